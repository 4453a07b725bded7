use clap::Parser;
use featscan::corner::{CornerDetector, CornerMethod, HarrisConfig, MedianDiffConfig};
use featscan::processor::{match_pattern, render_corners, render_matches};
use featscan::{
    load_image, save_image, Corner, Match, MatchConfig, ParallelExecutor, PatternConfig,
    PatternOperation, Rect,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "FeatScan CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ProcessorConfig {
    Corners,
    Pattern,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CornerMethodConfig {
    Harris,
    MedianDifference,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct CornersJson {
    method: CornerMethodConfig,
    alpha: f32,
    harris_threshold: f32,
    median_threshold: u32,
    dmin: f32,
}

impl Default for CornersJson {
    fn default() -> Self {
        let harris = HarrisConfig::default();
        let median = MedianDiffConfig::default();
        Self {
            method: CornerMethodConfig::Harris,
            alpha: harris.alpha,
            harris_threshold: harris.threshold,
            median_threshold: median.threshold,
            dmin: harris.dmin,
        }
    }
}

impl CornersJson {
    fn method(&self) -> CornerMethod {
        match self.method {
            CornerMethodConfig::Harris => CornerMethod::Harris(HarrisConfig {
                alpha: self.alpha,
                threshold: self.harris_threshold,
                dmin: self.dmin,
            }),
            CornerMethodConfig::MedianDifference => {
                CornerMethod::MedianDifference(MedianDiffConfig {
                    threshold: self.median_threshold,
                    dmin: self.dmin,
                })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum OperationConfig {
    Predefined,
    Modified,
    UserDefined,
}

impl From<&OperationConfig> for PatternOperation {
    fn from(value: &OperationConfig) -> Self {
        match value {
            OperationConfig::Predefined => PatternOperation::Predefined,
            OperationConfig::Modified => PatternOperation::Modified,
            OperationConfig::UserDefined => PatternOperation::UserDefined,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
struct RectJson {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl From<RectJson> for Rect {
    fn from(value: RectJson) -> Self {
        Rect::new(value.x, value.y, value.width, value.height)
    }
}

impl From<Rect> for RectJson {
    fn from(value: Rect) -> Self {
        Self {
            x: value.x,
            y: value.y,
            width: value.width,
            height: value.height,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PatternJson {
    operation: OperationConfig,
    predefined: RectJson,
    rect: Option<RectJson>,
    contrast_factor: i32,
    intensity_offset: i32,
    n_results: usize,
    min_var_i: f64,
}

impl Default for PatternJson {
    fn default() -> Self {
        let cfg = PatternConfig::default();
        Self {
            operation: OperationConfig::Predefined,
            predefined: cfg.predefined.into(),
            rect: None,
            contrast_factor: cfg.adjust.contrast_factor,
            intensity_offset: cfg.adjust.intensity_offset,
            n_results: cfg.matching.n_results,
            min_var_i: cfg.matching.min_var_i,
        }
    }
}

impl PatternJson {
    fn config(&self) -> PatternConfig {
        let mut cfg = PatternConfig {
            predefined: self.predefined.into(),
            matching: MatchConfig {
                n_results: self.n_results,
                min_var_i: self.min_var_i,
            },
            ..PatternConfig::default()
        };
        cfg.adjust.contrast_factor = self.contrast_factor;
        cfg.adjust.intensity_offset = self.intensity_offset;
        cfg
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    output_path: Option<String>,
    output_image: Option<String>,
    processor: ProcessorConfig,
    threads: usize,
    corners: CornersJson,
    pattern: PatternJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            output_path: None,
            output_image: None,
            processor: ProcessorConfig::Corners,
            threads: 0,
            corners: CornersJson::default(),
            pattern: PatternJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CornerRecord {
    x: usize,
    y: usize,
    score: f32,
}

impl From<&Corner> for CornerRecord {
    fn from(value: &Corner) -> Self {
        Self {
            x: value.x,
            y: value.y,
            score: value.score,
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    rect: RectJson,
    score: f32,
}

impl From<&Match> for MatchRecord {
    fn from(value: &Match) -> Self {
        Self {
            rect: value.rect.into(),
            score: value.score,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Output {
    Corners { corners: Vec<CornerRecord> },
    Matches { matches: Vec<MatchRecord> },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("featscan=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() {
        return Err("image_path must be set in the config".into());
    }

    let exec = ParallelExecutor::with_threads(config.threads)?;
    let image = load_image(&config.image_path)?;
    tracing::info!(
        width = image.width(),
        height = image.height(),
        threads = exec.num_threads(),
        "loaded {}",
        config.image_path
    );

    let (output, rendered) = match config.processor {
        ProcessorConfig::Corners => {
            let detector = CornerDetector::new(config.corners.method()).with_executor(exec);
            let gray = image.to_gray();
            let corners = detector.detect(&gray)?;
            let rendered = render_corners(&gray, &corners);
            let corners = corners.iter().map(CornerRecord::from).collect();
            (Output::Corners { corners }, rendered)
        }
        ProcessorConfig::Pattern => {
            let gray = image.to_gray();
            let cfg = config.pattern.config();
            let op = PatternOperation::from(&config.pattern.operation);
            let rect = match op {
                PatternOperation::UserDefined => config
                    .pattern
                    .rect
                    .map(Rect::from)
                    .ok_or("pattern.rect must be set for the user_defined operation")?,
                PatternOperation::Predefined | PatternOperation::Modified => cfg.predefined,
            };
            let matches = match_pattern(&gray, op, rect, &cfg, &exec)?;
            let rendered = render_matches(&gray, &matches);
            let matches = matches.iter().map(MatchRecord::from).collect();
            (Output::Matches { matches }, rendered)
        }
    };

    if let Some(path) = &config.output_image {
        save_image(&rendered, path)?;
    }

    let json = serde_json::to_string_pretty(&output)?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
