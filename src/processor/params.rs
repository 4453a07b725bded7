//! Parameter acquisition seam between processors and their host.

use crate::image::Rect;
use std::collections::HashMap;

/// Supplies processor parameters; `None` means the user cancelled.
pub trait ParamSource {
    /// Picks one of `options`, returning its index.
    fn choose(&mut self, title: &str, options: &[&str], default: usize) -> Option<usize>;

    /// Asks for a floating-point value.
    fn float(&mut self, name: &str, default: f32) -> Option<f32>;

    /// Asks for an integer value.
    fn integer(&mut self, name: &str, default: i64) -> Option<i64>;

    /// Asks for a rectangle in image coordinates.
    fn rect(&mut self, name: &str, default: Rect) -> Option<Rect>;
}

/// Accepts every default.
#[derive(Clone, Copy, Debug, Default)]
pub struct Defaults;

impl ParamSource for Defaults {
    fn choose(&mut self, _title: &str, _options: &[&str], default: usize) -> Option<usize> {
        Some(default)
    }

    fn float(&mut self, _name: &str, default: f32) -> Option<f32> {
        Some(default)
    }

    fn integer(&mut self, _name: &str, default: i64) -> Option<i64> {
        Some(default)
    }

    fn rect(&mut self, _name: &str, default: Rect) -> Option<Rect> {
        Some(default)
    }
}

/// Cancels at the first question.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cancel;

impl ParamSource for Cancel {
    fn choose(&mut self, _title: &str, _options: &[&str], _default: usize) -> Option<usize> {
        None
    }

    fn float(&mut self, _name: &str, _default: f32) -> Option<f32> {
        None
    }

    fn integer(&mut self, _name: &str, _default: i64) -> Option<i64> {
        None
    }

    fn rect(&mut self, _name: &str, _default: Rect) -> Option<Rect> {
        None
    }
}

/// A preset answer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
    /// Index into an option list.
    Choice(usize),
    /// Floating-point value.
    Float(f32),
    /// Integer value.
    Integer(i64),
    /// Rectangle.
    Rect(Rect),
    /// Cancel when this question is asked.
    Cancel,
}

/// Answers from a map keyed by question title or parameter name.
///
/// Missing keys and answers of the wrong type fall back to the default;
/// a choice index past the option list does too.
#[derive(Clone, Debug, Default)]
pub struct Preset {
    values: HashMap<String, ParamValue>,
}

impl Preset {
    /// Creates an empty preset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an answer.
    pub fn with(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Adds or replaces an answer in place.
    pub fn set(&mut self, key: impl Into<String>, value: ParamValue) {
        self.values.insert(key.into(), value);
    }

    /// Returns the answer stored for `key`.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }
}

impl ParamSource for Preset {
    fn choose(&mut self, title: &str, options: &[&str], default: usize) -> Option<usize> {
        match self.values.get(title) {
            Some(ParamValue::Choice(idx)) if *idx < options.len() => Some(*idx),
            Some(ParamValue::Cancel) => None,
            _ => Some(default),
        }
    }

    fn float(&mut self, name: &str, default: f32) -> Option<f32> {
        match self.values.get(name) {
            Some(ParamValue::Float(v)) => Some(*v),
            Some(ParamValue::Integer(v)) => Some(*v as f32),
            Some(ParamValue::Cancel) => None,
            _ => Some(default),
        }
    }

    fn integer(&mut self, name: &str, default: i64) -> Option<i64> {
        match self.values.get(name) {
            Some(ParamValue::Integer(v)) => Some(*v),
            Some(ParamValue::Cancel) => None,
            _ => Some(default),
        }
    }

    fn rect(&mut self, name: &str, default: Rect) -> Option<Rect> {
        match self.values.get(name) {
            Some(ParamValue::Rect(r)) => Some(*r),
            Some(ParamValue::Cancel) => None,
            _ => Some(default),
        }
    }
}
