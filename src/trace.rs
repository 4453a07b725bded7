//! Feature-gated tracing macros.
//!
//! With the `tracing` feature enabled these forward to the `tracing` crate.
//! Without it, spans become [`NoopSpan`] and events only evaluate their
//! field values. Pipeline stages open a span per stage and report candidate
//! counts as events.

/// Opens an info-level span named after a pipeline stage.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($stage:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info_span!($stage $(, $key = $value)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($stage:literal $(, $key:ident = $value:expr)* $(,)?) => {{
        $(let _ = &$value;)*
        $crate::trace::NoopSpan
    }};
}

/// Emits an event with key/value fields.
///
/// The level defaults to info; `trace_event!(debug: "name", k = v)` selects
/// another `tracing` level macro by name.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($level:ident: $name:literal, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::$level!(name: $name, $($key = $value),+)
    };
    ($name:literal, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($level:ident: $name:literal, $($key:ident = $value:expr),+ $(,)?) => {
        $(let _ = &$value;)+
    };
    ($name:literal, $($key:ident = $value:expr),+ $(,)?) => {
        $(let _ = &$value;)+
    };
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Span guard used when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Returns the guard unchanged, matching `tracing::Span::entered`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
