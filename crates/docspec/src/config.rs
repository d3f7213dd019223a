/// How the converter treats a fractional number where an integer is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FractionalIntegers {
    /// Truncate toward zero without a diagnostic
    Truncate,
    /// Truncate toward zero and record a warning
    #[default]
    Warn,
    /// Record an error
    Reject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Deepest nesting either engine descends into; `None` disables the limit.
    pub max_depth: Option<usize>,
    pub fractional_integers: FractionalIntegers,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: Some(256),
            fractional_integers: FractionalIntegers::default(),
        }
    }
}
