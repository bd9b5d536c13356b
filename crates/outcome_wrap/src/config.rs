#[non_exhaustive]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Log panics caught at a wrap boundary at `debug` level.
    pub log_contained: bool,
    /// Also hand contained panics to the previously installed panic hook.
    pub forward_contained: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_contained: true,
            forward_contained: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_contained(self, log_contained: bool) -> Self {
        Self {
            log_contained,
            ..self
        }
    }

    pub fn with_forward_contained(self, forward_contained: bool) -> Self {
        Self {
            forward_contained,
            ..self
        }
    }
}
