//! Query-string construction for list endpoints.
//!
//! Parameters are appended in call order, which is the order each endpoint
//! declares them in. A parameter is emitted when it is *present*: `None` is
//! skipped, `Some(0)` is rendered as `0`. Only empty text is treated as unset.

/// Builds a canonical `?name=value&...` suffix from optional parameters.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    pairs: Vec<(&'static str, String)>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text parameter, percent-encoded. Skipped when `None` or empty.
    pub fn text(mut self, name: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.pairs.push((name, urlencoding::encode(value).into_owned()));
        }
        self
    }

    /// Append a numeric parameter in decimal. Skipped only when `None`.
    pub fn number(mut self, name: &'static str, value: Option<i64>) -> Self {
        if let Some(value) = value {
            self.pairs.push((name, value.to_string()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Render the suffix: `""` when nothing is present, otherwise `?a=1&b=2`.
    pub fn build(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        let joined = self
            .pairs
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("?{joined}")
    }
}
