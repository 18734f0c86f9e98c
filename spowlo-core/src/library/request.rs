//! Requests to and responses from the download library.

use std::time::Duration;

/// A command-style invocation of the library.
///
/// With no URLs the request is a bare option list (e.g. `-v`); otherwise it
/// becomes `download <urls...> <options...>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpotDlRequest {
    urls: Vec<String>,
    options: Vec<String>,
}

impl SpotDlRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            options: Vec::new(),
        }
    }

    /// Add a flag such as `--no-cache`.
    pub fn add_option(&mut self, option: impl Into<String>) -> &mut Self {
        self.options.push(option.into());
        self
    }

    /// Add an option followed by its value.
    pub fn add_option_value(
        &mut self,
        option: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.options.push(option.into());
        self.options.push(value.into());
        self
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// The value following `option`, if present.
    pub fn option_value(&self, option: &str) -> Option<&str> {
        self.options
            .iter()
            .position(|o| o == option)
            .and_then(|i| self.options.get(i + 1))
            .map(String::as_str)
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Full argument list for the executable.
    pub fn build_args(&self) -> Vec<String> {
        if self.urls.is_empty() {
            return self.options.clone();
        }
        let mut args = Vec::with_capacity(1 + self.urls.len() + self.options.len());
        args.push("download".to_string());
        args.extend(self.urls.iter().cloned());
        args.extend(self.options.iter().cloned());
        args
    }
}

/// Result of a completed library invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotDlResponse {
    /// Trimmed standard output.
    pub output: String,
    pub error_output: String,
    pub exit_code: i32,
    pub elapsed: Duration,
}
