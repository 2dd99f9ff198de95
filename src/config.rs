//! Output configuration for token and state dumps.

/// Dump output configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpConfig {
    /// Output format
    pub format: OutputFormat,
    /// Whether to print each token's byte span
    pub show_spans: bool,
    /// Whether to print each token's source text
    pub show_text: bool,
    /// Whether to drop tokens the host lexed itself and keep only scanner tokens
    pub external_only: bool,
}

/// Output format for dumps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One token per line
    Text,
    /// A pretty-printed JSON array
    Json,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_spans: false,
            show_text: true,
            external_only: false,
        }
    }
}

impl DumpConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Print byte spans
    pub fn with_spans(mut self, show: bool) -> Self {
        self.show_spans = show;
        self
    }

    /// Print token text
    pub fn with_text(mut self, show: bool) -> Self {
        self.show_text = show;
        self
    }

    /// Keep only scanner-produced tokens
    pub fn with_external_only(mut self, external_only: bool) -> Self {
        self.external_only = external_only;
        self
    }
}
