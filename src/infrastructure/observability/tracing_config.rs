pub const DEFAULT_DIRECTIVES: &str = "info,brand_guardian=debug,tower_http=debug";

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    /// Used when `RUST_LOG` is not set.
    pub default_directives: String,
}

impl TracingConfig {
    pub fn new(environment: impl Into<String>, json_format: bool) -> Self {
        Self {
            environment: environment.into(),
            json_format,
            default_directives: DEFAULT_DIRECTIVES.to_string(),
        }
    }

    pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
        self.default_directives = directives.into();
        self
    }
}

/// Reads the same variables as the settings loader: `APP_ENVIRONMENT` and
/// `APP_LOGGING__JSON`.
impl Default for TracingConfig {
    fn default() -> Self {
        Self::new(
            std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
            std::env::var("APP_LOGGING__JSON")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        )
    }
}
