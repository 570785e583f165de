/// Runtime options for an htmlcard host.
#[derive(Debug, Clone)]
pub struct Config {
    /// Filter directive used when `RUST_LOG` is not set.
    pub log_filter: String,
    pub profiling: ProfilingMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_filter: "info,htmlcard=debug".to_string(),
            profiling: ProfilingMode::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingMode {
    /// Profiling scopes are disabled
    Off,
    /// Profiling scopes are recorded in-process
    On,
    /// Profiling scopes are recorded and served to `puffin_viewer` over HTTP
    WithWebServer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.profiling, ProfilingMode::Off);
        assert!(config.log_filter.contains("htmlcard=debug"));
    }
}
