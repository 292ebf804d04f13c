use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` sets one.
///
/// The GPU stack logs a lot at `info`; keep it at `warn`.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "debug",
/// "shapes_engine=debug,wgpu_core=warn") and wins over `RUST_LOG`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Picks the filter: explicit config, then `RUST_LOG`, then [`DEFAULT_FILTER`].
pub fn resolve_filter(explicit: Option<&str>, env: Option<&str>) -> String {
    explicit
        .or(env)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let env = std::env::var("RUST_LOG").ok();
        let filter = resolve_filter(config.env_filter.as_deref(), env.as_deref());

        let mut builder = env_logger::Builder::new();
        builder
            .parse_filters(&filter)
            .write_style(config.write_style)
            .format_timestamp_millis();

        if builder.try_init().is_err() {
            // Another logger was installed first (e.g. by a test harness).
            return;
        }
        log::debug!("logging initialized with `{filter}`");
    });
}
