use tracing_subscriber::EnvFilter;

/// Selects the JSON formatter when set to `json`.
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Installs the global subscriber. `RUST_LOG` controls the filter and
/// defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(ENV_LOG_FORMAT)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
