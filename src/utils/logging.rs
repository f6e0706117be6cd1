use crate::utils::toml_config::{LogFormat, ServerConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builds the log filter: `RUST_LOG` wins, then `--verbose`, then `server.log_level`.
pub fn env_filter(server: &ServerConfig, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { server.log_level.as_str() };
        EnvFilter::new(format!("{level},tower_http=info"))
    })
}

/// Installs the global tracing subscriber. Safe to call more than once; later
/// calls are ignored.
pub fn init_tracing(server: &ServerConfig, verbose: bool) {
    let filter = env_filter(server, verbose);
    let registry = tracing_subscriber::registry().with(filter);

    let result = match server.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
