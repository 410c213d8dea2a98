use std::io;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info,sqlx=warn";

/// Initialize tracing subscriber with sensible defaults and stdout writer.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info,tower_http=info,axum=info,sqlx=warn`
/// - Writes to stdout to improve visibility in environments that hide stderr
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// Same filter rules as [`init_logging_default`]; used outside local development
/// so that log shippers can parse `operation` and `error` fields.
pub fn init_logging_json() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// Pick the subscriber format from the configured environment name.
/// `local` (or an empty value) keeps the compact human format.
pub fn init_logging_for_env(env: &str) {
    if is_local(env) {
        init_logging_default();
    } else {
        init_logging_json();
    }
}

fn is_local(env: &str) -> bool {
    let env = env.trim();
    env.is_empty() || env.eq_ignore_ascii_case("local")
}

#[cfg(test)]
mod tests {
    use super::is_local;

    #[test]
    fn local_env_detection() {
        assert!(is_local("local"));
        assert!(is_local(" LOCAL "));
        assert!(is_local(""));
        assert!(!is_local("prod"));
        assert!(!is_local("dev"));
    }
}
