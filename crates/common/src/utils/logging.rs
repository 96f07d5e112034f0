use std::io;
use configs::{LogConfig, LogFormat};
use tracing::Span;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing subscriber with sensible defaults and stdout writer.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info` for the app, tower_http and axum, `warn` for sqlx
pub fn init_logging_default() {
    init_logging(&LogConfig::default());
}

/// Initialize the subscriber from the `[log]` config section.
/// - `RUST_LOG` wins over `log.level` when present
/// - `log.format = "json"` emits one JSON object per event
/// - Safe to call more than once; later calls are no-ops
pub fn init_logging(cfg: &LogConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&cfg.level)));
    let builder = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stdout);
    let _ = match cfg.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

fn default_directives(level: &str) -> String {
    format!("{level},tower_http={level},axum={level},sqlx=warn")
}

/// Logging handle handed to components at construction time.
///
/// Each component owns a span naming it; instrumented methods open their
/// spans as children of it, so every event carries the component it came from.
#[derive(Clone, Debug)]
pub struct Logger {
    span: Span,
}

impl Logger {
    /// Root handle for a component. Create it after the subscriber is installed.
    pub fn new(component: &'static str) -> Self {
        Self { span: tracing::info_span!("component", name = component) }
    }

    /// Handle whose span is disabled; events still reach the subscriber without a parent.
    pub fn disabled() -> Self {
        Self { span: Span::none() }
    }

    pub fn child(&self, component: &'static str) -> Self {
        Self { span: tracing::info_span!(parent: &self.span, "component", name = component) }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_follow_configured_level() {
        assert_eq!(default_directives("debug"), "debug,tower_http=debug,axum=debug,sqlx=warn");
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(&LogConfig::default());
        init_logging(&LogConfig { level: "debug".into(), format: LogFormat::Json });
    }

    #[test]
    fn disabled_logger_has_no_span() {
        let root = Logger::disabled();
        assert!(root.span().is_disabled());
        assert!(root.span().id().is_none());
    }
}
