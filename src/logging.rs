use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` wins; otherwise `debug` under `--debug` and `warn` without.
pub fn filter_directive(rust_log: Option<&str>, debug: bool) -> String {
    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directive) => directive.to_string(),
        None if debug => "debug".to_string(),
        None => "warn".to_string(),
    }
}

/// Logs go to stderr so tables on stdout stay clean.
pub fn init_tracing(debug: bool) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(rust_log.as_deref(), debug);
    let _ = fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_takes_precedence() {
        assert_eq!(filter_directive(Some("ddctl=trace"), false), "ddctl=trace");
        assert_eq!(filter_directive(Some("  "), true), "debug");
        assert_eq!(filter_directive(None, false), "warn");
    }
}
