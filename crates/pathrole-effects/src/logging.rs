// Tracing initialization for binaries, demos and tests

use std::sync::Once;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

static TEST_INIT: Once = Once::new();

/// Crates whose events a bare level applies to; everything else stays at `warn`.
const CRATE_TARGETS: [&str; 2] = ["pathrole_effects", "pathrole_error"];

/// Expand a filter setting into an `EnvFilter` directive string.
///
/// A bare level such as `"debug"` is scoped to this workspace's crates so that
/// dependencies stay quiet. Anything containing `=` or `,` is taken verbatim.
pub fn filter_directive(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    let mut directive = String::from("warn");
    for target in CRATE_TARGETS {
        directive.push_str(&format!(",{target}={level}"));
    }
    directive
}

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` wins over `log_level` when set. Pretty output carries targets
/// and span context so a refused call can be traced back to its model.
pub fn init_tracing(log_level: Option<&str>, json_output: Option<bool>) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directive = filter_directive(log_level.unwrap_or("info"));
            EnvFilter::try_new(&directive)
                .with_context(|| format!("invalid log filter `{directive}`"))?
        }
    };

    let subscriber = Registry::default().with(env_filter);

    if json_output.unwrap_or(false) {
        let json_layer = fmt::layer().json().with_current_span(true);
        tracing::subscriber::set_global_default(subscriber.with(json_layer))
            .context("installing JSON tracing subscriber")?;
    } else {
        let fmt_layer = fmt::layer().compact().with_target(true);
        tracing::subscriber::set_global_default(subscriber.with(fmt_layer))
            .context("installing tracing subscriber")?;
    }

    Ok(())
}

/// Initialize test logging at debug level for this workspace, once per test binary.
pub fn init_test_logging() {
    TEST_INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directive("debug")));
        let fmt_layer = fmt::layer().with_target(true).with_test_writer();
        let _ = tracing::subscriber::set_global_default(
            Registry::default().with(env_filter).with(fmt_layer),
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_level_is_scoped_to_workspace_crates() {
        assert_eq!(
            filter_directive("debug"),
            "warn,pathrole_effects=debug,pathrole_error=debug"
        );
        assert_eq!(filter_directive(" trace "), "warn,pathrole_effects=trace,pathrole_error=trace");
    }

    #[test]
    fn test_explicit_directives_pass_through() {
        assert_eq!(filter_directive("pathrole_effects=trace"), "pathrole_effects=trace");
        assert_eq!(filter_directive("info,tempfile=off"), "info,tempfile=off");
    }

    #[test]
    fn test_init_test_logging_is_idempotent() {
        init_test_logging();
        init_test_logging();
        tracing::debug!("test logging initialized");
    }

    #[test]
    fn test_second_global_init_fails() {
        init_test_logging();
        // A subscriber is already installed for this test binary.
        assert!(init_tracing(Some("info"), None).is_err());
    }
}
