use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directive applied when neither `CUPCAKES_LOG` nor `RUST_LOG` is set.
/// Failed catalog calls are logged at warn.
pub const DEFAULT_DIRECTIVE: &str = "cupcake_cli=warn";

/// Pick the filter directive: `CUPCAKES_LOG` first, then `RUST_LOG`, then
/// the default. Blank values count as unset.
pub fn filter_directive(lookup: impl Fn(&str) -> Option<String>) -> String {
    ["CUPCAKES_LOG", "RUST_LOG"]
        .iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

/// Initialize structured JSON logging on stderr (e.g.
/// `CUPCAKES_LOG=cupcake_cli=debug`). Stdout stays reserved for the page.
pub fn init_logging() {
    let directive = filter_directive(|key| std::env::var(key).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn directive(pairs: &[(&str, &str)]) -> String {
        let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
        filter_directive(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_default_directive_keeps_warnings() {
        assert_eq!(directive(&[]), "cupcake_cli=warn");
    }

    #[test]
    fn test_cupcakes_log_wins_over_rust_log() {
        let picked = directive(&[("CUPCAKES_LOG", "cupcake_cli=debug"), ("RUST_LOG", "info")]);
        assert_eq!(picked, "cupcake_cli=debug");
    }

    #[test]
    fn test_rust_log_used_when_cupcakes_log_unset() {
        assert_eq!(directive(&[("RUST_LOG", "cupcake_cli=info")]), "cupcake_cli=info");
        assert_eq!(directive(&[("CUPCAKES_LOG", " "), ("RUST_LOG", "trace")]), "trace");
    }

    #[test]
    fn test_default_directive_parses() {
        assert!(EnvFilter::try_new(DEFAULT_DIRECTIVE).is_ok());
    }
}
