use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

// `TraceLayer` emits request spans and responses at DEBUG, failures at ERROR.
fn fallback_directives(verbose: bool, level: Option<&str>) -> String {
    match (verbose, level) {
        (true, _) => "entregador=debug,tower_http=debug,info".to_string(),
        (false, Some(level)) => format!("entregador={},tower_http=error", level),
        (false, None) => "entregador=info,tower_http=error".to_string(),
    }
}

fn env_filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_directives(verbose, level)))
}

/// Installs the global subscriber. `RUST_LOG` always wins over `level`.
pub fn init_logger(verbose: bool, level: Option<&str>, format: LogFormat) {
    let filter = env_filter(verbose, level);

    match format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .init(),
    }
}

/// Keeps the first and last character of personal data, e.g. `M*********a`.
pub fn mask_text(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= 2 {
        return text.to_string();
    }

    let mut masked = String::with_capacity(text.len());
    masked.push(chars[0]);
    masked.extend(std::iter::repeat('*').take(chars.len() - 2));
    masked.push(chars[chars.len() - 1]);
    masked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_text() {
        assert_eq!(mask_text("Maria Silva"), "M*********a");
        assert_eq!(mask_text("Jo"), "Jo");
        assert_eq!(mask_text(""), "");
        assert_eq!(mask_text("Zé"), "Zé");
        assert_eq!(mask_text("João"), "J**o");
    }

    #[test]
    fn test_verbose_fallback_enables_http_traces() {
        assert!(fallback_directives(true, None).contains("tower_http=debug"));
        assert!(fallback_directives(true, Some("warn")).contains("entregador=debug"));
        assert_eq!(
            fallback_directives(false, Some("warn")),
            "entregador=warn,tower_http=error"
        );
        assert_eq!(
            fallback_directives(false, None),
            "entregador=info,tower_http=error"
        );
    }

    #[test]
    fn test_log_format_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: LogFormat,
        }

        let parsed: Wrapper = toml::from_str("format = \"json\"").unwrap();
        assert_eq!(parsed.format, LogFormat::Json);
    }
}
