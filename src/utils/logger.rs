use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How log events are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LogFormat {
    /// One short line per event, for terminals.
    #[default]
    Compact,
    /// One JSON object per event with fields at the top level and no
    /// timestamp; CloudWatch adds its own.
    Json,
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "newrelic_mute=debug,info"
    } else {
        "newrelic_mute=info"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. Call once per process.
pub fn init_logger(format: LogFormat, verbose: bool) {
    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);
    let registry = tracing_subscriber::registry().with(env_filter(verbose));

    match format {
        LogFormat::Compact => registry.with(layer.compact()).init(),
        LogFormat::Json => registry
            .with(layer.without_time().json().flatten_event(true))
            .init(),
    }
}

pub fn init_lambda_logger() {
    init_logger(LogFormat::Json, false);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_crate_level_to_debug() {
        assert_eq!(default_directive(false), "newrelic_mute=info");
        assert_eq!(default_directive(true), "newrelic_mute=debug,info");
    }

    #[test]
    fn default_directives_parse() {
        for verbose in [false, true] {
            assert!(default_directive(verbose).parse::<EnvFilter>().is_ok());
        }
    }

    #[test]
    fn compact_is_the_default_format() {
        assert_eq!(LogFormat::default(), LogFormat::Compact);
    }
}
