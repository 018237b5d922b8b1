//! Logging setup for camwatch.
//!
//! Output goes through `tracing` with a compact single-line format. The
//! default filter scopes to this crate's targets (`camwatch` for the
//! library, `camctl` for the binary) so dependency noise stays out unless
//! explicitly requested via `RUST_LOG`.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Info and above.
    #[default]
    Normal,
    /// Debug and above.
    Verbose,
    /// Everything, including trace.
    Trace,
}

impl Verbosity {
    /// The maximum `tracing` level this verbosity admits.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directives covering the library and the CLI binary.
    #[must_use]
    pub fn directives(self) -> String {
        let level = self.level();
        format!("camwatch={level},camctl={level}")
    }
}

/// Initialize the logging system.
///
/// Called once at startup. `RUST_LOG` overrides the verbosity-derived
/// filter entirely when set. Calling this again is a no-op.
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directives()));

    // Targets only matter once the user asks for detail
    let show_target = matches!(verbosity, Verbosity::Verbose | Verbosity::Trace);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().compact().with_target(show_target));

    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(Verbosity::Quiet.level(), Level::ERROR);
        assert_eq!(Verbosity::Normal.level(), Level::INFO);
        assert_eq!(Verbosity::Verbose.level(), Level::DEBUG);
        assert_eq!(Verbosity::Trace.level(), Level::TRACE);
    }

    #[test]
    fn test_verbosity_default() {
        assert_eq!(Verbosity::default(), Verbosity::Normal);
    }

    #[test]
    fn test_directives_cover_both_targets() {
        let directives = Verbosity::Verbose.directives();
        assert!(directives.contains("camwatch=DEBUG"));
        assert!(directives.contains("camctl=DEBUG"));
    }

    #[test]
    fn test_init_logging_is_reentrant() {
        // The subscriber may already be installed by another test; the
        // second call must not panic.
        init_logging(Verbosity::Normal);
        init_logging(Verbosity::Verbose);
    }
}
