//! Diagnostics writer handed to command listeners.
use log::*;

/// Output verbosity levels, from always-shown to debug-only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    VeryVerbose,
    Debug,
}

/// Line oriented diagnostics sink.
#[cfg_attr(test, mockall::automock)]
pub trait Io {
    /// Write a single line, shown only when the sink runs at `verbosity` or
    /// higher.
    fn write_line(&self, line: &str, verbosity: Verbosity);
}

/// [`Io`] implementation that forwards lines to the `log` facade, leaving the
/// filtering to whatever logger the binary installed.
#[derive(Debug, Default)]
pub struct LogIo {}

impl LogIo {
    pub fn new() -> Self {
        Self {}
    }
}

impl Io for LogIo {
    fn write_line(&self, line: &str, verbosity: Verbosity) {
        match verbosity {
            Verbosity::Quiet => {}
            Verbosity::Normal => info!("{line}"),
            Verbosity::Verbose | Verbosity::VeryVerbose | Verbosity::Debug => {
                debug!("{line}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_orders_from_quiet_to_debug() {
        assert!(Verbosity::Quiet < Verbosity::Normal);
        assert!(Verbosity::Normal < Verbosity::Verbose);
        assert!(Verbosity::VeryVerbose < Verbosity::Debug);
        assert_eq!(Verbosity::default(), Verbosity::Normal);
    }

    #[test_log::test]
    fn log_io_accepts_every_verbosity() {
        let io = LogIo::new();
        io.write_line("quiet", Verbosity::Quiet);
        io.write_line("normal", Verbosity::Normal);
        io.write_line("debug", Verbosity::Debug);
    }
}
