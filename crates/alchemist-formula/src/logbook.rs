//! Human-readable progress logging.
//!
//! Both assistants report through the same [`Logbook`]: info messages are
//! always emitted, debug messages only in verbose mode. Messages are plain
//! `tracing` events; [`BracketFormat`] renders them as `[INFO] message` lines.

use std::fmt;

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// The logging collaborator shared by the assistants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Logbook {
    verbose: bool,
}

impl Logbook {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Emit a debug message; silent unless verbose.
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            tracing::debug!("{msg}");
        }
    }

    /// Emit an info message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }
}

/// Event formatter producing `[LEVEL] message` lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketFormat;

impl<S, N> FormatEvent<S, N> for BracketFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "[{}] ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
