//! Wire-format logging
//!
//! The invoking mod manager parses stdout line by line, so every event is
//! exactly one `[<level>] <message>` line with embedded newlines escaped.
//! Built on `tracing` with a custom event format.

use std::fmt::Write as _;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// One `[<level>] <message>` line per event.
pub struct LineFormat;

/// Wire name for a level. Note `warning`, not `warn`.
pub fn level_name(level: Level) -> &'static str {
    if level == Level::TRACE {
        "trace"
    } else if level == Level::DEBUG {
        "debug"
    } else if level == Level::INFO {
        "info"
    } else if level == Level::WARN {
        "warning"
    } else {
        "error"
    }
}

/// Parse a `--logLevel` value; unknown names fall back to `info`.
pub fn level_from_str(name: &str) -> Level {
    match name {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Escape embedded line breaks so one event stays one line.
pub fn escape_newlines(message: &str) -> String {
    message.replace('\n', "\\n").replace('\r', "\\r")
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let mut message = String::new();
        ctx.field_format()
            .format_fields(Writer::new(&mut message), event)?;

        writeln!(
            writer,
            "[{}] {}",
            level_name(*event.metadata().level()),
            escape_newlines(&message)
        )
    }
}

/// Install the stdout subscriber with the wire format.
pub fn init(level: Level) {
    tracing_subscriber::fmt()
        .event_format(LineFormat)
        .with_max_level(level)
        .with_writer(std::io::stdout)
        .init();
}
