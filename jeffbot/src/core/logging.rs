use std::{any::Any, fmt::Result as FmtResult, panic};

use jeffbot_util::datetime::NAIVE_DATETIME_FORMAT;
use time::format_description::FormatItem;
use tracing::{Event, Metadata, Subscriber};
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling,
};
use tracing_subscriber::{
    fmt::{
        format::Writer,
        time::{FormatTime, UtcTime},
        FmtContext, FormatEvent, FormatFields, Layer,
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer as _,
};

const LOG_DIR: &str = "./logs";
const LOG_FILE: &str = "jeffbot.log";

const STDOUT_FILTER: &str = "jeffbot=debug,info";
const FILE_FILTER: &str = "jeffbot=trace,info";

/// Installs the stdout and file subscribers plus a panic hook.
///
/// The returned guard flushes the file writer when dropped.
pub fn init() -> WorkerGuard {
    let (file_writer, guard) = NonBlocking::new(rolling::daily(LOG_DIR, LOG_FILE));

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(FILE_FILTER));

    let stdout_layer = Layer::default()
        .event_format(JeffFormat::new(false))
        .with_filter(EnvFilter::new(STDOUT_FILTER));

    let file_layer = Layer::default()
        .event_format(JeffFormat::new(true))
        .with_writer(file_writer)
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    log_panics();

    guard
}

fn log_panics() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let payload = panic_payload(info.payload());
        let location = info.location().map(ToString::to_string);
        error!(payload, location, "Jeff panicked");

        default_hook(info);
    }));
}

fn panic_payload(payload: &(dyn Any + Send)) -> Option<&str> {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
}

/// `<utc time> <level> [file:line] <fields>`, the source only if enabled.
struct JeffFormat {
    timer: UtcTime<&'static [FormatItem<'static>]>,
    with_source: bool,
}

impl JeffFormat {
    fn new(with_source: bool) -> Self {
        Self {
            timer: UtcTime::new(NAIVE_DATETIME_FORMAT),
            with_source,
        }
    }

    fn write_source(writer: &mut Writer<'_>, metadata: &Metadata<'_>) -> FmtResult {
        let Some(file) = metadata.file() else {
            return Ok(());
        };

        match metadata.line() {
            Some(line) => write!(writer, "[{file}:{line}] "),
            None => write!(writer, "[{file}] "),
        }
    }
}

impl<S, N> FormatEvent<S, N> for JeffFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> FmtResult {
        let metadata = event.metadata();

        self.timer.format_time(&mut writer)?;
        write!(writer, " {:>5} ", metadata.level())?;

        if self.with_source {
            Self::write_source(&mut writer, metadata)?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters_parse() {
        assert!(STDOUT_FILTER.parse::<EnvFilter>().is_ok());
        assert!(FILE_FILTER.parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn panic_payloads() {
        let literal: Box<dyn Any + Send> = Box::new("sniffed too hard");
        assert_eq!(panic_payload(&*literal), Some("sniffed too hard"));

        let owned: Box<dyn Any + Send> = Box::new(String::from("no pokemon"));
        assert_eq!(panic_payload(&*owned), Some("no pokemon"));

        let other: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_payload(&*other), None);
    }
}
