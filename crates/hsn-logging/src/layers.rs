//! Output layers for the HSN webhook subscriber
//!
//! Every layer is boxed against the filtered registry so the builder can
//! assemble any combination of console and file output without one match arm
//! per combination.

use std::fs::{self, File};
use std::io::{self, IsTerminal};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Layer, Layered};
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::{ConsoleOutput, EventFields, FileConfig, FileRotation};

/// The registry after the global level filter is applied
pub type FilteredRegistry = Layered<EnvFilter, Registry>;

/// A type-erased output layer
pub type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync + 'static>;

/// Console layer in the requested format, or `None` when the console is off
pub fn console_layer(console: ConsoleOutput, fields: EventFields) -> Option<BoxedLayer> {
    match console {
        ConsoleOutput::Off => None,
        ConsoleOutput::Pretty => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(io::stdout().is_terminal())
                .with_target(true)
                .boxed(),
        ),
        ConsoleOutput::Json => Some(json_layer(io::stdout, fields)),
    }
}

/// JSONL layer writing to a non-blocking file writer
pub fn jsonl_file_layer(writer: NonBlocking, fields: EventFields) -> BoxedLayer {
    json_layer(writer, fields)
}

fn json_layer<W>(writer: W, fields: EventFields) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_ansi(false)
        .with_current_span(true)
        .with_span_list(fields.span_list)
        .flatten_event(true)
        .with_file(fields.source_location)
        .with_line_number(fields.source_location)
        .with_writer(writer)
        .boxed()
}

/// Open the file writer for `file`.
///
/// `Never` truncates a single `<prefix>.log`; the other strategies append to
/// rolling files. The returned guard must outlive the subscriber or buffered
/// lines are lost.
pub fn file_writer(file: &FileConfig) -> io::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(&file.directory)?;

    let rotation = match file.rotation {
        FileRotation::Never => {
            let path = file.directory.join(format!("{}.log", file.prefix));
            return Ok(tracing_appender::non_blocking(File::create(path)?));
        }
        FileRotation::Daily => Rotation::DAILY,
        FileRotation::Hourly => Rotation::HOURLY,
    };

    let appender = RollingFileAppender::new(rotation, &file.directory, &file.prefix);
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_writer_never_creates_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig {
            rotation: FileRotation::Never,
            ..FileConfig::new(dir.path().join("nested"))
        };

        let (_writer, _guard) = file_writer(&config).unwrap();
        assert!(dir.path().join("nested").join("hsn-webhook.log").exists());
    }

    #[test]
    fn test_file_writer_rolling_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig {
            rotation: FileRotation::Hourly,
            ..FileConfig::new(dir.path().join("rolling"))
        };

        let (_writer, _guard) = file_writer(&config).unwrap();
        assert!(dir.path().join("rolling").is_dir());
    }

    #[test]
    fn test_console_layer_per_output() {
        let fields = EventFields::default();
        assert!(console_layer(ConsoleOutput::Off, fields).is_none());
        assert!(console_layer(ConsoleOutput::Json, fields).is_some());
        assert!(console_layer(ConsoleOutput::Pretty, fields).is_some());
    }
}
