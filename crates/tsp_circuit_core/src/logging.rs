use std::{fs::File, io::Write};

use env_logger::{Builder, Target, WriteStyle, fmt::Formatter};
use log::Record;

use crate::{
    Error, Result,
    options::{LogFormat, SolverOptions},
};

/// Installs the global logger described by `options`. Fails if a logger is
/// already set or the log file cannot be created.
pub fn init_logger(options: &SolverOptions) -> Result<()> {
    let mut builder = builder(options);

    if let Some(log_path) = options.log_output_path() {
        let log_file = File::create(log_path).map_err(|e| {
            Error::other(format!(
                "failed to create log output file {}: {e}",
                log_path.display()
            ))
        })?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

fn builder(options: &SolverOptions) -> Builder {
    let (format, timestamp) = (options.log_format, options.log_timestamp);

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(WriteStyle::Never)
        .format(move |buf: &mut Formatter, record| {
            let line = render(format, record);
            if timestamp {
                writeln!(buf, "{} {line}", buf.timestamp_millis())
            } else {
                writeln!(buf, "{line}")
            }
        });
    builder
}

/// Record text without the timestamp: `LEVEL message`, with the target in
/// brackets for the pretty format.
fn render(format: LogFormat, record: &Record<'_>) -> String {
    let level = record.level().as_str();
    match format {
        LogFormat::Compact => format!("{level} {}", record.args()),
        LogFormat::Pretty => format!("{level} [{}] {}", record.target(), record.args()),
    }
}

#[cfg(test)]
mod tests {
    use log::{Level, Record};

    use super::{init_logger, render};
    use crate::options::{LogFormat, SolverOptions};

    #[test]
    fn compact_lines_carry_level_and_message() {
        let line = render(
            LogFormat::Compact,
            &Record::builder()
                .args(format_args!("solver: start n=4"))
                .level(Level::Info)
                .target("tsp_circuit_core::solver")
                .build(),
        );
        assert_eq!(line, "INFO solver: start n=4");
    }

    #[test]
    fn pretty_lines_name_the_target() {
        let line = render(
            LogFormat::Pretty,
            &Record::builder()
                .args(format_args!("odd=22 exceeds 20"))
                .level(Level::Warn)
                .target("christofides")
                .build(),
        );
        assert_eq!(line, "WARN [christofides] odd=22 exceeds 20");
    }

    #[test]
    fn unwritable_log_file_is_reported() {
        let options = SolverOptions {
            log_output: std::env::temp_dir()
                .join("tsp-circuit-no-such-dir")
                .join("nested")
                .join("run.log")
                .display()
                .to_string(),
            ..SolverOptions::default()
        };
        let err = init_logger(&options).expect_err("parent directory does not exist");
        assert!(err.to_string().contains("failed to create log output file"));
    }
}
