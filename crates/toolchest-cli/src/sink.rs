//! Terminal log sink with severity colors.

use console::style;

use toolchest_core::{LogLevel, LogSink};

/// Prints engine log lines to the terminal, colored by severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalSink;

impl LogSink for TerminalSink {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => println!("{message}"),
            LogLevel::Success => println!("{}", style(message).green()),
            LogLevel::Warning => println!("{}", style(message).yellow()),
            LogLevel::Error => eprintln!("{}", style(message).red()),
            LogLevel::Debug => println!("{}", style(message).dim()),
        }
    }
}
