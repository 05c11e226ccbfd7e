// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Program setup functions.

use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Sets up `env_logger` with the format "LEVEL message" (e.g. "WARN something
/// went wrong").
///
/// Log levels:
/// Error: Link conflicts and failed operations.
/// Warn: Anomalies and skipped files with existing sidecars.
/// Info: General program flow and file operations.
/// Debug: Detailed planning decisions.
pub fn configure_logging(verbosity: u8) {
  let level = match verbosity {
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };

  Builder::new()
    .filter_level(level)
    .format(|buf, record| {
      let style = buf.default_level_style(record.level());
      writeln!(buf, "{style}{}{style:#}\t{}", record.level(), record.args())
    })
    .init();
}
