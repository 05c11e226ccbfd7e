// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Date & time parsing for `ExifTool`-formatted strings.

use core::fmt;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike};
use regex::Regex;

/// A capture date & time as stored in media file metadata: a local date & time
/// with an optional UTC offset, since many sources omit the time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureDateTime {
  pub date_time: NaiveDateTime,
  pub offset:    Option<FixedOffset>,
}

impl CaptureDateTime {
  /// Parses a date & time string into a `CaptureDateTime`. Assumes RFC3339
  /// format, but optionally without a time zone offset.
  pub fn parse(date_time: &str) -> Result<Self, String> {
    let re =
      Regex::new(r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:.\d{1,3})?)([+-]\d{2}:\d{2})?$")
        .unwrap();

    let caps = re.captures(date_time).ok_or(format!(
      "Date Time string `{date_time}` did not match regex."
    ))?;

    // If a time zone is present.
    if caps.get(2).is_some() {
      let date_time_parsed = DateTime::parse_from_rfc3339(caps.get(0).unwrap().as_str())
        .map_err(|e| format!("Unable to parse date & time `{date_time}` ({e})."))?;
      return Ok(Self {
        date_time: date_time_parsed.naive_local(),
        offset:    Some(*date_time_parsed.offset()),
      });
    }

    NaiveDateTime::parse_from_str(caps.get(1).unwrap().as_str(), "%Y-%m-%dT%H:%M:%S%.f")
      .map_err(|e| format!("Unable to parse date & time `{date_time}` ({e})."))
      .map(|d| Self {
        date_time: d,
        offset:    None,
      })
  }
}

impl Display for CaptureDateTime {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", self.date_time.format("%Y-%m-%dT%H:%M:%S"))?;
    if self.date_time.nanosecond() > 0 {
      write!(f, "{}", self.date_time.format("%.3f"))?;
    }
    if let Some(offset) = self.offset {
      write!(f, "{offset}")?;
    }
    Ok(())
  }
}
