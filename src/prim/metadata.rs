// Copyright 2025 Seth Pendergrass. See LICENSE.

//! `ExifTool` metadata handling for media files.

use core::fmt;
use std::{
  fmt::{Display, Formatter},
  path::{Path, PathBuf},
};

use serde::Deserialize;

use super::CaptureDateTime;

/// Metadata for an image or video file, as reported by `ExifTool`.
///
/// Names are from `ExifTool`'s tags: <https://exiftool.org/TagNames/>.
#[derive(Default, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Metadata {
  // General.
  pub source_file: PathBuf,
  pub file_size:   Option<u64>, // Bytes, via `-FileSize#`.

  // For Live Photos.
  pub content_identifier: Option<String>,

  // Passed through from ExifTool's composite tag; planning never consumes it.
  #[serde(rename = "GPSPosition")]
  pub gps_position: Option<String>,

  // Date & Time.
  //
  // Capture date precedence follows what export pipelines actually populate:
  // DateTimeOriginal (shutter actuation), then CreateDate (file creation),
  // then XMP's DateCreated. Videos without any of these may still carry a
  // usable date on their tracks (MediaCreateDate / TrackCreateDate).
  pub date_time_original: Option<String>,
  pub create_date:        Option<String>,
  pub date_created:       Option<String>,
  pub media_create_date:  Option<String>,
  pub track_create_date:  Option<String>,
}

impl Metadata {
  /// Gets the capture date & time for this file, if any tag carries one. The
  /// boolean is true when the date was recovered from video track metadata,
  /// which is worth surfacing to the user.
  pub fn get_capture_date_time(&self) -> Option<(CaptureDateTime, bool)> {
    if let Some(date_time) = self
      .date_time_original
      .as_deref()
      .or(self.create_date.as_deref())
      .or(self.date_created.as_deref())
    {
      return CaptureDateTime::parse(date_time).ok().map(|d| (d, false));
    }

    let track_date = self
      .media_create_date
      .as_deref()
      .or(self.track_create_date.as_deref())?;

    CaptureDateTime::parse(track_date).ok().map(|d| (d, true))
  }
}

impl AsRef<Path> for Metadata {
  fn as_ref(&self) -> &Path {
    &self.source_file
  }
}

impl Display for Metadata {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", self.source_file.display())
  }
}
