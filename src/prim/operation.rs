// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Planned, idempotent actions produced by the orchestrator.

use core::fmt;
use std::{
  fmt::{Display, Formatter},
  path::PathBuf,
};

use super::CaptureDateTime;

/// Holds the `ContentIdentifier` tag value, which identifies which image and
/// video are a part of the same Live Photo.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentId(pub String);

impl Display for ContentId {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Where a planned capture date & time came from, kept for logging and audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
  /// Already embedded in the file's own metadata.
  Embedded,
  /// Donated by the nearest lexically ordered sibling with a usable date.
  InferredSibling,
  /// Supplied on the command line.
  UserOverride,
}

impl Display for TimestampSource {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Self::Embedded => write!(f, "embedded"),
      Self::InferredSibling => write!(f, "inferred-sibling"),
      Self::UserOverride => write!(f, "user-override"),
    }
  }
}

/// A capture date & time decided for a file, with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredTimestamp {
  pub date_time: CaptureDateTime,
  pub source:    TimestampSource,
  /// The sibling file the date was taken from, when inferred.
  pub donor:     Option<PathBuf>,
}

/// What a single operation does to its target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  /// Record a capture date & time in the target's sidecar.
  WriteDateTime(InferredTimestamp),
  /// Record a `ContentIdentifier` in the target's sidecar.
  WriteContentId(ContentId),
  /// Move a redundant preview image to the trash directory.
  RecyclePreview,
}

/// One planned unit of work. Operations are created by the orchestrator,
/// consumed exactly once by execution, and discarded wholesale under dry-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
  pub path:   PathBuf,
  pub action: Action,
}

impl Display for Operation {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match &self.action {
      Action::WriteDateTime(timestamp) => write!(
        f,
        "{}: Write sidecar date & time {} ({}).",
        self.path.display(),
        timestamp.date_time,
        timestamp.source
      ),
      Action::WriteContentId(id) => write!(
        f,
        "{}: Write sidecar Content ID {id}.",
        self.path.display()
      ),
      Action::RecyclePreview => {
        write!(f, "{}: Recycle preview image.", self.path.display())
      }
    }
  }
}

/// The merged payload for one sidecar file, combining all sidecar-writing
/// operations targeting the same media file. Writing the same payload twice
/// yields the same on-disk sidecar.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct SidecarPayload {
  pub date_time:  Option<CaptureDateTime>,
  pub content_id: Option<ContentId>,
}

impl SidecarPayload {
  pub fn is_empty(&self) -> bool {
    self.date_time.is_none() && self.content_id.is_none()
  }
}
