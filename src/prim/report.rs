// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Per-file anomalies and suppressed work, recorded while planning and
//! executing. Reports are data, not errors: they are logged, counted in the
//! run summary, and never abort the run.

use core::fmt;
use std::{
  fmt::{Display, Formatter},
  path::PathBuf,
};

use super::ContentId;

/// Why a file's planned work was suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
  /// A sidecar already exists and neither force nor recalculate is set.
  SidecarExists,
  /// Recalculate mode only processes files that already have a sidecar.
  NoSidecarToRecalculate,
  /// Both Live Photo members already carry the same `ContentIdentifier`.
  AlreadyLinked,
}

impl Display for SkipReason {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Self::SidecarExists => write!(f, "sidecar already exists"),
      Self::NoSidecarToRecalculate => write!(f, "no sidecar to recalculate"),
      Self::AlreadyLinked => write!(f, "already linked"),
    }
  }
}

/// Something worth telling the user about a file or group. Only
/// configuration errors are fatal; everything here leaves the run's exit
/// status untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
  /// A stem-partition had an unexpected shape; its members were degraded to
  /// standalone files.
  GroupingAnomaly { stem: PathBuf, paths: Vec<PathBuf> },

  /// No sibling in the file's directory carried a usable capture date.
  InferenceFailure { path: PathBuf },

  /// Live Photo members carry different `ContentIdentifier`s. Pre-existing
  /// data the tool must not silently overwrite.
  LinkConflict {
    image:    PathBuf,
    video:    PathBuf,
    image_id: ContentId,
    video_id: ContentId,
  },

  /// Two preview candidates with identical byte sizes; never guess which to
  /// recycle.
  AmbiguousPreview { image_a: PathBuf, image_b: PathBuf },

  /// Planned work suppressed by flags or existing state.
  Skipped { path: PathBuf, reason: SkipReason },

  /// Sidecar write failed during execution.
  WriteFailure { path: PathBuf, error: String },

  /// Recycling failed during execution.
  RecycleFailure { path: PathBuf, error: String },
}

impl Report {
  /// Whether this report counts as a data anomaly in the run summary.
  pub fn is_anomaly(&self) -> bool {
    matches!(
      self,
      Self::GroupingAnomaly { .. }
        | Self::InferenceFailure { .. }
        | Self::LinkConflict { .. }
        | Self::AmbiguousPreview { .. }
    )
  }

  /// Whether this report records a failed operation.
  pub fn is_failure(&self) -> bool {
    matches!(
      self,
      Self::WriteFailure { .. } | Self::RecycleFailure { .. }
    )
  }

  /// Logs this report at a level matching its severity.
  pub fn log(&self) {
    match self {
      Self::GroupingAnomaly { .. }
      | Self::InferenceFailure { .. }
      | Self::AmbiguousPreview { .. } => log::warn!("{self}"),
      Self::LinkConflict { .. } => log::error!("{self}"),
      Self::Skipped { reason, .. } => match reason {
        SkipReason::SidecarExists => log::warn!("{self}"),
        _ => log::debug!("{self}"),
      },
      Self::WriteFailure { .. } | Self::RecycleFailure { .. } => {
        log::error!("{self}");
      }
    }
  }
}

impl Display for Report {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Self::GroupingAnomaly { stem, paths } => write!(
        f,
        "{}: Unexpected group of {} files. Treating as standalone.",
        stem.display(),
        paths.len()
      ),
      Self::InferenceFailure { path } => write!(
        f,
        "{}: No capture date found in file or any sibling. Skipping.",
        path.display()
      ),
      Self::LinkConflict {
        image,
        video,
        image_id,
        video_id,
      } => write!(
        f,
        "Content ID mismatch between {} ({image_id}) and {} ({video_id}). Not linking.",
        image.display(),
        video.display()
      ),
      Self::AmbiguousPreview { image_a, image_b } => write!(
        f,
        "{} and {}: Identical sizes, cannot pick preview. Not recycling.",
        image_a.display(),
        image_b.display()
      ),
      Self::Skipped { path, reason } => {
        write!(f, "{}: Skipping ({reason}).", path.display())
      }
      Self::WriteFailure { path, error } => {
        write!(f, "{}: Sidecar write failed ({error}).", path.display())
      }
      Self::RecycleFailure { path, error } => {
        write!(f, "{}: Recycle failed ({error}).", path.display())
      }
    }
  }
}
