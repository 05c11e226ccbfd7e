// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Typed groups of media files sharing a filename stem.

use super::MediaFile;

/// The semantic shape of one stem-partition of media files.
///
/// Cloud exports produce a handful of recognizable shapes: a Live Photo's
/// image + video, a full-resolution image + its low-resolution preview, all
/// three at once, or a file on its own. Any other shape degrades to
/// `Standalone` members and is reported for manual review.
pub enum FileGroup {
  /// One image + one video sharing a stem.
  LivePhotoPair { image: MediaFile, video: MediaFile },

  /// Two images sharing a stem; the smaller is a preview candidate.
  PreviewPair { images: [MediaFile; 2] },

  /// Two images + one video sharing a stem: a preview candidate plus a Live
  /// Photo pair.
  PreviewTriad {
    images: [MediaFile; 2],
    video:  MediaFile,
  },

  /// A file with no stem siblings (or one that fell out of an anomalous
  /// partition).
  Standalone(MediaFile),
}

impl FileGroup {
  /// Iterates over all member files of this group.
  pub fn files(&self) -> impl Iterator<Item = &MediaFile> {
    let files: Vec<&MediaFile> = match self {
      Self::LivePhotoPair { image, video } => vec![image, video],
      Self::PreviewPair { images } => images.iter().collect(),
      Self::PreviewTriad { images, video } => {
        images.iter().chain(std::iter::once(video)).collect()
      }
      Self::Standalone(file) => vec![file],
    };

    files.into_iter()
  }
}
