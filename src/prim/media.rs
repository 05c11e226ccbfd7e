// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Media file handling.

use core::fmt;
use std::{
  collections::HashSet,
  ffi::OsStr,
  fmt::{Display, Formatter},
  path::{Path, PathBuf},
  sync::LazyLock,
};

use super::{CaptureDateTime, ContentId, Metadata};

static IMAGE_EXTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
  HashSet::from([
    "jpg", "jpeg", "png", "gif", "tiff", "tif", "webp", "heic", "heif",
  ])
});
static VIDEO_EXTS: LazyLock<HashSet<&'static str>> =
  LazyLock::new(|| HashSet::from(["mp4", "mov", "avi"]));

/// Media files are either still images or videos; a Live Photo is one of each
/// sharing a `ContentIdentifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
  Image,
  Video,
}

/// A single media file as discovered on disk: its metadata, kind and whether
/// an XMP sidecar already sits next to it. This is an immutable snapshot of
/// scan-time state; any change to the file becomes a planned `Operation`.
pub struct MediaFile {
  metadata:    Metadata,
  kind:        MediaKind,
  capture:     Option<CaptureDateTime>,
  from_track:  bool,
  has_sidecar: bool,
}

impl MediaFile {
  /// Create from scanned `metadata`. Fails for unsupported file extensions.
  pub fn new(metadata: Metadata, has_sidecar: bool) -> Result<Self, String> {
    let kind = kind_for_extension(&metadata.source_file).ok_or(format!(
      "{}: Unsupported media file extension.",
      metadata
    ))?;

    let (capture, from_track) = match metadata.get_capture_date_time() {
      Some((date_time, from_track)) => (Some(date_time), from_track),
      None => (None, false),
    };

    Ok(Self {
      metadata,
      kind,
      capture,
      from_track,
      has_sidecar,
    })
  }

  /// The capture date & time embedded in this file's metadata, if any.
  pub fn capture_date_time(&self) -> Option<CaptureDateTime> {
    self.capture
  }

  /// The `ContentIdentifier` for this media file, if it is part of a Live
  /// Photo.
  pub fn content_id(&self) -> Option<ContentId> {
    Some(ContentId(
      self.metadata.content_identifier.as_ref()?.clone(),
    ))
  }

  pub fn file_name(&self) -> &OsStr {
    self.metadata.source_file.file_name().unwrap_or_default()
  }

  /// Whether this file's capture date was recovered from video track metadata
  /// rather than a standard date tag.
  pub fn from_track(&self) -> bool {
    self.from_track
  }

  /// The embedded GPS position, surfaced in logs only.
  pub fn gps_position(&self) -> Option<&str> {
    self.metadata.gps_position.as_deref()
  }

  /// Whether an XMP sidecar for this file existed at scan time.
  pub fn has_sidecar(&self) -> bool {
    self.has_sidecar
  }

  pub fn is_image(&self) -> bool {
    self.kind == MediaKind::Image
  }

  pub fn is_video(&self) -> bool {
    self.kind == MediaKind::Video
  }

  pub fn kind(&self) -> MediaKind {
    self.kind
  }

  pub fn path(&self) -> &Path {
    &self.metadata.source_file
  }

  /// File size in bytes, used to identify the smaller preview image.
  pub fn size(&self) -> u64 {
    self.metadata.file_size.unwrap_or(0)
  }

  /// The grouping key for this file: its path with the extension removed.
  /// Case-sensitive, so `IMG_01.HEIC` and `img_01.mov` do *not* group.
  pub fn stem(&self) -> PathBuf {
    self.metadata.source_file.with_extension("")
  }
}

impl AsRef<Path> for MediaFile {
  fn as_ref(&self) -> &Path {
    self.metadata.as_ref()
  }
}

impl Display for MediaFile {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", self.metadata)
  }
}

/// Determines whether `path` points at an image or video, by extension.
/// Extensions are matched case-insensitively.
pub fn kind_for_extension(path: &Path) -> Option<MediaKind> {
  let ext = path.extension()?.to_str()?.to_lowercase();

  if IMAGE_EXTS.contains(ext.as_str()) {
    Some(MediaKind::Image)
  } else if VIDEO_EXTS.contains(ext.as_str()) {
    Some(MediaKind::Video)
  } else {
    None
  }
}

#[cfg(test)]
mod test_new {
  use super::*;
  use crate::testing::*;

  #[test]
  fn identifies_image() {
    let image = media!("SourceFile": "test.HEIC");

    assert_eq!(image.kind(), MediaKind::Image);
  }

  #[test]
  fn identifies_video() {
    let video = media!("SourceFile": "test.mov");

    assert_eq!(video.kind(), MediaKind::Video);
  }

  #[test]
  fn errors_on_unsupported_extension() {
    let metadata = metadata!("SourceFile": "test.docx");

    assert_err!(
      MediaFile::new(metadata, false),
      "Unsupported media file extension"
    );
  }

  #[test]
  fn errors_on_missing_extension() {
    let metadata = metadata!("SourceFile": "test");

    assert_err!(
      MediaFile::new(metadata, false),
      "Unsupported media file extension"
    );
  }
}
