// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Selecting the redundant low-resolution preview from a pair of images.

use crate::prim::MediaFile;

/// The outcome of preview selection over a pair of images.
pub enum PreviewSelection<'a> {
  /// The strictly smaller image, safe to recycle.
  Preview(&'a MediaFile),
  /// Identical byte sizes; never guess which to recycle.
  Ambiguous,
}

/// Selects the preview from `images` by comparing byte sizes. Only image
/// sizes are ever compared; a triad's video plays no part in selection.
pub fn select(images: &[MediaFile; 2]) -> PreviewSelection<'_> {
  let [a, b] = images;

  match a.size().cmp(&b.size()) {
    std::cmp::Ordering::Less => PreviewSelection::Preview(a),
    std::cmp::Ordering::Greater => PreviewSelection::Preview(b),
    std::cmp::Ordering::Equal => PreviewSelection::Ambiguous,
  }
}
