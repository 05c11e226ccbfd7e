// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Resolving the canonical `ContentIdentifier` for a Live Photo pair.

use std::path::Path;

use uuid::Uuid;

use crate::prim::{ContentId, MediaFile};

/// The outcome of resolving a Live Photo pair's `ContentIdentifier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResolution {
  /// Neither member has an identifier; write the generated one to both.
  GenerateBoth(ContentId),
  /// Only the image has an identifier; propagate it to the video.
  CopyToVideo(ContentId),
  /// Only the video has an identifier; propagate it to the image.
  CopyToImage(ContentId),
  /// Both members already carry the same identifier.
  AlreadyLinked,
  /// Members carry different identifiers; never overwritten.
  Conflict {
    image_id: ContentId,
    video_id: ContentId,
  },
}

/// Decides the canonical `ContentIdentifier` for `image` + `video`.
pub fn resolve(image: &MediaFile, video: &MediaFile) -> LinkResolution {
  match (image.content_id(), video.content_id()) {
    (None, None) => LinkResolution::GenerateBoth(generate_id(&image.stem())),
    (Some(id), None) => LinkResolution::CopyToVideo(id),
    (None, Some(id)) => LinkResolution::CopyToImage(id),
    (Some(image_id), Some(video_id)) => {
      if image_id == video_id {
        LinkResolution::AlreadyLinked
      } else {
        LinkResolution::Conflict { image_id, video_id }
      }
    }
  }
}

/// Generates a fresh `ContentIdentifier` for the pair at `stem`. Derived from
/// the stem path (UUIDv5), so recomputing for the same pair yields the same
/// identifier while distinct pairs get distinct ones.
fn generate_id(stem: &Path) -> ContentId {
  ContentId(
    Uuid::new_v5(
      &Uuid::NAMESPACE_OID,
      stem.to_string_lossy().as_bytes(),
    )
    .to_string()
    .to_uppercase(),
  )
}


#[cfg(test)]
mod test_generate_id {
  use super::*;
  use crate::testing::*;

  #[test]
  fn is_stable_for_same_pair() {
    let image = media!("SourceFile": "IMG_01.HEIC");
    let video = media!("SourceFile": "IMG_01.MOV");

    assert_eq!(resolve(&image, &video), resolve(&image, &video));
  }

  #[test]
  fn differs_between_pairs() {
    let image_a = media!("SourceFile": "IMG_01.HEIC");
    let video_a = media!("SourceFile": "IMG_01.MOV");
    let image_b = media!("SourceFile": "IMG_02.HEIC");
    let video_b = media!("SourceFile": "IMG_02.MOV");

    assert_ne!(resolve(&image_a, &video_a), resolve(&image_b, &video_b));
  }
}
