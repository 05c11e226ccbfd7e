// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Partitioning a flat set of media files into semantic groups by filename
//! stem and file kind.

use std::{collections::BTreeMap, path::PathBuf};

use crate::prim::{FileGroup, MediaFile, Report};

/// Partitions `files` into typed groups, along with reports for any
/// partitions of unexpected shape.
///
/// Grouping depends only on the stem/kind multiset of the input, never on
/// filesystem order: partitions are visited in stem order and members sorted
/// by file name, so repeated runs over the same files yield the same groups.
pub fn group(files: Vec<MediaFile>) -> (Vec<FileGroup>, Vec<Report>) {
  let mut by_stem: BTreeMap<PathBuf, Vec<MediaFile>> = BTreeMap::new();
  for file in files {
    by_stem.entry(file.stem()).or_default().push(file);
  }

  let mut groups = Vec::new();
  let mut reports = Vec::new();

  for (stem, mut members) in by_stem {
    members.sort_by(|a, b| a.file_name().cmp(b.file_name()));

    let images = members.iter().filter(|f| f.is_image()).count();
    let videos = members.len() - images;

    match (images, videos) {
      (1, 0) | (0, 1) => {
        groups.push(FileGroup::Standalone(members.pop().unwrap()));
      }
      (1, 1) => {
        // Sorted extraction keeps image/video assignment deterministic.
        let video = members.remove(members.iter().position(|f| f.is_video()).unwrap());
        let image = members.pop().unwrap();
        groups.push(FileGroup::LivePhotoPair { image, video });
      }
      (2, 0) => {
        let b = members.pop().unwrap();
        let a = members.pop().unwrap();
        groups.push(FileGroup::PreviewPair { images: [a, b] });
      }
      (2, 1) => {
        let video = members.remove(members.iter().position(|f| f.is_video()).unwrap());
        let b = members.pop().unwrap();
        let a = members.pop().unwrap();
        groups.push(FileGroup::PreviewTriad {
          images: [a, b],
          video,
        });
      }
      _ => {
        let report = Report::GroupingAnomaly {
          stem,
          paths: members.iter().map(|f| f.path().to_path_buf()).collect(),
        };
        report.log();
        reports.push(report);

        groups.extend(members.into_iter().map(FileGroup::Standalone));
      }
    }
  }

  (groups, reports)
}

#[cfg(test)]
mod test_group {
  use super::*;
  use crate::testing::*;

  #[test]
  fn groups_single_file_as_standalone() {
    let (groups, reports) = group(vec![media!("SourceFile": "IMG_01.jpg")]);

    assert_eq!(groups.len(), 1);
    assert!(matches!(&groups[0], FileGroup::Standalone(_)));
    assert!(reports.is_empty());
  }

  #[test]
  fn groups_image_and_video_as_live_photo_pair() {
    let (groups, reports) = group(vec![
      media!("SourceFile": "IMG_01.MOV"),
      media!("SourceFile": "IMG_01.HEIC"),
    ]);

    assert_eq!(groups.len(), 1);
    let FileGroup::LivePhotoPair { image, video } = &groups[0] else {
      panic!("Expected LivePhotoPair.");
    };
    assert!(image.is_image());
    assert!(video.is_video());
    assert!(reports.is_empty());
  }

  #[test]
  fn groups_two_images_as_preview_pair() {
    let (groups, _) = group(vec![
      media!("SourceFile": "IMG_02.HEIC"),
      media!("SourceFile": "IMG_02.JPG"),
    ]);

    assert_eq!(groups.len(), 1);
    assert!(matches!(&groups[0], FileGroup::PreviewPair { .. }));
  }

  #[test]
  fn groups_two_images_and_video_as_preview_triad() {
    let (groups, _) = group(vec![
      media!("SourceFile": "IMG_02.JPG"),
      media!("SourceFile": "IMG_02.MOV"),
      media!("SourceFile": "IMG_02.HEIC"),
    ]);

    assert_eq!(groups.len(), 1);
    let FileGroup::PreviewTriad { images, video } = &groups[0] else {
      panic!("Expected PreviewTriad.");
    };
    assert!(images.iter().all(crate::prim::MediaFile::is_image));
    assert!(video.is_video());
  }

  #[test]
  fn degrades_two_videos_to_standalones() {
    let (groups, reports) = group(vec![
      media!("SourceFile": "IMG_03.MOV"),
      media!("SourceFile": "IMG_03.mp4"),
    ]);

    assert_eq!(groups.len(), 2);
    assert!(
      groups
        .iter()
        .all(|g| matches!(g, FileGroup::Standalone(_)))
    );
    assert_eq!(reports.len(), 1);
    assert!(matches!(&reports[0], Report::GroupingAnomaly { paths, .. } if paths.len() == 2));
  }

  #[test]
  fn degrades_oversized_partition_to_standalones() {
    let (groups, reports) = group(vec![
      media!("SourceFile": "IMG_04.HEIC"),
      media!("SourceFile": "IMG_04.JPG"),
      media!("SourceFile": "IMG_04.PNG"),
      media!("SourceFile": "IMG_04.MOV"),
    ]);

    assert_eq!(groups.len(), 4);
    assert!(
      groups
        .iter()
        .all(|g| matches!(g, FileGroup::Standalone(_)))
    );
    assert_eq!(reports.len(), 1);
  }

  #[test]
  fn requires_exact_stem_match() {
    let (groups, _) = group(vec![
      media!("SourceFile": "IMG_05.HEIC"),
      media!("SourceFile": "img_05.MOV"),
    ]);

    assert_eq!(groups.len(), 2);
    assert!(
      groups
        .iter()
        .all(|g| matches!(g, FileGroup::Standalone(_)))
    );
  }

  #[test]
  fn ignores_input_order() {
    let forwards = group(vec![
      media!("SourceFile": "IMG_06.HEIC"),
      media!("SourceFile": "IMG_06.MOV"),
      media!("SourceFile": "IMG_07.jpg"),
    ]);
    let backwards = group(vec![
      media!("SourceFile": "IMG_07.jpg"),
      media!("SourceFile": "IMG_06.MOV"),
      media!("SourceFile": "IMG_06.HEIC"),
    ]);

    let shape = |groups: &[FileGroup]| {
      groups
        .iter()
        .map(|g| g.files().map(|f| f.path().to_path_buf()).collect::<Vec<_>>())
        .collect::<Vec<_>>()
    };

    assert_eq!(shape(&forwards.0), shape(&backwards.0));
  }
}
