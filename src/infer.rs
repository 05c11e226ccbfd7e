// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Capture date inference for files missing one, by consulting directory
//! siblings.
//!
//! The donor search walks outward from the target in lexical file name order.
//! Filenames from camera and export pipelines are lexically monotonic with
//! capture time far more reliably than file modification times, which export
//! and zip tooling rewrite. This is a policy choice, not a guarantee; it lives
//! behind `infer` so the strategy can be swapped.

use std::{
  collections::HashMap,
  path::{Path, PathBuf},
};

use crate::prim::{
  CaptureDateTime, FileGroup, InferredTimestamp, MediaFile, TimestampSource,
};

/// One potential timestamp donor: a directory sibling and its embedded
/// capture date, if any.
pub struct TimeDonor {
  pub path:      PathBuf,
  pub date_time: Option<CaptureDateTime>,
}

impl TimeDonor {
  fn new(file: &MediaFile) -> Self {
    Self {
      path:      file.path().to_path_buf(),
      date_time: file.capture_date_time(),
    }
  }
}

/// Builds the per-directory donor index for all files in `groups`, each
/// directory's entries sorted by file name.
pub fn directory_donors(groups: &[FileGroup]) -> HashMap<PathBuf, Vec<TimeDonor>> {
  let mut donors: HashMap<PathBuf, Vec<TimeDonor>> = HashMap::new();

  for file in groups.iter().flat_map(FileGroup::files) {
    let dir = file.path().parent().unwrap_or(Path::new("")).to_path_buf();
    donors.entry(dir).or_default().push(TimeDonor::new(file));
  }

  for entries in donors.values_mut() {
    entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
  }

  donors
}

/// Finds a capture date for `target` from its directory siblings, scanning
/// outward from the target's lexical position. Nearest neighbors are tried
/// first; at equal distance the earlier position wins. Returns `None` when no
/// sibling carries a usable date.
pub fn infer(target: &Path, donors: &[TimeDonor]) -> Option<InferredTimestamp> {
  let position = donors.iter().position(|d| d.path == target)?;

  for distance in 1..donors.len() {
    let earlier = position
      .checked_sub(distance)
      .and_then(|i| donors.get(i));
    let later = donors.get(position + distance);

    for donor in [earlier, later].into_iter().flatten() {
      if let Some(date_time) = donor.date_time {
        return Some(InferredTimestamp {
          date_time,
          source: TimestampSource::InferredSibling,
          donor: Some(donor.path.clone()),
        });
      }
    }
  }

  None
}


#[cfg(test)]
mod test_directory_donors {
  use std::path::Path;

  use super::*;
  use crate::{group, testing::*};

  #[test]
  fn indexes_by_parent_and_sorts_by_file_name() {
    let (groups, _) = group::group(vec![
      media!("SourceFile": "dir/IMG_02.jpg"),
      media!("SourceFile": "dir/IMG_01.jpg"),
      media!("SourceFile": "other/IMG_03.jpg"),
    ]);

    let donors = directory_donors(&groups);

    assert_eq!(donors.len(), 2);
    let dir = &donors[Path::new("dir")];
    assert_eq!(dir.len(), 2);
    assert_eq!(dir[0].path, Path::new("dir/IMG_01.jpg"));
    assert_eq!(dir[1].path, Path::new("dir/IMG_02.jpg"));
  }
}
