// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Discovering media files and their sidecars on disk.

use std::{
  collections::HashSet,
  path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::{
  io,
  prim::{self, MediaFile},
};

/// Loads all media files under `path` (a directory, walked recursively, or a
/// single file), recording for each whether an XMP sidecar already exists.
/// Unreadable files are logged and skipped; only an unusable `path` is fatal.
pub fn scan(path: &Path) -> Result<Vec<MediaFile>, String> {
  let paths = collect_paths(path)?;

  let sidecars = sidecar_index(&paths);

  let mut files = Vec::new();
  for path in &paths {
    if !is_media_candidate(path) {
      continue;
    }

    let metadata = match io::read_metadata(path) {
      Ok(metadata) => metadata,
      Err(e) => {
        log::warn!("{e}");
        continue;
      }
    };

    let has_sidecar = sidecars.contains(&io::xmp_path(path));

    match MediaFile::new(metadata, has_sidecar) {
      Ok(file) => {
        if let Some(gps) = file.gps_position() {
          log::debug!("{file}: GPS position {gps}.");
        }
        files.push(file);
      }
      Err(e) => log::warn!("{e}"),
    }
  }

  log::debug!("{}: Found {} media file(s).", path.display(), files.len());

  Ok(files)
}

fn collect_paths(path: &Path) -> Result<Vec<PathBuf>, String> {
  if path.is_file() {
    let mut paths = vec![path.to_path_buf()];

    // A lone file is never walked, so its sidecar has to be probed directly.
    let file_xmp = io::xmp_path(path);
    if file_xmp.is_file() {
      paths.push(file_xmp);
    }

    return Ok(paths);
  }
  if !path.is_dir() {
    return Err(format!(
      "{}: Not a file or directory.",
      path.display()
    ));
  }

  let mut paths = Vec::new();
  for entry in WalkDir::new(path) {
    let entry =
      entry.map_err(|e| format!("{}: Failed to walk directory ({e}).", path.display()))?;
    if entry.file_type().is_file() {
      paths.push(entry.into_path());
    }
  }
  paths.sort();

  Ok(paths)
}

/// Whether `path` looks like a media file worth loading: a supported
/// extension, and not an AppleDouble `._` resource fork file.
fn is_media_candidate(path: &Path) -> bool {
  let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
    return false;
  };
  if file_name.starts_with("._") {
    return false;
  }

  prim::kind_for_extension(path).is_some()
}

fn is_sidecar(path: &Path) -> bool {
  path
    .extension()
    .is_some_and(|e| e.eq_ignore_ascii_case("xmp"))
}

/// Indexes the sidecars among `paths` for lookup by `io::xmp_path`. The
/// extension is normalized so an uppercase `.XMP` sidecar still matches.
fn sidecar_index(paths: &[PathBuf]) -> HashSet<PathBuf> {
  paths
    .iter()
    .filter(|p| is_sidecar(p))
    .map(|p| p.with_extension("xmp"))
    .collect()
}

#[cfg(test)]
mod test_collect_paths {
  use super::*;
  use crate::testing::*;

  #[test]
  fn single_file_includes_its_sidecar() {
    let dir = TestDir::new(
      "scan/collect_paths/single_file_includes_its_sidecar",
      &["IMG_01.HEIC", "IMG_01.HEIC.xmp"],
    );
    let media = dir.get_path("IMG_01.HEIC");

    let paths = collect_paths(&media).unwrap();

    assert_eq!(paths, [media.clone(), dir.get_path("IMG_01.HEIC.xmp")]);
    assert!(sidecar_index(&paths).contains(&io::xmp_path(&media)));
  }

  #[test]
  fn single_file_without_sidecar_stands_alone() {
    let dir = TestDir::new(
      "scan/collect_paths/single_file_without_sidecar_stands_alone",
      &["IMG_01.HEIC"],
    );
    let media = dir.get_path("IMG_01.HEIC");

    let paths = collect_paths(&media).unwrap();

    assert_eq!(paths, [media]);
  }
}

#[cfg(test)]
mod test_sidecar_index {
  use super::*;

  #[test]
  fn matches_media_file_lookup() {
    let paths = [
      PathBuf::from("dir/IMG_01.HEIC"),
      PathBuf::from("dir/IMG_01.HEIC.xmp"),
    ];

    let index = sidecar_index(&paths);

    assert!(index.contains(&io::xmp_path(Path::new("dir/IMG_01.HEIC"))));
  }

  #[test]
  fn matches_uppercase_sidecar_extension() {
    let paths = [
      PathBuf::from("dir/IMG_01.HEIC"),
      PathBuf::from("dir/IMG_01.HEIC.XMP"),
    ];

    let index = sidecar_index(&paths);

    assert!(index.contains(&io::xmp_path(Path::new("dir/IMG_01.HEIC"))));
  }
}

#[cfg(test)]
mod test_is_media_candidate {
  use super::*;

  #[test]
  fn accepts_supported_extensions() {
    assert!(is_media_candidate(Path::new("dir/IMG_01.HEIC")));
    assert!(is_media_candidate(Path::new("dir/IMG_01.mov")));
  }

  #[test]
  fn rejects_sidecars_and_unknown_extensions() {
    assert!(!is_media_candidate(Path::new("dir/IMG_01.HEIC.xmp")));
    assert!(!is_media_candidate(Path::new("dir/notes.txt")));
  }

  #[test]
  fn rejects_appledouble_files() {
    assert!(!is_media_candidate(Path::new("dir/._IMG_01.HEIC")));
  }
}
