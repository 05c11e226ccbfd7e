// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Helper for setting up test directories with placeholder files.

use std::{
  env, fs,
  path::{Path, PathBuf},
  sync::LazyLock,
};

static TEST_ROOT: LazyLock<PathBuf> =
  LazyLock::new(|| env::temp_dir().join(format!("{}_tests", env!("CARGO_PKG_NAME"))));

/// A fresh directory under `TEST_ROOT` for tests involving file operations.
/// Contents are placeholder files; anything reading real metadata belongs in
/// an integration test instead.
pub struct TestDir {
  root: PathBuf,
}

impl TestDir {
  /// Creates the directory at `test_path` (unique per test), wiping any
  /// leftovers from a previous run, and populates it with empty `files`.
  pub fn new(test_path: impl AsRef<Path>, files: &[&str]) -> Self {
    let root = TEST_ROOT.join(test_path);
    if root.exists() {
      fs::remove_dir_all(&root).unwrap();
    }
    fs::create_dir_all(&root).unwrap();

    for file in files {
      let path = root.join(file);
      fs::create_dir_all(path.parent().unwrap()).unwrap();
      fs::write(path, "").unwrap();
    }

    Self { root }
  }

  pub fn get_path(&self, file: impl AsRef<Path>) -> PathBuf {
    self.root.join(file)
  }

  pub fn root(&self) -> &Path {
    &self.root
  }
}
