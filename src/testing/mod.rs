// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Test-only utilities.

mod asserts;
mod dates;
mod test_dir;

pub use dates::*;
pub use test_dir::*;

pub use crate::{assert_err, media, metadata};

/// Builds a `prim::Metadata` from ExifTool-shaped JSON, with required fields
/// defaulted.
#[macro_export]
macro_rules! metadata {
  ($($key:literal: $value:literal),* $(,)?) => {
    serde_json::from_value::<$crate::prim::Metadata>(
      serde_json::json!({
        "SourceFile": "-",
        $(
          $key: $value,
        )*
      })
    ).unwrap()
  }
}

/// Builds a `prim::MediaFile` from ExifTool-shaped JSON. Prefix with
/// `sidecar,` to mark the file as already having an XMP sidecar on disk.
#[macro_export]
macro_rules! media {
  (sidecar, $($key:literal: $value:literal),* $(,)?) => {
    $crate::prim::MediaFile::new($crate::metadata!($($key: $value),*), true).unwrap()
  };
  ($($key:literal: $value:literal),* $(,)?) => {
    $crate::prim::MediaFile::new($crate::metadata!($($key: $value),*), false).unwrap()
  };
}
