// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Functions for reading metadata, writing sidecars and recycling files.

use std::{
  ffi::{OsStr, OsString},
  fs,
  path::{Path, PathBuf},
  process::Command,
};

use crate::prim::{Metadata, SidecarPayload};

/// All `ExifTool` operations will use this format when extracting date & time.
/// Follows RFC 3339 format for easy parsing with `chrono`.
pub const DATETIME_READ_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%f%:z";

/// When using `ExifTool` to read metadata, this converts the time zone to UTC
/// in RFC 3339 format, and puts the output into JSON for easy parsing with
/// `serde_json`.
const READ_ARGS: [&str; 3] = ["-d", DATETIME_READ_FORMAT, "-json"];

/// The tags the planner consumes, plus the GPS position carried through for
/// logging. `-FileSize#` forces a numeric byte count.
const READ_TAGS: [&str; 9] = [
  "-EXIF:DateTimeOriginal",
  "-EXIF:CreateDate",
  "-XMP:DateCreated",
  "-XMP:CreateDate",
  "-MakerNotes:ContentIdentifier",
  "-Track*:MediaCreateDate",
  "-Track*:TrackCreateDate",
  "-Composite:GPSPosition",
  "-FileSize#",
];

/// Minimum supported (tested) version of `ExifTool`.
const EXIFTOOL_MIN_VERSION: (u32, u32) = (13, 10);

/// Check that `ExifTool` is present and new enough.
pub fn exiftool_check() -> Result<(), String> {
  version_check(run_exiftool(["-ver"])?, EXIFTOOL_MIN_VERSION)
}

/// Gets metadata for `file`. A failing `ExifTool` run (unreadable or corrupt
/// file) is an error; a readable file with no metadata simply reports empty
/// tags.
pub fn read_metadata(file: impl AsRef<Path>) -> Result<Metadata, String> {
  let file = file.as_ref();

  let mut args = Vec::from(READ_ARGS.map(OsStr::new));
  args.extend(READ_TAGS.map(OsStr::new));
  args.push(file.as_os_str());

  let mut parsed = parse_vec(run_exiftool(args)?)?;
  if parsed.is_empty() {
    return Err(format!("{}: ExifTool returned no metadata.", file.display()));
  }

  Ok(parsed.remove(0))
}

/// Writes the XMP sidecar for `file_media` with `payload`. The whole sidecar
/// is rewritten each time, so repeating a write leaves the same on-disk state.
/// Returns the sidecar's path.
pub fn write_sidecar(
  file_media: impl AsRef<Path>,
  payload: &SidecarPayload,
) -> Result<PathBuf, String> {
  let file_media = file_media.as_ref();

  if file_media.extension().is_none_or(|e| e == "xmp") {
    return Err(format!(
      "{}: Cannot create XMP (invalid extension).",
      file_media.display()
    ));
  }
  if payload.is_empty() {
    return Err(format!(
      "{}: Refusing to write an empty sidecar.",
      file_media.display()
    ));
  }

  let file_xmp = xmp_path(file_media);
  fs::write(&file_xmp, xmp_packet(payload))
    .map_err(|e| format!("{}: Failed to write sidecar ({e}).", file_xmp.display()))?;

  Ok(file_xmp)
}

/// The path of the XMP sidecar for `file_media` (e.g. `image.jpg.xmp`).
pub fn xmp_path(file_media: impl AsRef<Path>) -> PathBuf {
  let file_media = file_media.as_ref();

  let mut ext = OsString::new();
  if let Some(ext_curr) = file_media.extension() {
    ext = ext_curr.to_os_string();
  }
  ext.push(".xmp");

  file_media.with_extension(ext)
}

/// Renders the XMP packet for `payload`. Dates go to both the EXIF and
/// Photoshop namespaces so common importers pick them up; the Content ID uses
/// the Apple MakerNotes namespace `ExifTool` writes for Live Photos.
fn xmp_packet(payload: &SidecarPayload) -> String {
  let mut result = String::from(
    "<?xpacket begin='\u{feff}' id='W5M0MpCehiHzreSzNTczkc9d'?>\n\
     <x:xmpmeta xmlns:x='adobe:ns:meta/' x:xmptk='Image::ExifTool 13.10'>\n\
     <rdf:RDF xmlns:rdf='http://www.w3.org/1999/02/22-rdf-syntax-ns#'>\n\n",
  );

  if let Some(date_time) = &payload.date_time {
    result.push_str(&format!(
      "<rdf:Description rdf:about=''\n \
       xmlns:exif='http://ns.adobe.com/exif/1.0/'>\n \
       <exif:DateTimeOriginal>{date_time}</exif:DateTimeOriginal>\n\
       </rdf:Description>\n\n\
       <rdf:Description rdf:about=''\n \
       xmlns:photoshop='http://ns.adobe.com/photoshop/1.0/'>\n \
       <photoshop:DateCreated>{date_time}</photoshop:DateCreated>\n\
       </rdf:Description>\n\n"
    ));
  }
  if let Some(content_id) = &payload.content_id {
    result.push_str(&format!(
      "<rdf:Description rdf:about=''\n \
       xmlns:Apple='http://ns.exiftool.org/MakerNotes/Apple/1.0/'>\n \
       <Apple:ContentIdentifier>{content_id}</Apple:ContentIdentifier>\n\
       </rdf:Description>\n\n"
    ));
  }

  result.push_str("</rdf:RDF>\n</x:xmpmeta>\n<?xpacket end='w'?>");
  result
}

/// Moves `file` under `dir_trash`, maintaining its directory structure
/// relative to `dir_root`. Recoverable, unlike deletion. A sidecar sitting
/// next to `file` is moved with it.
pub fn recycle_file(
  dir_root: impl AsRef<Path>,
  dir_trash: impl AsRef<Path>,
  file: impl AsRef<Path>,
) -> Result<(), String> {
  let dir_root = dir_root.as_ref();
  let dir_trash = dir_trash.as_ref();
  let file = file.as_ref();

  if file.starts_with(dir_trash) {
    return Err(format!(
      "{}: Cannot remove file already in trash ({}).",
      file.display(),
      dir_trash.display()
    ));
  }

  let path_relative = file.strip_prefix(dir_root).map_err(|_| {
    format!(
      "{}: Cannot remove file outside root directory ({}).",
      file.display(),
      dir_root.display()
    )
  })?;

  let path_trash = dir_trash.join(path_relative);

  if path_trash.exists() {
    return Err(format!(
      "{}: Cannot remove file due to name collision in trash ({}).",
      file.display(),
      path_trash.display()
    ));
  }

  fs::create_dir_all(path_trash.parent().unwrap())
    .map_err(|e| format!("{}: Failed to create trash directory ({e}).", path_trash.display()))?;
  fs::rename(file, &path_trash)
    .map_err(|e| format!("{}: Failed to move to trash ({e}).", file.display()))?;

  // Don't leave a leftover sidecar behind.
  let file_xmp = xmp_path(file);
  if file_xmp.is_file() {
    fs::rename(&file_xmp, xmp_path(&path_trash))
      .map_err(|e| format!("{}: Failed to move to trash ({e}).", file_xmp.display()))?;
  }

  Ok(())
}

/// Runs `ExifTool` with `args`.
pub fn run_exiftool<I: IntoIterator<Item = S>, S: AsRef<OsStr>>(args: I) -> Result<Vec<u8>, String> {
  let mut cmd = Command::new("exiftool");
  cmd.args(args);

  let output = cmd.output().map_err(|e| {
    format!(
      "ExifTool failed to run. Is it installed?\nArgs:\n{}\nError:\n{e}",
      cmd
        .get_args()
        .collect::<Vec<_>>()
        .join(OsStr::new(" "))
        .display(),
    )
  })?;

  if !output.status.success() {
    return Err(format!(
      "ExifTool did not run successfully.\nArgs:\n{}\nstderr:\n{}",
      cmd
        .get_args()
        .collect::<Vec<_>>()
        .join(OsStr::new(" "))
        .display(),
      String::from_utf8_lossy(&output.stderr)
    ));
  }

  Ok(output.stdout)
}

/// Parses `ExifTool`'s JSON-formatted output `metadata` into Rust types.
fn parse_vec(metadata: impl AsRef<[u8]>) -> Result<Vec<Metadata>, String> {
  // `serde_json` doesn't handle the empty case.
  if metadata.as_ref().is_empty() {
    return Ok(Vec::new());
  }

  serde_json::from_slice(metadata.as_ref()).map_err(|e| {
    format!(
      "Failed to parse ExifTool output as metadata ({e}).\nstdout:\n{}",
      String::from_utf8_lossy(metadata.as_ref())
    )
  })
}

/// Returns whether `version` is as new or newer than `version_required_min`,
/// where `version` is from `ExifTool`'s stdout.
fn version_check(version: Vec<u8>, version_required_min: (u32, u32)) -> Result<(), String> {
  let version = String::from_utf8_lossy(&version).into_owned();
  let Some((major, minor)) = version.trim().split_once('.') else {
    return Err(format!("Unexpected ExifTool version string: \"{version}\""));
  };

  let major = major.parse::<u32>();
  let minor = minor.parse::<u32>();
  let (Ok(major), Ok(minor)) = (major, minor) else {
    return Err(format!("Unexpected ExifTool version: {version}"));
  };

  if major > version_required_min.0
    || (major == version_required_min.0 && minor >= version_required_min.1)
  {
    Ok(())
  } else {
    Err(format!(
      "ExifTool version {major}.{minor} is too old (needs {}.{} or newer).",
      version_required_min.0, version_required_min.1
    ))
  }
}

#[cfg(test)]
mod test_xmp_path {
  use super::*;

  #[test]
  fn appends_to_existing_extension() {
    assert_eq!(
      xmp_path(Path::new("dir/image.jpg")),
      PathBuf::from("dir/image.jpg.xmp")
    );
  }
}
