//! This is a small utility for preparing media exported from cloud photo
//! services for import into a self-hosted library, acting as a wrapper around
//! 'exiftool'. It fills in missing capture dates, links Live Photo pairs and
//! removes redundant preview images, writing all changes as XMP sidecars and
//! never touching the original files.
//!
//! Copyright 2025 Seth Pendergrass. See LICENSE.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

mod group;
mod infer;
mod io;
mod link;
mod plan;
mod preview;
mod prim;
mod scan;
mod setup;
#[cfg(test)]
mod testing;

use prim::CaptureDateTime;

#[derive(Parser)]
struct Args {
  /// Directory of media files (or a single file).
  path: PathBuf,

  /// Write sidecar dates, inferring missing capture dates from siblings.
  #[arg(short, long)]
  time: bool,

  /// Link Live Photo image/video pairs via a shared Content ID.
  #[arg(short, long)]
  live_photos: bool,

  /// Recycle redundant low-resolution preview images.
  #[arg(short, long)]
  previews: bool,

  /// Write sidecars even if they already exist.
  #[arg(short, long)]
  force: bool,

  /// Only process media that already has sidecars.
  #[arg(short, long)]
  recalculate: bool,

  /// Compute and report the full plan without executing it.
  #[arg(short = 'n', long)]
  dry_run: bool,

  /// Replace embedded capture dates rather than preserving them.
  #[arg(short, long = "override")]
  override_time: bool,

  /// Capture date to apply (RFC 3339), instead of searching siblings.
  #[arg(short, long)]
  iso: Option<String>,

  /// Verbosity level. Max: 2.
  #[arg(short, action = ArgAction::Count)]
  verbose: u8,
}

fn main() {
  let args = Args::parse();
  setup::configure_logging(args.verbose);

  if let Err(e) = run(&args) {
    log::error!("{e}");
    std::process::exit(1);
  }
}

fn run(args: &Args) -> Result<(), String> {
  let request = plan::Request {
    force:         args.force,
    recalculate:   args.recalculate,
    dry_run:       args.dry_run,
    time:          args.time,
    live_photos:   args.live_photos,
    previews:      args.previews,
    override_time: args.override_time,
    iso:           args
      .iso
      .as_deref()
      .map(CaptureDateTime::parse)
      .transpose()?,
  };
  request.validate()?;

  io::exiftool_check()?;

  let files = scan::scan(&args.path)?;
  let (groups, anomalies) = group::group(files);

  let mut built = plan::build(&groups, &request);
  built.reports.extend(anomalies);

  let dir_root = if args.path.is_dir() {
    args.path.clone()
  } else {
    args
      .path
      .parent()
      .map_or_else(|| PathBuf::from("."), std::path::Path::to_path_buf)
  };

  let summary = plan::execute(&built, &dir_root, request.dry_run);
  println!("Complete.\n{summary}");

  Ok(())
}
