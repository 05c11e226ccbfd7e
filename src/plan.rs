// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Composes per-group decisions into a single ordered plan of operations, and
//! executes (or reports) that plan.

use core::fmt;
use std::{
  collections::{BTreeMap, HashMap},
  fmt::{Display, Formatter},
  path::{Path, PathBuf},
};

use crate::{
  infer::{self, TimeDonor},
  io, link,
  preview::{self, PreviewSelection},
  prim::{
    Action, CaptureDateTime, FileGroup, InferredTimestamp, MediaFile, Operation, Report,
    SidecarPayload, SkipReason, TimestampSource,
  },
};

/// The validated request for one run. Parsed once at the boundary and passed
/// by value into planning, so flag checks do not scatter through the group
/// logic.
#[derive(Default, Clone)]
pub struct Request {
  pub force:         bool,
  pub recalculate:   bool,
  pub dry_run:       bool,
  pub time:          bool,
  pub live_photos:   bool,
  pub previews:      bool,
  pub override_time: bool,
  pub iso:           Option<CaptureDateTime>,
}

impl Request {
  /// Rejects inconsistent flag combinations before any file is touched.
  pub fn validate(&self) -> Result<(), String> {
    if !(self.time || self.live_photos || self.previews) {
      return Err(
        "No features selected. Enable at least one of --time, --live-photos or --previews."
          .to_string(),
      );
    }
    if self.override_time && !self.time {
      return Err("--override requires --time.".to_string());
    }
    if self.iso.is_some() && !self.time {
      return Err("--iso requires --time.".to_string());
    }

    Ok(())
  }
}

/// The full plan for one run: operations to perform plus everything reported
/// along the way. Identical inputs always produce an identical plan, whether
/// or not it is later executed.
#[derive(Default)]
pub struct Plan {
  pub operations: Vec<Operation>,
  pub reports:    Vec<Report>,
}

impl Plan {
  fn operate(&mut self, path: &Path, action: Action) {
    self.operations.push(Operation {
      path: path.to_path_buf(),
      action,
    });
  }

  fn report(&mut self, report: Report) {
    report.log();
    self.reports.push(report);
  }

  fn skip(&mut self, path: &Path, reason: SkipReason) {
    self.report(Report::Skipped {
      path: path.to_path_buf(),
      reason,
    });
  }
}

/// Builds the plan for `groups` under `request`. Groups are independent; the
/// only cross-group input is the read-only per-directory donor index for time
/// inference.
pub fn build(groups: &[FileGroup], request: &Request) -> Plan {
  let donors = infer::directory_donors(groups);
  let mut plan = Plan::default();

  for group in groups {
    match group {
      FileGroup::Standalone(file) => {
        plan_time(file, &donors, request, &mut plan);
      }
      FileGroup::LivePhotoPair { image, video } => {
        plan_time(image, &donors, request, &mut plan);
        plan_time(video, &donors, request, &mut plan);
        plan_link(image, video, request, &mut plan);
      }
      FileGroup::PreviewPair { images } => {
        let recycled = plan_preview(images, request, &mut plan);
        for image in images {
          if recycled != Some(image.path()) {
            plan_time(image, &donors, request, &mut plan);
          }
        }
      }
      FileGroup::PreviewTriad { images, video } => {
        plan_triad(images, video, &donors, request, &mut plan);
      }
    }
  }

  plan
}

/// The gate shared by time and link writes: fresh files are processed unless
/// in recalculate mode, files with sidecars only under force or recalculate.
fn should_process(has_sidecar: bool, request: &Request) -> Result<(), SkipReason> {
  if request.recalculate && !has_sidecar {
    return Err(SkipReason::NoSidecarToRecalculate);
  }
  if has_sidecar && !request.force && !request.recalculate {
    return Err(SkipReason::SidecarExists);
  }

  Ok(())
}

/// Plans the sidecar date & time write for one file, if the time feature is
/// active and the file passes the sidecar gate.
fn plan_time(
  file: &MediaFile,
  donors: &HashMap<PathBuf, Vec<TimeDonor>>,
  request: &Request,
  plan: &mut Plan,
) {
  if !request.time {
    return;
  }

  if let Err(reason) = should_process(file.has_sidecar(), request) {
    plan.skip(file.path(), reason);
    return;
  }

  // An embedded date is authoritative unless an override is requested; a
  // supplied ISO date beats a fresh inference but never an embedded date.
  let timestamp = if !request.override_time && file.capture_date_time().is_some() {
    Some(InferredTimestamp {
      date_time: file.capture_date_time().unwrap(),
      source:    TimestampSource::Embedded,
      donor:     None,
    })
  } else if let Some(iso) = request.iso {
    Some(InferredTimestamp {
      date_time: iso,
      source:    TimestampSource::UserOverride,
      donor:     None,
    })
  } else {
    let dir = file.path().parent().unwrap_or(Path::new(""));
    infer::infer(file.path(), donors.get(dir).map_or(&[], Vec::as_slice))
  };

  match timestamp {
    Some(timestamp) => {
      if let Some(donor) = &timestamp.donor {
        log::info!(
          "{file}: Inferred capture date {} from {}.",
          timestamp.date_time,
          donor.display()
        );
      }
      if file.from_track() {
        log::info!("{file}: Recovered capture date from track metadata.");
      }
      plan.operate(file.path(), Action::WriteDateTime(timestamp));
    }
    None => {
      plan.report(Report::InferenceFailure {
        path: file.path().to_path_buf(),
      });
    }
  }
}

/// Plans the `ContentIdentifier` writes for a Live Photo pair, if the
/// live-photos feature is active and the pair passes the sidecar gate. The
/// gate treats either member's sidecar as authoritative for the pair.
fn plan_link(image: &MediaFile, video: &MediaFile, request: &Request, plan: &mut Plan) {
  if !request.live_photos {
    return;
  }

  if let Err(reason) = should_process(image.has_sidecar() || video.has_sidecar(), request) {
    plan.skip(image.path(), reason);
    return;
  }

  match link::resolve(image, video) {
    link::LinkResolution::GenerateBoth(id) => {
      log::info!("{image}: Creating missing Content ID.");
      plan.operate(image.path(), Action::WriteContentId(id.clone()));
      plan.operate(video.path(), Action::WriteContentId(id));
    }
    link::LinkResolution::CopyToVideo(id) => {
      plan.operate(video.path(), Action::WriteContentId(id));
    }
    link::LinkResolution::CopyToImage(id) => {
      plan.operate(image.path(), Action::WriteContentId(id));
    }
    link::LinkResolution::AlreadyLinked => {
      plan.skip(image.path(), SkipReason::AlreadyLinked);
    }
    link::LinkResolution::Conflict { image_id, video_id } => {
      plan.report(Report::LinkConflict {
        image:    image.path().to_path_buf(),
        video:    video.path().to_path_buf(),
        image_id,
        video_id,
      });
    }
  }
}

/// Plans the recycle of the smaller image of `images`, if the previews
/// feature is active. Returns the path of the image planned for recycling, so
/// callers can withhold sidecar writes for it.
fn plan_preview<'a>(
  images: &'a [MediaFile; 2],
  request: &Request,
  plan: &mut Plan,
) -> Option<&'a Path> {
  if !request.previews {
    return None;
  }

  match preview::select(images) {
    PreviewSelection::Preview(preview) => {
      // Recalculate mode restricts recycling, too, to files with sidecars.
      if request.recalculate && !preview.has_sidecar() {
        plan.skip(preview.path(), SkipReason::NoSidecarToRecalculate);
        return None;
      }
      plan.operate(preview.path(), Action::RecyclePreview);
      Some(preview.path())
    }
    PreviewSelection::Ambiguous => {
      plan.report(Report::AmbiguousPreview {
        image_a: images[0].path().to_path_buf(),
        image_b: images[1].path().to_path_buf(),
      });
      None
    }
  }
}

/// Plans a preview triad: preview selection always runs to identify the Live
/// Photo image, the recycle itself only under the previews flag. An ambiguous
/// selection blocks linking, since the pair cannot be identified.
fn plan_triad(
  images: &[MediaFile; 2],
  video: &MediaFile,
  donors: &HashMap<PathBuf, Vec<TimeDonor>>,
  request: &Request,
  plan: &mut Plan,
) {
  match preview::select(images) {
    PreviewSelection::Preview(preview) => {
      let full = if std::ptr::eq(preview, &images[0]) {
        &images[1]
      } else {
        &images[0]
      };

      let mut recycled = None;
      if request.previews {
        if request.recalculate && !preview.has_sidecar() {
          plan.skip(preview.path(), SkipReason::NoSidecarToRecalculate);
        } else {
          plan.operate(preview.path(), Action::RecyclePreview);
          recycled = Some(preview.path());
        }
      }

      if recycled.is_none() {
        plan_time(preview, donors, request, plan);
      }
      plan_time(full, donors, request, plan);
      plan_time(video, donors, request, plan);

      plan_link(full, video, request, plan);
    }
    PreviewSelection::Ambiguous => {
      if request.previews || request.live_photos {
        plan.report(Report::AmbiguousPreview {
          image_a: images[0].path().to_path_buf(),
          image_b: images[1].path().to_path_buf(),
        });
      }

      for image in images {
        plan_time(image, donors, request, plan);
      }
      plan_time(video, donors, request, plan);
    }
  }
}

/// Counts for the run's closing summary.
#[derive(Default)]
pub struct RunSummary {
  pub written:   usize,
  pub recycled:  usize,
  pub skipped:   usize,
  pub anomalies: usize,
  pub failures:  usize,
  pub dry_run:   bool,
}

impl RunSummary {
  fn tally_reports(&mut self, reports: &[Report]) {
    for report in reports {
      if matches!(report, Report::Skipped { .. }) {
        self.skipped += 1;
      } else if report.is_anomaly() {
        self.anomalies += 1;
      } else if report.is_failure() {
        self.failures += 1;
      }
    }
  }
}

impl Display for RunSummary {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    if self.dry_run {
      write!(
        f,
        "Planned {} sidecar write(s) and {} recycle(s) (dry run).",
        self.written, self.recycled
      )?;
    } else {
      write!(
        f,
        "Wrote {} sidecar file(s), recycled {} preview(s).",
        self.written, self.recycled
      )?;
    }
    write!(
      f,
      "\nSkipped: {}. Anomalies: {}. Failed operations: {}.",
      self.skipped, self.anomalies, self.failures
    )
  }
}

/// Folds sidecar-writing operations into one payload per file, so a file
/// receiving both a date and a Content ID gets a single sidecar write.
/// Recycles are collected separately.
fn merge_payloads(operations: &[Operation]) -> (BTreeMap<&Path, SidecarPayload>, Vec<&Path>) {
  let mut payloads: BTreeMap<&Path, SidecarPayload> = BTreeMap::new();
  let mut recycles: Vec<&Path> = Vec::new();

  for operation in operations {
    match &operation.action {
      Action::WriteDateTime(timestamp) => {
        payloads.entry(&operation.path).or_default().date_time = Some(timestamp.date_time);
      }
      Action::WriteContentId(id) => {
        payloads.entry(&operation.path).or_default().content_id = Some(id.clone());
      }
      Action::RecyclePreview => recycles.push(&operation.path),
    }
  }

  (payloads, recycles)
}

/// Executes `plan`, or only reports it under dry-run. Sidecar writes for the
/// same file are merged into a single payload; per-operation failures are
/// recorded and do not abort the remaining plan.
pub fn execute(plan: &Plan, dir_root: &Path, dry_run: bool) -> RunSummary {
  let mut summary = RunSummary {
    dry_run,
    ..RunSummary::default()
  };
  summary.tally_reports(&plan.reports);

  let (payloads, recycles) = merge_payloads(&plan.operations);

  if dry_run {
    for operation in &plan.operations {
      log::info!("[dry run] {operation}");
    }
    summary.written = payloads.len();
    summary.recycled = recycles.len();
    return summary;
  }

  let dir_trash = dir_root.join(".trash");

  for (path, payload) in payloads {
    match io::write_sidecar(path, &payload) {
      Ok(path_xmp) => {
        log::info!("{}: Wrote sidecar.", path_xmp.display());
        summary.written += 1;
      }
      Err(error) => {
        summary.failures += 1;
        let report = Report::WriteFailure {
          path: path.to_path_buf(),
          error,
        };
        report.log();
      }
    }
  }

  for path in recycles {
    match io::recycle_file(dir_root, &dir_trash, path) {
      Ok(()) => {
        log::info!("{}: Moved to trash.", path.display());
        summary.recycled += 1;
      }
      Err(error) => {
        summary.failures += 1;
        let report = Report::RecycleFailure {
          path: path.to_path_buf(),
          error,
        };
        report.log();
      }
    }
  }

  summary
}



#[cfg(test)]
mod test_merge_payloads {
  use super::*;
  use crate::prim::ContentId;

  fn date_write(path: &str) -> Operation {
    Operation {
      path:   path.into(),
      action: Action::WriteDateTime(InferredTimestamp {
        date_time: CaptureDateTime::parse("2000-01-01T00:00:00").unwrap(),
        source:    TimestampSource::Embedded,
        donor:     None,
      }),
    }
  }

  fn id_write(path: &str) -> Operation {
    Operation {
      path:   path.into(),
      action: Action::WriteContentId(ContentId("ID".to_string())),
    }
  }

  #[test]
  fn combines_writes_to_the_same_file() {
    let operations = [date_write("IMG_01.HEIC"), id_write("IMG_01.HEIC")];

    let (payloads, recycles) = merge_payloads(&operations);

    assert_eq!(payloads.len(), 1);
    let payload = &payloads[Path::new("IMG_01.HEIC")];
    assert!(payload.date_time.is_some());
    assert_eq!(payload.content_id, Some(ContentId("ID".to_string())));
    assert!(recycles.is_empty());
  }

  #[test]
  fn separates_recycles_from_writes() {
    let operations = [
      date_write("IMG_01.HEIC"),
      Operation {
        path:   "IMG_01.JPG".into(),
        action: Action::RecyclePreview,
      },
    ];

    let (payloads, recycles) = merge_payloads(&operations);

    assert_eq!(payloads.len(), 1);
    assert_eq!(recycles, [Path::new("IMG_01.JPG")]);
  }
}
