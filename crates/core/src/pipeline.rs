use crate::collision::CollisionResolver;
use crate::config::AppConfig;
use crate::convert::{convert_all, delete_converted_originals, ConversionReport, DeleteReport};
use crate::converter::ImageConverter;
use crate::date_resolver::DateResolver;
use crate::error::PipelineError;
use crate::live_photo::{organize, LivePhotoReport};
use crate::media::ScanOptions;
use crate::metadata::{PropertyProvider, VideoMetadataProvider};
use crate::progress::{Phase, ProgressSink};
use crate::rename::{rename_all, RenameReport};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Everything one run needs to know, passed explicitly to each phase.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub dir: PathBuf,
    pub target_extension: String,
    pub live_photo_dir: String,
    pub collision_marker: String,
    pub move_live_photos: bool,
    pub prefix_dates: bool,
    pub convert: bool,
    pub replace_originals: bool,
    pub recursive: bool,
    pub include_hidden: bool,
}

impl RunConfig {
    pub fn from_app_config(dir: impl Into<PathBuf>, app: &AppConfig) -> Self {
        Self {
            dir: dir.into(),
            target_extension: app.target_extension.clone(),
            live_photo_dir: app.live_photo_dir.clone(),
            collision_marker: app.collision_marker.clone(),
            move_live_photos: false,
            prefix_dates: true,
            convert: true,
            replace_originals: false,
            recursive: app.recursive_default,
            include_hidden: app.include_hidden_default,
        }
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.dir.is_dir() {
            return Err(PipelineError::DirectoryNotFound {
                path: self.dir.clone(),
            });
        }
        if self.replace_originals && !self.convert {
            return Err(PipelineError::InvalidConfig(
                "deleting originals requires the conversion phase".to_string(),
            ));
        }
        let ext = self.target_extension.as_str();
        if ext.is_empty() || ext.contains(['.', '/', '\\']) {
            return Err(PipelineError::InvalidConfig(format!(
                "target extension must be a bare extension like \"jpg\", got {ext:?}"
            )));
        }
        if self.move_live_photos
            && (self.live_photo_dir.trim().is_empty() || self.live_photo_dir.contains(['/', '\\']))
        {
            return Err(PipelineError::InvalidConfig(format!(
                "live photo folder must be a single folder name, got {:?}",
                self.live_photo_dir
            )));
        }
        Ok(())
    }

    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            recursive: self.recursive,
            include_hidden: self.include_hidden,
        }
    }
}

/// Asked once before originals are deleted.
pub trait Confirmer {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirmer for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// The external collaborators a run calls out to.
pub struct Capabilities<'a> {
    pub properties: &'a dyn PropertyProvider,
    pub video: &'a dyn VideoMetadataProvider,
    pub converter: &'a dyn ImageConverter,
    pub confirmer: &'a mut dyn Confirmer,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunReport {
    pub dir: PathBuf,
    pub live_photos: Option<LivePhotoReport>,
    pub renames: Option<RenameReport>,
    pub conversions: Option<ConversionReport>,
    pub deletions: Option<DeleteReport>,
}

impl RunReport {
    pub fn failures(&self) -> usize {
        self.live_photos.as_ref().map_or(0, |r| r.failed())
            + self.renames.as_ref().map_or(0, |r| r.failed())
            + self.conversions.as_ref().map_or(0, |r| r.failed())
            + self.deletions.as_ref().map_or(0, |r| r.failed())
    }
}

/// Runs live-photo move, rename, conversion and original deletion in that
/// order. Each phase lists the directory afresh after the previous one has
/// finished, so it sees the previous phase's renames and moves.
pub fn run(
    config: &RunConfig,
    mut caps: Capabilities<'_>,
    sink: &mut dyn ProgressSink,
) -> Result<RunReport> {
    config.validate()?;
    let scan = config.scan_options();
    let mut resolver = CollisionResolver::new(config.collision_marker.clone());
    let mut report = RunReport {
        dir: config.dir.clone(),
        ..RunReport::default()
    };

    if config.move_live_photos {
        info!("moving live photo clips into {:?}", config.live_photo_dir);
        let dest = config.dir.join(&config.live_photo_dir);
        report.live_photos = Some(organize(&config.dir, &dest, scan, &mut resolver, sink)?);
    }

    if config.prefix_dates {
        info!("prefixing capture dates");
        let dates = DateResolver::new(caps.properties, caps.video);
        report.renames = Some(rename_all(
            &config.dir,
            &config.target_extension,
            scan,
            &dates,
            sink,
        )?);
    }

    if config.convert {
        info!("converting stills to .{}", config.target_extension);
        let conversions = convert_all(
            &config.dir,
            &config.target_extension,
            scan,
            caps.converter,
            &mut resolver,
            sink,
        )?;

        if config.replace_originals && conversions.converted() == 0 {
            sink.note(Phase::DeleteOriginals, "nothing was converted; originals kept");
            report.deletions = Some(DeleteReport::default());
        } else if config.replace_originals {
            let prompt = format!(
                "Delete {} converted original(s) in {}?",
                conversions.converted(),
                config.dir.display()
            );
            report.deletions = Some(if caps.confirmer.confirm(&prompt) {
                delete_converted_originals(&conversions, sink)
            } else {
                sink.note(Phase::DeleteOriginals, "declined; originals kept");
                DeleteReport {
                    declined: true,
                    ..DeleteReport::default()
                }
            });
        }
        report.conversions = Some(conversions);
    }

    Ok(report)
}
