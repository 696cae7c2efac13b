mod collision;
mod config;
mod convert;
mod converter;
mod date_resolver;
mod error;
mod exif_reader;
mod live_photo;
mod media;
mod metadata;
mod pipeline;
mod progress;
mod rename;
mod tools;
mod video_probe;

pub use collision::{CollisionResolver, DEFAULT_COLLISION_MARKER};
pub use config::{app_paths, load_config, load_config_from, save_config, AppConfig, AppPaths};
pub use convert::{
    convert_all, delete_converted_originals, ConversionOutcome, ConversionReport,
    ConversionResult, DeleteReport, DeletedOriginal,
};
pub use converter::{ImageConverter, MagickConverter};
pub use date_resolver::{
    is_date_prefixed, parse_encoded_date, parse_still_date, DatePrefix, DateResolution,
    DateResolver,
};
pub use error::PipelineError;
pub use exif_reader::ExifPropertyProvider;
pub use live_photo::{organize, LivePhotoMove, LivePhotoReport, DEFAULT_LIVE_PHOTO_DIR};
pub use media::{MediaFile, MediaKind, ScanOptions};
pub use metadata::{PropertyProvider, VideoMetadataProvider, DATE_TAKEN};
pub use pipeline::{run, AssumeYes, Capabilities, Confirmer, RunConfig, RunReport};
pub use progress::{EventOutcome, Phase, ProgressEvent, ProgressSink, TracingProgress};
pub use rename::{
    apply_renames, plan_renames, rename_all, PlannedAction, PlannedRename, RenameEntry,
    RenameOutcome, RenamePlan, RenameReport,
};
pub use video_probe::MediaInfoProbe;
