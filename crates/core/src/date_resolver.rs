use crate::error::PipelineError;
use crate::media::{MediaFile, MediaKind};
use crate::metadata::{PropertyProvider, VideoMetadataProvider, DATE_TAKEN};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

const PREFIX_FORMAT: &str = "%Y-%m-%d_%H-%M_";
const PREFIX_LEN: usize = "yyyy-MM-dd_HH-mm_".len();

const STILL_DATE_FORMATS: &[&str] = &[
    "%Y:%m:%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M",
];

const STILL_DATE_FORMATS_WITH_OFFSET: &[&str] =
    &["%Y-%m-%dT%H:%M:%S%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

const VIDEO_DATE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S UTC", "UTC %Y-%m-%d %H:%M:%S"];

/// `yyyy-MM-dd_HH-mm_`, ready to be glued in front of a file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePrefix(String);

impl DatePrefix {
    pub fn from_datetime(value: NaiveDateTime) -> Self {
        Self(value.format(PREFIX_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn prepend_to(&self, file_name: &str) -> String {
        format!("{}{}", self.0, file_name)
    }
}

impl fmt::Display for DatePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateResolution {
    Prefix(DatePrefix),
    /// The still has no usable capture date. Not an error.
    Unavailable,
}

/// Turns embedded capture metadata into a [`DatePrefix`].
///
/// Stills without a date resolve to [`DateResolution::Unavailable`]; a video
/// whose encoded date is missing or malformed is a
/// [`PipelineError::VideoMetadata`].
#[derive(Debug, Clone)]
pub struct DateResolver<P, V> {
    properties: P,
    video: V,
}

impl<P, V> DateResolver<P, V>
where
    P: PropertyProvider,
    V: VideoMetadataProvider,
{
    pub fn new(properties: P, video: V) -> Self {
        Self { properties, video }
    }

    pub fn resolve(&self, file: &MediaFile) -> Result<DateResolution, PipelineError> {
        match file.kind {
            MediaKind::Still => Ok(self
                .properties
                .property(&file.path, DATE_TAKEN)
                .as_deref()
                .and_then(parse_still_date)
                .map(|date| DateResolution::Prefix(DatePrefix::from_datetime(date)))
                .unwrap_or(DateResolution::Unavailable)),
            MediaKind::Video => {
                let raw = self.video.encoded_date(&file.path).map_err(|err| {
                    PipelineError::VideoMetadata {
                        path: file.path.clone(),
                        reason: format!("{err:#}"),
                    }
                })?;
                let date =
                    parse_encoded_date(&raw).ok_or_else(|| PipelineError::VideoMetadata {
                        path: file.path.clone(),
                        reason: format!("unexpected encoded date format: {raw:?}"),
                    })?;
                Ok(DateResolution::Prefix(DatePrefix::from_datetime(date)))
            }
        }
    }
}

/// True when `file_name` already starts with a date prefix from an earlier run.
pub fn is_date_prefixed(file_name: &str) -> bool {
    let Some(head) = file_name.get(..PREFIX_LEN) else {
        return false;
    };
    head.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 | 13 => b == b'-',
        10 | 16 => b == b'_',
        _ => b.is_ascii_digit(),
    }) && NaiveDateTime::parse_from_str(head, PREFIX_FORMAT).is_ok()
}

/// Wall-clock time as written in the file; offsets are dropped, not applied.
pub fn parse_still_date(input: &str) -> Option<NaiveDateTime> {
    // Shell property values carry invisible direction marks around each field.
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, '\u{200e}' | '\u{200f}' | '\u{202a}'..='\u{202e}'))
        .collect();
    let normalized = cleaned.trim();
    if normalized.is_empty() {
        return None;
    }

    for fmt in STILL_DATE_FORMATS_WITH_OFFSET {
        if let Ok(dt) = DateTime::parse_from_str(normalized, fmt) {
            return Some(dt.naive_local());
        }
    }
    STILL_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(normalized, fmt).ok())
}

pub fn parse_encoded_date(input: &str) -> Option<NaiveDateTime> {
    let normalized = input.trim();
    VIDEO_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(normalized, fmt).ok())
}
