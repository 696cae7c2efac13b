use crate::date_resolver::parse_still_date;
use crate::metadata::{PropertyProvider, DATE_TAKEN};
use anyhow::{Context, Result};
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Tags tried for the capture time, most specific first.
const DATE_TAKEN_TAGS: &[Tag] = &[Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Reads EXIF properties out of JPEG, HEIF, PNG and TIFF containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifPropertyProvider;

impl PropertyProvider for ExifPropertyProvider {
    fn property(&self, path: &Path, name: &str) -> Option<String> {
        let exif = match read_exif(path) {
            Ok(exif) => exif,
            Err(err) => {
                tracing::debug!("no EXIF in {}: {err:#}", path.display());
                return None;
            }
        };

        if name.eq_ignore_ascii_case(DATE_TAKEN) {
            // A blank or garbled tag falls through to the next one.
            return DATE_TAKEN_TAGS.iter().find_map(|tag| {
                exif.get_field(*tag, In::PRIMARY)
                    .map(field_text)
                    .filter(|v| parse_still_date(v).is_some())
            });
        }
        find_field_value(&exif, name)
    }
}

fn read_exif(path: &Path) -> Result<exif::Exif> {
    let file =
        File::open(path).with_context(|| format!("failed to open: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    Reader::new()
        .read_from_container(&mut buf)
        .with_context(|| format!("failed to parse EXIF: {}", path.display()))
}

/// Looks a field up by its EXIF name, e.g. `Model` or `DateTimeDigitized`.
fn find_field_value(exif: &exif::Exif, name: &str) -> Option<String> {
    exif.fields()
        .filter(|field| field.ifd_num == In::PRIMARY)
        .find(|field| name.eq_ignore_ascii_case(&field.tag.to_string()))
        .map(field_text)
        .filter(|v| !v.is_empty())
}

/// ASCII fields come back verbatim (`2023:05:01 10:15:00`); the rest use
/// kamadak's display form.
fn field_text(field: &exif::Field) -> String {
    match &field.value {
        Value::Ascii(parts) => parts
            .iter()
            .map(|part| {
                String::from_utf8_lossy(part)
                    .trim_matches(char::from(0))
                    .trim()
                    .to_string()
            })
            .find(|part| !part.is_empty())
            .unwrap_or_default(),
        _ => field.display_value().to_string().trim().to_string(),
    }
}
