use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_COLLISION_MARKER: &str = " - New";

/// Hands out destination paths that neither exist on disk nor were handed
/// out earlier in the same run.
///
/// The first collision inserts the marker before the extension
/// (`IMG_01 - New.jpg`); later ones append a counter (`IMG_01 - New 2.jpg`).
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    marker: String,
    reserved: HashSet<PathBuf>,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(DEFAULT_COLLISION_MARKER)
    }
}

impl CollisionResolver {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            reserved: HashSet::new(),
        }
    }

    pub fn resolve(&mut self, candidate: &Path) -> PathBuf {
        if !self.is_taken(candidate) {
            self.reserved.insert(candidate.to_path_buf());
            return candidate.to_path_buf();
        }

        let parent = candidate.parent().unwrap_or_else(|| Path::new(""));
        let stem = candidate
            .file_stem()
            .map(|v| v.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string());
        let ext = candidate
            .extension()
            .map(|v| v.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut n = 1usize;
        loop {
            let mut name = if n == 1 {
                format!("{}{}", stem, self.marker)
            } else {
                format!("{}{} {}", stem, self.marker, n)
            };
            if !ext.is_empty() {
                name.push('.');
                name.push_str(&ext);
            }
            let next = parent.join(name);
            if !self.is_taken(&next) {
                self.reserved.insert(next.clone());
                return next;
            }
            n += 1;
        }
    }

    fn is_taken(&self, path: &Path) -> bool {
        self.reserved.contains(path) || path.exists()
    }
}
