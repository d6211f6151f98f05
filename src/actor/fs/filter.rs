use std::ffi::OsStr;
use std::path::Path;

/// Matches files sharing the artifact's base name and extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFilter {
    stem: String,
    extension: String,
}

impl ArtifactFilter {
    pub fn for_artifact(artifact: &Path) -> Self {
        let lossy = |s: Option<&OsStr>| s.map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        Self {
            stem: lossy(artifact.file_stem()),
            extension: lossy(artifact.extension()),
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        if is_temp_file(path) {
            return false;
        }
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        extension.eq_ignore_ascii_case(&self.extension) && stem.contains(self.stem.as_str())
    }
}

/// Check if path is a temp/backup file (editor and linker artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}
