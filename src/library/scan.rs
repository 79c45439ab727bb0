use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::ImportBlob;

/// MIME type for a path, derived from its extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" | "wave" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "aac" => "audio/aac",
        "m4a" | "mp4" => "audio/mp4",
        "aif" | "aiff" => "audio/aiff",
        "webm" => "audio/webm",
        _ => "application/octet-stream",
    }
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Expand import arguments into candidate files.
///
/// Directories are walked and only yield files with a configured audio
/// extension. Files named explicitly are always kept, so the catalog gets to
/// reject them with a proper report.
pub fn collect_import_paths(roots: &[PathBuf], settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = Vec::new();

    for root in roots {
        if !root.is_dir() {
            paths.push(root.clone());
            continue;
        }

        let mut walker = WalkDir::new(root).follow_links(settings.follow_links);
        // Non-recursive = only the root directory.
        let depth_cap = if settings.recursive {
            settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        let mut found: Vec<PathBuf> = walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && is_audio_file(p, settings))
            .collect();
        found.sort();
        paths.extend(found);
    }

    paths
}

/// Read a file into an [`ImportBlob`].
pub fn load_blob(path: &Path) -> std::io::Result<ImportBlob> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string());
    Ok(ImportBlob::new(file_name, content_type_for(path), bytes))
}

/// Read every path, splitting readable blobs from read failures.
pub fn load_blobs(paths: &[PathBuf]) -> (Vec<ImportBlob>, Vec<(PathBuf, std::io::Error)>) {
    let mut blobs = Vec::new();
    let mut failures = Vec::new();
    for path in paths {
        match load_blob(path) {
            Ok(blob) => blobs.push(blob),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read file for import");
                failures.push((path.clone(), e));
            }
        }
    }
    (blobs, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.WAV"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for(Path::new("boom.WAV")), "audio/wav");
        assert_eq!(content_type_for(Path::new("boom.mp3")), "audio/mpeg");
        assert_eq!(content_type_for(Path::new("notes.txt")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn directories_yield_audio_only_but_explicit_files_are_kept() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.wav"), b"x").unwrap();
        fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        fs::write(dir.path().join("readme.txt"), b"x").unwrap();
        let explicit = dir.path().join("readme.txt");

        let settings = LibrarySettings::default();
        let paths = collect_import_paths(&[dir.path().to_path_buf(), explicit.clone()], &settings);

        assert_eq!(
            paths,
            vec![dir.path().join("a.mp3"), dir.path().join("b.wav"), explicit]
        );
    }

    #[test]
    fn walking_respects_recursive_false_and_hidden() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.wav"), b"x").unwrap();
        fs::write(dir.path().join(".hidden.wav"), b"x").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.wav"), b"x").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            include_hidden: false,
            ..LibrarySettings::default()
        };
        let paths = collect_import_paths(&[dir.path().to_path_buf()], &settings);
        assert_eq!(paths, vec![dir.path().join("root.wav")]);
    }

    #[test]
    fn load_blobs_reports_unreadable_paths() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("hit.wav");
        fs::write(&good, b"RIFF").unwrap();
        let missing = dir.path().join("missing.wav");

        let (blobs, failures) = load_blobs(&[good, missing.clone()]);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].file_name, "hit.wav");
        assert_eq!(blobs[0].content_type, "audio/wav");
        assert_eq!(&blobs[0].bytes[..], b"RIFF");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, missing);
    }
}
