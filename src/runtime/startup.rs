use std::path::PathBuf;

use tracing::info;

use crate::catalog::Catalog;
use crate::config::LibrarySettings;
use crate::library::{DurationProbe, RecordStore, collect_import_paths, load_blobs};

/// Import files and directories from disk, returning a status line.
///
/// Directories are expanded per `library`; files that cannot be read are
/// counted alongside the catalog's own failures.
pub fn import_paths<S, P>(
    catalog: &mut Catalog<S, P>,
    roots: &[PathBuf],
    library: &LibrarySettings,
) -> String
where
    S: RecordStore,
    P: DurationProbe,
{
    let files = collect_import_paths(roots, library);
    if files.is_empty() {
        return "nothing to import".to_string();
    }

    let (blobs, unreadable) = load_blobs(&files);
    let report = catalog.import_files(blobs);

    let mut msg = report.summary();
    if !unreadable.is_empty() {
        msg.push_str(&format!(", unreadable {}", unreadable.len()));
    }
    info!(
        imported = report.imported.len(),
        failed = report.failures.len(),
        unreadable = unreadable.len(),
        "import finished"
    );
    msg
}

/// Import whatever was passed on the command line.
pub fn import_args<S, P>(
    catalog: &mut Catalog<S, P>,
    args: Vec<String>,
    library: &LibrarySettings,
) -> Option<String>
where
    S: RecordStore,
    P: DurationProbe,
{
    let roots: Vec<PathBuf> = args.into_iter().map(PathBuf::from).collect();
    if roots.is_empty() {
        return None;
    }
    Some(import_paths(catalog, &roots, library))
}
