use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::library::{
    DurationProbe, ImportBlob, RecordStore, Sound, SoundId, display_name, normalize_category,
    normalize_tags, suggest_category, suggest_tags,
};

use super::filter;

/// A file that could not be imported, and why.
#[derive(Debug)]
pub struct ImportFailure {
    pub file_name: String,
    pub error: CatalogError,
}

/// Outcome of [`Catalog::import_files`]. Never an error as a whole.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<SoundId>,
    pub failures: Vec<ImportFailure>,
    /// Set when the trailing reload failed; the previous view was kept.
    pub reload_error: Option<CatalogError>,
}

impl ImportReport {
    /// One-line summary for the status bar.
    pub fn summary(&self) -> String {
        let mut msg = format!("imported {}", self.imported.len());
        if !self.failures.is_empty() {
            let names: Vec<&str> = self.failures.iter().map(|f| f.file_name.as_str()).collect();
            msg.push_str(&format!(", failed {} ({})", self.failures.len(), names.join(", ")));
        }
        if let Some(e) = &self.reload_error {
            msg.push_str(&format!(", reload failed: {e}"));
        }
        msg
    }
}

/// The in-memory view of the library and the only path that mutates it.
///
/// Every mutation writes through the [`RecordStore`] and then reloads, so the
/// view always reflects the latest stored values once a call returns.
pub struct Catalog<S, P> {
    store: S,
    probe: P,
    sounds: Vec<Sound>,
    revision: u64,
    last_created_at: i64,
}

impl<S, P> Catalog<S, P>
where
    S: RecordStore,
    P: DurationProbe,
{
    /// Create a catalog with an empty view. Call [`Catalog::reload`] to populate it.
    pub fn new(store: S, probe: P) -> Self {
        Self {
            store,
            probe,
            sounds: Vec::new(),
            revision: 0,
            last_created_at: 0,
        }
    }

    /// Create a catalog and load the current library.
    pub fn open(store: S, probe: P) -> CatalogResult<Self> {
        let mut catalog = Self::new(store, probe);
        catalog.reload()?;
        Ok(catalog)
    }

    /// Current view, newest first.
    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }

    pub fn get(&self, id: &SoundId) -> Option<&Sound> {
        self.sounds.iter().find(|s| s.id == *id)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Bumped after every successful reload; observers compare it to detect changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the view with the store's contents, or keep it untouched on failure.
    pub fn reload(&mut self) -> CatalogResult<()> {
        let mut sounds = match self.store.fetch_all() {
            Ok(sounds) => sounds,
            Err(e) => {
                warn!(error = %e, "reload failed, keeping previous view");
                return Err(e.into());
            }
        };
        sounds.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        if let Some(newest) = sounds.first() {
            self.last_created_at = self.last_created_at.max(newest.created_at);
        }
        self.sounds = sounds;
        self.revision += 1;
        debug!(count = self.sounds.len(), revision = self.revision, "catalog reloaded");
        Ok(())
    }

    /// Import each blob independently, then reload once.
    ///
    /// Failures are collected per file and never stop the batch.
    pub fn import_files<I>(&mut self, blobs: I) -> ImportReport
    where
        I: IntoIterator<Item = ImportBlob>,
    {
        let mut report = ImportReport::default();

        for blob in blobs {
            let file_name = blob.file_name.clone();
            match self.import_one(blob) {
                Ok(id) => {
                    info!(file = %file_name, %id, "imported sound");
                    report.imported.push(id);
                }
                Err(error) => {
                    warn!(file = %file_name, %error, "import failed");
                    report.failures.push(ImportFailure { file_name, error });
                }
            }
        }

        if let Err(e) = self.reload() {
            report.reload_error = Some(e);
        }
        report
    }

    fn import_one(&mut self, blob: ImportBlob) -> CatalogResult<SoundId> {
        if !blob.is_audio() {
            return Err(CatalogError::InvalidInput {
                file_name: blob.file_name,
                content_type: blob.content_type,
            });
        }

        let duration = self.probe.probe(blob.bytes.clone())?;
        let sound = Sound {
            id: SoundId::new(),
            name: display_name(&blob.file_name),
            category: suggest_category(&blob.file_name).map(str::to_string),
            tags: suggest_tags(&blob.file_name),
            duration,
            notes: String::new(),
            created_at: self.next_created_at(),
            file_name: blob.file_name,
            file: blob.bytes,
        };

        Ok(self.store.insert(&sound)?)
    }

    /// Strictly increasing wall-clock milliseconds.
    fn next_created_at(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let ts = now.max(self.last_created_at + 1);
        self.last_created_at = ts;
        ts
    }

    /// Replace the editable fields of an existing record.
    ///
    /// `file_name`, `file`, `duration` and `created_at` always keep their
    /// stored values. Unknown ids fail with [`CatalogError::NotFound`].
    pub fn update_record(&mut self, record: Sound) -> CatalogResult<()> {
        let stored = self.store.fetch_one(&record.id)?;
        let updated = Sound {
            name: record.name,
            category: normalize_category(record.category.as_deref()),
            tags: normalize_tags(&record.tags),
            notes: record.notes,
            ..stored
        };
        self.store.update(&updated)?;
        info!(id = %updated.id, name = %updated.name, "updated sound");
        self.reload()
    }

    /// Add `tag` (trimmed) to a sound. Returns whether anything was written.
    pub fn add_tag(&mut self, id: &SoundId, tag: &str) -> CatalogResult<bool> {
        let mut sound = self.store.fetch_one(id)?;
        let tag = tag.trim();
        let changed = !tag.is_empty() && !sound.has_tag(tag);
        if changed {
            sound.tags.push(tag.to_string());
            self.store.update(&sound)?;
            info!(%id, tag, "added tag");
        }
        self.reload()?;
        Ok(changed)
    }

    /// Remove `tag` from a sound. Returns whether anything was written.
    pub fn remove_tag(&mut self, id: &SoundId, tag: &str) -> CatalogResult<bool> {
        let mut sound = self.store.fetch_one(id)?;
        let tag = tag.trim();
        let before = sound.tags.len();
        sound.tags.retain(|t| t != tag);
        let changed = sound.tags.len() != before;
        if changed {
            self.store.update(&sound)?;
            info!(%id, tag, "removed tag");
        }
        self.reload()?;
        Ok(changed)
    }

    /// Delete a sound. Stopping its playback is the caller's job.
    ///
    /// If the row is gone but the trailing reload fails, the error is
    /// [`CatalogError::Stale`]; the sound is deleted either way.
    pub fn delete_record(&mut self, id: &SoundId) -> CatalogResult<()> {
        self.store.delete(id)?;
        info!(%id, "deleted sound");
        self.reload().map_err(|e| CatalogError::Stale(Box::new(e)))
    }

    /// Sounds matching `query` and carrying every tag in `tag_filters`, newest first.
    ///
    /// Works on the in-memory view only.
    pub fn filter(&self, query: &str, tag_filters: &BTreeSet<String>) -> Vec<&Sound> {
        filter::filter_sounds(&self.sounds, query, tag_filters)
    }

    /// Sorted distinct tags present in the view.
    pub fn facets(&self) -> Vec<String> {
        filter::distinct_tags(&self.sounds)
    }

    pub fn tag_counts(&self) -> BTreeMap<String, usize> {
        filter::tag_counts(&self.sounds)
    }

    pub fn untagged_count(&self) -> usize {
        self.sounds.iter().filter(|s| s.is_untagged()).count()
    }
}
