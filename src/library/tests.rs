use super::*;
use crate::error::{ProbeError, StoreError};
use std::sync::Arc;
use std::time::Duration;

/// Minimal PCM WAV: mono, 16-bit, silent.
fn wav_bytes(seconds: u32, sample_rate: u32) -> Vec<u8> {
    let data_len = seconds * sample_rate * 2;
    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.resize(44 + data_len as usize, 0);
    out
}

fn sound(name: &str, category: Option<&str>, created_at: i64) -> Sound {
    Sound {
        id: SoundId::new(),
        file_name: format!("{name}.wav"),
        file: Arc::from(vec![1u8, 2, 3]),
        name: name.to_string(),
        category: category.map(str::to_string),
        tags: vec!["a".into(), "b".into()],
        duration: 1.5,
        notes: String::new(),
        created_at,
    }
}

#[test]
fn suggest_category_uses_first_matching_rule() {
    assert_eq!(suggest_category("whoosh_transition.wav"), Some("Transition"));
    assert_eq!(suggest_category("Big_BOOM_01.mp3"), Some("Impact"));
    assert_eq!(suggest_category("forest_atmosphere.flac"), Some("Ambience"));
    assert_eq!(suggest_category("menu_click.wav"), Some("UI"));
    assert_eq!(suggest_category("gravel_step.wav"), Some("Foley"));
    // "swoosh" and "hit" both match; the transition rule comes first.
    assert_eq!(suggest_category("swoosh_hit.wav"), Some("Transition"));
    assert_eq!(suggest_category("zzz.wav"), None);
}

#[test]
fn suggest_tags_collects_every_matching_rule_once() {
    assert_eq!(suggest_tags("whoosh_transition.wav"), vec!["transition"]);
    assert_eq!(suggest_tags("swoosh_hit.wav"), vec!["transition", "impact"]);
    assert_eq!(suggest_tags("vocal_riser.wav"), vec!["voice", "riser"]);
    assert!(suggest_tags("zzz.wav").is_empty());
}

#[test]
fn display_name_strips_last_extension_only() {
    assert_eq!(display_name("whoosh_transition.wav"), "whoosh_transition");
    assert_eq!(display_name("take.2.final.mp3"), "take.2.final");
    assert_eq!(display_name("noext"), "noext");
    assert_eq!(display_name(".hidden"), ".hidden");
    assert_eq!(display_name("trailing."), "trailing.");
}

#[test]
fn format_duration_is_minutes_and_padded_seconds() {
    assert_eq!(format_duration(0.0), "0:00");
    assert_eq!(format_duration(5.9), "0:05");
    assert_eq!(format_duration(65.0), "1:05");
    assert_eq!(format_duration(f64::NAN), "0:00");
}

#[test]
fn normalize_tags_trims_dedupes_and_keeps_order() {
    assert_eq!(
        normalize_tags([" b", "a", "", "b", "  ", "c "]),
        vec!["b".to_string(), "a".to_string(), "c".to_string()]
    );
    assert_eq!(normalize_category(Some("  ")), None);
    assert_eq!(normalize_category(Some(" UI ")), Some("UI".to_string()));
}

#[test]
fn import_blob_checks_audio_content_type() {
    assert!(ImportBlob::new("a.wav", "audio/wav", vec![0u8]).is_audio());
    assert!(ImportBlob::new("a.wav", "Audio/X-WAV", vec![0u8]).is_audio());
    assert!(!ImportBlob::new("a.txt", "text/plain", vec![0u8]).is_audio());
}

#[test]
fn sound_id_round_trips_through_text() {
    let id = SoundId::new();
    assert_eq!(id.to_string().parse::<SoundId>().unwrap(), id);
    assert!("not-a-uuid".parse::<SoundId>().is_err());
}

#[test]
fn store_insert_fetch_update_delete() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut s = sound("hit", Some("Impact"), 10);

    assert_eq!(store.insert(&s).unwrap(), s.id);
    assert_eq!(store.fetch_one(&s.id).unwrap(), s);

    s.name = "renamed".into();
    s.tags = vec!["z".into()];
    store.update(&s).unwrap();
    let fetched = store.fetch_one(&s.id).unwrap();
    assert_eq!(fetched.name, "renamed");
    assert_eq!(fetched.tags, vec!["z".to_string()]);
    assert_eq!(&fetched.file[..], &[1u8, 2, 3]);

    store.delete(&s.id).unwrap();
    assert!(matches!(store.fetch_one(&s.id), Err(StoreError::NotFound(id)) if id == s.id));
    assert!(store.fetch_all().unwrap().is_empty());
}

#[test]
fn store_rejects_duplicate_insert_and_unknown_ids() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let s = sound("hit", None, 1);
    store.insert(&s).unwrap();
    assert!(matches!(store.insert(&s), Err(StoreError::Sqlite(_))));

    let ghost = sound("ghost", None, 2);
    assert!(matches!(store.update(&ghost), Err(StoreError::NotFound(_))));
    assert!(matches!(store.delete(&ghost.id), Err(StoreError::NotFound(_))));
}

#[test]
fn store_fetch_by_category_uses_exact_label_newest_first() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let old = sound("old", Some("Impact"), 1);
    let new = sound("new", Some("Impact"), 2);
    let other = sound("other", Some("UI"), 3);
    let none = sound("none", None, 4);
    for s in [&old, &new, &other, &none] {
        store.insert(s).unwrap();
    }

    let impacts: Vec<String> = store
        .fetch_by_category("Impact")
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(impacts, vec!["new".to_string(), "old".to_string()]);
    assert!(store.fetch_by_category("impact").unwrap().is_empty());
}

#[test]
fn store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("library.db");
    let s = sound("kept", Some("Foley"), 7);
    {
        let mut store = SqliteStore::open(&path).unwrap();
        store.insert(&s).unwrap();
    }
    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.fetch_all().unwrap(), vec![s]);
}

#[test]
fn lofty_probe_reads_wav_duration() {
    let bytes: Arc<[u8]> = Arc::from(wav_bytes(1, 8000));
    let secs = LoftyProbe.probe(bytes).unwrap();
    assert!((secs - 1.0).abs() < 0.05, "got {secs}");
}

#[test]
fn lofty_probe_rejects_garbage() {
    let bytes: Arc<[u8]> = Arc::from(b"definitely not audio".to_vec());
    assert!(LoftyProbe.probe(bytes).is_err());
}

struct SlowProbe(Duration);

impl DurationProbe for SlowProbe {
    fn probe(&self, _audio: Arc<[u8]>) -> Result<f64, ProbeError> {
        std::thread::sleep(self.0);
        Ok(3.0)
    }
}

#[test]
fn timed_probe_passes_through_fast_results() {
    let probe = TimedProbe::new(SlowProbe(Duration::ZERO), Duration::from_secs(5));
    assert_eq!(probe.probe(Arc::from(vec![0u8])).unwrap(), 3.0);
}

#[test]
fn timed_probe_gives_up_after_timeout() {
    let probe = TimedProbe::new(SlowProbe(Duration::from_secs(2)), Duration::from_millis(20));
    assert!(matches!(
        probe.probe(Arc::from(vec![0u8])),
        Err(ProbeError::TimedOut(t)) if t == Duration::from_millis(20)
    ));
}
