use consent_storage::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Prefs {
    analytics: bool,
    marketing: bool,
}

fn key() -> StorageKey {
    StorageKey::try_from("cookieConsent").unwrap()
}

#[test]
fn test_file_roundtrip_and_layout() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::builder().root(temp.path()).open().unwrap();

    let prefs = Prefs { analytics: true, marketing: false };
    store.save(&key(), &prefs).unwrap();

    assert!(store.path_for(&key()).ends_with("cookieConsent.json"));
    assert!(store.contains(&key()).unwrap());
    assert_eq!(store.load_or_default::<Prefs>(&key()), prefs);
}

#[test]
fn test_records_survive_reopen() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("prefs");

    {
        let store = FileStore::builder().root(&root).create(true).open().unwrap();
        store.save(&key(), &Prefs { analytics: true, marketing: true }).unwrap();
    }

    let reopened = FileStore::builder().root(&root).create(false).open().unwrap();
    let loaded: Prefs = reopened.load_or_default(&key());
    assert_eq!(loaded, Prefs { analytics: true, marketing: true });
}

#[test]
fn test_missing_root_without_create_fails() {
    let temp = TempDir::new().unwrap();
    let res = FileStore::builder().root(temp.path().join("absent")).create(false).open();

    assert!(matches!(res, Err(StorageError::DirectoryNotFound { .. })));
}

#[test]
fn test_missing_record_reads_none() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::builder().root(temp.path()).open().unwrap();

    assert!(store.read(&key()).unwrap().is_none());
    assert!(!store.contains(&key()).unwrap());
    assert_eq!(store.load_or_default::<Prefs>(&key()), Prefs::default());
}

#[test]
fn test_corrupt_record_falls_back_to_default() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::builder().root(temp.path()).open().unwrap();

    fs::write(store.path_for(&key()), b"{ not json").unwrap();

    let loaded = store.load_or_else(&key(), || Prefs { analytics: true, marketing: true });
    assert_eq!(loaded, Prefs { analytics: true, marketing: true });
}

#[test]
fn test_overwrite_is_last_write_wins() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::builder().root(temp.path()).open().unwrap();

    store.save(&key(), &Prefs { analytics: true, marketing: true }).unwrap();
    store.save(&key(), &Prefs { analytics: false, marketing: true }).unwrap();

    assert_eq!(store.load_or_default::<Prefs>(&key()), Prefs { analytics: false, marketing: true });

    let leftovers = fs::read_dir(store.root())
        .unwrap()
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().starts_with(".consenttmp."))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn test_remove_reports_presence() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::builder().root(temp.path()).open().unwrap();

    store.write(&key(), b"{}").unwrap();
    assert!(store.remove(&key()).unwrap());
    assert!(!store.remove(&key()).unwrap());
}

#[test]
fn test_memory_clones_share_records() {
    let store = MemoryStore::new();
    let twin = store.clone();

    store.save(&key(), &Prefs { analytics: true, marketing: false }).unwrap();

    assert_eq!(twin.len(), 1);
    assert_eq!(twin.load_or_default::<Prefs>(&key()), Prefs { analytics: true, marketing: false });
    assert!(twin.remove(&key()).unwrap());
    assert!(!store.contains(&key()).unwrap());
}

#[test]
fn test_trait_object_usage() {
    let store: Box<dyn PreferenceStore> = Box::new(MemoryStore::new());
    store.save(&key(), &[1, 2, 3]).unwrap();

    let loaded: Vec<u8> = store.load_or_default(&key());
    assert_eq!(loaded, vec![1, 2, 3]);
}

#[test]
fn test_reopen_keeps_old_record_with_dotted_key() {
    let temp = TempDir::new().unwrap();
    let key = StorageKey::try_from("site.consenttmp.v2").unwrap();

    let store = FileStore::builder().root(temp.path()).open().unwrap();
    store.save(&key, &Prefs { analytics: true, marketing: false }).unwrap();

    let path = store.path_for(&key);
    fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(600))
        .unwrap();
    drop(store);

    let reopened = FileStore::builder().root(temp.path()).open().unwrap();

    assert!(path.is_file());
    assert_eq!(
        reopened.load_or_default::<Prefs>(&key),
        Prefs { analytics: true, marketing: false }
    );
}

#[test]
fn test_reopen_purges_stale_temp_files() {
    let temp = TempDir::new().unwrap();
    let stale = temp.path().join(".consenttmp.cookieConsent.json.1.1");
    fs::write(&stale, b"partial").unwrap();
    fs::File::options()
        .write(true)
        .open(&stale)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(600))
        .unwrap();

    let _store = FileStore::builder().root(temp.path()).open().unwrap();

    assert!(!stale.exists());
}
