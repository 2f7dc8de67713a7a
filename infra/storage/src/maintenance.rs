use crate::file::TMP_PREFIX;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

/// Temp files younger than this may still belong to a concurrent writer.
const STALE_AFTER: Duration = Duration::from_secs(300);

pub(crate) fn purge_tmp(root: &Path) {
    let (removed, failed) = remove_stale(root, SystemTime::now(), STALE_AFTER);
    if removed > 0 || failed > 0 {
        info!(removed, failed, path = %root.display(), "Cleaned up temporary files");
    }
}

fn remove_stale(root: &Path, now: SystemTime, threshold: Duration) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    WalkDir::new(root)
        .max_depth(1)
        .into_iter()
        .flatten()
        .filter(|entry| is_tmp(entry) && is_stale(entry, now, threshold))
        .for_each(|entry| match std::fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(err) => {
                warn!(path = %entry.path().display(), error = %err, "Temp file removal failed");
                failed += 1;
            },
        });

    (removed, failed)
}

fn is_tmp(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry.file_name().to_str().is_some_and(|name| name.starts_with(TMP_PREFIX))
}

fn is_stale(entry: &DirEntry, now: SystemTime, threshold: Duration) -> bool {
    entry
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn removes_only_stale_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join(format!("{TMP_PREFIX}cookieConsent.json.1.1"));
        let record = dir.path().join("cookieConsent.json");
        fs::write(&tmp, b"partial").unwrap();
        fs::write(&record, b"{}").unwrap();

        let later = SystemTime::now() + Duration::from_secs(600);
        let (removed, failed) = remove_stale(dir.path(), later, STALE_AFTER);

        assert_eq!((removed, failed), (1, 0));
        assert!(!tmp.exists());
        assert!(record.exists());
    }

    #[test]
    fn keeps_fresh_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join(format!("{TMP_PREFIX}cookieConsent.json.1.2"));
        fs::write(&tmp, b"in flight").unwrap();

        let (removed, _) = remove_stale(dir.path(), SystemTime::now(), STALE_AFTER);

        assert_eq!(removed, 0);
        assert!(tmp.exists());
    }

    #[test]
    fn keeps_records_whose_key_mentions_the_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let record = dir.path().join("site.consenttmp.v2.json");
        fs::write(&record, b"{}").unwrap();

        let later = SystemTime::now() + Duration::from_secs(600);
        let (removed, _) = remove_stale(dir.path(), later, STALE_AFTER);

        assert_eq!(removed, 0);
        assert!(record.exists());
    }
}
