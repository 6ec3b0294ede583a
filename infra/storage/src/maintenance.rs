use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

pub(crate) const TMP_MARKER: &str = ".sostmp.";

/// Temp files younger than this may belong to a write that is still in flight.
const STALE_AFTER: Duration = Duration::from_secs(300);

pub(crate) async fn purge_tmp(root: &Path) {
    let root = root.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || remove_stale(&root, now)).await {
        Ok((removed, failed)) if removed > 0 || failed > 0 => {
            info!(removed, failed, "Cleaned up interrupted document writes");
        },
        Ok(_) => {},
        Err(e) => error!(error = %e, "Temp file cleanup task panicked"),
    }
}

fn remove_stale(root: &Path, now: SystemTime) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    for entry in WalkDir::new(root).into_iter().flatten().filter(|e| e.file_type().is_file()) {
        if !is_tmp(&entry) || !is_stale(&entry, now) {
            continue;
        }
        match std::fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "Failed to remove temp file");
                failed += 1;
            },
        }
    }

    (removed, failed)
}

fn is_tmp(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER))
}

fn is_stale(entry: &DirEntry, now: SystemTime) -> bool {
    entry
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > STALE_AFTER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fresh_temp_files_survive_and_old_ones_go() {
        let dir = TempDir::new().expect("tempdir");
        let tmp = dir.path().join("alice.json.sostmp.3");
        let doc = dir.path().join("alice.json");
        std::fs::write(&tmp, b"{").expect("write tmp");
        std::fs::write(&doc, b"{}").expect("write doc");

        assert_eq!(remove_stale(dir.path(), SystemTime::now()), (0, 0));
        assert!(tmp.exists());

        let later = SystemTime::now() + STALE_AFTER + Duration::from_secs(1);
        assert_eq!(remove_stale(dir.path(), later), (1, 0));
        assert!(!tmp.exists());
        assert!(doc.exists());
    }
}
