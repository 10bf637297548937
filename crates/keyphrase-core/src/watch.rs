use crate::catalog::CatalogChanged;
use crate::error::Result;
use notify::{recommended_watcher, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Active watch on the catalog database file. Watching stops when dropped.
pub struct CatalogFileWatch {
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl CatalogFileWatch {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Watch `path` and emit one [`CatalogChanged`] per burst of writes to it.
///
/// The parent directory is watched rather than the file itself so that
/// editors which replace the file through a rename are still seen.
pub fn watch_catalog_file(
    path: &Path,
    debounce: Duration,
) -> Result<(CatalogFileWatch, Receiver<CatalogChanged>)> {
    let file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    let watch_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let (raw_tx, raw_rx) = channel();
    let mut watcher = recommended_watcher(move |res: notify::Result<notify::Event>| {
        let _ = raw_tx.send(res);
    })?;
    watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

    let (tx, rx) = channel();
    thread::Builder::new()
        .name("catalog-file-watch".to_string())
        .spawn(move || forward_events(raw_rx, tx, file_name, debounce))?;

    info!(path = %path.display(), "Watching phrase catalog");

    Ok((
        CatalogFileWatch {
            _watcher: watcher,
            path: path.to_path_buf(),
        },
        rx,
    ))
}

fn forward_events(
    raw: Receiver<notify::Result<notify::Event>>,
    tx: Sender<CatalogChanged>,
    file_name: OsString,
    debounce: Duration,
) {
    loop {
        match raw.recv() {
            Ok(Ok(event)) => {
                if !is_catalog_event(&event, &file_name) {
                    continue;
                }
                // swallow the rest of the burst
                loop {
                    match raw.recv_timeout(debounce) {
                        Ok(_) => continue,
                        Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                            break
                        }
                    }
                }
                debug!("Phrase catalog file changed");
                if tx.send(CatalogChanged).is_err() {
                    break;
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Catalog file watcher error");
            }
            Err(_) => break,
        }
    }
    debug!("Catalog file watch shutting down");
}

/// Whether `event` creates, modifies or removes the file named `file_name`
pub fn is_catalog_event(event: &notify::Event, file_name: &OsString) -> bool {
    let relevant_kind = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant_kind
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(file_name.as_os_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind};
    use std::fs;
    use tempfile::tempdir;

    fn name() -> OsString {
        OsString::from("phrases.json")
    }

    #[test]
    fn filters_on_file_name_and_kind() {
        let modify = notify::Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(PathBuf::from("/tmp/kp/phrases.json"));
        assert!(is_catalog_event(&modify, &name()));

        let other_file = notify::Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/tmp/kp/config.json"));
        assert!(!is_catalog_event(&other_file, &name()));

        let access = notify::Event::new(EventKind::Access(AccessKind::Read))
            .add_path(PathBuf::from("/tmp/kp/phrases.json"));
        assert!(!is_catalog_event(&access, &name()));
    }

    #[test]
    fn forwards_one_notification_per_burst() {
        let (raw_tx, raw_rx) = channel();
        let (tx, rx) = channel();
        let handle = thread::spawn(move || {
            forward_events(raw_rx, tx, name(), Duration::from_millis(20));
        });

        for _ in 0..3 {
            let event = notify::Event::new(EventKind::Modify(ModifyKind::Any))
                .add_path(PathBuf::from("phrases.json"));
            raw_tx.send(Ok(event)).unwrap();
        }
        drop(raw_tx);
        handle.join().unwrap();

        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn notices_writes_to_catalog_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("phrases.json");
        fs::write(&path, "[]").unwrap();

        let (_watch, rx) = watch_catalog_file(&path, Duration::from_millis(50)).unwrap();
        fs::write(&path, r#"[{"key":"a","value":"b"}]"#).unwrap();

        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            CatalogChanged
        );
    }
}
