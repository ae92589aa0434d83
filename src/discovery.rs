//! Component F: locates the newest Chrome/Chromium session log on disk.
//! Best-effort -- failures collapse to `None` rather than a typed error,
//! since this only answers "where", never "did the bytes decode".

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const PROFILE_DIRS: &[&str] = &[".config/chromium", ".config/google-chrome", ".config/chrome"];

/// Tries each well-known profile directory in order, returning the first one
/// that exists.
fn profile_root(home: &Path) -> Option<PathBuf> {
    PROFILE_DIRS
        .iter()
        .map(|rel| home.join(rel))
        .find(|path| path.exists())
}

/// Walks `root` for the file named `Session_*` with the newest modification
/// time. Any `io::Error` encountered while walking is swallowed: a
/// permission-denied subdirectory shouldn't prevent finding a session file
/// elsewhere in the tree.
fn newest_session_file(root: &Path) -> Option<PathBuf> {
    let mut best: Option<(SystemTime, PathBuf)> = None;
    walk(root, &mut best);
    best.map(|(_, path)| path)
}

fn walk(dir: &Path, best: &mut Option<(SystemTime, PathBuf)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, best);
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with("Session_") {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let Ok(mtime) = metadata.modified() else {
            continue;
        };
        let is_newer = match best {
            Some((best_mtime, _)) => mtime > *best_mtime,
            None => true,
        };
        if is_newer {
            *best = Some((mtime, path));
        }
    }
}

/// Finds the session file a caller should hand to [`crate::session::parse_session`].
/// Returns `None` if no profile directory exists or none contains a
/// `Session_*` file.
pub fn find_session_file(home: &Path) -> Option<PathBuf> {
    let root = profile_root(home)?;
    newest_session_file(&root)
}
