//! Component G: a thin Firefox recovery-file reader. Unlike the SNSS
//! decoder, this does not model Firefox's session JSON as a typed structure
//! -- it shells out to `lz4jsoncat` and `jq` and extracts a tab count,
//! mirroring the glue strategy of the source this crate was distilled from.

use std::path::{Path, PathBuf};
use std::process::Command;

const LZ4JSONCAT: &str = "lz4jsoncat";
const JQ: &str = "jq";

fn which(bin: &str) -> bool {
    let Ok(path_var) = std::env::var("PATH") else {
        return false;
    };
    std::env::split_paths(&path_var).any(|dir| dir.join(bin).is_file())
}

/// Finds the first Firefox profile's recovery file under `home`. Only the
/// macOS profile layout is understood.
fn find_recovery_file(home: &Path) -> Option<PathBuf> {
    let profiles_dir = home.join("Library/Application Support/Firefox/Profiles");
    let entries = std::fs::read_dir(&profiles_dir).ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.starts_with("default") && !name.contains(".default") {
            continue;
        }
        let recovery = entry.path().join("sessionstore-backups/recovery.jsonlz4");
        if recovery.exists() {
            return Some(recovery);
        }
    }
    None
}

/// Runs `lz4jsoncat` then `jq` over the recovery file and sums the per-window
/// tab counts. Returns `None` on any missing dependency, missing profile, or
/// tool failure -- this collaborator only ever degrades to "unavailable".
pub fn firefox_tab_count(home: &Path) -> Option<usize> {
    if !which(LZ4JSONCAT) || !which(JQ) {
        return None;
    }
    let recovery_file = find_recovery_file(home)?;

    let json = Command::new(LZ4JSONCAT)
        .arg(&recovery_file)
        .output()
        .ok()?
        .stdout;

    let counts_output = Command::new(JQ)
        .arg(".windows[].tabs | length")
        .arg("-r")
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .and_then(|mut child| {
            use std::io::Write;
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| std::io::Error::other("jq child has no stdin pipe"))?;
            stdin.write_all(&json)?;
            drop(stdin);
            child.wait_with_output()
        })
        .ok()?;

    if !counts_output.status.success() {
        return None;
    }

    let text = String::from_utf8(counts_output.stdout).ok()?;
    let mut total = 0usize;
    for line in text.lines() {
        total += line.trim().parse::<usize>().ok()?;
    }
    Some(total)
}
