use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Writes `text` to `path` through a staged sibling file followed by a
/// rename, so a crash mid-write leaves either the old file or the new file,
/// never a torn one.
pub fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let staged = stage_path(path);
    fs::write(&staged, text.as_bytes())?;
    swap_into_place(&staged, path).inspect_err(|_| {
        let _ = fs::remove_file(&staged);
    })
}

// Windows rename refuses to overwrite, so the target is cleared first. A
// missing target is the first-write case, not an error.
fn swap_into_place(staged: &Path, target: &Path) -> io::Result<()> {
    match fs::remove_file(target) {
        Err(error) if error.kind() != io::ErrorKind::NotFound => return Err(error),
        _ => {}
    }
    fs::rename(staged, target)
}

fn stage_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "document".into());
    name.push(".tmp");
    path.with_file_name(name)
}
