use camino::Utf8Path;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};

/// Create `path` with `contents` unless something already exists there.
///
/// Returns `Ok(true)` when the file was written, `Ok(false)` when it was left
/// alone. Existence check and creation are a single `create_new` open.
pub fn write_if_absent(path: &Utf8Path, contents: &[u8]) -> std::io::Result<bool> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::AlreadyExists || path.exists() => return Ok(false),
        Err(e) => return Err(e),
    };

    if let Err(e) = file.write_all(contents).and_then(|_| file.flush()) {
        drop(file);
        // A truncated file would be reported as "unchanged" forever after.
        let _ = fs::remove_file(path);
        return Err(e);
    }
    Ok(true)
}
