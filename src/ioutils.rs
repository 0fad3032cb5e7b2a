use std::path::Path;

use crate::constants::MARKER_FILE;
use crate::error::{Error, Result};

pub fn create_dir_all<P: AsRef<Path>>(dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    std::fs::create_dir_all(dest_path).map_err(Error::IoError)
}

/// Writes the whole content in a single call, creating parent directories first.
pub fn write_file<P: AsRef<Path>>(content: &str, dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    if let Some(parent) = dest_path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::write(dest_path, content).map_err(Error::IoError)
}

pub fn read_file<P: AsRef<Path>>(source_path: P) -> Result<String> {
    std::fs::read_to_string(source_path.as_ref()).map_err(Error::IoError)
}

/// Creates `dir` (recursively) and an empty marker file inside it.
pub fn create_marked_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    create_dir_all(dir)?;
    write_file("", dir.join(MARKER_FILE))
}
