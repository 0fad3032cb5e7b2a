//! Text tree of a generated component.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Renders `root` as a tree headed by `name`.
///
/// Each level lists directories first, then files, both by name. Hidden
/// entries such as marker files are left out.
pub fn render_tree(name: &str, root: &Path) -> Result<String> {
    let mut out = String::new();
    let _ = writeln!(out, "{name}");
    print_level(root, "", &mut out)?;
    Ok(out)
}

fn print_level(dir: &Path, prefix: &str, out: &mut String) -> Result<()> {
    let mut directories: Vec<PathBuf> = Vec::new();
    let mut files: Vec<PathBuf> = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| Error::IoError(err.into()))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if entry.file_type().is_dir() {
            directories.push(entry.into_path());
        } else {
            files.push(entry.into_path());
        }
    }

    let count = directories.len() + files.len();
    for (idx, item) in directories.iter().chain(files.iter()).enumerate() {
        let last = idx + 1 == count;
        let connector = if last { "└─ " } else { "├─ " };
        let name = item.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let _ = writeln!(out, "{prefix}{connector}{name}");

        if item.is_dir() {
            let child_prefix = format!("{prefix}{}", if last { "   " } else { "│  " });
            print_level(item, &child_prefix, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ioutils::write_file;
    use tempfile::TempDir;

    #[test]
    fn directories_come_before_files() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file("", root.join(".gitkeep")).unwrap();
        write_file("", root.join("README.md")).unwrap();
        write_file("", root.join("Models/User/.gitkeep")).unwrap();
        write_file("", root.join("Dtos/UserDto.php")).unwrap();
        write_file("", root.join("Dtos/OrderDto.php")).unwrap();

        let tree = render_tree("Billing", root).unwrap();
        assert_eq!(
            tree,
            "Billing\n\
             ├─ Dtos\n\
             │  ├─ OrderDto.php\n\
             │  └─ UserDto.php\n\
             ├─ Models\n\
             │  └─ User\n\
             └─ README.md\n"
        );
    }

    #[test]
    fn empty_component_prints_only_its_name() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(render_tree("Empty", tmp.path()).unwrap(), "Empty\n");
    }
}
