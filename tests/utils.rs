use foundry::cli::{ConfigArgs, ModeArgs, Runner, ScaffoldArgs};
use foundry::report::Report;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Absolute path of the fixture modes directory.
pub fn modes_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/modes")
}

/// Scaffold arguments selecting `mode` from the fixture modes directory.
pub fn scaffold_args(mode: &str, custom: &[&str]) -> ScaffoldArgs {
    ScaffoldArgs {
        mode: ModeArgs {
            config: ConfigArgs {
                config_name: "foundry".to_string(),
                config_path: PathBuf::from("."),
                modes_path: Some(modes_path()),
            },
            mode: Some(mode.to_string()),
            custom: custom.iter().map(|c| c.to_string()).collect(),
        },
        tree_view: false,
    }
}

/// Prints a diff of files and their contents between two directories.
/// Shows files only present in one directory and content differences for files present in both.
///
/// # Arguments
/// * `dir1` - The first directory to compare (actual output).
/// * `dir2` - The second directory to compare (expected output).
pub fn print_dir_diff(dir1: &Path, dir2: &Path) {
    let mut files1 = std::collections::BTreeSet::new();
    let mut files2 = std::collections::BTreeSet::new();

    for entry in WalkDir::new(dir1).into_iter().filter_map(Result::ok) {
        if entry.path().is_file() {
            files1.insert(entry.path().strip_prefix(dir1).unwrap().to_path_buf());
        }
    }
    for entry in WalkDir::new(dir2).into_iter().filter_map(Result::ok) {
        if entry.path().is_file() {
            files2.insert(entry.path().strip_prefix(dir2).unwrap().to_path_buf());
        }
    }

    println!("\n=== Directory Comparison ===");
    println!("Actual output:   {dir1:?}");
    println!("Expected output: {dir2:?}");

    for file in files1.difference(&files2) {
        println!("  + {file:?}");
    }
    for file in files2.difference(&files1) {
        println!("  - {file:?}");
    }
    for file in files1.intersection(&files2) {
        let actual = fs::read_to_string(dir1.join(file)).unwrap_or_default();
        let expected = fs::read_to_string(dir2.join(file)).unwrap_or_default();
        if actual != expected {
            println!("\n  File: {file:?}");
            println!("  --- Actual content:\n{actual}");
            println!("  --- Expected content:\n{expected}");
        }
    }
    println!("=== End of Comparison ===\n");
}

/// Scaffolds `mode` into a fresh working directory, compares the component
/// root `component` against `expected_dir` and returns the run report.
pub fn run_and_assert(mode: &str, custom: &[&str], component: &str, expected_dir: &str) -> Report {
    let tmp_dir = tempfile::tempdir().unwrap();
    let report = Runner::new(scaffold_args(mode, custom), tmp_dir.path().to_path_buf(), false)
        .run()
        .unwrap();

    let actual = tmp_dir.path().join(component);
    let expected = Path::new(env!("CARGO_MANIFEST_DIR")).join(expected_dir);
    match dir_diff::is_different(&actual, &expected) {
        Ok(true) => {
            print_dir_diff(&actual, &expected);
            panic!("Directories differ. See above for details.");
        }
        Ok(false) => {}
        Err(e) => debug!("Error comparing directories: {e:?}"),
    }
    assert!(!dir_diff::is_different(&actual, &expected).unwrap());
    report
}
