use std::path::PathBuf;

use crate::constants::DRY_RUN_MESSAGE_PREFIX;

/// A single filesystem step planned for a rendered template.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    /// A missing target directory that will be created before writing.
    CreateDirectory { target: PathBuf },
    /// A missing target directory that is skipped because templates require
    /// existing directories.
    SkipDirectory { target: PathBuf, file_name: String },
    Write { target: PathBuf, content: String, target_exists: bool },
}

impl FileOperation {
    /// Returns the target path for this operation, used for error context.
    pub fn target_path(&self) -> &PathBuf {
        match self {
            FileOperation::CreateDirectory { target }
            | FileOperation::SkipDirectory { target, .. }
            | FileOperation::Write { target, .. } => target,
        }
    }

    /// Returns a brief description of this operation for error messages.
    pub fn error_context(&self) -> String {
        match self {
            FileOperation::CreateDirectory { target } => {
                format!("create directory '{}'", target.display())
            }
            FileOperation::SkipDirectory { target, .. } => {
                format!("skip directory '{}'", target.display())
            }
            FileOperation::Write { target, .. } => format!("write '{}'", target.display()),
        }
    }

    /// Gets a message describing the operation and its status.
    ///
    /// # Arguments
    /// * `dry_run` - Whether the run writes into a throwaway directory
    pub fn get_message(&self, dry_run: bool) -> String {
        let prefix = if dry_run { DRY_RUN_MESSAGE_PREFIX } else { "" };

        match self {
            FileOperation::CreateDirectory { target } => {
                format!("{prefix}Creating path '{}'", target.display())
            }
            FileOperation::SkipDirectory { target, file_name } => format!(
                "{prefix}Path '{}' does not exist; skipping generating file '{file_name}' in that directory",
                target.display()
            ),
            FileOperation::Write { target, target_exists, .. } => {
                if *target_exists {
                    format!("{prefix}Writing to '{}' (overwriting existing file)", target.display())
                } else {
                    format!("{prefix}Writing to '{}'", target.display())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_directory_message() {
        let target = PathBuf::from("/tmp/Billing/Dtos");
        let op = FileOperation::CreateDirectory { target: target.clone() };
        assert_eq!(op.get_message(false), format!("Creating path '{}'", target.display()));
        assert_eq!(op.target_path(), &target);
    }

    #[test]
    fn skip_directory_message_names_the_file() {
        let op = FileOperation::SkipDirectory {
            target: PathBuf::from("/tmp/Billing/Missing"),
            file_name: "UserDto.php".into(),
        };
        assert_eq!(
            op.get_message(false),
            "Path '/tmp/Billing/Missing' does not exist; skipping generating file 'UserDto.php' in that directory"
        );
    }

    #[test]
    fn write_operation_messages() {
        let target = PathBuf::from("/tmp/Billing/Dtos/UserDto.php");
        let fresh =
            FileOperation::Write { target: target.clone(), content: String::new(), target_exists: false };
        let existing =
            FileOperation::Write { target: target.clone(), content: String::new(), target_exists: true };
        assert_eq!(fresh.get_message(false), format!("Writing to '{}'", target.display()));
        assert_eq!(
            existing.get_message(false),
            format!("Writing to '{}' (overwriting existing file)", target.display())
        );
    }

    #[test]
    fn dry_run_messages_are_prefixed() {
        let op = FileOperation::CreateDirectory { target: PathBuf::from("/tmp/x") };
        let dry_run_message = op.get_message(true);
        let normal_message = op.get_message(false);
        assert_eq!(dry_run_message, format!("[DRY RUN] {normal_message}"));
    }

    #[test]
    fn error_context_includes_target() {
        let op = FileOperation::Write {
            target: PathBuf::from("/output/deep/nested/file.php"),
            content: "content".into(),
            target_exists: false,
        };
        let context = op.error_context();
        assert!(context.contains("write"));
        assert!(context.contains("/output/deep/nested/file.php"));
    }
}
