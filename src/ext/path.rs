use std::path::{Path, PathBuf};

/// Extension trait for Path to resolve configured paths
pub trait PathExt {
    /// Resolves the path against `base` unless it is already absolute.
    ///
    /// No filesystem access happens here; `.` components are dropped and `..`
    /// pops the previous component when there is one.
    ///
    /// # Examples
    /// ```
    /// use foundry::ext::PathExt;
    /// use std::path::Path;
    ///
    /// let path = Path::new("src/./Domains");
    /// assert_eq!(path.absolutize_from("/work"), Path::new("/work/src/Domains"));
    /// ```
    fn absolutize_from<B: AsRef<Path>>(&self, base: B) -> PathBuf;
}

impl PathExt for Path {
    fn absolutize_from<B: AsRef<Path>>(&self, base: B) -> PathBuf {
        let joined =
            if self.is_absolute() { self.to_path_buf() } else { base.as_ref().join(self) };

        let mut normalized = PathBuf::new();
        for component in joined.components() {
            match component {
                std::path::Component::CurDir => {}
                std::path::Component::ParentDir => {
                    if !normalized.pop() {
                        normalized.push(component);
                    }
                }
                other => normalized.push(other),
            }
        }
        normalized
    }
}
