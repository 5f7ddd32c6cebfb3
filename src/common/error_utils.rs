use std::path::Path;

use crate::report::errors::ReportError;

/// Common error mapping utilities to keep path context on filesystem failures
/// Map directory creation errors with the offending path
pub fn map_dir_creation_error(path: &Path) -> impl Fn(std::io::Error) -> ReportError + '_ {
    move |e| ReportError::DirectoryCreation(format!("Failed to create directory '{}': {}", path.display(), e))
}

/// Map render failures (chart or summary export) with the target path
pub fn map_render_error(path: &Path) -> impl Fn(std::io::Error) -> ReportError + '_ {
    move |e| ReportError::Render(format!("Failed to write '{}': {}", path.display(), e))
}

/// Helper trait for attaching path context to io results
pub trait ErrorContext<T> {
    fn with_dir_context(self, path: &Path) -> Result<T, ReportError>;
    fn with_render_context(self, path: &Path) -> Result<T, ReportError>;
}

impl<T> ErrorContext<T> for Result<T, std::io::Error> {
    fn with_dir_context(self, path: &Path) -> Result<T, ReportError> {
        self.map_err(map_dir_creation_error(path))
    }

    fn with_render_context(self, path: &Path) -> Result<T, ReportError> {
        self.map_err(map_render_error(path))
    }
}
