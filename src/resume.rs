use std::path::Path;

use crate::error::{Error, Result};

/// Fetch the resume text for a person by the fixed naming convention
/// `Resume-<name>.txt` under the resumes directory.
///
/// A missing file yields an empty string rather than an error; the
/// dashboard treats "no resume" and "empty resume" the same way. Names
/// are user input used to build a filesystem path, so anything that is
/// not filename-safe is rejected before the path is constructed.
pub fn lookup(resumes_dir: &Path, name: &str) -> Result<String> {
    if !is_safe_name(name) {
        return Err(Error::Config(format!(
            "invalid person name: {name:?}"
        )));
    }

    let path = resumes_dir.join(format!("Resume-{name}.txt"));
    match std::fs::read_to_string(&path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(String::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Letters, digits, spaces, dots, hyphens, underscores and apostrophes
/// only; never empty. Path separators and traversal sequences cannot
/// pass.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            c.is_alphanumeric() || matches!(c, ' ' | '.' | '-' | '_' | '\'')
        })
}
