use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Extension given to every derived script destination.
pub const SCRIPT_EXTENSION: &str = "py";

/// Suffix appended to the notebook stem for the definitions file.
pub const UTILS_SUFFIX: &str = "_utils";

fn notebook_stem(input: &Path) -> &str {
    input
        .file_stem()
        .and_then(OsStr::to_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("notebook")
}

/// `analysis.ipynb` -> `analysis_utils.py`, next to the notebook.
pub fn default_utils_path(input: &Path) -> PathBuf {
    let stem = notebook_stem(input);
    input.with_file_name(format!("{stem}{UTILS_SUFFIX}.{SCRIPT_EXTENSION}"))
}

/// `analysis.ipynb` -> `analysis.py`, next to the notebook.
pub fn default_main_path(input: &Path) -> PathBuf {
    let stem = notebook_stem(input);
    input.with_file_name(format!("{stem}.{SCRIPT_EXTENSION}"))
}
