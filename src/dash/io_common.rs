use std::path::{Path, PathBuf};

use crate::dash::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Paths in a configuration file are relative to the directory of that file.
pub fn resolve_path(root: &Path, file: &str) -> String {
    if Path::new(file).is_absolute() {
        return file.to_string();
    }
    let p: PathBuf = [root, Path::new(file)].iter().collect();
    p.as_path().display().to_string()
}

/// Writes to the given file, or to the standard output for `None` and `stdout`.
pub fn write_output(out: &Option<String>, contents: &str) -> DashResult<()> {
    match out.as_deref() {
        None | Some("stdout") => {
            println!("{}", contents);
            Ok(())
        }
        Some(path) => {
            info!("Writing output to {:?}", path);
            fs::write(path, contents).context(WritingOutputSnafu { path })
        }
    }
}
