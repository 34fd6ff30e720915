use crate::grouper::FileGroup;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Placed between chunks of the same destination.
pub const CHUNK_SEPARATOR: &str = "\n\n\n";

/// Written before new content when appending to a file that already exists,
/// empty or not. It does not look at how many blank lines the file ends with.
pub const APPEND_SEPARATOR: &str = "\n\n";

pub struct ScriptWriter {
    overwrite: bool,
}

impl ScriptWriter {
    pub fn new(overwrite: bool) -> Self {
        Self { overwrite }
    }

    /// Writes every destination in `files`, in order, stopping at the first error.
    pub async fn write_group(&self, files: &FileGroup) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(files.len());

        for (dest, chunks) in files.iter() {
            self.write_file(dest, chunks).await?;
            written.push(dest.to_path_buf());
        }

        Ok(written)
    }

    pub async fn write_file(&self, dest: &Path, chunks: &[String]) -> Result<()> {
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let existed = fs::try_exists(dest)
            .await
            .with_context(|| format!("Failed to stat output file: {}", dest.display()))?;

        let mut options = OpenOptions::new();
        if self.overwrite {
            options.write(true).create(true).truncate(true);
        } else {
            options.append(true).create(true);
        }

        let file = options
            .open(dest)
            .await
            .with_context(|| format!("Failed to open output file: {}", dest.display()))?;

        let mut writer = BufWriter::new(file);

        if !self.overwrite && existed {
            debug!("Appending to existing file {}", dest.display());
            writer
                .write_all(APPEND_SEPARATOR.as_bytes())
                .await
                .with_context(|| format!("Failed to write separator to {}", dest.display()))?;
        }

        let mut content = chunks.join(CHUNK_SEPARATOR);
        content.push('\n');

        writer
            .write_all(content.as_bytes())
            .await
            .with_context(|| format!("Failed to write chunks to {}", dest.display()))?;

        writer
            .flush()
            .await
            .with_context(|| format!("Failed to flush output file: {}", dest.display()))?;

        info!("Wrote {} chunk(s) to {}", chunks.len(), dest.display());
        Ok(())
    }
}
