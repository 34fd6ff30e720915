//! # portus Library
//!
//! Exports selected code cells from a Jupyter notebook into plain script files.
//!
//! - In port mode, a cell whose first line is `# PORT <path>` has the rest of its
//!   lines written to `<path>`.
//! - In the automatic modes, function/class cells go to a utilities script and
//!   the remaining cells go to a main script.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use portus::{Config, grouper::Mode, run_portus};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config {
//!         input: PathBuf::from("analysis.ipynb"),
//!         overwrite: true,
//!         mode: Mode::All,
//!         dest_utils: None,
//!         dest_main: Some(PathBuf::from("scripts/analysis.py")),
//!         verbosity: 0,
//!     };
//!
//!     run_portus(config).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod grouper;
pub mod notebook;
pub mod utils;
pub mod writer;

pub use cli::Config;
pub use grouper::{Destinations, FileGroup, Mode, group_cells};
pub use notebook::{Cell, load_notebook};
pub use writer::ScriptWriter;

use anyhow::Result;
use log::{info, warn};
use std::path::PathBuf;

/// Loads the notebook, groups its cells and writes the groups.
///
/// Returns the destinations that were written, in write order. Skipped cells are
/// reported through `log::warn!` and do not fail the run.
pub async fn run_portus(config: Config) -> Result<Vec<PathBuf>> {
    let cells = load_notebook(&config.input).await?;
    info!(
        "Loaded {} code cell(s) from {}",
        cells.len(),
        config.input.display()
    );

    let destinations = Destinations::resolve(&config.input, config.dest_utils, config.dest_main);
    let grouping = group_cells(&cells, config.mode, &destinations);

    for warning in &grouping.warnings {
        warn!("{warning}");
    }

    if grouping.files.is_empty() {
        info!("No cells to export");
    }

    ScriptWriter::new(config.overwrite)
        .write_group(&grouping.files)
        .await
}
