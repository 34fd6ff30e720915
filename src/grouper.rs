//! Routing of code cells to destination files.
//!
//! A [`Mode`] is chosen once per run. In [`Mode::Port`] every cell names its own
//! destination with a `# PORT <path>` first line. The other modes split cells
//! into definitions (first line starts with `def ` or `class `) and loose code,
//! sending them to a utilities file and a main file respectively.

use crate::notebook::Cell;
use crate::utils::{default_main_path, default_utils_path};
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const PORT_MARKER: &str = "# PORT";

const DEFINITION_PREFIXES: [&str; 2] = ["def ", "class "];

/// How cells are routed to destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Each cell's `# PORT <path>` first line picks its destination.
    #[default]
    Port,
    /// Definitions to the utilities file, everything else to the main file.
    All,
    /// Definitions only, to the utilities file.
    Functions,
    /// Loose code only, to the main file.
    Main,
}

impl Mode {
    /// Flag values accepted on the command line, in declaration order.
    pub const FLAGS: [&'static str; 4] = ["p", "a", "f", "m"];

    fn accepts_definitions(self) -> bool {
        matches!(self, Mode::All | Mode::Functions)
    }

    fn accepts_loose_code(self) -> bool {
        matches!(self, Mode::All | Mode::Main)
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "p" => Ok(Mode::Port),
            "a" => Ok(Mode::All),
            "f" => Ok(Mode::Functions),
            "m" => Ok(Mode::Main),
            other => Err(format!("unknown mode '{other}' (expected one of p, a, f, m)")),
        }
    }
}

/// Output files used by the automatic modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    pub utils: PathBuf,
    pub main: PathBuf,
}

impl Destinations {
    /// Uses the explicit paths where given, otherwise names derived from `input`.
    pub fn resolve(input: &Path, utils: Option<PathBuf>, main: Option<PathBuf>) -> Self {
        Self {
            utils: utils.unwrap_or_else(|| default_utils_path(input)),
            main: main.unwrap_or_else(|| default_main_path(input)),
        }
    }
}

/// Destination path -> chunks, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileGroup {
    entries: Vec<(PathBuf, Vec<String>)>,
}

impl FileGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` to the entry for `dest`, creating the entry if needed.
    pub fn push(&mut self, dest: impl Into<PathBuf>, chunk: String) {
        let dest = dest.into();
        match self.entries.iter_mut().find(|(path, _)| *path == dest) {
            Some((_, chunks)) => chunks.push(chunk),
            None => self.entries.push((dest, vec![chunk])),
        }
    }

    pub fn get(&self, dest: impl AsRef<Path>) -> Option<&[String]> {
        let dest = dest.as_ref();
        self.entries
            .iter()
            .find(|(path, _)| path == dest)
            .map(|(_, chunks)| chunks.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[String])> {
        self.entries
            .iter()
            .map(|(path, chunks)| (path.as_path(), chunks.as_slice()))
    }

    pub fn destinations(&self) -> Vec<&Path> {
        self.iter().map(|(path, _)| path).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A parsed `# PORT <path>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    pub path: &'a str,
}

impl<'a> Directive<'a> {
    /// Returns `None` unless `line` starts with the marker followed by whitespace
    /// or nothing at all. The path may come back empty.
    pub fn parse(line: &'a str) -> Option<Self> {
        let rest = line.strip_prefix(PORT_MARKER)?;
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }
        Some(Self { path: rest.trim() })
    }
}

/// A cell that was dropped because its directive could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    IncompletePortCommand { excerpt: String },
    EmptyPortCell { excerpt: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::IncompletePortCommand { excerpt } => {
                write!(f, "Incomplete port command: {excerpt}")
            }
            Warning::EmptyPortCell { excerpt } => write!(f, "Empty port cell: {excerpt}"),
        }
    }
}

/// Result of grouping: what to write and which cells were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    pub files: FileGroup,
    pub warnings: Vec<Warning>,
}

/// Routes `cells` according to `mode`. `destinations` is unused in port mode.
pub fn group_cells(cells: &[Cell], mode: Mode, destinations: &Destinations) -> Grouping {
    match mode {
        Mode::Port => group_by_directive(cells),
        Mode::All | Mode::Functions | Mode::Main => {
            group_automatically(cells, mode, destinations)
        }
    }
}

/// The first two lines of a cell, enough to find it again in the notebook.
fn excerpt(cell: &Cell) -> String {
    let head: String = cell.source.iter().take(2).map(String::as_str).collect();
    format!("{}...", head.trim_end())
}

fn group_by_directive(cells: &[Cell]) -> Grouping {
    let mut grouping = Grouping::default();

    for cell in cells {
        let Some(directive) = cell.first_line().and_then(Directive::parse) else {
            continue;
        };

        if directive.path.is_empty() {
            grouping.warnings.push(Warning::IncompletePortCommand {
                excerpt: excerpt(cell),
            });
            continue;
        }

        if cell.body().is_empty() {
            grouping.warnings.push(Warning::EmptyPortCell {
                excerpt: excerpt(cell),
            });
            continue;
        }

        debug!("Porting cell to {}", directive.path);
        grouping.files.push(directive.path, cell.body().concat());
    }

    grouping
}

fn is_definition(cell: &Cell) -> bool {
    cell.first_line()
        .is_some_and(|line| DEFINITION_PREFIXES.iter().any(|p| line.starts_with(p)))
}

fn group_automatically(cells: &[Cell], mode: Mode, destinations: &Destinations) -> Grouping {
    let mut grouping = Grouping::default();

    for cell in cells {
        let dest = if is_definition(cell) {
            mode.accepts_definitions().then_some(&destinations.utils)
        } else {
            mode.accepts_loose_code().then_some(&destinations.main)
        };

        match dest {
            Some(dest) => {
                debug!("Routing cell to {}", dest.display());
                grouping.files.push(dest.clone(), cell.text());
            }
            None => debug!("Dropping cell not accepted by {mode:?} mode"),
        }
    }

    grouping
}
