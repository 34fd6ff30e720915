use crate::grouper::Mode;
use anyhow::{Result, anyhow};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;

pub struct Config {
    pub input: PathBuf,
    pub overwrite: bool,
    pub mode: Mode,
    pub dest_utils: Option<PathBuf>,
    pub dest_main: Option<PathBuf>,
    pub verbosity: u8,
}

pub fn build_command() -> Command {
    Command::new("portus")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Exports selected notebook code cells to script files")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("Notebook to export from")
                .required(true),
        )
        .arg(
            Arg::new("overwrite")
                .short('o')
                .long("overwrite")
                .help("Truncate destination files instead of appending to them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help(
                    "p: route cells by their '# PORT <path>' line, a: all cells, \
                     f: function/class cells only, m: other cells only",
                )
                .value_parser(Mode::FLAGS)
                .default_value("p"),
        )
        .arg(
            Arg::new("dest_utils")
                .long("dest_utils")
                .value_name("PATH")
                .help("Output file for function/class cells (short: -du PATH or -du=PATH)")
                .num_args(1),
        )
        .arg(
            Arg::new("dest_main")
                .long("dest_main")
                .value_name("PATH")
                .help("Output file for the remaining cells (short: -dm PATH or -dm=PATH)")
                .num_args(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase logging verbosity (-v, -vv, -vvv)")
                .action(ArgAction::Count),
        )
}

const TWO_LETTER_SHORTS: [(&str, &str); 2] = [("-du", "--dest_utils"), ("-dm", "--dest_main")];

/// clap only knows single-character shorts, so `-du`/`-dm` become long flags.
/// Attached values (`-du=PATH`, `-duPATH`) are carried over.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter().map(Into::into).map(expand_short).collect()
}

fn expand_short(arg: OsString) -> OsString {
    let Some(text) = arg.to_str() else {
        return arg;
    };

    for (short, long) in TWO_LETTER_SHORTS {
        if let Some(rest) = text.strip_prefix(short) {
            if rest.is_empty() {
                return OsString::from(long);
            }
            let value = rest.strip_prefix('=').unwrap_or(rest);
            return OsString::from(format!("{long}={value}"));
        }
    }

    arg
}

pub fn parse_args() -> Result<Config> {
    parse_args_from(std::env::args_os())
}

pub fn parse_args_from<I, T>(args: I) -> Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let matches = build_command().get_matches_from(normalize_args(args));
    config_from_matches(&matches)
}

fn config_from_matches(matches: &ArgMatches) -> Result<Config> {
    let input = matches
        .get_one::<String>("file")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Missing notebook path"))?;

    let mode = matches
        .get_one::<String>("mode")
        .map(|flag| flag.parse::<Mode>())
        .transpose()
        .map_err(|e| anyhow!(e))?
        .unwrap_or_default();

    Ok(Config {
        input,
        overwrite: matches.get_flag("overwrite"),
        mode,
        dest_utils: matches.get_one::<String>("dest_utils").map(PathBuf::from),
        dest_main: matches.get_one::<String>("dest_main").map(PathBuf::from),
        verbosity: matches.get_count("verbose"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = parse_args_from(["portus", "nb.ipynb"]).unwrap();
        assert_eq!(config.input, PathBuf::from("nb.ipynb"));
        assert!(!config.overwrite);
        assert_eq!(config.mode, Mode::Port);
        assert_eq!(config.dest_utils, None);
        assert_eq!(config.dest_main, None);
        assert_eq!(config.verbosity, 0);
    }

    #[test]
    fn two_letter_shorts_are_accepted() {
        let config = parse_args_from([
            "portus", "nb.ipynb", "-o", "-m", "a", "-du", "lib/u.py", "-dm", "main.py", "-vv",
        ])
        .unwrap();
        assert!(config.overwrite);
        assert_eq!(config.mode, Mode::All);
        assert_eq!(config.dest_utils, Some(PathBuf::from("lib/u.py")));
        assert_eq!(config.dest_main, Some(PathBuf::from("main.py")));
        assert_eq!(config.verbosity, 2);
    }

    #[test]
    fn long_flags() {
        let config = parse_args_from([
            "portus",
            "--mode",
            "f",
            "--dest_utils",
            "u.py",
            "--overwrite",
            "nb.ipynb",
        ])
        .unwrap();
        assert_eq!(config.mode, Mode::Functions);
        assert_eq!(config.dest_utils, Some(PathBuf::from("u.py")));
        assert!(config.overwrite);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let result = build_command().try_get_matches_from(["portus", "nb.ipynb", "-m", "z"]);
        assert!(result.is_err());
    }

    #[test]
    fn attached_values_on_two_letter_shorts() {
        let config = parse_args_from([
            "portus",
            "nb.ipynb",
            "-m",
            "a",
            "-du=lib/u.py",
            "-dmrun.py",
        ])
        .unwrap();
        assert_eq!(config.dest_utils, Some(PathBuf::from("lib/u.py")));
        assert_eq!(config.dest_main, Some(PathBuf::from("run.py")));

        let args = normalize_args(["-du=x.py", "-dmy.py"]);
        assert_eq!(args, ["--dest_utils=x.py", "--dest_main=y.py"].map(OsString::from));
    }

    #[test]
    fn normalize_leaves_other_args_alone() {
        let args = normalize_args(["portus", "-du", "x", "-dm", "y", "--du", "-d"]);
        assert_eq!(
            args,
            ["portus", "--dest_utils", "x", "--dest_main", "y", "--du", "-d"]
                .map(OsString::from)
        );
    }

    #[test]
    fn command_is_well_formed() {
        build_command().debug_assert();
    }
}
