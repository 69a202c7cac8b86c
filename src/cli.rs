use crate::plugins::{IndexOptions, PluginSelection};
use crate::scan::ScanOptions;
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "maker_file_index.md";

pub struct Config {
    /// File, directory, or glob to index.
    pub target: String,
    pub output_path: PathBuf,
    pub recursive: bool,
    /// Display paths in the flat report relative to this directory.
    pub relpath_root: Option<PathBuf>,
    pub debug_plugins: bool,
    pub overwrite_thumbnails: bool,
    pub plugins: PluginSelection,
    pub list_plugins: bool,
    pub verbosity: u8,
}

impl Config {
    /// Config with defaults for everything except the target and output.
    pub fn new(target: impl Into<String>, output_path: PathBuf) -> Self {
        Self {
            target: target.into(),
            output_path,
            recursive: true,
            relpath_root: None,
            debug_plugins: false,
            overwrite_thumbnails: true,
            plugins: PluginSelection::default(),
            list_plugins: false,
            verbosity: 0,
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            recursive: self.recursive,
            debug_plugins: self.debug_plugins,
            index: IndexOptions {
                overwrite_thumbnails: self.overwrite_thumbnails,
            },
            plugins: self.plugins.clone(),
        }
    }
}

fn command() -> Command {
    Command::new("maker-file-index")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Index maker project files (LightBurn first) with thumbnails and notes")
        .arg(
            Arg::new("target")
                .value_name("TARGET")
                .help("File, directory, or glob (quote globs)")
                .default_value(".")
                .num_args(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output Markdown filename")
                .default_value(DEFAULT_OUTPUT)
                .num_args(1),
        )
        .arg(
            Arg::new("no-recursive")
                .long("no-recursive")
                .help("If target is a directory, do not scan subdirectories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("relpath-root")
                .long("relpath-root")
                .value_name("DIR")
                .help("Write file paths in the report relative to this directory")
                .num_args(1),
        )
        .arg(
            Arg::new("debug-plugins")
                .long("debug-plugins")
                .help("Show which plugin handles each file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-overwrite")
                .long("no-overwrite")
                .help("Keep existing thumbnails; report an error for those files instead")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("plugins")
                .long("plugins")
                .value_name("LIST")
                .help("Comma-separated plugins to try, in order (default: all)")
                .num_args(1),
        )
        .arg(
            Arg::new("list-plugins")
                .long("list-plugins")
                .help("Print the available plugins and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v, -vv, -vvv)")
                .action(ArgAction::Count),
        )
}

/// Parses the process arguments. Exits on `--help`, `--version` or usage errors.
pub fn parse_args() -> Config {
    config_from(&command().get_matches())
}

pub fn parse_from<I, T>(args: I) -> Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;
    Ok(config_from(&matches))
}

fn config_from(matches: &ArgMatches) -> Config {
    let target = matches
        .get_one::<String>("target")
        .cloned()
        .unwrap_or_else(|| ".".to_string());

    let output_path = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    Config {
        target,
        output_path,
        recursive: !matches.get_flag("no-recursive"),
        relpath_root: matches.get_one::<String>("relpath-root").map(PathBuf::from),
        debug_plugins: matches.get_flag("debug-plugins"),
        overwrite_thumbnails: !matches.get_flag("no-overwrite"),
        plugins: matches
            .get_one::<String>("plugins")
            .map(|s| PluginSelection::parse(s))
            .unwrap_or_default(),
        list_plugins: matches.get_flag("list-plugins"),
        verbosity: matches.get_count("verbose"),
    }
}
