//! Command-line interface definitions for the demo binary.

use std::path::PathBuf;

use clap::Parser;



/// Command-line arguments.
#[derive(Parser)]
#[command(
    name = "konfig-demo",
    author,
    about = "Loads, edits and saves a sectioned TOML configuration file.",
    version
)]
pub struct CLIArgs {
    /// This is the path to the configuration file to use.
    /// If unspecified, this defaults to `./data/configuration.toml`.
    #[arg(
        short = 'c',
        long = "configuration-file-path",
        help = "Path to the configuration file to use. Defaults to ./data/configuration.toml"
    )]
    pub configuration_file_path: Option<PathBuf>,

    #[arg(
        short = 'p',
        long = "port",
        help = "Overwrite server.port with this value and save it."
    )]
    pub port: Option<u16>,

    #[arg(
        long = "host",
        help = "Overwrite server.host with this value and save it."
    )]
    pub host: Option<String>,

    #[arg(
        long = "reset",
        help = "If this flag is present, the configuration file is overwritten with \
                built-in defaults before anything else happens."
    )]
    pub reset: bool,

    #[arg(
        long = "print",
        help = "Print the resulting configuration document to standard output."
    )]
    pub print: bool,
}
