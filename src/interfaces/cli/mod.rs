use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::LevelFilter;

use crate::io::format::irssg_output;

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;

const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Logs a nicely formatted IrSSG heading to the `irssg-output` logger.
pub fn log_heading() {
    let version = if let Some(ver) = VERSION {
        format!("v{ver}")
    } else {
        "v unknown".to_string()
    };
    irssg_output!("╭─────────────────────────────────────────────────────────────────────────────────────────────────────╮");
    irssg_output!("│                                                                                                     │");
    irssg_output!("│           ██╗██████╗  ███████╗███████╗ ██████╗                                                      │");
    irssg_output!("│           ██║██╔══██╗ ██╔════╝██╔════╝██╔════╝                                                      │");
    irssg_output!("│           ██║██████╔╝ ███████╗███████╗██║  ███╗                                                     │");
    irssg_output!("│           ██║██╔══██╗ ╚════██║╚════██║██║   ██║                                                     │");
    irssg_output!("│           ██║██║  ██║ ███████║███████║╚██████╔╝                                                     │");
    irssg_output!("│           ╚═╝╚═╝  ╚═╝ ╚══════╝╚══════╝ ╚═════╝                                                      │");
    irssg_output!("│                                                                                                     │");
    irssg_output!("│           Irreducible representations of Bloch bands in space and spin-space groups                 │");
    irssg_output!("│                                                                               {version:>21} │");
    irssg_output!("╰─────────────────────────────────────────────────────────────────────────────────────────────────────╯");
    irssg_output!("");
}

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// YAML input file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// File to which the program output is written in addition to the terminal.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Lists the group identifiers of a catalogue and exits.
    #[arg(long, value_name = "CATALOGUE")]
    pub list_groups: Option<PathBuf>,

    /// Reads and checks all inputs without running the analysis.
    #[arg(long)]
    pub validate: bool,

    /// Increases the diagnostic output on stderr (`-v` info, `-vv` debug, `-vvv` trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The level of the root logger. Warnings and errors are always shown.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
