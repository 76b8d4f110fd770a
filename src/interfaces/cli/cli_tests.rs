use clap::Parser;
use log::LevelFilter;

use crate::interfaces::cli::Cli;

#[test]
fn test_cli_verbosity_levels() {
    let quiet = Cli::parse_from(["irssg", "--config", "input.yml"]);
    assert_eq!(quiet.verbose, 0);
    assert_eq!(quiet.log_level(), LevelFilter::Warn);

    let info = Cli::parse_from(["irssg", "-v", "--config", "input.yml"]);
    assert_eq!(info.log_level(), LevelFilter::Info);

    let debug = Cli::parse_from(["irssg", "-vv", "--config", "input.yml"]);
    assert_eq!(debug.verbose, 2);
    assert_eq!(debug.log_level(), LevelFilter::Debug);

    let trace = Cli::parse_from(["irssg", "--verbose", "-v", "-vv", "--validate"]);
    assert_eq!(trace.verbose, 4);
    assert_eq!(trace.log_level(), LevelFilter::Trace);
    assert!(trace.validate);
    assert!(trace.config.is_none());
}
