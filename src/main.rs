use std::path::Path;
use std::process;

use anyhow::{self, format_err};
use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;

use irssg::interfaces::catalogue::GroupCatalogue;
use irssg::interfaces::cli::{log_heading, Cli};
use irssg::interfaces::input::Input;
use irssg::interfaces::InputHandle;
use irssg::io::read_irssg_yaml;

/// Sets up a console logger for the `irssg-output` target, mirrored to `output` if given, and a
/// stderr logger at `level` for everything else.
fn init_logging(output: Option<&Path>, level: LevelFilter) -> Result<(), anyhow::Error> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{m}{n}")))
        .build();
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{l}] {t}: {m}{n}")))
        .build();
    let mut config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("stderr", Box::new(stderr)));
    let mut output_logger = Logger::builder().appender("stdout").additive(false);
    if let Some(path) = output {
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{m}{n}")))
            .append(false)
            .build(path)
            .map_err(|err| format_err!("Unable to open {}: {err}", path.display()))?;
        config = config.appender(Appender::builder().build("output_file", Box::new(file)));
        output_logger = output_logger.appender("output_file");
    }
    let config = config
        .logger(output_logger.build("irssg-output", LevelFilter::Info))
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|err| format_err!(err))?;
    log4rs::init_config(config).map_err(|err| format_err!(err))?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), anyhow::Error> {
    if let Some(catalogue_path) = cli.list_groups.as_ref() {
        let catalogue = GroupCatalogue::read(catalogue_path, 1e-6)?;
        for identifier in catalogue.identifiers() {
            log::info!(target: "irssg-output", "{identifier}");
        }
        return Ok(());
    }

    let config = cli
        .config
        .as_ref()
        .ok_or_else(|| format_err!("No input file specified. Use `--config <FILE>`."))?;
    let input: Input = read_irssg_yaml(config)?;
    if cli.validate {
        input.validate()
    } else {
        input.handle()
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.output.as_deref(), cli.log_level()) {
        eprintln!("{err}");
        process::exit(1);
    }
    log_heading();
    if let Err(err) = run(cli) {
        log::error!("{err}");
        log::error!(target: "irssg-output", "{err}");
        process::exit(1);
    }
}
