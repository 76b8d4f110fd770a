//! Formatted program output.

use std::fmt;

use log;

const IRSSG_BANNER_LENGTH: usize = 103;

/// Logs an error to the `irssg-output` logger as well as to the default logger.
macro_rules! irssg_error {
    ($fmt:expr $(, $($arg:tt)*)?) => {
        log::error!($fmt, $($($arg)*)?);
        log::error!(target: "irssg-output", $fmt, $($($arg)*)?);
    }
}

/// Logs a warning to the `irssg-output` logger.
macro_rules! irssg_warn {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::warn!(target: "irssg-output", $fmt, $($($arg)*)?); }
}

/// Logs a main output line to the `irssg-output` logger.
macro_rules! irssg_output {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::info!(target: "irssg-output", $fmt, $($($arg)*)?); }
}

pub(crate) use {irssg_error, irssg_output, irssg_warn};

/// Logs a nicely formatted section title to the `irssg-output` logger.
pub fn log_title(title: &str) {
    let length = title.chars().count().max(IRSSG_BANNER_LENGTH - 6);
    let bar = "─".repeat(length);
    irssg_output!("┌──{bar}──┐");
    irssg_output!("│§ {title:^length$} §│");
    irssg_output!("└──{bar}──┘");
}

/// Writes a nicely formatted subtitle.
pub(crate) fn write_subtitle(f: &mut fmt::Formatter<'_>, subtitle: &str) -> fmt::Result {
    let length = subtitle.chars().count();
    let bar = "═".repeat(length);
    writeln!(f, "{subtitle}")?;
    writeln!(f, "{bar}")?;
    Ok(())
}

/// Logs a nicely formatted subtitle to the `irssg-output` logger.
pub(crate) fn log_subtitle(subtitle: &str) {
    let length = subtitle.chars().count();
    let bar = "═".repeat(length);
    irssg_output!("{}", subtitle);
    irssg_output!("{}", bar);
}

/// Logs a nicely formatted section beginning for one k-point to the `irssg-output` logger.
pub(crate) fn log_kpoint_begin(label: &str) {
    let width = IRSSG_BANNER_LENGTH - 14;
    let sectitle_space = label.to_string() + " ";
    irssg_output!("‹‹‹‹‹ [Begin] {sectitle_space:‹<width$}");
}

/// Logs a nicely formatted section ending for one k-point to the `irssg-output` logger.
pub(crate) fn log_kpoint_end(label: &str) {
    let width = IRSSG_BANNER_LENGTH - 14;
    let sectitle_space = label.to_string() + " ";
    irssg_output!("››››› [ End ] {sectitle_space:›<width$}");
}

/// Turns a boolean into a string of `yes` or `no`.
pub(crate) fn nice_bool(b: bool) -> String {
    if b {
        "yes".to_string()
    } else {
        "no".to_string()
    }
}

/// Logs the `Display` form of parameters, tables and results line by line to the
/// `irssg-output` logger.
pub trait IrssgOutput: fmt::Display {
    fn log_output_display(&self) {
        self.to_string().lines().for_each(|line| {
            irssg_output!("{line}");
        })
    }
}

impl<T> IrssgOutput for T where T: fmt::Display {}
