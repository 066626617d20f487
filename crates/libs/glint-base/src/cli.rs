//! Start-up plumbing of the glint binaries: command line parsing and the
//! console logger.

use log::LevelFilter;
use std::{
    io::Write,
    time::{Duration, SystemTime},
};

/// Parses the command line into `T` and records when the program started.
///
/// The start time is later handed to [`setup_logging`] so that every log line
/// carries the time elapsed since launch.
pub fn parse_args<T: clap::Parser>() -> (T, SystemTime) {
    let args = T::parse();
    (args, SystemTime::now())
}

/// Announces `name` in the log with its start time (UTC) and the host OS.
///
/// Must be called after [`setup_logging`], otherwise the line is dropped.
pub fn log_launch(name: &str, launch_time: SystemTime) {
    log::info!(
        "{} started at {} on {}",
        name,
        chrono::DateTime::<chrono::Utc>::from(launch_time),
        std::env::consts::OS
    );
}

/// Per-module verbosity override: module path and its level.
pub type LogFilter<'a> = (&'a str, LevelFilter);

/// Installs the console logger.
///
/// Lines look like `0:00:01.250 INFO  [glint_visu]: message`, the first field
/// being the time elapsed since `launch_time`. Without a launch time the
/// prefix is left out.
///
/// # Arguments
///
/// * `launch_time` - Reference instant of the elapsed-time prefix.
/// * `verbosity` - Global level, 0 (errors only) to 4 (trace); see
///   [`log_filter_from_level`].
/// * `overrides` - Modules logged at a level other than `verbosity`.
pub fn setup_logging(launch_time: Option<SystemTime>, verbosity: u8, overrides: &[LogFilter]) {
    let mut builder = env_logger::builder();
    builder.format(move |buf, record| {
        let crate_name = record
            .module_path()
            .and_then(|path| path.split("::").next())
            .unwrap_or("?");
        if let Some(elapsed) = launch_time.and_then(|t| t.elapsed().ok()) {
            write!(buf, "{} ", format_elapsed(elapsed))?;
        }
        writeln!(
            buf,
            "{:5} [{}]: {}",
            record.level(),
            crate_name,
            record.args()
        )
    });
    for &(module, level) in overrides {
        builder.filter(Some(module), level);
    }
    builder.filter_level(log_filter_from_level(verbosity)).init();
}

/// Formats a duration as `h:mm:ss.mmm`.
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{}:{:02}:{:02}.{:03}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        elapsed.subsec_millis()
    )
}

/// Maps the numeric verbosity of the command line to a level filter; anything
/// above 3 enables tracing.
pub fn log_filter_from_level(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
