use std::{
    env,
    fs::File,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::logger::{GroupEvent, get_group_event};
use crate::prelude::*;
use console::{Style, style};
use indicatif::{ProgressBar, ProgressStyle};
use lazy_static::lazy_static;
use log::{LevelFilter, Log};
use simplelog::{CombinedLogger, SharedLogger, WriteLogger};
use std::io::Write;

pub const DSBENCH_U8_COLOR_CODE: u8 = 38; // #00AFD7
pub const LOG_LEVEL_ENV: &str = "DSBENCH_LOG";

lazy_static! {
    pub static ref SPINNER: Arc<Mutex<Option<ProgressBar>>> = Arc::new(Mutex::new(None));
    pub static ref IS_TTY: bool = std::io::IsTerminal::is_terminal(&std::io::stdout());
}

/// Hide the progress bar temporarily, execute `f`, then redraw the progress bar.
///
/// If the output is not a TTY, `f` will be executed without hiding the progress bar.
pub fn suspend_progress_bar<F: FnOnce() -> R, R>(f: F) -> R {
    if *IS_TTY {
        if let Ok(mut spinner) = SPINNER.lock() {
            if let Some(spinner) = spinner.as_mut() {
                return spinner.suspend(f);
            }
        }
    }

    f()
}

fn log_level_from_env() -> LevelFilter {
    env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|log_level| log_level.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info)
}

pub struct LocalLogger {
    log_level: LevelFilter,
}

impl LocalLogger {
    pub fn new() -> Self {
        LocalLogger {
            log_level: log_level_from_env(),
        }
    }
}

impl Log for LocalLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.log_level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if let Some(group_event) = get_group_event(record) {
            match group_event {
                GroupEvent::Start(name) => {
                    println!(
                        "\n{}",
                        style(format!("►►► {name} "))
                            .bold()
                            .color256(DSBENCH_U8_COLOR_CODE)
                    );

                    if *IS_TTY {
                        start_spinner(&name);
                    } else {
                        println!("{name}...");
                    }
                }
                GroupEvent::End => {
                    if *IS_TTY {
                        clean_logger();
                    }
                }
            }

            return;
        }

        suspend_progress_bar(|| print_record(record));
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

fn start_spinner(name: &str) {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template(&format!(
        "  {{spinner:>.{DSBENCH_U8_COLOR_CODE}}} {{wide_msg:.{DSBENCH_U8_COLOR_CODE}.bold}}"
    )) {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(format!("{name}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));
    if let Ok(mut current) = SPINNER.lock() {
        current.replace(spinner);
    }
}

/// Print a log record to the console with the appropriate style
fn print_record(record: &log::Record) {
    let error_style = Style::new().red();
    let info_style = Style::new().white();
    let warn_style = Style::new().yellow();
    let debug_style = Style::new().blue().dim();
    let trace_style = Style::new().black().dim();

    match record.level() {
        log::Level::Error => eprintln!("{}", error_style.apply_to(record.args())),
        log::Level::Warn => eprintln!("{}", warn_style.apply_to(record.args())),
        log::Level::Info => println!("{}", info_style.apply_to(record.args())),
        log::Level::Debug => println!(
            "{}",
            debug_style.apply_to(format!("[DEBUG::{}] {}", record.target(), record.args())),
        ),
        log::Level::Trace => println!(
            "{}",
            trace_style.apply_to(format!("[TRACE::{}] {}", record.target(), record.args()))
        ),
    }
}

impl SharedLogger for LocalLogger {
    fn level(&self) -> LevelFilter {
        self.log_level
    }

    fn config(&self) -> Option<&simplelog::Config> {
        None
    }

    fn as_log(self: Box<Self>) -> Box<dyn Log> {
        Box::new(*self)
    }
}

pub fn get_local_logger() -> Box<dyn SharedLogger> {
    Box::new(LocalLogger::new())
}

/// Install the console logger, and a trace-level file logger when `harness_log_path` is set.
///
/// The file logger skips group events and the echoed benchmark output, which the raw log
/// already holds.
pub fn init_logger(harness_log_path: Option<&Path>) -> Result<()> {
    let mut loggers = vec![get_local_logger()];

    if let Some(path) = harness_log_path {
        let file = File::create(path)
            .with_context(|| format!("Failed to create the log file {}", path.display()))?;
        let file_logger_config = simplelog::ConfigBuilder::new()
            .add_filter_ignore_str(crate::logger::GROUP_TARGET)
            .add_filter_ignore_str(crate::executor::EXECUTOR_TARGET)
            .build();
        loggers.push(WriteLogger::new(LevelFilter::Trace, file_logger_config, file));
    }

    CombinedLogger::init(loggers).context("Failed to init logger")?;
    Ok(())
}

pub fn clean_logger() {
    if let Ok(mut spinner) = SPINNER.lock() {
        if let Some(spinner) = spinner.as_mut() {
            spinner.finish_and_clear();
        }
    }
}
