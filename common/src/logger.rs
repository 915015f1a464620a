use std::sync::OnceLock;
use chrono::Local;

static LOGGER: OnceLock<Logger> = OnceLock::new();

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LogLevel {
    Info,
    Warn,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
        }
    }
}

pub struct Logger {
    prefix: Option<String>,
}

impl Logger {
    fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    fn format_line(&self, level: LogLevel, message: &str) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        match self.prefix {
            Some(ref prefix) => format!("[{}][{}][{}] {}", timestamp, level.tag(), prefix, message),
            None => format!("[{}][{}] {}", timestamp, level.tag(), message),
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        let line = self.format_line(level, message);
        // stdout belongs to the game board in the console client
        eprintln!("{}", line);
    }
}

pub fn init_logger(prefix: Option<String>) {
    LOGGER.get_or_init(|| Logger::new(prefix));
}

pub fn log_at(level: LogLevel, message: &str) {
    match LOGGER.get() {
        Some(logger) => logger.log(level, message),
        None => eprintln!("[{}] {}", level.tag(), message),
    }
}

pub fn log(message: &str) {
    log_at(LogLevel::Info, message);
}

pub fn warn(message: &str) {
    log_at(LogLevel::Warn, message);
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::logger::warn(&format!($($arg)*))
    };
}
