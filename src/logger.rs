use chrono::Local;
use crossterm::style::Stylize;

use crate::state::{LogLevel, LogLine, Logs, MAX_LOGS};

pub fn log(logs: &mut Logs, level: LogLevel, msg: impl Into<String>) {
    let line = LogLine {
        level,
        text: msg.into(),
        at: Local::now(),
    };

    if logs.echo {
        eprintln!("{}", render_line(&line));
    }

    if logs.lines.len() >= MAX_LOGS {
        logs.lines.pop_front();
    }

    logs.lines.push_back(line);
}

fn render_line(line: &LogLine) -> String {
    let stamp = line.at.format("%H:%M:%S");
    let tag = match line.level {
        LogLevel::Info => "info".cyan(),
        LogLevel::Success => "ok".green(),
        LogLevel::Warn => "warn".yellow(),
        LogLevel::Error => "error".red(),
    };
    format!("{} [{}] {}", stamp, tag, line.text)
}
