mod stdio;

#[cfg(test)]
mod scripted;

use std::io;

pub use stdio::StdConsole;

#[cfg(test)]
pub use scripted::ScriptedConsole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Plain,
    Info,
    Success,
    Warning,
    Error,
    Detail,
}

impl Status {
    pub fn icon(self) -> &'static str {
        match self {
            Status::Plain => "",
            Status::Info => "ℹ ",
            Status::Success => "✅",
            Status::Warning => "⚠ ",
            Status::Error => "❌",
            Status::Detail => "  ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    Closed,
    Interrupted,
}

pub trait Console {
    fn read_line(&mut self, prompt: &str) -> io::Result<Input>;

    fn say(&mut self, status: Status, message: &str);

    fn blank_line(&mut self) {
        self.say(Status::Plain, "");
    }
}

pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}
