use std::collections::VecDeque;
use std::io;

use super::{Console, Input, Status};

// Once the script runs out every read reports `Closed`.
#[derive(Default)]
pub struct ScriptedConsole {
    script: VecDeque<io::Result<Input>>,
    pub prompts: Vec<String>,
    pub lines: Vec<(Status, String)>,
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Input> {
        self.prompts.push(prompt.to_string());

        self.script.pop_front().unwrap_or(Ok(Input::Closed))
    }

    fn say(&mut self, status: Status, message: &str) {
        self.lines.push((status, message.to_string()));
    }
}

impl ScriptedConsole {
    pub fn new(lines: &[&str]) -> Self {
        let script = lines
            .iter()
            .map(|line| Ok(Input::Line(line.to_string())))
            .collect();

        Self {
            script,
            ..Self::default()
        }
    }

    pub fn then_line(mut self, line: &str) -> Self {
        self.script.push_back(Ok(Input::Line(line.to_string())));
        self
    }

    pub fn then_interrupt(mut self) -> Self {
        self.script.push_back(Ok(Input::Interrupted));
        self
    }

    pub fn then_error(mut self, kind: io::ErrorKind) -> Self {
        self.script
            .push_back(Err(io::Error::new(kind, "scripted console failure")));
        self
    }

    pub fn said(&self, needle: &str) -> bool {
        self.lines.iter().any(|(_, line)| line.contains(needle))
    }

    pub fn said_with(&self, status: Status, needle: &str) -> bool {
        self.lines
            .iter()
            .any(|(s, line)| *s == status && line.contains(needle))
    }
}
