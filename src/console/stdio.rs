use std::io::{self, BufRead, Write};

use tracing::warn;

use super::{Console, Input, Status};

pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Input> {
        {
            let mut stdout = io::stdout().lock();
            stdout.write_all(prompt.as_bytes())?;
            stdout.flush()?;
        }

        let mut line = String::new();

        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => Ok(Input::Closed),
            Ok(_) => Ok(Input::Line(line.trim().to_string())),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(Input::Interrupted),
            Err(err) => Err(err),
        }
    }

    fn say(&mut self, status: Status, message: &str) {
        let icon = status.icon();

        let result = if icon.is_empty() {
            writeln!(io::stdout().lock(), "{message}")
        } else {
            writeln!(io::stdout().lock(), "{icon} {message}")
        };

        if let Err(err) = result {
            warn!(%err, "failed to write to stdout");
        }
    }
}

impl StdConsole {
    pub fn new() -> Self {
        StdConsole
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}
