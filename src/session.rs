use std::io;

use thiserror::Error;
use tracing::{error, info};

use crate::console::{Console, Input, Status};
use crate::downloader::{DownloadError, Downloader, FileDownloader};

pub const FAREWELL: &str = "👋 Thank you for using Image Fetch!";
pub const INTERRUPTED_FAREWELL: &str = "👋 Program interrupted by user. Goodbye!";

const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];
const AFFIRMATIVE_WORDS: [&str; 2] = ["y", "yes"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Prompting,
    Validating(String),
    Downloading(String),
    AskRetry { succeeded: bool },
    Terminated,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("console I/O failed: {0}")]
    Console(#[from] io::Error),
}

pub struct Session<T: FileDownloader, C: Console> {
    downloader: Downloader<T>,
    console: C,
}

impl<T, C> Session<T, C>
where
    T: FileDownloader,
    C: Console,
{
    pub fn new(downloader: Downloader<T>, console: C) -> Self {
        Session {
            downloader,
            console,
        }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn downloader(&self) -> &Downloader<T> {
        &self.downloader
    }

    pub fn run(&mut self) {
        let mut state = State::Prompting;

        while state != State::Terminated {
            state = match self.step(state) {
                Ok(next) => next,
                Err(err) => {
                    error!(%err, "session step failed");
                    self.console.blank_line();
                    self.console.say(
                        Status::Error,
                        &format!("Unexpected error in main program: {err}"),
                    );
                    self.console
                        .say(Status::Plain, "The program will continue running...");
                    State::Prompting
                }
            };
        }
    }

    pub fn step(&mut self, state: State) -> Result<State, SessionError> {
        let next = match state {
            State::Prompting => self.prompt_for_url()?,
            State::Validating(url) => self.validate(url),
            State::Downloading(url) => {
                let succeeded = self.download(&url);
                State::AskRetry { succeeded }
            }
            State::AskRetry { succeeded } => self.ask_retry(succeeded)?,
            State::Terminated => State::Terminated,
        };

        Ok(next)
    }

    fn prompt_for_url(&mut self) -> Result<State, SessionError> {
        self.console.blank_line();
        self.console.say(
            Status::Plain,
            "📝 Please enter the URL of the image you want to download:",
        );

        let line = match self.console.read_line("URL: ")? {
            Input::Line(line) => line,
            Input::Closed => return Ok(self.farewell()),
            Input::Interrupted => return Ok(self.interrupted()),
        };

        if line.is_empty() {
            self.console.say(Status::Plain, "Empty URL entered.");
            return Ok(self.farewell());
        }

        if is_quit_word(&line) {
            return Ok(self.farewell());
        }

        Ok(State::Validating(line))
    }

    fn validate(&mut self, url: String) -> State {
        if has_http_scheme(&url) {
            State::Downloading(url)
        } else {
            self.console.say(
                Status::Warning,
                "Please enter a valid URL starting with http:// or https://",
            );
            State::Prompting
        }
    }

    fn download(&mut self, url: &str) -> bool {
        match self.downloader.download(url, &mut self.console) {
            Ok(download) => {
                info!(url, file = %download.file.display(), size = download.size, "saved image");
                true
            }
            Err(err) => {
                info!(url, %err, "download failed");
                self.report_failure(&err);
                false
            }
        }
    }

    fn report_failure(&mut self, err: &DownloadError) {
        self.console.say(Status::Error, &format!("Error: {err}"));

        if let Some(hint) = err.hint() {
            self.console.say(Status::Detail, hint);
        }
    }

    fn ask_retry(&mut self, succeeded: bool) -> Result<State, SessionError> {
        self.console.blank_line();

        let question = if succeeded {
            "🔄 Would you like to download another image? (y/n)"
        } else {
            "🔄 Would you like to try with a different URL? (y/n)"
        };
        self.console.say(Status::Plain, question);

        let next = match self.console.read_line("Choice: ")? {
            Input::Line(choice) if is_affirmative(&choice) => State::Prompting,
            Input::Interrupted => self.interrupted(),
            Input::Line(_) | Input::Closed => self.farewell(),
        };

        Ok(next)
    }

    fn farewell(&mut self) -> State {
        self.console.say(Status::Plain, FAREWELL);
        State::Terminated
    }

    fn interrupted(&mut self) -> State {
        self.console.blank_line();
        self.console.say(Status::Plain, INTERRUPTED_FAREWELL);
        State::Terminated
    }
}

pub fn print_banner(console: &mut dyn Console) {
    let rule = "=".repeat(40);

    console.say(Status::Plain, "🖼  Image Fetch");
    console.say(Status::Plain, &rule);
    console.say(
        Status::Plain,
        "Saves images from the web into a local folder.",
    );
    console.say(Status::Plain, "Enter an empty line or 'quit' to leave.");
    console.say(Status::Plain, &rule);
}

pub fn is_quit_word(input: &str) -> bool {
    QUIT_WORDS
        .iter()
        .any(|word| input.eq_ignore_ascii_case(word))
}

pub fn is_affirmative(input: &str) -> bool {
    AFFIRMATIVE_WORDS
        .iter()
        .any(|word| input.trim().eq_ignore_ascii_case(word))
}

pub fn has_http_scheme(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
