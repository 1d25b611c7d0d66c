//! [`UserIo`] on a terminal

use crate::search::UserIo;
use std::io::{BufRead, Write};

/// Prompts on `output` and reads answers from `input`.
pub struct ConsoleIo<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleIo<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl ConsoleIo<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> UserIo for ConsoleIo<R, W> {
    fn prompt_for_integer(&mut self, message: &str) -> Option<String> {
        write!(self.output, "{} ", message).ok()?;
        self.output.flush().ok()?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            // End of input dismisses the prompt
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn show_status(&mut self, message: &str) {
        writeln!(self.output, "{}", message).ok();
    }

    fn show_result(&mut self, message: &str, value: &str) {
        writeln!(self.output, "{}\n{}", message, value).ok();
    }
}
