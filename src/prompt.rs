use crate::error::Result;
use console::style;
use std::io::{self, BufRead, Write};

const AFFIRMATIVE: &str = "yes";

/// Asks the user to approve a destructive step.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self(prompt))
    }
}

/// Only a literal `yes` (any case, surrounding whitespace ignored) approves.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case(AFFIRMATIVE)
}

/// Reads answers line by line from a reader, typically stdin.
pub struct LineConfirm<R> {
    reader: R,
}

impl LineConfirm<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self {
            reader: io::stdin().lock(),
        }
    }
}

impl<R: BufRead> LineConfirm<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Confirm for LineConfirm<R> {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        print!("{} {} ", style(prompt).bold(), style("(yes/no):").dim());
        io::stdout().flush()?;

        let mut answer = String::new();
        // EOF counts as "no".
        self.reader.read_line(&mut answer)?;
        Ok(is_affirmative(&answer))
    }
}
