//! Where round decisions come from.

use std::io::{self, BufRead, Write};

use crate::error::Result;
use crate::models::RoundSummary;
use crate::search::Decision;

pub const DECISION_QUESTION: &str =
    "Rename all the files (y), increase threshold (i), lower threshold (l) or exit (e): ";

pub trait DecisionSource {
    fn decide(&mut self, summary: &RoundSummary) -> Result<Decision>;
}

/// Always accepts the first round (`--auto-rename`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoAccept;

impl DecisionSource for AutoAccept {
    fn decide(&mut self, _summary: &RoundSummary) -> Result<Decision> {
        Ok(Decision::Accept)
    }
}

/// Asks on `output` and reads one line from `input`. End of input aborts.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LinePrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> DecisionSource for LinePrompt<R, W> {
    fn decide(&mut self, _summary: &RoundSummary) -> Result<Decision> {
        write!(self.output, "{}", DECISION_QUESTION)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Decision::Abort);
        }
        Ok(Decision::from_token(&line))
    }
}
