//! Line-oriented input for the interactive wizard.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Source of answers to wizard prompts.
pub trait InputProvider {
    /// Show `prompt` and return the next answer with surrounding whitespace trimmed.
    fn next(&mut self, prompt: &str) -> io::Result<String>;
}

/// Prompts on standard output and reads answers from standard input.
#[derive(Debug, Default)]
pub struct StdinInput;

impl StdinInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputProvider for StdinInput {
    fn next(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;
        read_answer(&mut io::stdin().lock())
    }
}

fn read_answer(reader: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "standard input closed while waiting for an answer",
        ));
    }
    Ok(line.trim().to_string())
}

/// Pre-recorded answers, consumed in order. Used to drive the wizard without a terminal.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl InputProvider for ScriptedInput {
    fn next(&mut self, prompt: &str) -> io::Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .map(|answer| answer.trim().to_string())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("no scripted answer for prompt: {prompt}"),
                )
            })
    }
}
