//! Menus, prompts and status output.

use std::{
    fmt,
    io::{self, IsTerminal},
};

use anyhow::{Result, anyhow, bail};
use console::{Key, Term, style};
use static_assertions::assert_impl_all;

use crate::{Report, Severity};

/// The operator's side of a session.
pub trait Terminal {
    /// Whether key strokes can be read.
    fn is_interactive(&self) -> bool;

    /// Let the operator pick one of `choices`. Returns its index.
    fn select(&mut self, title: &str, choices: &[&str]) -> Result<usize>;

    /// Ask until a non-empty answer is given.
    fn ask(&mut self, question: &str) -> Result<String>;

    /// Read a raw line after showing `prompt`. `None` when the input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    fn report(&mut self, report: &Report) -> Result<()>;
}

/// A closed set of menu entries.
pub trait Choice: Copy + fmt::Display + 'static {
    const ALL: &'static [Self];
}

pub fn choose<T: Choice>(terminal: &mut dyn Terminal, title: &str) -> Result<T> {
    let labels: Vec<String> = T::ALL.iter().map(ToString::to_string).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    let index = terminal.select(title, &labels)?;
    T::ALL
        .get(index)
        .copied()
        .ok_or_else(|| anyhow!("Selection {index} is out of range"))
}

/// The process' terminal.
#[derive(Debug)]
pub struct ConsoleTerminal {
    term: Term,
}
assert_impl_all!(ConsoleTerminal: Send);

impl Default for ConsoleTerminal {
    fn default() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl ConsoleTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    fn render_choices(&self, choices: &[&str], selected: usize) -> io::Result<()> {
        for (index, choice) in choices.iter().enumerate() {
            if index == selected {
                self.term
                    .write_line(&format!("{} {}", style(">").green(), style(choice).green()))?;
            } else {
                self.term.write_line(&format!("  {choice}"))?;
            }
        }
        Ok(())
    }

    fn pick(&self, choices: &[&str]) -> io::Result<usize> {
        let mut selected = 0;
        loop {
            self.render_choices(choices, selected)?;
            let key = self.term.read_key()?;
            self.term.clear_last_lines(choices.len())?;
            match key {
                Key::ArrowUp | Key::Char('k') => {
                    selected = selected.checked_sub(1).unwrap_or(choices.len() - 1)
                }
                Key::ArrowDown | Key::Char('j') => selected = (selected + 1) % choices.len(),
                Key::Enter => return Ok(selected),
                _ => {}
            }
        }
    }
}

impl Terminal for ConsoleTerminal {
    fn is_interactive(&self) -> bool {
        self.term.is_term() && io::stdin().is_terminal()
    }

    fn select(&mut self, title: &str, choices: &[&str]) -> Result<usize> {
        if choices.is_empty() {
            bail!("Nothing to select for `{title}`");
        }

        self.term.write_line(title)?;
        self.term.hide_cursor()?;
        let picked = self.pick(choices);
        self.term.show_cursor()?;
        let selected = picked?;

        // Replace the title with title and answer.
        self.term.clear_last_lines(1)?;
        self.term
            .write_line(&format!("{title} {}", style(choices[selected]).green()))?;
        Ok(selected)
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        loop {
            self.term.write_str(&format!("{question} "))?;
            let answer = self.term.read_line()?;
            let answer = answer.trim();
            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.term.write_str(prompt)?;
        match self.term.read_line() {
            Ok(line) => Ok(Some(line)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn report(&mut self, report: &Report) -> Result<()> {
        let line = report.to_string();
        let line = match report.severity() {
            Severity::Info => style(line),
            Severity::Success => style(line).green(),
            Severity::Warning => style(line).yellow(),
            Severity::Error => style(line).red(),
        };
        Ok(self.term.write_line(&line.to_string())?)
    }
}
