use anyhow::Result;
use console::style;
use std::io::{BufRead, Write};

/// Line-based prompt with validation. Invalid input is reported and asked
/// again; end of input yields `None`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<std::io::StdinLock<'static>, console::Term> {
    pub fn stdio() -> Self {
        Prompter::new(std::io::stdin().lock(), console::Term::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    pub fn ask<F>(&mut self, label: &str, validate: F) -> Result<Option<String>>
    where
        F: Fn(&str) -> Result<(), String>,
    {
        loop {
            write!(self.output, "{} ", style(format!("{label}:")).bold())?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(None);
            }
            let answer = line.trim();
            match validate(answer) {
                Ok(()) => return Ok(Some(answer.to_string())),
                Err(message) => writeln!(self.output, "{}", style(message).red())?,
            }
        }
    }

    /// Prints `items` as a numbered list and accepts either the number or
    /// the item itself.
    pub fn select(&mut self, label: &str, items: &[(String, String)]) -> Result<Option<String>> {
        for (idx, (value, description)) in items.iter().enumerate() {
            writeln!(self.output, "  {}) {} {}", idx + 1, value, style(description).dim())?;
        }
        let answer = self.ask(label, |input| {
            resolve_selection(input, items)
                .map(|_| ())
                .ok_or_else(|| format!("Choose 1-{} or one of the listed values", items.len()))
        })?;
        Ok(answer.and_then(|a| resolve_selection(&a, items)))
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &W {
        &self.output
    }
}

fn resolve_selection(input: &str, items: &[(String, String)]) -> Option<String> {
    if let Ok(n) = input.parse::<usize>() {
        return items.get(n.checked_sub(1)?).map(|(value, _)| value.clone());
    }
    items
        .iter()
        .find(|(value, _)| value == input)
        .map(|(value, _)| value.clone())
}
