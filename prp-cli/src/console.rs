//! Line-oriented prompts for the interactive wizard.

use anyhow::{Result, bail};
use std::io::{BufRead, Write};
use std::str::FromStr;

pub struct Console<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    #[cfg(test)]
    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn say(&mut self, line: impl AsRef<str>) -> Result<()> {
        writeln!(self.out, "{}", line.as_ref())?;
        Ok(())
    }

    /// Read one trimmed line. End of input is an error so a scripted session
    /// cannot spin forever on a prompt.
    pub fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.out, "{}: ", label)?;
        self.out.flush().ok();
        let mut s = String::new();
        if self.input.read_line(&mut s)? == 0 {
            bail!("input closed at prompt '{label}'");
        }
        Ok(s.trim().to_string())
    }

    /// Ask until the answer parses.
    pub fn prompt_parse<T: FromStr>(&mut self, label: &str) -> Result<T> {
        loop {
            let s = self.prompt(label)?;
            match s.replace(',', "").parse() {
                Ok(v) => return Ok(v),
                Err(_) => self.say(format!("  '{s}' is not a valid value, try again"))?,
            }
        }
    }

    /// Blank answer keeps `default`.
    pub fn prompt_or<T: FromStr>(&mut self, label: &str, default: T) -> Result<T> {
        loop {
            let s = self.prompt(label)?;
            if s.is_empty() {
                return Ok(default);
            }
            match s.replace(',', "").parse() {
                Ok(v) => return Ok(v),
                Err(_) => self.say(format!("  '{s}' is not a valid value, try again"))?,
            }
        }
    }

    pub fn confirm(&mut self, label: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let s = self.prompt(&format!("{label} [{hint}]"))?;
            match s.to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("  please answer y or n")?,
            }
        }
    }
}
