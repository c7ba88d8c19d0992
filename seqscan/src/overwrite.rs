use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::Path;

/// Yes/no gate consulted before replacing an existing output file.
pub trait OverwriteGate {
    fn allow(&mut self, path: &Path) -> Result<bool>;
}

/// `--yes`: never ask.
pub struct AlwaysOverwrite;

impl OverwriteGate for AlwaysOverwrite {
    fn allow(&mut self, _path: &Path) -> Result<bool> {
        Ok(true)
    }
}

/// Asks on `output` and reads the answer from `input` when the file exists.
pub struct PromptGate<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptGate<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptGate<std::io::StdinLock<'static>, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> OverwriteGate for PromptGate<R, W> {
    fn allow(&mut self, path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(true);
        }
        write!(self.output, "{} exists. Overwrite? [y/N] ", path.display())?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        let answer = answer.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}
