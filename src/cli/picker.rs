//! Interactive epoch prompt.
//!
//! Used when a subcommand needs an epoch and none was passed on the command line.

use std::io::{self, BufRead, Write};

use crate::error::AppError;

/// Prompt on stdin/stdout until a valid epoch number is entered (`q` cancels).
pub fn prompt_for_epoch(hint: Option<u64>) -> Result<u64, AppError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    read_epoch(&mut stdin.lock(), &mut stdout.lock(), hint)
}

/// Prompt loop over arbitrary reader/writer (testable).
///
/// An empty answer accepts `hint` when one is given.
pub fn read_epoch<R: BufRead, W: Write>(input: &mut R, output: &mut W, hint: Option<u64>) -> Result<u64, AppError> {
    loop {
        let written = match hint {
            Some(h) => write!(output, "Enter epoch number [{h}]: "),
            None => write!(output, "Enter epoch number: "),
        };
        written
            .and_then(|_| output.flush())
            .map_err(|e| AppError::config(format!("Failed to write prompt: {e}")))?;

        let mut line = String::new();
        let bytes = input
            .read_line(&mut line)
            .map_err(|e| AppError::config(format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::config("No input received. Pass the epoch with `--epoch <N>`."));
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            return Err(AppError::config("Canceled."));
        }
        if answer.is_empty() {
            if let Some(h) = hint {
                return Ok(h);
            }
            continue;
        }
        match answer.parse::<u64>() {
            Ok(epoch) => return Ok(epoch),
            Err(_) => {
                writeln!(output, "Invalid epoch: {answer}")
                    .map_err(|e| AppError::config(format!("Failed to write prompt: {e}")))?;
            }
        }
    }
}
