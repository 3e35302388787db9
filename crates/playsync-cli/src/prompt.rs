//! Yes/no confirmation gates shown before a provisioning run.

use std::io::{BufRead, Write};

/// Asks the operator a yes/no question. Anything other than an explicit yes
/// counts as no.
pub(crate) trait Confirm {
    fn confirm(&mut self, question: &str) -> std::io::Result<bool>;
}

/// Prompts on stdout and reads the answer from stdin.
pub(crate) struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, question: &str) -> std::io::Result<bool> {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{question} (y/N): ")?;
        stdout.flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

/// Answers yes to everything; selected by `--yes` for scripted runs.
pub(crate) struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, question: &str) -> std::io::Result<bool> {
        tracing::debug!(question, "auto-confirmed");
        Ok(true)
    }
}

pub(crate) fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
