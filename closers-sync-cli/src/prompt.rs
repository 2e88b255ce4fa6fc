//! Interactive install directory selection.

use std::path::{Path, PathBuf};

use console::Term;
use dialoguer::Input;

use crate::error::CliError;

/// Ask for the install directory. `Ok(None)` means "use the default".
///
/// Returns `Ok(None)` without asking when stdin is not interactive.
pub fn ask_install_dir(default: &Path) -> Result<Option<PathBuf>, CliError> {
    if !Term::stdout().is_term() {
        return Ok(None);
    }

    let answer: String = Input::new()
        .with_prompt(format!("Install directory [{}]", default.display()))
        .allow_empty(true)
        .interact_text()
        .map_err(|e| CliError::Prompt(e.to_string()))?;

    Ok(parse_answer(&answer))
}

fn parse_answer(answer: &str) -> Option<PathBuf> {
    let trimmed = answer.trim().trim_matches('"');
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}
