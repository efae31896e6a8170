//! Parsing of the role selection and manual-entry answers.

use crate::error::{RoleClonerError, RoleClonerResult};

/// Largest number of role names accepted in manual entry mode.
pub const MAX_MANUAL_ROLES: usize = 20;

/// Resolve an answer to the "Enter role numbers" prompt against the discovered roles.
///
/// `all` (any case) selects everything. Otherwise the answer is a comma-separated
/// list of 1-based indices; blank entries are skipped, anything non-numeric or out
/// of range is rejected.
pub fn parse_role_selection(selection: &str, roles: &[String]) -> RoleClonerResult<Vec<String>> {
    let selection = selection.trim();
    if selection.eq_ignore_ascii_case("all") {
        return Ok(roles.to_vec());
    }

    let mut selected = Vec::new();
    for part in selection.split(',').map(str::trim) {
        if part.is_empty() {
            continue;
        }

        let index: usize = part
            .parse()
            .map_err(|_| RoleClonerError::selection(format!("invalid number: {part}")))?;

        if index < 1 || index > roles.len() {
            return Err(RoleClonerError::selection(format!(
                "number out of range: {index}"
            )));
        }

        selected.push(roles[index - 1].clone());
    }

    if selected.is_empty() {
        return Err(RoleClonerError::selection("no roles selected"));
    }

    Ok(selected)
}

/// Parse the answer to "How many roles do you want to clone?".
pub fn parse_role_count(answer: &str) -> RoleClonerResult<usize> {
    let answer = answer.trim();
    match answer.parse::<usize>() {
        Ok(count) if (1..=MAX_MANUAL_ROLES).contains(&count) => Ok(count),
        _ => Err(RoleClonerError::selection(format!(
            "invalid role count: {answer}"
        ))),
    }
}
