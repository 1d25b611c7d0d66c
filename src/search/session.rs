//! One interactive run: read the host's rule, ask for the period, search and
//! report.

use super::engine::search_rule_family;
use super::family::RuleFamily;
use crate::error::{InputError, SearchError};
use crate::game_of_life::Simulation;
use crate::rule::parse_rule;

/// Prompting and status display offered by the host.
pub trait UserIo {
    /// Ask for a number; `None` means the prompt was dismissed.
    fn prompt_for_integer(&mut self, message: &str) -> Option<String>;

    fn show_status(&mut self, message: &str);

    /// Present `value` so the user can copy it.
    fn show_result(&mut self, message: &str, value: &str);
}

/// Parse the period typed by the user.
pub fn parse_period(input: &str) -> Result<usize, InputError> {
    match input.trim().parse::<usize>() {
        Ok(period) if period >= 1 => Ok(period),
        _ => Err(InputError::InvalidPeriod(input.to_string())),
    }
}

/// Search the family of the host's current pattern under its active rule.
///
/// Nothing is searched, and the host is left untouched, when the rule is not
/// Life-like, the pattern is empty, or the period is cancelled or invalid.
pub fn run_session<S: Simulation, U: UserIo>(
    simulation: &mut S,
    io: &mut U,
) -> Result<RuleFamily, SearchError> {
    let baseline = parse_rule(&simulation.active_rule()).map_err(InputError::NotLifeLike)?;
    if simulation.is_pattern_empty() {
        return Err(InputError::EmptyPattern.into());
    }

    let answer = io
        .prompt_for_integer("Enter the period:")
        .ok_or(InputError::Cancelled)?;
    let period = parse_period(&answer)?;

    io.show_status("Processing...");
    let family = search_rule_family(simulation, &baseline, period)?;

    let expression = family.expression();
    io.show_status(&expression);
    io.show_result(
        &format!("Pattern works in 2^{} rules:", family.free_conditions()),
        &expression,
    );
    Ok(family)
}
