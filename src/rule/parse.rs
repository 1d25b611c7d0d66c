//! Two-pass parser for Hensel rule strings.
//!
//! The first pass splits a condition list such as `2-a3ce4` into groups of
//! `(count, negated, letters)`; the second resolves each group against the
//! Hensel table.

use super::hensel::{Token, TokenSet};
use super::Rule;
use crate::error::RuleError;

/// One `<digit>[-]<letters>` group of a condition list.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Group {
    count: u8,
    negated: bool,
    letters: Vec<char>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing read yet.
    Start,
    /// Just read a count digit.
    Count,
    /// Read `-` after a count digit, letters must follow.
    Minus,
    /// Reading the letters of the current group.
    Letters,
}

/// Parse a full rule string `B<conditions>/S<conditions>`.
///
/// A topology suffix such as `:T20,20` is ignored.
pub fn parse_rule(input: &str) -> Result<Rule, RuleError> {
    let rule = input.split(':').next().unwrap_or_default().trim();
    let not_life_like = || RuleError::NotLifeLike(input.to_string());

    let body = rule.strip_prefix('B').ok_or_else(not_life_like)?;
    let (birth, survival) = body.split_once("/S").ok_or_else(not_life_like)?;

    Ok(Rule::new(
        parse_conditions(birth)?,
        parse_conditions(survival)?,
    ))
}

/// Parse one condition list, the part after `B` or `S`.
pub fn parse_conditions(spec: &str) -> Result<TokenSet, RuleError> {
    tokenize(spec)?
        .iter()
        .try_fold(TokenSet::empty(), |set, group| Ok(set.union(resolve(group)?)))
}

fn tokenize(spec: &str) -> Result<Vec<Group>, RuleError> {
    let mut groups: Vec<Group> = Vec::new();
    let mut state = State::Start;

    for (position, character) in spec.chars().enumerate() {
        state = match (character, state) {
            ('0'..='8', State::Minus) => {
                let count = groups.last().map(|g| g.count).unwrap_or_default();
                return Err(RuleError::EmptyNegation { count });
            }
            ('0'..='8', _) => {
                groups.push(Group {
                    count: character as u8 - b'0',
                    negated: false,
                    letters: Vec::new(),
                });
                State::Count
            }
            ('-', State::Count) => {
                if let Some(group) = groups.last_mut() {
                    group.negated = true;
                }
                State::Minus
            }
            ('-', _) => return Err(RuleError::MisplacedMinus { position }),
            ('a'..='z', State::Start) => {
                return Err(RuleError::LetterWithoutCount {
                    letter: character,
                    position,
                })
            }
            ('a'..='z', _) => {
                if let Some(group) = groups.last_mut() {
                    group.letters.push(character);
                }
                State::Letters
            }
            _ => {
                return Err(RuleError::UnexpectedCharacter {
                    character,
                    position,
                })
            }
        };
    }

    if state == State::Minus {
        let count = groups.last().map(|g| g.count).unwrap_or_default();
        return Err(RuleError::EmptyNegation { count });
    }

    Ok(groups)
}

fn resolve(group: &Group) -> Result<TokenSet, RuleError> {
    let count = group.count;
    let mut listed = TokenSet::empty();
    for &letter in &group.letters {
        let token = Token::new(count, Some(letter))
            .ok_or(RuleError::InvalidLetter { count, letter })?;
        listed = listed.with(token);
    }

    Ok(if group.negated {
        TokenSet::bucket(count).difference(listed)
    } else if group.letters.is_empty() {
        TokenSet::bucket(count)
    } else {
        listed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(spec: &str) -> Vec<String> {
        parse_conditions(spec)
            .unwrap()
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn test_totalistic_counts() {
        assert_eq!(tokens("1"), vec!["1c", "1e"]);
        assert_eq!(tokens("08"), vec!["0", "8"]);
        assert_eq!(parse_conditions("3").unwrap(), TokenSet::bucket(3));
        assert!(parse_conditions("").unwrap().is_empty());
    }

    #[test]
    fn test_explicit_letters_attach_to_last_count() {
        assert_eq!(tokens("3a4ce"), vec!["3a", "4c", "4e"]);
        assert_eq!(
            tokens("2a3"),
            vec!["2a", "3a", "3c", "3e", "3i", "3j", "3k", "3n", "3q", "3r", "3y"]
        );
    }

    #[test]
    fn test_negation() {
        assert_eq!(tokens("2-a"), vec!["2c", "2e", "2i", "2k", "2n"]);
        // Trailing negation at the end of the list is resolved too.
        assert_eq!(tokens("3-aceijknq"), vec!["3r", "3y"]);
        assert_eq!(tokens("1-c2"), vec!["1e", "2a", "2c", "2e", "2i", "2k", "2n"]);
    }

    #[test]
    fn test_repeated_groups_union() {
        assert_eq!(tokens("3a3a3c"), vec!["3a", "3c"]);
    }

    #[test]
    fn test_parse_rule() {
        let rule = parse_rule("B3/S23").unwrap();
        assert_eq!(rule.birth(), TokenSet::bucket(3));
        assert_eq!(rule.survival(), TokenSet::bucket(2).union(TokenSet::bucket(3)));

        let bounded = parse_rule("B3/S23:T64,64").unwrap();
        assert_eq!(bounded, rule);

        let empty = parse_rule("B/S").unwrap();
        assert!(empty.birth().is_empty() && empty.survival().is_empty());
    }

    #[test]
    fn test_rejects_non_life_like() {
        assert!(matches!(parse_rule("S23/B3"), Err(RuleError::NotLifeLike(_))));
        assert!(matches!(parse_rule("B3S23"), Err(RuleError::NotLifeLike(_))));
        assert!(matches!(parse_rule("23/3"), Err(RuleError::NotLifeLike(_))));
        assert!(matches!(parse_rule(""), Err(RuleError::NotLifeLike(_))));
    }

    #[test]
    fn test_rejects_malformed_conditions() {
        assert_eq!(
            parse_conditions("a3"),
            Err(RuleError::LetterWithoutCount { letter: 'a', position: 0 })
        );
        assert_eq!(
            parse_conditions("1a"),
            Err(RuleError::InvalidLetter { count: 1, letter: 'a' })
        );
        assert_eq!(
            parse_conditions("8c"),
            Err(RuleError::InvalidLetter { count: 8, letter: 'c' })
        );
        assert_eq!(parse_conditions("2-"), Err(RuleError::EmptyNegation { count: 2 }));
        assert_eq!(parse_conditions("2-3"), Err(RuleError::EmptyNegation { count: 2 }));
        assert_eq!(parse_conditions("2a-c"), Err(RuleError::MisplacedMinus { position: 2 }));
        assert_eq!(
            parse_conditions("9"),
            Err(RuleError::UnexpectedCharacter { character: '9', position: 0 })
        );
    }
}
