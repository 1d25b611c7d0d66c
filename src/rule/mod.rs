//! Life-like rules in Hensel notation

pub mod hensel;
pub mod normalize;
pub mod parse;

pub use hensel::{Token, TokenSet};
pub use normalize::{normalize, normalize_conditions, normalize_str};
pub use parse::parse_rule;

use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Birth and survival conditions of an isotropic non-totalistic rule.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rule {
    birth: TokenSet,
    survival: TokenSet,
}

impl Rule {
    pub fn new(birth: TokenSet, survival: TokenSet) -> Self {
        Self { birth, survival }
    }

    pub fn birth(&self) -> TokenSet {
        self.birth
    }

    pub fn survival(&self) -> TokenSet {
        self.survival
    }

    /// Same survival conditions, different birth conditions.
    #[must_use]
    pub fn with_birth(&self, birth: TokenSet) -> Self {
        Self::new(birth, self.survival)
    }

    /// Same birth conditions, different survival conditions.
    #[must_use]
    pub fn with_survival(&self, survival: TokenSet) -> Self {
        Self::new(self.birth, survival)
    }

    /// Cells with no live neighbours are born.
    pub fn is_b0(&self) -> bool {
        self.birth.contains(Token::ZERO)
    }

    /// Cells with eight live neighbours survive.
    pub fn is_s8(&self) -> bool {
        self.survival.contains_bucket(8)
    }

    /// Every token spelled out, e.g. `B3a3c…/S2a…`.
    pub fn expanded(&self) -> String {
        format!(
            "B{}/S{}",
            normalize::expand_conditions(self.birth),
            normalize::expand_conditions(self.survival)
        )
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&normalize(self))
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule({})", self)
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rule(s)
    }
}

impl From<Rule> for String {
    fn from(rule: Rule) -> Self {
        rule.to_string()
    }
}

impl TryFrom<String> for Rule {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_rule(&value)
    }
}
