//! Rule-family search: which rules reproduce a pattern's evolution

pub mod batch;
pub mod engine;
pub mod family;
pub mod session;
pub mod trace;
pub mod validator;

pub use batch::{BatchEntry, BatchSearch};
pub use engine::{search_rule_family, RuleFamilySearch};
pub use family::{FamilySummary, PassStatistics, RuleFamily, SearchStatistics};
pub use session::{parse_period, run_session, UserIo};
pub use trace::{ReferenceTrace, TrialOutcome};
pub use validator::{TraceValidator, ValidationResult};
