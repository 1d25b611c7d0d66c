//! End-to-end searches against known families

use rule_family::error::{InputError, SearchError, SimulationError};
use rule_family::game_of_life::{LifeSimulator, Pattern, Simulation};
use rule_family::rule::{normalize_str, Rule, TokenSet};
use rule_family::search::{run_session, search_rule_family, RuleFamily, TraceValidator, UserIo};

fn pattern(cells: &[(i64, i64)]) -> Pattern {
    cells.iter().copied().collect()
}

fn glider() -> Pattern {
    pattern(&[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)])
}

fn search(rule: &str, cells: &Pattern, period: usize) -> RuleFamily {
    let baseline: Rule = rule.parse().unwrap();
    let mut simulator = LifeSimulator::with_pattern(rule, cells).unwrap();
    search_rule_family(&mut simulator, &baseline, period).unwrap()
}

fn assert_contained(family: &RuleFamily) {
    let baseline = family.baseline;
    assert!(family.need.birth().is_subset(baseline.birth()));
    assert!(baseline.birth().is_subset(family.ok.birth()));
    assert!(family.need.survival().is_subset(baseline.survival()));
    assert!(baseline.survival().is_subset(family.ok.survival()));
}

#[test]
fn glider_in_life() {
    let family = search("B3/S23", &glider(), 4);

    assert_eq!(
        family.expression(),
        "B3aijn/S2ae3jnr - B2ikn34aceijknqtwyz5aceijkqry678/S0234aceijnqrtwyz5678"
    );
    assert_eq!(family.free_conditions(), 82);
    assert_contained(&family);
}

#[test]
fn glider_in_highlife_has_the_same_family() {
    let life = search("B3/S23", &glider(), 4);
    let highlife = search("B36/S23", &glider(), 4);

    assert_eq!(highlife.expression(), life.expression());
    assert!(life.contains(&"B36/S23".parse().unwrap()));
}

#[test]
fn blinker_and_block() {
    let blinker = search("B3/S23", &pattern(&[(0, 1), (1, 1), (2, 1)]), 2);
    assert_eq!(blinker.expression(), "B3i/S2i - B2ceikn345678/S01c2345678");
    assert_eq!(blinker.free_conditions(), 95);

    let block = search("B3/S23", &pattern(&[(0, 0), (1, 0), (0, 1), (1, 1)]), 1);
    assert_eq!(block.expression(), "B/S3a - B1e2ceikn345678/S012345678");
    assert_eq!(block.free_conditions(), 98);
}

#[test]
fn lone_cell_dies_in_any_rule_without_b1_or_s0() {
    let family = search("B2-a/S12", &pattern(&[(0, 0)]), 1);
    assert_eq!(family.expression(), "B/S - B2345678/S12345678");
}

#[test]
fn b0_rules_keep_b0_in_both_ends() {
    let family = search("B0/S", &pattern(&[(0, 0)]), 2);

    assert_eq!(
        family.expression(),
        "B0/S - B023acejknqry45ceijknqry678/S12345acejknqry6ceikn7e"
    );
    assert_eq!(family.free_conditions(), 92);
    assert!(family.need.is_b0() && family.ok.is_b0());
    assert!(!family.ok.is_s8());

    let validator = TraceValidator::new(2);
    for result in validator.validate_family(&pattern(&[(0, 0)]), &family).unwrap() {
        assert!(result.is_valid(), "{}", result);
    }
}

#[test]
fn b0_with_s8_baseline_is_rejected() {
    let baseline: Rule = "B0123478/S01234678".parse().unwrap();
    let mut simulator = LifeSimulator::new("B3/S23").unwrap();
    simulator.place_pattern(&glider());

    let result = search_rule_family(&mut simulator, &baseline, 4);
    assert!(matches!(
        result,
        Err(SearchError::Input(InputError::UnsupportedBaseline(
            SimulationError::InvalidRule { .. }
        )))
    ));
}

#[test]
fn both_ends_of_a_family_reproduce_the_trace() {
    let validator = TraceValidator::new(4);
    let family = search("B3/S23", &glider(), 4);

    for result in validator.validate_family(&glider(), &family).unwrap() {
        assert!(result.is_valid(), "{}", result);
    }

    // Adding any condition outside the OK rule breaks the trace.
    let outside = TokenSet::bucket(1).difference(family.ok.birth());
    for token in outside.iter() {
        let candidate = family.ok.with_birth(family.ok.birth().with(token));
        let result = validator.validate(&glider(), &family.baseline, &candidate).unwrap();
        assert!(!result.is_valid(), "{}", candidate);
    }
}

#[test]
fn count_identity() {
    let family = search("B3/S23", &pattern(&[(0, 1), (1, 1), (2, 1)]), 2);
    let k = (family.ok.birth().len() - family.need.birth().len())
        + (family.ok.survival().len() - family.need.survival().len());
    assert_eq!(family.free_conditions(), k);
    assert_eq!(family.family_size(), 1u128 << k);
}

#[test]
fn results_are_normalized() {
    let family = search("B3/S23", &glider(), 4);
    for rule in [family.need, family.ok] {
        let text = rule.to_string();
        assert_eq!(normalize_str(&text).unwrap(), text);
    }
}

#[test]
fn host_is_restored() {
    let mut simulator = LifeSimulator::with_pattern("B3/S23", &glider()).unwrap();
    simulator.step(3).unwrap();
    let moved = simulator.live_cells();

    let baseline: Rule = "B3/S23".parse().unwrap();
    search_rule_family(&mut simulator, &baseline, 4).unwrap();

    assert_eq!(simulator.live_cells(), moved);
    assert_eq!(simulator.active_rule(), "B3/S23");
    assert_eq!(simulator.generation(), 0);
}

/// A host running something other than a Life-like rule.
struct ForeignHost {
    pattern: Pattern,
}

impl Simulation for ForeignHost {
    fn active_rule(&self) -> String {
        "23/3/8".to_string()
    }

    fn set_active_rule(&mut self, rule: &str) -> Result<(), SimulationError> {
        Err(SimulationError::InvalidRule {
            rule: rule.to_string(),
            reason: "read-only host".to_string(),
        })
    }

    fn reset_generation_counter(&mut self) {}

    fn clear_pattern(&mut self) {
        self.pattern = Pattern::new();
    }

    fn place_pattern(&mut self, cells: &Pattern) {
        for cell in cells.iter() {
            self.pattern.insert(cell);
        }
    }

    fn step(&mut self, _generations: usize) -> Result<(), SimulationError> {
        Ok(())
    }

    fn live_cells(&self) -> Pattern {
        self.pattern.clone()
    }

    fn is_pattern_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}

struct NeverAsked;

impl UserIo for NeverAsked {
    fn prompt_for_integer(&mut self, message: &str) -> Option<String> {
        panic!("unexpected prompt: {}", message);
    }

    fn show_status(&mut self, message: &str) {
        panic!("unexpected status: {}", message);
    }

    fn show_result(&mut self, message: &str, _value: &str) {
        panic!("unexpected result: {}", message);
    }
}

#[test]
fn session_rejects_non_life_like_host() {
    let mut host = ForeignHost { pattern: glider() };
    let result = run_session(&mut host, &mut NeverAsked);
    assert!(matches!(result, Err(SearchError::Input(InputError::NotLifeLike(_)))));
    assert_eq!(host.live_cells(), glider());
}
