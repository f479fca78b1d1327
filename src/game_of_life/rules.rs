//! Birth/survival rule sets and the full-grid reference stepper

use super::Grid;
use crate::error::{LifeError, LifeResult};
use itertools::Itertools;
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Maximum possible neighbor count in the Moore neighborhood
pub const MAX_NEIGHBORS: u8 = 8;

/// Birth and survival neighbor-count sets for a life-like automaton.
///
/// Stored as lookup tables indexed by neighbor count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    survival: [bool; MAX_NEIGHBORS as usize + 1],
    birth: [bool; MAX_NEIGHBORS as usize + 1],
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::conway()
    }
}

impl RuleSet {
    /// Build a rule set from explicit neighbor counts.
    ///
    /// Birth on zero neighbors is rejected: it would let cells appear far
    /// from any live cell, outside the change list's reach.
    pub fn new(survival: &[u8], birth: &[u8]) -> LifeResult<Self> {
        let label = format!(
            "survival [{}], birth [{}]",
            survival.iter().join(", "),
            birth.iter().join(", ")
        );
        if birth.contains(&0) {
            return Err(LifeError::malformed_rule(
                &label,
                "birth on 0 neighbors is not supported",
            ));
        }
        let mut rules = Self {
            survival: [false; MAX_NEIGHBORS as usize + 1],
            birth: [false; MAX_NEIGHBORS as usize + 1],
        };
        for &count in survival {
            *rules.survival_slot(count).ok_or_else(|| out_of_range(&label, count))? = true;
        }
        for &count in birth {
            *rules.birth_slot(count).ok_or_else(|| out_of_range(&label, count))? = true;
        }
        Ok(rules)
    }

    /// Classic Conway rules, `23/3`
    pub fn conway() -> Self {
        let mut survival = [false; MAX_NEIGHBORS as usize + 1];
        let mut birth = [false; MAX_NEIGHBORS as usize + 1];
        survival[2] = true;
        survival[3] = true;
        birth[3] = true;
        Self { survival, birth }
    }

    /// Parse a rule string.
    ///
    /// The primary form is `"<survival-digits>/<birth-digits>"`, e.g. `"23/3"`.
    /// The letter-tagged form `"B3/S23"` (either order) is accepted as well.
    pub fn parse(rule: &str) -> LifeResult<Self> {
        let rule_text = rule.trim();
        let mut halves = rule_text.split('/');
        let (first, second) = match (halves.next(), halves.next(), halves.next()) {
            (Some(first), Some(second), None) => (first, second),
            _ => {
                return Err(LifeError::malformed_rule(
                    rule,
                    "expected exactly one '/' separator",
                ))
            }
        };

        let (survival, birth) = match (tag_of(first), tag_of(second)) {
            (None, None) => (first, second),
            (Some('s'), Some('b')) => (&first[1..], &second[1..]),
            (Some('b'), Some('s')) => (&second[1..], &first[1..]),
            _ => {
                return Err(LifeError::malformed_rule(
                    rule,
                    "halves must both be untagged or tagged with B and S",
                ))
            }
        };

        let survival = parse_counts(rule, survival)?;
        let birth = parse_counts(rule, birth)?;
        Self::new(&survival, &birth).map_err(|e| match e {
            LifeError::MalformedRule { reason, .. } => LifeError::malformed_rule(rule, reason),
            other => other,
        })
    }

    /// Whether a live cell with `neighbors` live neighbors stays alive
    #[inline]
    pub fn survives(&self, neighbors: u8) -> bool {
        self.survival.get(neighbors as usize).copied().unwrap_or(false)
    }

    /// Whether a dead cell with `neighbors` live neighbors becomes alive
    #[inline]
    pub fn born(&self, neighbors: u8) -> bool {
        self.birth.get(neighbors as usize).copied().unwrap_or(false)
    }

    /// Next state for a cell given its current state and neighbor count
    #[inline]
    pub fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        if alive {
            self.survives(neighbors)
        } else {
            self.born(neighbors)
        }
    }

    pub fn survival_counts(&self) -> Vec<u8> {
        counts_of(&self.survival)
    }

    pub fn birth_counts(&self) -> Vec<u8> {
        counts_of(&self.birth)
    }

    fn survival_slot(&mut self, count: u8) -> Option<&mut bool> {
        self.survival.get_mut(count as usize)
    }

    fn birth_slot(&mut self, count: u8) -> Option<&mut bool> {
        self.birth.get_mut(count as usize)
    }
}

fn out_of_range(label: &str, count: u8) -> LifeError {
    LifeError::malformed_rule(
        label,
        format!("neighbor count {} exceeds {}", count, MAX_NEIGHBORS),
    )
}

fn tag_of(half: &str) -> Option<char> {
    half.chars()
        .next()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
}

fn parse_counts(rule: &str, digits: &str) -> LifeResult<Vec<u8>> {
    digits
        .chars()
        .map(|ch| {
            let value = ch.to_digit(10).ok_or_else(|| {
                LifeError::malformed_rule(rule, format!("'{}' is not a digit", ch))
            })? as u8;
            if value > MAX_NEIGHBORS {
                return Err(LifeError::malformed_rule(
                    rule,
                    format!("neighbor count {} exceeds {}", value, MAX_NEIGHBORS),
                ));
            }
            Ok(value)
        })
        .collect()
}

fn counts_of(table: &[bool]) -> Vec<u8> {
    table
        .iter()
        .enumerate()
        .filter(|(_, &set)| set)
        .map(|(count, _)| count as u8)
        .collect()
}

impl FromStr for RuleSet {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for count in self.survival_counts() {
            write!(f, "{}", count)?;
        }
        write!(f, "/")?;
        for count in self.birth_counts() {
            write!(f, "{}", count)?;
        }
        Ok(())
    }
}

/// Full-grid stepper that rescans every cell each generation.
///
/// It shares no state with the incremental engine and exists to check it.
pub struct ReferenceStepper;

impl ReferenceStepper {
    /// Evolve the grid one generation forward, recounting every neighbor
    pub fn evolve(current: &Grid, rules: &RuleSet) -> Grid {
        let columns = current.columns;
        let next_alive: Vec<bool> = (0..current.rows)
            .into_par_iter()
            .flat_map(|y| {
                (0..columns).into_par_iter().map(move |x| {
                    let neighbors = current.count_live_neighbors(x, y, current.topology);
                    rules.next_state(current.is_alive(x, y), neighbors)
                })
            })
            .collect();

        let mut next = Grid::new(current.columns, current.rows, current.topology);
        for (index, alive) in next_alive.into_iter().enumerate() {
            next.cells[index].alive = alive;
        }
        next.recount_neighbors(current.topology);
        next
    }

    /// Evolve the grid for multiple generations
    pub fn evolve_generations(mut grid: Grid, rules: &RuleSet, generations: usize) -> Grid {
        for _ in 0..generations {
            grid = Self::evolve(&grid, rules);
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_of_life::Topology;

    #[test]
    fn test_parse_classic_rules() {
        let rules = RuleSet::parse("23/3").unwrap();
        assert_eq!(rules, RuleSet::conway());
        assert_eq!(rules.survival_counts(), vec![2, 3]);
        assert_eq!(rules.birth_counts(), vec![3]);
    }

    #[test]
    fn test_parse_tagged_rules() {
        let highlife = RuleSet::parse("B36/S23").unwrap();
        assert_eq!(highlife.birth_counts(), vec![3, 6]);
        assert_eq!(highlife.survival_counts(), vec![2, 3]);
        assert_eq!(RuleSet::parse("s23/b3").unwrap(), RuleSet::conway());
    }

    #[test]
    fn test_parse_empty_halves() {
        let seeds = RuleSet::parse("/2").unwrap();
        assert!(seeds.survival_counts().is_empty());
        assert_eq!(seeds.birth_counts(), vec![2]);
        assert!(RuleSet::parse("/").unwrap().birth_counts().is_empty());
    }

    #[test]
    fn test_malformed_rules() {
        for bad in ["233", "23/3/1", "2a/3", "23/x", "9/3", "B3/23", "", "23/03"] {
            match RuleSet::parse(bad) {
                Err(LifeError::MalformedRule { .. }) => {}
                other => panic!("expected MalformedRule for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_explicit_counts_errors_name_the_input() {
        match RuleSet::new(&[2, 3], &[0, 3]) {
            Err(LifeError::MalformedRule { rule, .. }) => {
                assert_eq!(rule, "survival [2, 3], birth [0, 3]")
            }
            other => panic!("expected MalformedRule, got {:?}", other),
        }
        match RuleSet::new(&[2, 12], &[3]) {
            Err(LifeError::MalformedRule { rule, reason }) => {
                assert_eq!(rule, "survival [2, 12], birth [3]");
                assert!(reason.contains("12"));
            }
            other => panic!("expected MalformedRule, got {:?}", other),
        }
        match RuleSet::parse("23/03") {
            Err(LifeError::MalformedRule { rule, .. }) => assert_eq!(rule, "23/03"),
            other => panic!("expected MalformedRule, got {:?}", other),
        }
    }

    #[test]
    fn test_display_round_trip() {
        let rules: RuleSet = "34678/3678".parse().unwrap();
        assert_eq!(rules.to_string(), "34678/3678");
        assert_eq!(RuleSet::conway().to_string(), "23/3");
    }

    #[test]
    fn test_rule_logic() {
        let rules = RuleSet::conway();
        assert!(rules.next_state(true, 2));
        assert!(rules.next_state(true, 3));
        assert!(rules.next_state(false, 3));
        assert!(!rules.next_state(true, 1));
        assert!(!rules.next_state(true, 4));
        assert!(!rules.next_state(false, 2));
        assert!(!rules.born(200));
    }

    #[test]
    fn test_reference_blinker() {
        let horizontal =
            Grid::from_alive_cells(3, 3, Topology::Bounded, [(0, 1), (1, 1), (2, 1)]).unwrap();
        let vertical = ReferenceStepper::evolve(&horizontal, &RuleSet::conway());
        assert_eq!(vertical.living_cells(), vec![(1, 0), (1, 1), (1, 2)]);
        assert_eq!(vertical.cell(0, 0).unwrap().live_neighbors, 2);

        let back = ReferenceStepper::evolve_generations(vertical, &RuleSet::conway(), 1);
        assert_eq!(back, horizontal);
    }

    #[test]
    fn test_reference_block_is_still() {
        let block = Grid::from_alive_cells(
            4,
            4,
            Topology::Wrap,
            [(1, 1), (2, 1), (1, 2), (2, 2)],
        )
        .unwrap();
        assert_eq!(ReferenceStepper::evolve(&block, &RuleSet::conway()), block);
    }
}
