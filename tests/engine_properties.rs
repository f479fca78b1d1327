//! Property-based tests for the incremental engine.
//!
//! The full-grid reference stepper recomputes every cell from scratch each
//! generation; the incremental engine must agree with it on both alive flags
//! and cached neighbor counts.

use incremental_life::game_of_life::{
    EngineValidator, Grid, ReferenceStepper, RuleSet, SimulationEngine, Topology,
};
use proptest::prelude::*;

fn topology() -> impl Strategy<Value = Topology> {
    prop_oneof![Just(Topology::Bounded), Just(Topology::Wrap)]
}

fn rules() -> impl Strategy<Value = RuleSet> {
    (
        proptest::collection::vec(0u8..=8, 0..5),
        proptest::collection::vec(1u8..=8, 0..4),
    )
        .prop_map(|(survival, birth)| RuleSet::new(&survival, &birth).unwrap())
}

/// A grid with random live cells and counts from a full recount
fn seeded_grid() -> impl Strategy<Value = Grid> {
    (1usize..12, 1usize..12, topology()).prop_flat_map(|(columns, rows, topology)| {
        proptest::collection::vec(any::<bool>(), columns * rows).prop_map(move |alive| {
            let cells = alive
                .iter()
                .enumerate()
                .filter(|(_, &a)| a)
                .map(|(idx, _)| (idx % columns, idx / columns));
            Grid::from_alive_cells(columns, rows, topology, cells).unwrap()
        })
    })
}

// =============================================================================
// Incremental vs. reference
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Every generation matches the full-grid recomputation
    #[test]
    fn prop_matches_reference(grid in seeded_grid(), rules in rules(), generations in 1usize..12) {
        let mut engine = SimulationEngine::from_grid(grid, rules, 1);
        let report = EngineValidator::verify(&mut engine, generations);
        prop_assert!(report.is_consistent(), "{}", report);
        prop_assert_eq!(report.generations_checked, generations);
    }

    /// Conway rules on larger grids, compared grid-for-grid
    #[test]
    fn prop_conway_matches_reference(grid in seeded_grid(), generations in 1usize..20) {
        let mut engine = SimulationEngine::from_grid(grid.clone(), RuleSet::conway(), 1);
        engine.run(generations);
        let reference = ReferenceStepper::evolve_generations(grid, &RuleSet::conway(), generations);
        prop_assert_eq!(engine.grid(), &reference);
    }

    /// The alive index always lists exactly the live cells
    #[test]
    fn prop_alive_index_matches_grid(
        grid in seeded_grid(),
        rules in rules(),
        generations in 0usize..8
    ) {
        let mut engine = SimulationEngine::from_grid(grid, rules, 1);
        engine.run(generations);
        let mut indexed: Vec<_> = engine.alive_index().cells().collect();
        indexed.sort_by_key(|&(x, y)| (y, x));
        prop_assert_eq!(indexed, engine.grid().living_cells());
    }
}

// =============================================================================
// Manual edits
// =============================================================================

proptest! {
    /// Toggling a cell twice restores the grid and every neighbor count
    #[test]
    fn prop_toggle_involution(
        grid in seeded_grid(),
        rules in rules(),
        x in 0usize..12,
        y in 0usize..12,
        warmup in 0usize..4
    ) {
        let mut engine = SimulationEngine::from_grid(grid, rules, 1);
        engine.run(warmup);
        let before = engine.grid().clone();
        let x = x % before.columns;
        let y = y % before.rows;

        prop_assert!(engine.toggle_cell(x, y));
        prop_assert_ne!(engine.grid(), &before);
        prop_assert!(engine.toggle_cell(x, y));
        prop_assert_eq!(engine.grid(), &before);
    }

    /// Edits keep the counts exact, so stepping afterwards stays consistent
    #[test]
    fn prop_toggle_then_advance(
        grid in seeded_grid(),
        toggles in proptest::collection::vec((0usize..12, 0usize..12), 1..6)
    ) {
        let mut engine = SimulationEngine::from_grid(grid, RuleSet::conway(), 1);
        for (x, y) in toggles {
            engine.toggle_cell(x % engine.columns(), y % engine.rows());
        }
        let report = EngineValidator::verify(&mut engine, 6);
        prop_assert!(report.is_consistent(), "{}", report);
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn empty_grid_stays_empty() {
    for topology in [Topology::Bounded, Topology::Wrap] {
        let mut engine =
            SimulationEngine::from_grid(Grid::new(16, 9, topology), RuleSet::conway(), 1);
        engine.run(50);
        assert!(engine.grid().is_empty());
        assert_eq!(engine.change_list_len(), 0);
    }
}

#[test]
fn r_pentomino_seed_on_small_torus() {
    let seed = [(2, 0), (3, 0), (1, 1), (2, 1), (2, 2)];
    let grid = Grid::from_alive_cells(5, 5, Topology::Wrap, seed).unwrap();
    let expected = ReferenceStepper::evolve(&grid, &RuleSet::conway());

    let run = || {
        let mut engine = SimulationEngine::from_grid(grid.clone(), RuleSet::conway(), 10);
        engine.advance();
        engine.grid().clone()
    };

    let first = run();
    assert_eq!(first, expected);
    for _ in 0..5 {
        assert_eq!(run(), first);
    }
}

#[test]
fn glider_wraps_around_torus() {
    let glider = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
    let grid = Grid::from_alive_cells(6, 6, Topology::Wrap, glider).unwrap();
    let mut engine = SimulationEngine::from_grid(grid, RuleSet::conway(), 1);

    // A glider moves one cell diagonally every four generations, so after
    // 24 generations it has crossed both edges and is back where it started.
    engine.run(12);
    let shifted: Vec<_> = glider.iter().map(|&(x, y)| ((x + 3) % 6, (y + 3) % 6)).collect();
    let mut alive = engine.grid().living_cells();
    alive.sort();
    let mut expected = shifted.clone();
    expected.sort();
    assert_eq!(alive, expected);

    engine.run(12);
    let mut alive = engine.grid().living_cells();
    alive.sort();
    let mut original = glider.to_vec();
    original.sort();
    assert_eq!(alive, original);
}

#[test]
fn glider_dies_against_bounded_edge() {
    let glider = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
    let grid = Grid::from_alive_cells(6, 6, Topology::Bounded, glider).unwrap();
    let mut engine = SimulationEngine::from_grid(grid.clone(), RuleSet::conway(), 1);
    engine.run(40);

    let reference = ReferenceStepper::evolve_generations(grid, &RuleSet::conway(), 40);
    assert_eq!(engine.grid(), &reference);
    // The glider degenerates into a block in the corner
    assert_eq!(engine.population(), 4);
}

#[test]
fn simulate_from_settings() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = dir.path().join("glider.lif");
    std::fs::write(&pattern, "#Life 1.05\n#P -1 -1\n.*.\n..*\n***\n").unwrap();

    let mut settings = incremental_life::Settings::default();
    settings.grid.width = 100;
    settings.grid.height = 100;
    settings.pattern = Some(pattern);

    let engine = incremental_life::simulate(&settings, 8).unwrap();
    assert_eq!(engine.iteration_count(), 8);
    assert_eq!(engine.population(), 5);
}
