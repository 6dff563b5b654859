//! Foraging, regeneration, and scarcity for the resource grid.
//!
//! Regeneration is weak: a cell/kind that is empty may come back
//! to exactly one unit, with probability `min(1, base * multiplier)`. Cells
//! that still hold anything are never touched, so repeated passes cannot
//! stockpile resources.

use microworld_types::{Position, ResourceKind, ResourceStatus, Signals};
use rand::Rng;
use serde::Deserialize;
use tracing::trace;

use crate::error::WorldError;
use crate::grid::ResourceGrid;

/// Base per-turn probability that an empty cell regrows one unit, per kind.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RegenProbabilities {
    /// Base probability for wood.
    #[serde(default = "default_regen_probability")]
    pub wood: f64,
    /// Base probability for flint.
    #[serde(default = "default_regen_probability")]
    pub flint: f64,
    /// Base probability for food.
    #[serde(default = "default_regen_probability")]
    pub food: f64,
}

const fn default_regen_probability() -> f64 {
    0.05
}

impl Default for RegenProbabilities {
    fn default() -> Self {
        Self::uniform(default_regen_probability())
    }
}

impl RegenProbabilities {
    /// The same base probability for every kind.
    pub const fn uniform(probability: f64) -> Self {
        Self {
            wood: probability,
            flint: probability,
            food: probability,
        }
    }

    /// Base probability for one kind.
    pub const fn for_kind(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Wood => self.wood,
            ResourceKind::Flint => self.flint,
            ResourceKind::Food => self.food,
        }
    }

    /// Check that every probability lies in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] naming the first bad kind.
    pub fn validate(&self) -> Result<(), WorldError> {
        for kind in ResourceKind::ALL {
            let p = self.for_kind(kind);
            if !(0.0..=1.0).contains(&p) {
                return Err(WorldError::InvalidConfig(format!(
                    "regen probability for {kind} must be within [0, 1], got {p}"
                )));
            }
        }
        Ok(())
    }
}

/// Effective per-roll probability: `min(1, base * multiplier)`, or zero for a
/// non-positive or non-finite product.
pub fn effective_probability(base: f64, multiplier: f64) -> f64 {
    let p = base * multiplier;
    if p.is_nan() || p <= 0.0 {
        0.0
    } else {
        p.min(1.0)
    }
}

/// Run one regeneration pass over the whole grid.
///
/// Cells are visited in raster order and kinds in priority order. A roll is
/// drawn only for an empty cell/kind whose effective probability lies strictly
/// between zero and one. Returns the number of units regrown.
pub fn regenerate<R: Rng + ?Sized>(
    grid: &mut ResourceGrid,
    base: &RegenProbabilities,
    multiplier: f64,
    rng: &mut R,
) -> u64 {
    let mut regrown: u64 = 0;
    for stock in grid.iter_mut() {
        for kind in ResourceKind::ALL {
            let p = effective_probability(base.for_kind(kind), multiplier);
            if p <= 0.0 {
                continue;
            }
            let Some(qty) = stock.get_mut(&kind) else {
                continue;
            };
            if *qty != 0 {
                continue;
            }
            let hit = p >= 1.0 || rng.random::<f64>() < p;
            if hit {
                *qty = 1;
                regrown = regrown.saturating_add(1);
            }
        }
    }
    trace!(regrown, multiplier, "regeneration pass");
    regrown
}

/// Take one unit of the most plentiful resource at a cell.
///
/// Ties go to the kind that comes first in [`ResourceKind::ALL`]
/// (wood, then flint, then food). Returns `Ok(None)` when the cell is empty.
///
/// # Errors
///
/// Returns [`WorldError::PositionOutOfBounds`] for off-grid positions.
pub fn harvest_richest(
    grid: &mut ResourceGrid,
    position: Position,
) -> Result<Option<ResourceKind>, WorldError> {
    let stock = grid.cell_mut(position)?;

    let mut best: Option<(ResourceKind, u32)> = None;
    for kind in ResourceKind::ALL {
        let qty = stock.get(&kind).copied().unwrap_or(0);
        if qty == 0 {
            continue;
        }
        if best.is_none_or(|(_, best_qty)| qty > best_qty) {
            best = Some((kind, qty));
        }
    }

    let Some((kind, qty)) = best else {
        return Ok(None);
    };
    let remaining = qty.checked_sub(1).ok_or(WorldError::ArithmeticOverflow)?;
    stock.insert(kind, remaining);
    Ok(Some(kind))
}

/// Scarcity in `[0, 1]`: zero at or above `reference` units per cell, rising
/// linearly to one as the average drops to zero.
///
/// A non-positive or non-finite reference disables the indicator (always 0).
pub fn scarcity(avg_per_cell: f64, reference: f64) -> f64 {
    if !reference.is_finite() || reference <= 0.0 || !avg_per_cell.is_finite() {
        return 0.0;
    }
    (1.0 - avg_per_cell / reference).clamp(0.0, 1.0)
}

/// Overall and per-kind scarcity signals for a grid.
///
/// Per-kind scarcity compares the kind's own per-cell average against a third
/// of the overall reference.
#[allow(clippy::cast_precision_loss)]
pub fn scarcity_signals(status: &ResourceStatus, cell_count: u64, reference: f64) -> Signals {
    let mut signals = Signals::new();
    signals.insert("scarcity".to_owned(), scarcity(status.avg_per_cell, reference));

    let per_kind_reference = reference / 3.0;
    for (kind, total) in [
        (ResourceKind::Wood, status.wood),
        (ResourceKind::Flint, status.flint),
        (ResourceKind::Food, status.food),
    ] {
        let avg = if cell_count == 0 {
            0.0
        } else {
            total as f64 / cell_count as f64
        };
        signals.insert(
            format!("scarcity_{}", kind.as_str()),
            scarcity(avg, per_kind_reference),
        );
    }
    signals
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn grid_with(size: u32, cells: &[(Position, ResourceKind, u32)]) -> ResourceGrid {
        let mut grid = ResourceGrid::empty(size).unwrap();
        for &(pos, kind, qty) in cells {
            grid.set(pos, kind, qty).unwrap();
        }
        grid
    }

    #[test]
    fn zero_multiplier_changes_nothing() {
        let mut grid = grid_with(4, &[(Position::new(1, 1), ResourceKind::Wood, 3)]);
        let before = grid.clone();
        let mut rng = StdRng::seed_from_u64(5);
        let regrown = regenerate(&mut grid, &RegenProbabilities::uniform(1.0), 0.0, &mut rng);
        assert_eq!(regrown, 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn saturating_multiplier_fills_every_empty_cell_with_one() {
        let mut grid = grid_with(3, &[(Position::new(0, 0), ResourceKind::Food, 4)]);
        let mut rng = StdRng::seed_from_u64(5);
        regenerate(&mut grid, &RegenProbabilities::uniform(0.1), 1_000.0, &mut rng);

        for (pos, stock) in grid.iter() {
            for (&kind, &qty) in stock {
                if pos == Position::new(0, 0) && kind == ResourceKind::Food {
                    assert_eq!(qty, 4, "positive cell must be untouched");
                } else {
                    assert_eq!(qty, 1);
                }
            }
        }
    }

    #[test]
    fn repeated_passes_never_exceed_one_from_empty() {
        let mut grid = ResourceGrid::empty(5).unwrap();
        let mut rng = StdRng::seed_from_u64(77);
        for _ in 0..20 {
            regenerate(&mut grid, &RegenProbabilities::uniform(0.5), 2.0, &mut rng);
        }
        for (_, stock) in grid.iter() {
            assert!(stock.values().all(|&q| q <= 1));
        }
    }

    #[test]
    fn regeneration_is_seed_deterministic() {
        let run = |seed| {
            let mut grid = ResourceGrid::empty(6).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            regenerate(&mut grid, &RegenProbabilities::uniform(0.3), 1.0, &mut rng);
            grid
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn effective_probability_is_clamped() {
        assert_eq!(effective_probability(0.2, 10.0), 1.0);
        assert_eq!(effective_probability(0.2, 0.0), 0.0);
        assert_eq!(effective_probability(0.2, -1.0), 0.0);
        assert_eq!(effective_probability(0.2, f64::NAN), 0.0);
        assert!((effective_probability(0.2, 0.5) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn harvest_prefers_highest_quantity() {
        let pos = Position::new(0, 0);
        let mut grid = grid_with(
            2,
            &[(pos, ResourceKind::Wood, 1), (pos, ResourceKind::Food, 3)],
        );
        assert_eq!(harvest_richest(&mut grid, pos).unwrap(), Some(ResourceKind::Food));
        assert_eq!(grid.quantity(pos, ResourceKind::Food), 2);
        assert_eq!(grid.quantity(pos, ResourceKind::Wood), 1);
    }

    #[test]
    fn harvest_tie_breaks_wood_then_flint_then_food() {
        let pos = Position::new(1, 1);
        let mut grid = grid_with(
            2,
            &[
                (pos, ResourceKind::Flint, 2),
                (pos, ResourceKind::Food, 2),
                (pos, ResourceKind::Wood, 2),
            ],
        );
        assert_eq!(harvest_richest(&mut grid, pos).unwrap(), Some(ResourceKind::Wood));

        let mut grid = grid_with(2, &[(pos, ResourceKind::Flint, 1), (pos, ResourceKind::Food, 1)]);
        assert_eq!(harvest_richest(&mut grid, pos).unwrap(), Some(ResourceKind::Flint));
    }

    #[test]
    fn harvest_empty_cell_is_noop() {
        let mut grid = ResourceGrid::empty(2).unwrap();
        let before = grid.clone();
        assert_eq!(harvest_richest(&mut grid, Position::new(0, 1)).unwrap(), None);
        assert_eq!(grid, before);
    }

    #[test]
    fn probabilities_outside_unit_interval_are_rejected() {
        assert!(RegenProbabilities::uniform(0.5).validate().is_ok());
        let bad = RegenProbabilities {
            flint: 1.5,
            ..RegenProbabilities::default()
        };
        assert!(matches!(bad.validate(), Err(WorldError::InvalidConfig(_))));
        assert!(RegenProbabilities::uniform(f64::NAN).validate().is_err());
    }

    #[test]
    fn probabilities_parse_with_defaults() {
        let parsed: RegenProbabilities = serde_yml::from_str("food: 0.2").unwrap();
        assert_eq!(parsed.food, 0.2);
        assert_eq!(parsed.wood, 0.05);
    }

    #[test]
    fn scarcity_is_bounded() {
        for avg in [0.0, 0.5, 1.5, 3.0, 100.0] {
            let s = scarcity(avg, 1.5);
            assert!((0.0..=1.0).contains(&s));
        }
        assert_eq!(scarcity(0.0, 1.5), 1.0);
        assert_eq!(scarcity(3.0, 1.5), 0.0);
        assert_eq!(scarcity(1.0, 0.0), 0.0);
    }

    #[test]
    fn scarcity_signals_cover_every_kind() {
        let status = ResourceStatus::from_totals(0, 4, 8, 4);
        let signals = scarcity_signals(&status, 4, 1.5);
        assert_eq!(signals.get("scarcity_wood"), Some(&1.0));
        assert_eq!(signals.get("scarcity_food"), Some(&0.0));
        assert!(signals.contains_key("scarcity_flint"));
        assert_eq!(signals.get("scarcity"), Some(&0.0));
    }
}
