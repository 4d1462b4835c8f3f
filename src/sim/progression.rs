//! Level progression
//!
//! Swallowed targets pay points into a ledger. Whenever the ledger covers the
//! cost of the next level, that cost is deducted and the hole levels up. One
//! big payout can cover several levels at once.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_LEVEL_COST, DEFAULT_MAX_LEVEL, HOLE_START_LEVEL};

/// Cost to advance from each level to the next
///
/// `costs[L]` is the price of going from level `L` to `L + 1`; index 0 is
/// unused because levels start at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelCostTable {
    pub costs: Vec<u32>,
    /// Used for any level past the end of `costs`
    pub default_cost: u32,
}

impl Default for LevelCostTable {
    fn default() -> Self {
        Self {
            costs: vec![0, 3, 5, 8, 12, 16, 20],
            default_cost: DEFAULT_LEVEL_COST,
        }
    }
}

impl LevelCostTable {
    pub fn new(costs: Vec<u32>) -> Self {
        Self {
            costs,
            default_cost: DEFAULT_LEVEL_COST,
        }
    }

    /// Points needed to go from `level` to `level + 1`
    pub fn cost_to_advance(&self, level: u32) -> u32 {
        self.costs
            .get(level as usize)
            .copied()
            .unwrap_or(self.default_cost)
    }
}

/// Points paid per swallowed target, indexed by the target's required level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsTable {
    pub points: Vec<u32>,
}

impl Default for PointsTable {
    fn default() -> Self {
        Self {
            points: vec![0, 1, 3, 5, 7, 10, 15],
        }
    }
}

impl PointsTable {
    pub fn new(points: Vec<u32>) -> Self {
        Self { points }
    }

    /// Points for a target of the given required level. Out-of-range levels
    /// use the nearest entry; an empty table pays nothing.
    pub fn points_for(&self, required_level: u32) -> u32 {
        match self.points.len() {
            0 => 0,
            len => self.points[(required_level as usize).min(len - 1)],
        }
    }
}

/// Level and point ledger for one hole
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    level: u32,
    max_level: u32,
    /// Points accumulated since the last level-up
    ledger: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(HOLE_START_LEVEL, DEFAULT_MAX_LEVEL)
    }
}

impl Progression {
    /// Levels are clamped into `1..=max_level` (and `max_level` is at least 1)
    pub fn new(start_level: u32, max_level: u32) -> Self {
        let max_level = max_level.max(1);
        Self {
            level: start_level.clamp(1, max_level),
            max_level,
            ledger: 0,
        }
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    #[inline]
    pub fn ledger(&self) -> u32 {
        self.ledger
    }

    #[inline]
    pub fn is_max_level(&self) -> bool {
        self.level >= self.max_level
    }

    /// Add points to the ledger. Zero is ignored.
    pub fn deposit(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.ledger = self.ledger.saturating_add(amount);
    }

    /// Spend the ledger on one level if it covers the cost.
    /// Returns the new level on success.
    pub fn try_advance(&mut self, costs: &LevelCostTable) -> Option<u32> {
        if self.is_max_level() {
            return None;
        }
        let cost = costs.cost_to_advance(self.level);
        if self.ledger < cost {
            return None;
        }
        self.ledger -= cost;
        self.level += 1;
        Some(self.level)
    }

    /// Deposit and take every level-up the ledger now pays for
    pub fn add_points(&mut self, amount: u32, costs: &LevelCostTable) -> Vec<u32> {
        self.deposit(amount);
        std::iter::from_fn(|| self.try_advance(costs)).collect()
    }

    /// Points still missing for the next level (None at max level)
    pub fn points_to_next(&self, costs: &LevelCostTable) -> Option<u32> {
        if self.is_max_level() {
            None
        } else {
            Some(costs.cost_to_advance(self.level).saturating_sub(self.ledger))
        }
    }
}
