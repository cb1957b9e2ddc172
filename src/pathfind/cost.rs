use serde::{Deserialize, Serialize};
use strum::Display;

use super::error::PathError;
use crate::utils::coords::{Cell, Direction};

// ----------------------------------------------
// NodeCost
// ----------------------------------------------

pub type NodeCost = f32;
pub const NODE_COST_ZERO: NodeCost = 0.0;
pub const NODE_COST_INFINITE: NodeCost = NodeCost::INFINITY;

// ----------------------------------------------
// TurnPenalty
// ----------------------------------------------

// Extra cost added to a move whose direction differs from the direction
// of the move into the current node. The start node has no incoming
// direction, so the first move is never penalized.
#[derive(Copy, Clone, Debug, PartialEq, Display, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TurnPenalty {
    None,

    // Small flat penalty for any change of direction. Breaks ties between
    // equal-length routes in favor of straighter ones without meaningfully
    // changing which route is shortest.
    Constant { penalty: NodeCost },

    // Discrete penalty scaled by how sharp the turn is.
    // `reversal` applies to a full 180 degree turn, `turn` to anything else.
    Graded { turn: NodeCost, reversal: NodeCost },
}

impl TurnPenalty {
    pub const SMOOTH: Self = Self::Constant { penalty: 0.01 };
    pub const GRADED: Self = Self::Graded { turn: 15.0, reversal: 30.0 };

    #[inline]
    pub fn cost(self, incoming: Direction, step: Direction) -> NodeCost {
        if incoming.is_none() || incoming == step {
            return NODE_COST_ZERO;
        }
        match self {
            Self::None => NODE_COST_ZERO,
            Self::Constant { penalty } => penalty,
            Self::Graded { turn, reversal } => {
                if step.is_reverse_of(incoming) { reversal } else { turn }
            }
        }
    }

    fn validate(self) -> Result<(), PathError> {
        let is_valid = |value: NodeCost| value.is_finite() && value >= NODE_COST_ZERO;
        let valid = match self {
            Self::None => true,
            Self::Constant { penalty } => is_valid(penalty),
            Self::Graded { turn, reversal } => is_valid(turn) && is_valid(reversal),
        };
        if !valid {
            return Err(PathError::InvalidConfiguration(
                format!("turn penalty {self:?} must be finite and >= 0")));
        }
        Ok(())
    }
}

impl Default for TurnPenalty {
    fn default() -> Self {
        Self::SMOOTH
    }
}

// ----------------------------------------------
// CostModel
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    // Cost of an orthogonal step.
    pub straight_cost: NodeCost,

    // Cost of a diagonal step, approximately straight_cost * sqrt(2).
    pub diagonal_cost: NodeCost,

    pub turn_penalty: TurnPenalty,
}

impl CostModel {
    pub const STRAIGHT_COST: NodeCost = 10.0;
    pub const DIAGONAL_COST: NodeCost = 14.0;

    #[inline]
    pub fn step_cost(&self, step: Direction) -> NodeCost {
        if step.is_diagonal() { self.diagonal_cost } else { self.straight_cost }
    }

    // Cost of moving one step in `step` direction after arriving with `incoming`.
    #[inline]
    pub fn edge_cost(&self, incoming: Direction, step: Direction) -> NodeCost {
        self.step_cost(step) + self.turn_penalty.cost(incoming, step)
    }

    // Diagonal distance. Exact remaining cost on an empty 8-connected grid
    // without turn penalties, so it never overestimates.
    #[inline]
    pub fn octile_distance(&self, from: Cell, to: Cell) -> NodeCost {
        let dx = (from.x - to.x).abs();
        let dy = (from.y - to.y).abs();
        let (max, min) = if dx > dy { (dx, dy) } else { (dy, dx) };
        self.straight_cost * max as NodeCost + (self.diagonal_cost - self.straight_cost) * min as NodeCost
    }

    #[inline]
    pub fn manhattan_distance(&self, from: Cell, to: Cell) -> NodeCost {
        self.straight_cost * from.manhattan_distance(to) as NodeCost
    }

    // Rejects costs that would make the heuristics overestimate.
    pub fn validate(&self, allow_diagonal: bool) -> Result<(), PathError> {
        if !self.straight_cost.is_finite() || self.straight_cost <= NODE_COST_ZERO {
            return Err(PathError::InvalidConfiguration(
                format!("straight_cost must be finite and > 0, got {}", self.straight_cost)));
        }

        if allow_diagonal {
            // Octile distance is only a lower bound for D <= D2 <= 2*D.
            if !self.diagonal_cost.is_finite()
                || self.diagonal_cost < self.straight_cost
                || self.diagonal_cost > self.straight_cost * 2.0 {
                return Err(PathError::InvalidConfiguration(
                    format!("diagonal_cost must be within [{}, {}], got {}",
                            self.straight_cost, self.straight_cost * 2.0, self.diagonal_cost)));
            }
        }

        self.turn_penalty.validate()
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self { straight_cost: Self::STRAIGHT_COST,
               diagonal_cost: Self::DIAGONAL_COST,
               turn_penalty: TurnPenalty::default() }
    }
}

// ----------------------------------------------
// Heuristic
// ----------------------------------------------

// Only estimates remaining cost. Edge costs always come from the
// validated CostModel in SearchOptions.
pub trait Heuristic {
    // Returns the estimated cost from `cell` to `goal`.
    // Must never overestimate for the search to return optimal paths.
    fn estimate_cost_to_goal(&self, cell: Cell, goal: Cell) -> NodeCost;
}

// Octile distance for 8-connected searches, Manhattan for 4-connected.
#[derive(Copy, Clone, Debug)]
pub struct GridHeuristic {
    pub costs: CostModel,
    pub allow_diagonal: bool,
}

impl GridHeuristic {
    #[inline]
    pub fn new(costs: CostModel, allow_diagonal: bool) -> Self {
        Self { costs, allow_diagonal }
    }
}

impl Heuristic for GridHeuristic {
    #[inline]
    fn estimate_cost_to_goal(&self, cell: Cell, goal: Cell) -> NodeCost {
        if self.allow_diagonal {
            self.costs.octile_distance(cell, goal)
        } else {
            self.costs.manhattan_distance(cell, goal)
        }
    }
}

// Zero estimate. Turns A* into Dijkstra's.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraHeuristic;

impl Heuristic for DijkstraHeuristic {
    #[inline]
    fn estimate_cost_to_goal(&self, _cell: Cell, _goal: Cell) -> NodeCost {
        NODE_COST_ZERO
    }
}
