//! Layout collaborator contract and the debounced re-layout scheduler
//!
//! Position computation is delegated to a [`LayoutEngine`], a pure and
//! deterministic function of the graph. [`LayoutScheduler`] coalesces bursts
//! of mutations into one layout pass.

mod layered;
mod scheduler;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Edge, Node};

pub use layered::LayeredLayout;
pub use scheduler::{LayoutPass, LayoutScheduler, DEFAULT_DEBOUNCE};

/// Flow direction of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Left to right
    #[default]
    LR,
    /// Right to left
    RL,
    /// Top to bottom
    TB,
    /// Bottom to top
    BT,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::LR => write!(f, "LR"),
            Direction::RL => write!(f, "RL"),
            Direction::TB => write!(f, "TB"),
            Direction::BT => write!(f, "BT"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LR" => Ok(Direction::LR),
            "RL" => Ok(Direction::RL),
            "TB" => Ok(Direction::TB),
            "BT" => Ok(Direction::BT),
            other => Err(format!("unknown layout direction '{}'", other)),
        }
    }
}

/// Computes node positions for a graph
///
/// Implementations must be deterministic for a given input and must not
/// change any node field other than `position`.
pub trait LayoutEngine: Send + Sync {
    /// Return the nodes with their computed positions
    fn layout(&self, nodes: &[Node], edges: &[Edge], direction: Direction) -> Vec<Node>;
}
