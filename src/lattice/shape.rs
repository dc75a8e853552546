//! Node addressing shared by the payment tree and the price lattice
//!
//! Both trees are stored as flat arenas. A node is identified by `(level, index)`:
//! - **Recombining**: `index` counts up-moves, so level `l` holds `l + 1` nodes and the
//!   up/down children of `(l, j)` are `(l + 1, j + 1)` and `(l + 1, j)`.
//! - **Full binary**: `index` is the path from the root, one bit per move (`0` = up,
//!   `1` = down, most recent move lowest). Level `l` holds `2^l` nodes.
//!
//! In both layouts every child slot is greater than its parent's slot, so a reverse
//! scan of the arena visits children before parents.

use crate::error::{LatticeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest period count accepted for the full binary layout (2^23 - 1 nodes)
pub const MAX_FULL_BINARY_PERIODS: usize = 22;

/// How lattice nodes are shared between paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LatticeLayout {
    /// One node per (level, up-move count); O(n²) nodes
    #[default]
    Recombining,
    /// One node per path; O(2ⁿ) nodes
    FullBinary,
}

impl fmt::Display for LatticeLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatticeLayout::Recombining => f.write_str("recombining"),
            LatticeLayout::FullBinary => f.write_str("full-binary"),
        }
    }
}

impl FromStr for LatticeLayout {
    type Err = LatticeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "recombining" => Ok(LatticeLayout::Recombining),
            "full-binary" | "full" => Ok(LatticeLayout::FullBinary),
            _ => Err(LatticeError::UnsupportedVariant(format!("lattice layout '{}'", s))),
        }
    }
}

/// Layout plus depth; fixes the arena size and child addressing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeShape {
    pub layout: LatticeLayout,
    pub periods: usize,
}

impl LatticeShape {
    pub fn new(layout: LatticeLayout, periods: usize) -> Result<Self> {
        if layout == LatticeLayout::FullBinary && periods > MAX_FULL_BINARY_PERIODS {
            return Err(LatticeError::InvalidInput(format!(
                "full binary layout supports at most {} periods, got {}",
                MAX_FULL_BINARY_PERIODS, periods
            )));
        }
        Ok(Self { layout, periods })
    }

    /// Number of nodes at `level`
    pub fn width(&self, level: usize) -> usize {
        match self.layout {
            LatticeLayout::Recombining => level + 1,
            LatticeLayout::FullBinary => 1 << level,
        }
    }

    /// Arena slot of the first node at `level`
    pub fn level_offset(&self, level: usize) -> usize {
        match self.layout {
            LatticeLayout::Recombining => level * (level + 1) / 2,
            LatticeLayout::FullBinary => (1 << level) - 1,
        }
    }

    /// Total nodes across all levels
    pub fn node_count(&self) -> usize {
        self.level_offset(self.periods + 1)
    }

    /// Arena slot of `(level, index)`
    #[inline]
    pub fn slot(&self, level: usize, index: usize) -> usize {
        debug_assert!(level <= self.periods && index < self.width(level));
        self.level_offset(level) + index
    }

    /// Index of the up child at the next level
    #[inline]
    pub fn up_index(&self, index: usize) -> usize {
        match self.layout {
            LatticeLayout::Recombining => index + 1,
            LatticeLayout::FullBinary => index << 1,
        }
    }

    /// Index of the down child at the next level
    #[inline]
    pub fn down_index(&self, index: usize) -> usize {
        match self.layout {
            LatticeLayout::Recombining => index,
            LatticeLayout::FullBinary => (index << 1) | 1,
        }
    }

    /// Index reached from the root by a sequence of moves (`true` = up)
    pub fn index_of_path(&self, moves: &[bool]) -> usize {
        moves.iter().fold(0, |index, &up| {
            if up {
                self.up_index(index)
            } else {
                self.down_index(index)
            }
        })
    }
}

impl fmt::Display for LatticeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} periods", self.layout, self.periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_counts() {
        let recombining = LatticeShape::new(LatticeLayout::Recombining, 4).unwrap();
        assert_eq!(recombining.node_count(), 15); // 1 + 2 + 3 + 4 + 5

        let full = LatticeShape::new(LatticeLayout::FullBinary, 4).unwrap();
        assert_eq!(full.node_count(), 31); // 2^5 - 1

        let single = LatticeShape::new(LatticeLayout::FullBinary, 0).unwrap();
        assert_eq!(single.node_count(), 1);
    }

    #[test]
    fn test_children_follow_parents() {
        for layout in [LatticeLayout::Recombining, LatticeLayout::FullBinary] {
            let shape = LatticeShape::new(layout, 5).unwrap();
            for level in 0..shape.periods {
                for index in 0..shape.width(level) {
                    let parent = shape.slot(level, index);
                    let up = shape.slot(level + 1, shape.up_index(index));
                    let down = shape.slot(level + 1, shape.down_index(index));
                    assert!(up > parent && down > parent);
                    assert_ne!(up, down);
                }
            }
        }
    }

    #[test]
    fn test_recombination() {
        let shape = LatticeShape::new(LatticeLayout::Recombining, 2).unwrap();
        assert_eq!(shape.index_of_path(&[true, false]), shape.index_of_path(&[false, true]));

        let full = LatticeShape::new(LatticeLayout::FullBinary, 2).unwrap();
        assert_ne!(full.index_of_path(&[true, false]), full.index_of_path(&[false, true]));
    }

    #[test]
    fn test_full_binary_limit() {
        assert!(LatticeShape::new(LatticeLayout::FullBinary, MAX_FULL_BINARY_PERIODS).is_ok());
        let err = LatticeShape::new(LatticeLayout::FullBinary, MAX_FULL_BINARY_PERIODS + 1);
        assert!(matches!(err, Err(LatticeError::InvalidInput(_))));
        assert!(LatticeShape::new(LatticeLayout::Recombining, 1000).is_ok());
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("full_binary".parse::<LatticeLayout>().unwrap(), LatticeLayout::FullBinary);
        assert_eq!("Recombining".parse::<LatticeLayout>().unwrap(), LatticeLayout::Recombining);
        assert!("trinomial".parse::<LatticeLayout>().is_err());
    }
}
