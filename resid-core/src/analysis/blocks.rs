//! Contiguous ID ranges.

use serde::Serialize;

use crate::declaration::DeclarationSet;

/// A maximal run of consecutive used values, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Block {
    pub start: u64,
    pub end: u64,
}

impl Block {
    /// Number of values covered; zero when `start > end`.
    pub fn width(&self) -> u64 {
        self.end
            .checked_sub(self.start)
            .map_or(0, |span| span.saturating_add(1))
    }

    pub fn contains(&self, value: u64) -> bool {
        (self.start..=self.end).contains(&value)
    }
}

/// Maximal runs of consecutive used values, ascending by `start`.
pub fn find_blocks(set: &DeclarationSet) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    for value in set.used_values() {
        match blocks.last_mut() {
            Some(block) if block.end.checked_add(1) == Some(value) => block.end = value,
            _ => blocks.push(Block {
                start: value,
                end: value,
            }),
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Declaration;

    fn set(values: &[u64]) -> DeclarationSet {
        DeclarationSet::new(
            1000,
            values
                .iter()
                .enumerate()
                .map(|(i, v)| Declaration::new(format!("ID_{}", i), *v, "a.h", i + 1)),
        )
    }

    #[test]
    fn test_split_blocks() {
        assert_eq!(
            find_blocks(&set(&[1000, 1000, 1002])),
            vec![Block { start: 1000, end: 1000 }, Block { start: 1002, end: 1002 }]
        );
    }

    #[test]
    fn test_runs_merge_regardless_of_order() {
        let blocks = find_blocks(&set(&[1005, 1001, 1000, 1002, 1006, 1010]));
        assert_eq!(
            blocks,
            vec![
                Block { start: 1000, end: 1002 },
                Block { start: 1005, end: 1006 },
                Block { start: 1010, end: 1010 },
            ]
        );
        assert_eq!(blocks[0].width(), 3);
        assert!(blocks[1].contains(1006));
        assert!(!blocks[1].contains(1007));
    }

    #[test]
    fn test_empty() {
        assert!(find_blocks(&DeclarationSet::empty(1000)).is_empty());
    }

    #[test]
    fn test_below_floor_excluded() {
        assert_eq!(find_blocks(&set(&[999, 1000])), vec![Block { start: 1000, end: 1000 }]);
    }

    #[test]
    fn test_width_edges() {
        assert_eq!(Block { start: 7, end: 7 }.width(), 1);
        assert_eq!(Block { start: 0, end: u64::MAX }.width(), u64::MAX);
        let inverted = Block { start: 10, end: 3 };
        assert_eq!(inverted.width(), 0);
        assert!(!inverted.contains(5));
    }

    #[test]
    fn test_max_value() {
        let s = DeclarationSet::new(
            0,
            vec![
                Declaration::new("A", u64::MAX - 1, "a.h", 1),
                Declaration::new("B", u64::MAX, "a.h", 2),
            ],
        );
        assert_eq!(find_blocks(&s), vec![Block { start: u64::MAX - 1, end: u64::MAX }]);
    }
}
