use std::ops::Range;

use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

/// Square cell of the charge tree. Leaves own a run of node indices, branches
/// own up to four child cells.
pub(super) struct Cell {
    pub(super) side: f32,
    /// Nodes below this cell; every node carries the same charge.
    pub(super) weight: f32,
    pub(super) centroid: Vec2,
    points: Range<usize>,
    children: [Option<usize>; 4],
}

impl Cell {
    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(super) fn child_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.children.iter().flatten().copied()
    }
}

/// Barnes-Hut tree over layout positions, stored as a flat arena.
///
/// `order` is a permutation of node indices arranged so that every leaf owns
/// a contiguous run of it.
pub(super) struct ChargeTree {
    cells: Vec<Cell>,
    order: Vec<usize>,
}

impl ChargeTree {
    pub(super) const ROOT: usize = 0;

    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let (min, side) = square_extent(positions)?;
        let mut tree = Self {
            cells: Vec::new(),
            order: (0..positions.len()).collect(),
        };
        tree.subdivide(positions, min, side, 0..positions.len(), 0);
        Some(tree)
    }

    pub(super) fn cell(&self, id: usize) -> &Cell {
        &self.cells[id]
    }

    pub(super) fn points(&self, cell: &Cell) -> &[usize] {
        &self.order[cell.points.clone()]
    }

    fn subdivide(
        &mut self,
        positions: &[Vec2],
        min: Vec2,
        side: f32,
        range: Range<usize>,
        depth: usize,
    ) -> usize {
        let id = self.cells.len();
        let members = &self.order[range.clone()];
        let weight = members.len() as f32;
        let centroid = members
            .iter()
            .fold(Vec2::ZERO, |sum, &index| sum + positions[index])
            / weight.max(1.0);
        self.cells.push(Cell {
            side,
            weight,
            centroid,
            points: range.clone(),
            children: [None; 4],
        });

        if depth >= MAX_DEPTH || range.len() <= LEAF_CAPACITY {
            return id;
        }

        let half = side / 2.0;
        let mid = min + vec2(half, half);
        let run = &mut self.order[range.clone()];
        run.sort_unstable_by_key(|&index| quadrant(positions[index], mid));

        let mut counts = [0usize; 4];
        for &index in run.iter() {
            counts[quadrant(positions[index], mid)] += 1;
        }
        // Coincident points cannot be separated by splitting.
        if counts.iter().filter(|&&count| count > 0).count() <= 1 {
            return id;
        }

        let mut start = range.start;
        for (slot, count) in counts.into_iter().enumerate() {
            if count == 0 {
                continue;
            }
            let offset = vec2(
                if slot & 1 == 1 { half } else { 0.0 },
                if slot & 2 == 2 { half } else { 0.0 },
            );
            let child = self.subdivide(positions, min + offset, half, start..start + count, depth + 1);
            self.cells[id].children[slot] = Some(child);
            start += count;
        }
        self.cells[id].points = range.start..range.start;
        id
    }
}

/// Bit 0 is the right half, bit 1 the lower half.
fn quadrant(point: Vec2, mid: Vec2) -> usize {
    usize::from(point.x >= mid.x) | (usize::from(point.y >= mid.y) << 1)
}

/// Smallest padded square holding every point, as (min corner, side).
fn square_extent(points: &[Vec2]) -> Option<(Vec2, f32)> {
    let (first, rest) = points.split_first()?;
    let (lo, hi) = rest
        .iter()
        .fold((*first, *first), |(lo, hi), point| (lo.min(*point), hi.max(*point)));
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }

    let side = (hi - lo).max_elem().max(1.0) + 2.0;
    Some((lo - vec2(1.0, 1.0), side))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_sizes(tree: &ChargeTree, id: usize, sizes: &mut Vec<usize>) {
        let cell = tree.cell(id);
        if cell.is_leaf() {
            sizes.push(tree.points(cell).len());
            return;
        }
        assert!(tree.points(cell).is_empty());
        for child in cell.child_ids() {
            leaf_sizes(tree, child, sizes);
        }
    }

    #[test]
    fn splits_until_leaves_are_small() {
        let positions = (0..64)
            .map(|i| vec2((i % 8) as f32 * 10.0, (i / 8) as f32 * 10.0))
            .collect::<Vec<_>>();
        let tree = ChargeTree::build(&positions).unwrap();
        let root = tree.cell(ChargeTree::ROOT);
        assert!(!root.is_leaf());
        assert_eq!(root.weight, 64.0);
        assert!((root.centroid - vec2(35.0, 35.0)).length() < 1e-3);

        let mut sizes = Vec::new();
        leaf_sizes(&tree, ChargeTree::ROOT, &mut sizes);
        assert!(sizes.iter().all(|&size| size <= LEAF_CAPACITY));
        assert_eq!(sizes.iter().sum::<usize>(), 64);
    }

    #[test]
    fn branch_weight_is_sum_of_children() {
        let positions = (0..40)
            .map(|i| vec2((i * 37 % 101) as f32, (i * 53 % 89) as f32))
            .collect::<Vec<_>>();
        let tree = ChargeTree::build(&positions).unwrap();

        fn check(tree: &ChargeTree, id: usize, positions: &[Vec2]) {
            let cell = tree.cell(id);
            if cell.is_leaf() {
                let points = tree.points(cell);
                let mean = points.iter().fold(Vec2::ZERO, |sum, &i| sum + positions[i])
                    / points.len() as f32;
                assert_eq!(cell.weight, points.len() as f32);
                assert!((cell.centroid - mean).length() < 1e-3);
                return;
            }
            let children = cell.child_ids().map(|child| tree.cell(child).weight).sum::<f32>();
            assert_eq!(cell.weight, children);
            for child in cell.child_ids() {
                check(tree, child, positions);
            }
        }
        check(&tree, ChargeTree::ROOT, &positions);
    }

    #[test]
    fn coincident_points_share_one_leaf() {
        let positions = vec![vec2(3.0, 3.0); 20];
        let tree = ChargeTree::build(&positions).unwrap();
        let root = tree.cell(ChargeTree::ROOT);
        assert!(root.is_leaf());
        assert_eq!(tree.points(root).len(), 20);
    }

    #[test]
    fn empty_positions_have_no_tree() {
        assert!(ChargeTree::build(&[]).is_none());
    }
}
