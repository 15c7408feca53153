use eframe::egui::{Vec2, vec2};

use super::quadtree::ChargeTree;

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    /// Per-node charge; negative values repel.
    pub(super) strength: f32,
    pub(super) theta_sq: f32,
    pub(super) distance_min_sq: f32,
    pub(super) alpha: f32,
}

#[derive(Clone, Copy)]
pub(super) struct Link {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) strength: f32,
    pub(super) bias: f32,
}

/// Deterministic stand-in for d3's random jiggle on coincident points.
pub(super) fn jiggle(seed: usize) -> f32 {
    let hashed = seed.wrapping_mul(2_654_435_761) % 1_000;
    (hashed as f32 / 1_000.0 - 0.5) * 1e-6
}

fn softened(distance_sq: f32, distance_min_sq: f32) -> f32 {
    if distance_sq < distance_min_sq {
        (distance_min_sq * distance_sq).sqrt()
    } else {
        distance_sq
    }
}

/// Adds the charge every other node exerts on `index` to `velocity`.
pub(super) fn accumulate_charge(
    tree: &ChargeTree,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams,
    velocity: &mut Vec2,
) {
    visit_cell(tree, ChargeTree::ROOT, index, positions, params, velocity);
}

fn visit_cell(
    tree: &ChargeTree,
    id: usize,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams,
    velocity: &mut Vec2,
) {
    let cell = tree.cell(id);
    if cell.weight <= 0.0 {
        return;
    }

    let point = positions[index];

    if cell.is_leaf() {
        for &other in tree.points(cell) {
            if other == index {
                continue;
            }

            let mut delta = positions[other] - point;
            if delta.x == 0.0 {
                delta.x = jiggle(index * 31 + other);
            }
            if delta.y == 0.0 {
                delta.y = jiggle(index * 17 + other * 7);
            }
            let distance_sq = softened(delta.length_sq(), params.distance_min_sq);
            *velocity += delta * (params.strength * params.alpha / distance_sq);
        }
        return;
    }

    let mut delta = cell.centroid - point;
    if (cell.side * cell.side) / params.theta_sq < delta.length_sq() {
        if delta.x == 0.0 {
            delta.x = jiggle(index);
        }
        if delta.y == 0.0 {
            delta.y = jiggle(index + 1);
        }
        let distance_sq = softened(delta.length_sq(), params.distance_min_sq);
        *velocity += delta * (params.strength * cell.weight * params.alpha / distance_sq);
        return;
    }

    for child in cell.child_ids() {
        visit_cell(tree, child, index, positions, params, velocity);
    }
}

/// Moves linked nodes toward `distance`, splitting the correction by degree.
pub(super) fn apply_links(
    links: &[Link],
    distance: f32,
    alpha: f32,
    positions: &[Vec2],
    velocities: &mut [Vec2],
) {
    for (link_index, link) in links.iter().enumerate() {
        let mut delta = positions[link.target] + velocities[link.target]
            - positions[link.source]
            - velocities[link.source];
        if delta.x == 0.0 {
            delta.x = jiggle(link_index);
        }
        if delta.y == 0.0 {
            delta.y = jiggle(link_index + 3);
        }

        let length = delta.length();
        let scale = (length - distance) / length * alpha * link.strength;
        let correction = delta * scale;

        velocities[link.target] -= correction * link.bias;
        velocities[link.source] += correction * (1.0 - link.bias);
    }
}

pub(super) fn degree_links(node_count: usize, pairs: &[(usize, usize)]) -> Vec<Link> {
    let mut degree = vec![0usize; node_count];
    for &(source, target) in pairs {
        degree[source] += 1;
        degree[target] += 1;
    }

    pairs
        .iter()
        .map(|&(source, target)| {
            let source_degree = degree[source] as f32;
            let target_degree = degree[target] as f32;
            Link {
                source,
                target,
                strength: 1.0 / source_degree.min(target_degree),
                bias: source_degree / (source_degree + target_degree),
            }
        })
        .collect()
}

pub(super) fn center_offset(positions: &[Vec2], center: Vec2) -> Vec2 {
    if positions.is_empty() {
        return Vec2::ZERO;
    }

    let sum = positions
        .iter()
        .fold(vec2(0.0, 0.0), |sum, position| sum + *position);
    sum / positions.len() as f32 - center
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_pull_distant_pair_together() {
        let links = degree_links(2, &[(0, 1)]);
        assert_eq!(links[0].strength, 1.0);
        assert_eq!(links[0].bias, 0.5);

        let positions = [vec2(0.0, 0.0), vec2(300.0, 0.0)];
        let mut velocities = [Vec2::ZERO; 2];
        apply_links(&links, 120.0, 1.0, &positions, &mut velocities);
        assert!(velocities[0].x > 0.0);
        assert!(velocities[1].x < 0.0);
        assert!((velocities[0].x + velocities[1].x).abs() < 1e-4);
    }

    #[test]
    fn links_push_close_pair_apart() {
        let links = degree_links(2, &[(0, 1)]);
        let positions = [vec2(0.0, 0.0), vec2(20.0, 0.0)];
        let mut velocities = [Vec2::ZERO; 2];
        apply_links(&links, 120.0, 1.0, &positions, &mut velocities);
        assert!(velocities[0].x < 0.0);
        assert!(velocities[1].x > 0.0);
    }

    #[test]
    fn charge_repels_neighbours() {
        let positions = [vec2(0.0, 0.0), vec2(10.0, 0.0)];
        let tree = ChargeTree::build(&positions).unwrap();
        let params = ChargeParams {
            strength: -40.0,
            theta_sq: 0.81,
            distance_min_sq: 1.0,
            alpha: 1.0,
        };
        let mut velocity = Vec2::ZERO;
        accumulate_charge(&tree, 0, &positions, params, &mut velocity);
        assert!(velocity.x < 0.0);
        assert!((velocity.x + 4.0).abs() < 1e-3);
    }

    #[test]
    fn center_offset_is_mean_minus_center() {
        let positions = [vec2(0.0, 0.0), vec2(10.0, 20.0)];
        let offset = center_offset(&positions, vec2(5.0, 5.0));
        assert_eq!(offset, vec2(0.0, 5.0));
    }
}
