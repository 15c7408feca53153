mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use forces::{ChargeParams, Link, accumulate_charge, apply_links, center_offset, degree_links};
use quadtree::ChargeTree;

const INITIAL_RADIUS: f32 = 10.0;

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct LayoutConfig {
    pub link_distance: f32,
    pub charge_strength: f32,
    pub theta: f32,
    pub velocity_decay: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub drag_alpha_target: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            link_distance: 120.0,
            charge_strength: -40.0,
            theta: 0.9,
            velocity_decay: 0.4,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            drag_alpha_target: 0.3,
        }
    }
}

/// Force-directed placement with link, charge and centering forces.
///
/// Positions live in viewport space: the center target is the midpoint of the
/// graph viewport. Pinned nodes sit at their pin while still exerting charge
/// on every other node.
pub(in crate::app) struct ForceLayout {
    config: LayoutConfig,
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    pins: Vec<Option<Vec2>>,
    links: Vec<Link>,
    center: Vec2,
    alpha: f32,
    alpha_target: f32,
    active_drags: usize,
}

impl ForceLayout {
    pub(in crate::app) fn new(
        node_count: usize,
        pairs: &[(usize, usize)],
        center: Vec2,
        config: LayoutConfig,
    ) -> Self {
        let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
        let positions = (0..node_count)
            .map(|index| {
                let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
                let angle = index as f32 * golden_angle;
                center + vec2(radius * angle.cos(), radius * angle.sin())
            })
            .collect();

        let pairs = pairs
            .iter()
            .copied()
            .filter(|&(source, target)| {
                source != target && source < node_count && target < node_count
            })
            .collect::<Vec<_>>();

        Self {
            config,
            positions,
            velocities: vec![Vec2::ZERO; node_count],
            pins: vec![None; node_count],
            links: degree_links(node_count, &pairs),
            center,
            alpha: 1.0,
            alpha_target: 0.0,
            active_drags: 0,
        }
    }

    pub(in crate::app) fn len(&self) -> usize {
        self.positions.len()
    }

    pub(in crate::app) fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub(in crate::app) fn position(&self, index: usize) -> Option<Vec2> {
        self.positions.get(index).copied()
    }

    pub(in crate::app) fn is_pinned(&self, index: usize) -> bool {
        self.pins.get(index).is_some_and(Option::is_some)
    }

    pub(in crate::app) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(in crate::app) fn center(&self) -> Vec2 {
        self.center
    }

    pub(in crate::app) fn is_running(&self) -> bool {
        self.alpha >= self.config.alpha_min
    }

    /// Advances one tick when the layout still has energy.
    pub(in crate::app) fn step(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.tick();
        true
    }

    pub(in crate::app) fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        let alpha = self.alpha;

        apply_links(
            &self.links,
            self.config.link_distance,
            alpha,
            &self.positions,
            &mut self.velocities,
        );

        if let Some(tree) = ChargeTree::build(&self.positions) {
            let params = ChargeParams {
                strength: self.config.charge_strength,
                theta_sq: self.config.theta * self.config.theta,
                distance_min_sq: 1.0,
                alpha,
            };
            for index in 0..self.positions.len() {
                let mut velocity = self.velocities[index];
                accumulate_charge(&tree, index, &self.positions, params, &mut velocity);
                self.velocities[index] = velocity;
            }
        }

        let offset = center_offset(&self.positions, self.center);
        for position in &mut self.positions {
            *position -= offset;
        }

        let retain = 1.0 - self.config.velocity_decay;
        for ((position, velocity), pin) in self
            .positions
            .iter_mut()
            .zip(self.velocities.iter_mut())
            .zip(self.pins.iter())
        {
            match pin {
                Some(pinned) => {
                    *position = *pinned;
                    *velocity = Vec2::ZERO;
                }
                None => {
                    *velocity *= retain;
                    *position += *velocity;
                }
            }
        }
    }

    /// Pins the node where it is and raises the energy target so the rest of
    /// the graph keeps relaxing around it.
    pub(in crate::app) fn drag_start(&mut self, index: usize) {
        let Some(position) = self.position(index) else {
            return;
        };

        if self.active_drags == 0 {
            self.alpha_target = self.config.drag_alpha_target;
            self.alpha = self.alpha.max(self.config.alpha_min);
            debug!(node = index, "layout restarted for drag");
        }
        self.active_drags += 1;
        self.pins[index] = Some(position);
    }

    pub(in crate::app) fn drag_to(&mut self, index: usize, position: Vec2) {
        if let Some(pin) = self.pins.get_mut(index)
            && pin.is_some()
        {
            *pin = Some(position);
        }
    }

    pub(in crate::app) fn drag_end(&mut self, index: usize) {
        let Some(pin) = self.pins.get_mut(index) else {
            return;
        };
        if pin.take().is_none() {
            return;
        }

        self.active_drags = self.active_drags.saturating_sub(1);
        if self.active_drags == 0 {
            self.alpha_target = 0.0;
        }
    }

    /// Moves the center target without disturbing current positions.
    pub(in crate::app) fn recenter(&mut self, center: Vec2) {
        if (self.center - center).length_sq() <= f32::EPSILON {
            return;
        }

        self.center = center;
        if !self.is_running() {
            self.alpha = self.config.alpha_min * 20.0;
        }
    }

    pub(in crate::app) fn nearest(&self, point: Vec2, radius: f32) -> Option<usize> {
        let radius_sq = radius * radius;
        self.positions
            .iter()
            .enumerate()
            .map(|(index, position)| (index, (*position - point).length_sq()))
            .filter(|(_, distance_sq)| *distance_sq <= radius_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}
