use std::collections::HashMap;

use tracing::debug;

use super::record::Paper;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Left,
    Right,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Left, Slot::Right];

    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// How the window is divided between the paper list and the process views.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaneSplit {
    Single,
    Dual,
}

impl PaneSplit {
    pub fn list_fraction(self) -> f32 {
        match self {
            Self::Single => 0.5,
            Self::Dual => 0.25,
        }
    }
}

pub struct PaperStore {
    papers: Vec<Paper>,
    index_by_id: HashMap<String, usize>,
    spotlighted: Option<usize>,
    compare_counter: u32,
    slots: [Option<usize>; 2],
}

impl PaperStore {
    pub fn new(papers: Vec<Paper>) -> Self {
        let index_by_id = papers
            .iter()
            .enumerate()
            .map(|(index, paper)| (paper.id.clone(), index))
            .collect();
        let spotlighted = (!papers.is_empty()).then_some(0);

        Self {
            papers,
            index_by_id,
            spotlighted,
            compare_counter: 0,
            slots: [spotlighted; 2],
        }
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn paper(&self, id: &str) -> Option<&Paper> {
        self.index_of(id).map(|index| &self.papers[index])
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn spotlighted(&self) -> Option<&Paper> {
        self.spotlighted.map(|index| &self.papers[index])
    }

    pub fn spotlighted_index(&self) -> Option<usize> {
        self.spotlighted
    }

    pub fn slot_index(&self, slot: Slot) -> Option<usize> {
        self.slots[slot.index()]
    }

    pub fn slot_paper(&self, slot: Slot) -> Option<&Paper> {
        self.slot_index(slot).map(|index| &self.papers[index])
    }

    pub fn compare_counter(&self) -> u32 {
        self.compare_counter
    }

    pub fn is_comparing(&self) -> bool {
        self.compare_counter > 0
    }

    pub fn pane_split(&self) -> PaneSplit {
        if self.is_comparing() {
            PaneSplit::Dual
        } else {
            PaneSplit::Single
        }
    }

    /// The slot that receives the next selection while comparing.
    pub fn target_slot(&self) -> Option<Slot> {
        match self.compare_counter {
            0 => None,
            counter if counter % 2 == 0 => Some(Slot::Left),
            _ => Some(Slot::Right),
        }
    }

    /// Spotlights the paper with `id`. Unknown ids leave the state untouched.
    pub fn select_paper(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            debug!(paper = %id, "ignoring selection of unknown paper");
            return false;
        };

        self.spotlighted = Some(index);
        match self.target_slot() {
            Some(slot) => self.slots[slot.index()] = Some(index),
            None => self.slots = [Some(index); 2],
        }
        true
    }

    pub fn toggle_compare_mode(&mut self) -> PaneSplit {
        if self.is_comparing() {
            self.compare_counter = 0;
            self.slots = [self.spotlighted; 2];
        } else {
            self.compare_counter = 1;
        }
        debug!(counter = self.compare_counter, "compare mode toggled");
        self.pane_split()
    }

    /// Alternates which slot receives selections; ignored outside compare mode.
    pub fn advance_compare_target(&mut self) {
        if self.is_comparing() {
            self.compare_counter = self.compare_counter % 2 + 1;
        }
    }
}
