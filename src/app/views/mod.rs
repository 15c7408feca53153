//! Plain-data projections of papers into what the panels draw.
//!
//! Nothing in here touches egui, so every projection is deterministic and can
//! be compared directly.

mod cards;
mod detail;

use crate::papers::Paper;
use crate::util::display_tag;

pub(in crate::app) use cards::{ListCard, ListLayout, filter_cards};
pub(in crate::app) use detail::{DetailView, StepView};

/// The feedstock → output product row shown on cards, details and tooltips.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub(in crate::app) struct TagRow {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl TagRow {
    pub(in crate::app) fn project(paper: &Paper) -> Self {
        Self {
            inputs: paper.feedstock_tags.iter().map(|tag| display_tag(tag)).collect(),
            outputs: paper
                .output_products_tags
                .iter()
                .map(|tag| display_tag(tag))
                .collect(),
        }
    }

    pub(in crate::app) fn text(&self) -> String {
        format!("{} → {}", self.inputs.join(" "), self.outputs.join(" "))
    }
}

pub(in crate::app) fn tag_chips(paper: &Paper) -> Vec<String> {
    paper.tags.iter().map(|tag| display_tag(tag)).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct Tooltip {
    pub title: String,
    pub row: TagRow,
}

impl Tooltip {
    pub(in crate::app) fn project(paper: &Paper) -> Self {
        Self {
            title: paper.title.clone(),
            row: TagRow::project(paper),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::papers::test_paper;

    #[test]
    fn tag_row_formats_both_sides() {
        let mut paper = test_paper("p", &[], &["corn_stover", "switchgrass"]);
        paper.output_products_tags = vec!["bio.ethanol".to_owned()];

        let row = TagRow::project(&paper);
        assert_eq!(row.inputs, vec!["Corn Stover", "Switchgrass"]);
        assert_eq!(row.outputs, vec!["Bio Ethanol"]);
        assert_eq!(row.text(), "Corn Stover Switchgrass → Bio Ethanol");
    }

    #[test]
    fn tooltip_uses_record_title() {
        let paper = test_paper("p", &["lignin"], &["corn"]);
        let tooltip = Tooltip::project(&paper);
        assert_eq!(tooltip.title, "Paper p");
        assert_eq!(tooltip.row.inputs, vec!["Corn"]);
    }
}
