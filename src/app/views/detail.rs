use crate::papers::{Paper, ProcessStep};
use crate::util::display_tag;

use super::{TagRow, tag_chips};

const NOT_REPORTED: &str = "Not reported.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct DetailSection {
    pub heading: &'static str,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct StepView {
    pub number: usize,
    pub kind: String,
    pub description: String,
    pub parameters: Vec<String>,
    pub output: Option<String>,
}

impl StepView {
    fn project(number: usize, step: &ProcessStep) -> Self {
        Self {
            number,
            kind: display_tag(&step.kind),
            description: step.description.trim().to_owned(),
            parameters: step
                .parameters
                .iter()
                .map(|parameter| format!("{} ({})", display_tag(&parameter.name), parameter.unit))
                .collect(),
            output: step
                .output
                .as_ref()
                .filter(|output| !output.name.is_empty() || !output.unit.is_empty())
                .map(|output| format!("{} of {}", output.unit, output.name)),
        }
    }
}

/// Everything the process panel shows for one paper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct DetailView {
    pub id: String,
    pub title: String,
    pub link: String,
    pub metrics: Vec<(&'static str, String)>,
    pub row: TagRow,
    pub sections: Vec<DetailSection>,
    pub citation_count: Option<u64>,
    pub chips: Vec<String>,
    pub steps: Vec<StepView>,
}

impl DetailView {
    pub(in crate::app) fn project(paper: &Paper) -> Self {
        let metrics = &paper.metrics;
        let metrics = [
            ("Production Costs", &metrics.production_costs),
            ("Minimal Selling Price", &metrics.minimal_selling_price),
            (
                "Minimal Selling Price per unit",
                &metrics.minimal_selling_price_per_unit,
            ),
            ("IRR", &metrics.irr),
            ("NPV", &metrics.npv),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.clone().map(|value| (label, value)))
        .collect();

        let section = |heading, body: &str| DetailSection {
            heading,
            body: if body.trim().is_empty() {
                NOT_REPORTED.to_owned()
            } else {
                body.trim().to_owned()
            },
        };

        let title = if paper.title.trim().is_empty() {
            paper.display_title().to_owned()
        } else {
            paper.title.clone()
        };
        let link = if paper.doi.trim().is_empty() {
            paper.citation_link().to_owned()
        } else {
            paper.doi.clone()
        };

        Self {
            id: paper.id.clone(),
            title,
            link,
            metrics,
            row: TagRow::project(paper),
            sections: vec![
                section("Novelty", &paper.novelty),
                section("IRR", &paper.irr_summary),
                section("Price Sensitivity", &paper.price_sensitivity),
            ],
            citation_count: paper.citation_count,
            chips: tag_chips(paper),
            steps: paper
                .process_flow()
                .iter()
                .enumerate()
                .map(|(index, step)| StepView::project(index + 1, step))
                .collect(),
        }
    }
}
