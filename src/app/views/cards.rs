use crate::papers::Paper;
use crate::util::truncate_chars;

use super::{TagRow, tag_chips};

const NOVELTY_PREVIEW_CHARS: usize = 280;
const CONDENSED_BREAKPOINT: f32 = 700.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct ListCard {
    pub id: String,
    pub title: String,
    pub row: TagRow,
    pub chips: Vec<String>,
    pub link: String,
    pub novelty_preview: String,
    /// Lowercased text of everything the card shows, novelty untruncated.
    pub search_text: String,
}

impl ListCard {
    pub(in crate::app) fn project(paper: &Paper) -> Self {
        let title = paper.display_title().to_owned();
        let row = TagRow::project(paper);
        let chips = tag_chips(paper);
        let link = paper.citation_link().to_owned();

        let search_text = [
            title.as_str(),
            row.text().as_str(),
            chips.join(" ").as_str(),
            link.as_str(),
            paper.novelty.as_str(),
        ]
        .join("\n")
        .to_lowercase();

        Self {
            id: paper.id.clone(),
            novelty_preview: truncate_chars(&paper.novelty, NOVELTY_PREVIEW_CHARS),
            title,
            row,
            chips,
            link,
            search_text,
        }
    }
}

/// Indices of cards whose text contains `query`, ignoring case.
pub(in crate::app) fn filter_cards(cards: &[ListCard], query: &str) -> Vec<usize> {
    let query = query.to_lowercase();
    cards
        .iter()
        .enumerate()
        .filter(|(_, card)| query.is_empty() || card.search_text.contains(&query))
        .map(|(index, _)| index)
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ListLayout {
    pub columns: usize,
    pub body_size: f32,
    pub title_size: f32,
    pub search_fraction: f32,
}

impl ListLayout {
    pub(in crate::app) fn for_width(width: f32) -> Self {
        if width < CONDENSED_BREAKPOINT {
            Self {
                columns: 1,
                body_size: 12.0,
                title_size: 28.0,
                search_fraction: 0.75,
            }
        } else {
            Self {
                columns: 2,
                body_size: 14.5,
                title_size: 38.0,
                search_fraction: 0.5,
            }
        }
    }

    /// Tag chips are drawn in both layouts, one step below the body text.
    pub(in crate::app) fn chip_size(self) -> f32 {
        self.body_size - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::papers::test_paper;

    fn cards() -> Vec<ListCard> {
        let mut lignin = test_paper("a", &["lignin_valorization"], &["corn_stover"]);
        lignin.novelty = "First plant-scale Lignin recovery.".to_owned();
        let protein = test_paper("b", &["single_cell_protein"], &["sugarcane"]);
        vec![ListCard::project(&lignin), ListCard::project(&protein)]
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let cards = cards();
        assert_eq!(filter_cards(&cards, "LIGNIN"), vec![0]);
        assert_eq!(filter_cards(&cards, "cell prot"), vec![1]);
        assert_eq!(filter_cards(&cards, "sugarcane"), vec![1]);
        assert!(filter_cards(&cards, "nothing-like-this").is_empty());
    }

    #[test]
    fn only_empty_query_shows_everything() {
        let cards = cards();
        assert_eq!(filter_cards(&cards, ""), vec![0, 1]);
        assert!(filter_cards(&cards, "  ").is_empty());
        assert_eq!(filter_cards(&cards, "protein"), vec![1]);
        assert!(filter_cards(&cards, "protein ").is_empty());
    }

    #[test]
    fn novelty_is_truncated_but_searchable() {
        let mut paper = test_paper("long", &[], &["corn"]);
        paper.novelty = format!("{} needle", "word ".repeat(100));
        let card = ListCard::project(&paper);
        assert!(card.novelty_preview.chars().count() <= NOVELTY_PREVIEW_CHARS + 1);
        assert!(!card.novelty_preview.contains("needle"));
        assert_eq!(filter_cards(&[card], "needle"), vec![0]);
    }

    #[test]
    fn card_falls_back_to_record_fields() {
        let cards = cards();
        let card = &cards[1];
        assert_eq!(card.title, "Paper b");
        assert_eq!(card.link, "https://doi.org/10.0/b");
        assert_eq!(card.chips, vec!["Single Cell Protein"]);
    }

    #[test]
    fn layout_switches_at_breakpoint() {
        assert_eq!(ListLayout::for_width(699.0).columns, 1);
        assert_eq!(ListLayout::for_width(700.0).columns, 2);
        assert!(ListLayout::for_width(320.0).body_size < ListLayout::for_width(900.0).body_size);
    }

    #[test]
    fn chips_keep_a_readable_size_when_condensed() {
        let condensed = ListLayout::for_width(360.0);
        let wide = ListLayout::for_width(1200.0);
        assert!(condensed.chip_size() >= 10.0);
        assert!(condensed.chip_size() < wide.chip_size());
        assert!(condensed.chip_size() < condensed.body_size);
    }
}
