use std::collections::HashSet;

use eframe::egui::{self, Align, Context, Layout, RichText, Vec2, vec2};
use tracing::debug;

use crate::papers::{Paper, PaperStore, build_graph};

use super::super::ViewModel;
use super::super::events::UiEvent;
use super::super::physics::{ForceLayout, LayoutConfig};
use super::super::views::ListCard;

const DEFAULT_VIEWPORT: Vec2 = vec2(800.0, 600.0);
const AUTHOR_NAME: &str = "Homeworld Collective";
const AUTHOR_URL: &str = "https://homeworld.bio/";

impl ViewModel {
    pub(in crate::app) fn new(papers: Vec<Paper>) -> Self {
        let graph = build_graph(&papers);
        let pairs = graph
            .edges
            .iter()
            .map(|edge| (edge.source, edge.target))
            .collect::<Vec<_>>();
        let layout = ForceLayout::new(
            graph.nodes.len(),
            &pairs,
            DEFAULT_VIEWPORT / 2.0,
            LayoutConfig::default(),
        );
        let cards = papers.iter().map(ListCard::project).collect::<Vec<_>>();
        debug!(
            papers = papers.len(),
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "view model ready"
        );

        let mut model = Self {
            store: PaperStore::new(papers),
            graph,
            layout,
            visible_cards: (0..cards.len()).collect(),
            cards,
            search: String::new(),
            search_matches: HashSet::new(),
            details: [None, None],
            expanded: [false; 2],
            dragging: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            viewport: DEFAULT_VIEWPORT,
            pending_split: None,
        };
        model.refresh_details();
        model
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        let mut events = Vec::new();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui, &mut events));

        let screen_width = ctx.input(|input| input.content_rect().width());
        let mut list_panel = egui::SidePanel::left("paper_list")
            .resizable(true)
            .default_width(screen_width * self.store.pane_split().list_fraction());
        if let Some(split) = self.pending_split.take() {
            list_panel = list_panel.exact_width(screen_width * split.list_fraction());
        }
        list_panel.show(ctx, |ui| self.draw_list(ui, &mut events));

        egui::TopBottomPanel::bottom("details")
            .resizable(true)
            .default_height(320.0)
            .show(ctx, |ui| self.draw_details(ui, &mut events));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui, &mut events));

        let request = self.handle_all(events);
        if !request.is_empty() {
            ctx.request_repaint();
        }
    }

    fn draw_top_bar(&self, ui: &mut egui::Ui, events: &mut Vec<UiEvent>) {
        ui.horizontal(|ui| {
            ui.heading("TEA Atlas");
            ui.hyperlink_to(AUTHOR_NAME, AUTHOR_URL);
            ui.separator();
            ui.label(format!("papers: {}", self.store.papers().len()));
            ui.label(format!("nodes: {}", self.graph.nodes.len()));
            ui.label(format!("edges: {}", self.graph.edges.len()));
            ui.separator();

            let mut comparing = self.store.is_comparing();
            if ui.toggle_value(&mut comparing, "Compare").changed() {
                events.push(UiEvent::ToggleCompare);
            }
            if let Some(target) = self.store.target_slot() {
                let label = format!("Next selection: {}", target.label());
                if ui.button(label).clicked() {
                    events.push(UiEvent::SwapCompareTarget);
                }
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let status = if self.layout.is_running() {
                    format!("layout settling (alpha {:.3})", self.layout.alpha())
                } else {
                    "layout at rest".to_owned()
                };
                ui.label(RichText::new(status).small());
            });
        });
    }
}
