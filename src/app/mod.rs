use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};
use tracing::error;

use crate::papers::{PaneSplit, Paper, PaperStore, TagGraph, load_papers};

mod events;
mod graph;
mod physics;
mod render_utils;
mod ui;
mod views;

use physics::ForceLayout;
use views::{DetailView, ListCard};

pub struct TeaAtlasApp {
    data_path: PathBuf,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Vec<Paper>, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    store: PaperStore,
    graph: TagGraph,
    layout: ForceLayout,
    cards: Vec<ListCard>,
    search: String,
    visible_cards: Vec<usize>,
    /// Graph node indices whose card matches a non-empty search.
    search_matches: HashSet<usize>,
    details: [Option<DetailView>; 2],
    expanded: [bool; 2],
    dragging: Option<usize>,
    pan: Vec2,
    zoom: f32,
    viewport: Vec2,
    pending_split: Option<PaneSplit>,
}

impl TeaAtlasApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_path: PathBuf) -> Self {
        let state = Self::start_load(data_path.clone());
        Self { data_path, state }
    }

    fn spawn_load(data_path: PathBuf) -> Receiver<Result<Vec<Paper>, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_papers(&data_path).map_err(|error| {
                error!(%error, "failed to load papers");
                error.to_string()
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(data_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(data_path),
        }
    }
}

impl eframe::App for TeaAtlasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => {
                        transition = Some(match result {
                            Ok(papers) => AppState::Ready(Box::new(ViewModel::new(papers))),
                            Err(error) => AppState::Error(error),
                        });
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading papers...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load papers");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.data_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
