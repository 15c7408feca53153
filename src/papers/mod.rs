mod graph;
mod lenient;
mod load;
mod record;
mod store;
mod tags;

pub use graph::{TagGraph, build_graph};
pub use load::load_papers;
pub use record::{Paper, ProcessStep};
pub use store::{PaneSplit, PaperStore, Slot};

#[cfg(test)]
pub(crate) use graph::tests::paper as test_paper;
#[cfg(test)]
pub(crate) use record::{ProcessMetadata, Quantity};
