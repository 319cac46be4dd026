//! UI components: the input panel, view filters, loader, and the graph canvas.

pub mod filter_controls;
pub mod force_graph;
pub mod keyword_input;
pub mod loader;

pub use filter_controls::FilterControls;
pub use keyword_input::KeywordInput;
pub use loader::Loader;
