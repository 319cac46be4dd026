//! Force-directed keyword graph visualization component.
//!
//! Renders an interactive force-directed graph on an HTML canvas with:
//! - Physics-based node positioning via force simulation
//! - Pan, zoom, node dragging and click-to-select
//! - Smooth opacity transitions when the view projection changes
//! - Common-node markers, relationship labels and a hover tooltip
//!
//! # Example
//!
//! ```ignore
//! let view = Signal::derive(move || GraphView::new(&projection.get(), &emphasis.get(), &common.get()));
//! let on_click = Callback::new(move |id: String| view_state.update(|v| v.toggle_selection(&id)));
//!
//! view! { <ForceGraphCanvas view=view on_node_click=on_click /> }
//! ```

mod component;
mod render;
mod scale;
mod state;
mod theme;
mod types;

pub use component::ForceGraphCanvas;
pub use types::GraphView;
