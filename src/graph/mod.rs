//! Keyword graph domain: the snapshot model, keyword parsing, and the view
//! projection applied before rendering.

pub mod keywords;
pub mod model;
pub mod projection;

pub use keywords::{CommonNodes, append_links, clean_listing, common_keywords, parse_keywords};
pub use model::{GraphData, Group, Link, LinkKind, Node};
pub use projection::{DisplayMode, Emphasis, LinkFilters, Projection, ViewState, emphasis, project};
