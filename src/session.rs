//! Per-operation busy tracking and request outcomes for the input layer.
//!
//! One generation, one suggestion and one analysis per side may be in flight
//! at a time. A second submission of the same operation is refused while the
//! first is outstanding. The `apply_*` functions decide what a finished
//! request leaves behind in the app state.

use log::info;

use crate::document::DocumentKind;
use crate::error::{AppError, AppResult, Failed, ServiceError};
use crate::graph::{GraphData, append_links};

/// Which system's keyword field an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
	/// First system.
	A,
	/// Second system.
	B,
}

impl Side {
	/// Default display name.
	pub fn label(self) -> &'static str {
		match self {
			Side::A => "System A",
			Side::B => "System B",
		}
	}
}

/// A long-running request issued from the input panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
	/// Knowledge graph generation.
	Generate,
	/// Keyword extraction from a document for one side.
	Analyze(Side),
	/// Explicit-link suggestion.
	Suggest,
}

/// In-flight flag per operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusyFlags {
	generating: bool,
	analyzing_a: bool,
	analyzing_b: bool,
	suggesting: bool,
}

impl BusyFlags {
	fn slot(&mut self, op: Operation) -> &mut bool {
		match op {
			Operation::Generate => &mut self.generating,
			Operation::Analyze(Side::A) => &mut self.analyzing_a,
			Operation::Analyze(Side::B) => &mut self.analyzing_b,
			Operation::Suggest => &mut self.suggesting,
		}
	}

	/// Whether `op` is in flight.
	pub fn is_busy(&self, op: Operation) -> bool {
		match op {
			Operation::Generate => self.generating,
			Operation::Analyze(Side::A) => self.analyzing_a,
			Operation::Analyze(Side::B) => self.analyzing_b,
			Operation::Suggest => self.suggesting,
		}
	}

	/// Mark `op` as in flight. Returns `false` if it already was.
	pub fn try_begin(&mut self, op: Operation) -> bool {
		let slot = self.slot(op);
		if *slot {
			return false;
		}
		*slot = true;
		true
	}

	/// Release `op`, whether it succeeded or not.
	pub fn finish(&mut self, op: Operation) {
		*self.slot(op) = false;
	}
}

/// Validate an upload and claim the side's analysis slot.
///
/// The MIME check runs first, so an unsupported file never marks the side
/// busy. `Ok(None)` means an analysis for that side is already running.
pub fn begin_analysis(
	busy: &mut BusyFlags,
	side: Side,
	mime: &str,
) -> AppResult<Option<DocumentKind>> {
	let kind = DocumentKind::from_mime(mime)?;
	Ok(busy.try_begin(Operation::Analyze(side)).then_some(kind))
}

/// Snapshot left by a finished generation, plus the failure to report.
///
/// A failed generation clears the graph rather than keeping the previous one.
pub fn apply_generation(result: Result<GraphData, ServiceError>) -> (GraphData, Option<AppError>) {
	match result {
		Ok(graph) => (graph, None),
		Err(e) => (
			GraphData::default(),
			Some(AppError::service(Failed::Generation, e)),
		),
	}
}

/// Keyword text for a side after a document analysis.
///
/// On failure the side keeps `current`.
pub fn apply_analysis(current: &str, result: AppResult<String>) -> (String, Option<AppError>) {
	match result {
		Ok(keywords) => (keywords, None),
		Err(e) => (current.to_string(), Some(e)),
	}
}

/// Explicit-links text after a suggestion. Suggested pairs are appended.
pub fn apply_suggestion(
	links: &str,
	result: Result<String, ServiceError>,
) -> (String, Option<AppError>) {
	match result {
		Ok(pairs) => {
			info!("keyword-graph: suggested links: {}", pairs);
			(append_links(links, &pairs), None)
		}
		Err(e) => (
			links.to_string(),
			Some(AppError::service(Failed::Suggestion, e)),
		),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{Group, Node};

	fn one_node_graph() -> GraphData {
		GraphData {
			nodes: vec![Node {
				id: "design".into(),
				weight: 10.0,
				group: Group::SystemA,
			}],
			links: vec![],
		}
	}

	#[test]
	fn operations_are_tracked_independently() {
		let mut busy = BusyFlags::default();
		assert!(busy.try_begin(Operation::Generate));
		assert!(busy.try_begin(Operation::Analyze(Side::A)));
		assert!(busy.try_begin(Operation::Analyze(Side::B)));
		assert!(busy.is_busy(Operation::Generate));
		assert!(!busy.is_busy(Operation::Suggest));

		busy.finish(Operation::Analyze(Side::A));
		assert!(!busy.is_busy(Operation::Analyze(Side::A)));
		assert!(busy.is_busy(Operation::Analyze(Side::B)));
	}

	#[test]
	fn duplicate_submission_is_refused() {
		let mut busy = BusyFlags::default();
		assert!(busy.try_begin(Operation::Generate));
		assert!(!busy.try_begin(Operation::Generate));
		busy.finish(Operation::Generate);
		assert!(busy.try_begin(Operation::Generate));
	}

	#[test]
	fn unsupported_upload_never_sets_busy() {
		let mut busy = BusyFlags::default();
		let result = begin_analysis(&mut busy, Side::A, "application/json");
		assert!(matches!(result, Err(AppError::UnsupportedFileType(_))));
		assert_eq!(busy, BusyFlags::default());
	}

	#[test]
	fn supported_upload_claims_the_side_once() {
		let mut busy = BusyFlags::default();
		let kind = begin_analysis(&mut busy, Side::B, "application/pdf").unwrap();
		assert_eq!(kind, Some(DocumentKind::Pdf));
		assert!(busy.is_busy(Operation::Analyze(Side::B)));
		assert!(!busy.is_busy(Operation::Analyze(Side::A)));

		let again = begin_analysis(&mut busy, Side::B, "text/plain").unwrap();
		assert_eq!(again, None);
	}

	#[test]
	fn successful_generation_replaces_the_graph() {
		let (graph, err) = apply_generation(Ok(one_node_graph()));
		assert_eq!(graph, one_node_graph());
		assert!(err.is_none());
	}

	#[test]
	fn failed_generation_clears_the_graph() {
		let (graph, err) = apply_generation(Err(ServiceError::EmptyResponse));
		assert!(graph.is_empty());
		let err = err.unwrap();
		assert!(matches!(err, AppError::Service { failed: Failed::Generation, .. }));
		assert!(err.user_message().contains("generate graph"));
	}

	#[test]
	fn successful_analysis_replaces_the_keywords() {
		let (keywords, err) = apply_analysis("design:10", Ok("brand:7,market:5".into()));
		assert_eq!(keywords, "brand:7,market:5");
		assert!(err.is_none());
	}

	#[test]
	fn failed_analysis_keeps_the_keywords() {
		let failure = AppError::service(Failed::Analysis, ServiceError::Schema("bad".into()));
		let (keywords, err) = apply_analysis("design:10", Err(failure));
		assert_eq!(keywords, "design:10");
		assert!(err.unwrap().user_message().contains("analyze document"));

		let (keywords, err) =
			apply_analysis("design:10", Err(AppError::Document("no text".into())));
		assert_eq!(keywords, "design:10");
		assert!(err.is_some());
	}

	#[test]
	fn suggestions_append_or_leave_links_alone() {
		let (links, err) = apply_suggestion("a-b", Ok("c-d".into()));
		assert_eq!(links, append_links("a-b", "c-d"));
		assert!(err.is_none());

		let (links, err) = apply_suggestion("a-b", Err(ServiceError::EmptyResponse));
		assert_eq!(links, "a-b");
		assert!(matches!(err, Some(AppError::Service { failed: Failed::Suggestion, .. })));
	}
}
