//! Graph simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation with per-node metadata, view
//! transforms for pan/zoom, and emphasis state that eases each element's
//! displayed opacity towards the target computed by the view projection.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::scale::{ScaleConfig, ScaledValues};
use super::theme::{Color, Theme};
use super::types::{GraphView, ViewLink, ViewNode};
use crate::graph::Group;

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: String,
	pub weight: f64,
	pub group: Group,
	pub color: Color,
	/// Shared by both systems' keyword lists.
	pub common: bool,
}

/// Per-edge metadata: index of the link in the current [`GraphView`].
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeInfo {
	pub link: usize,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to MIN_ZOOM..MAX_ZOOM).
	pub k: f64,
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
	/// Set once the pointer travels past the click tolerance.
	pub moved: bool,
}

/// Pointer travel (screen px) below which a press counts as a click.
pub const CLICK_TOLERANCE: f64 = 3.0;

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

// Smoothing factors - higher = faster response.
// At 60fps with speed=6 an opacity change is ~95% done in ~500ms.
const FADE_IN_SPEED: f64 = 6.0;
const FADE_OUT_SPEED: f64 = 4.0;

/// Minimum time (seconds) the tooltip is held after the pointer leaves a node.
/// This prevents flashing when the mouse briefly skirts a node's edge.
const MIN_HOLD_TIME: f64 = 0.12;

/// A displayed value easing towards a target with exponential smoothing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Fade {
	pub current: f64,
	pub target: f64,
}

impl Fade {
	fn new(current: f64, target: f64) -> Self {
		Self { current, target }
	}

	/// value += (target - value) * (1 - e^(-speed * dt))
	fn step(&mut self, dt: f64) {
		let speed = if self.target > self.current {
			FADE_IN_SPEED
		} else {
			FADE_OUT_SPEED
		};
		self.current += (self.target - self.current) * (1.0 - (-speed * dt).exp());
		if (self.target - self.current).abs() < 0.001 {
			self.current = self.target;
		}
	}
}

/// Smoothed opacities for every visible element plus the hover tooltip.
#[derive(Clone, Debug, Default)]
pub struct EmphasisState {
	nodes: HashMap<DefaultNodeIdx, Fade>,
	links: Vec<Fade>,
	labels: Vec<Fade>,
	/// Node under the pointer (if any)
	pub hovered_node: Option<DefaultNodeIdx>,
	/// Node whose tooltip is shown; outlives `hovered_node` while fading out.
	pub tooltip_node: Option<DefaultNodeIdx>,
	tooltip: Fade,
	hold_timer: f64,
}

impl EmphasisState {
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hovered_node == node {
			return;
		}
		self.hovered_node = node;
		if let Some(idx) = node {
			if self.tooltip_node != Some(idx) {
				self.tooltip.current = 0.0;
			}
			self.tooltip_node = Some(idx);
			self.tooltip.target = 1.0;
			self.hold_timer = MIN_HOLD_TIME;
		} else {
			self.tooltip.target = 0.0;
		}
	}

	/// Animate all opacities towards their targets.
	pub fn tick(&mut self, dt: f64) {
		for fade in self
			.nodes
			.values_mut()
			.chain(self.links.iter_mut())
			.chain(self.labels.iter_mut())
		{
			fade.step(dt);
		}

		if self.hovered_node.is_none() && self.hold_timer > 0.0 {
			self.hold_timer -= dt;
		} else {
			self.tooltip.step(dt);
		}
		if self.hovered_node.is_none() && self.tooltip.current <= 0.005 {
			self.tooltip_node = None;
		}
	}

	pub fn node_alpha(&self, idx: DefaultNodeIdx) -> f64 {
		self.nodes.get(&idx).map_or(0.0, |f| f.current)
	}

	pub fn link_alpha(&self, link: usize) -> f64 {
		self.links.get(link).map_or(0.0, |f| f.current)
	}

	pub fn label_alpha(&self, link: usize) -> f64 {
		self.labels.get(link).map_or(0.0, |f| f.current)
	}

	pub fn tooltip_alpha(&self) -> f64 {
		self.tooltip.current
	}
}

/// Core graph state combining physics simulation with interaction and emphasis tracking.
///
/// Created once when the component mounts, then synced with each new
/// [`GraphView`] and mutated every frame by the animation loop.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, EdgeInfo>,
	pub view: GraphView,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub emphasis: EmphasisState,
	pub width: f64,
	pub height: f64,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
}

fn simulation() -> ForceGraph<NodeInfo, EdgeInfo> {
	ForceGraph::new(SimulationParameters {
		force_charge: 300.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

impl ForceGraphState {
	pub fn new(view: &GraphView, width: f64, height: f64, theme: &Theme) -> Self {
		let mut state = Self {
			graph: simulation(),
			view: GraphView::default(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			emphasis: EmphasisState::default(),
			width,
			height,
			id_to_idx: HashMap::new(),
		};
		state.sync(view, theme);
		state
	}

	/// Adopt a new view. Opacity-only changes retarget the fades; any change
	/// to the visible nodes or links rebuilds the simulation, keeping the
	/// positions and opacities of nodes that stay visible.
	pub fn sync(&mut self, view: &GraphView, theme: &Theme) {
		let same_elements = self.view.nodes.len() == view.nodes.len()
			&& self.view.links.len() == view.links.len()
			&& self.view.nodes.iter().zip(&view.nodes).all(|(a, b)| a.node == b.node && a.common == b.common)
			&& self.view.links.iter().zip(&view.links).all(|(a, b)| a.link == b.link);

		if !same_elements {
			self.rebuild(view, theme);
		}
		self.retarget(view);
		self.view = view.clone();
	}

	fn rebuild(&mut self, view: &GraphView, theme: &Theme) {
		// Remember where surviving nodes were and how visible they were.
		let mut previous: HashMap<String, (f32, f32, f64)> = HashMap::new();
		self.graph.visit_nodes(|node| {
			let alpha = self.emphasis.node_alpha(node.index());
			previous.insert(node.data.user_data.id.clone(), (node.x(), node.y(), alpha));
		});

		let mut graph = simulation();
		let mut id_to_idx = HashMap::with_capacity(view.nodes.len());
		let mut node_fades = HashMap::with_capacity(view.nodes.len());
		let count = view.nodes.len().max(1) as f64;

		for (i, ViewNode { node, common, .. }) in view.nodes.iter().enumerate() {
			if id_to_idx.contains_key(&node.id) {
				continue;
			}
			let (x, y, alpha) = previous.get(&node.id).copied().unwrap_or_else(|| {
				let angle = (i as f64) * 2.0 * PI / count;
				((150.0 * angle.cos()) as f32, (150.0 * angle.sin()) as f32, 0.0)
			});
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					weight: node.weight,
					group: node.group,
					color: theme.palette.get(node.group),
					common: *common,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
			node_fades.insert(idx, Fade::new(alpha, alpha));
		}

		for (i, ViewLink { link, .. }) in view.links.iter().enumerate() {
			if let (Some(&src), Some(&tgt)) = (id_to_idx.get(&link.source), id_to_idx.get(&link.target)) {
				graph.add_edge(src, tgt, EdgeData {
					user_data: EdgeInfo { link: i },
				});
			}
		}

		self.graph = graph;
		self.id_to_idx = id_to_idx;
		self.emphasis.nodes = node_fades;
		self.emphasis.links = vec![Fade::default(); view.links.len()];
		self.emphasis.labels = vec![Fade::default(); view.links.len()];
		self.emphasis.hovered_node = None;
		self.emphasis.tooltip_node = None;
		self.drag = DragState::default();
	}

	fn retarget(&mut self, view: &GraphView) {
		// The first occurrence of a duplicated id owns the simulation node.
		let mut seen = HashSet::with_capacity(view.nodes.len());
		for view_node in &view.nodes {
			if !seen.insert(view_node.node.id.as_str()) {
				continue;
			}
			if let Some(fade) = self
				.id_to_idx
				.get(&view_node.node.id)
				.and_then(|idx| self.emphasis.nodes.get_mut(idx))
			{
				fade.target = view_node.opacity;
			}
		}
		for (i, view_link) in view.links.iter().enumerate() {
			self.emphasis.links[i].target = view_link.opacity;
			self.emphasis.labels[i].target = view_link.label_opacity;
		}
	}

	#[cfg(test)]
	pub fn idx_of(&self, id: &str) -> Option<DefaultNodeIdx> {
		self.id_to_idx.get(id).copied()
	}

	pub fn is_selected(&self, info: &NodeInfo) -> bool {
		self.view.selected.as_deref() == Some(info.id.as_str())
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		config: &ScaleConfig,
	) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let hit_radius = scale.node_radius(node.data.user_data.weight) + scale.hit_padding;
			if (dx * dx + dy * dy).sqrt() < hit_radius {
				found = Some(node.index());
			}
		});
		found
	}

	/// Id of the node at `idx` in the current simulation.
	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.emphasis.set_hover(node);
	}

	pub fn tick(&mut self, dt: f32) {
		// Nothing to lay out without nodes.
		if !self.view.is_empty() {
			self.graph.update(dt);
		}
		self.emphasis.tick(dt as f64);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{
		CommonNodes, GraphData, Link, LinkKind, Node, ViewState, emphasis, project,
	};

	fn graph() -> GraphData {
		let node = |id: &str, weight: f64, group: u8| Node {
			id: id.into(),
			weight,
			group: Group::from_number(group).unwrap(),
		};
		GraphData {
			nodes: vec![node("design", 10.0, 1), node("business", 8.0, 2), node("team", 4.0, 3)],
			links: vec![Link {
				source: "design".into(),
				target: "business".into(),
				kind: LinkKind::Generated,
				label: "supports".into(),
				strength: 0.6,
			}],
		}
	}

	fn view_of(data: &GraphData, view: &ViewState) -> GraphView {
		let common = CommonNodes::from(["design".to_string()]);
		let projection = project(data, view.mode, &common);
		GraphView::new(&projection, &emphasis(&projection, view), &common)
	}

	fn settle(state: &mut ForceGraphState) {
		for _ in 0..300 {
			state.emphasis.tick(0.016);
		}
	}

	#[test]
	fn fades_converge_to_projection_targets() {
		let data = graph();
		let view = view_of(&data, &ViewState::default());
		let mut state = ForceGraphState::new(&view, 800.0, 600.0, &Theme::default());

		let design = state.idx_of("design").unwrap();
		assert_eq!(state.emphasis.node_alpha(design), 0.0);
		settle(&mut state);
		assert_eq!(state.emphasis.node_alpha(design), 1.0);
		assert!((state.emphasis.link_alpha(0) - (0.6 * 0.7 + 0.2)).abs() < 1e-9);
		assert_eq!(state.emphasis.label_alpha(0), 1.0);
	}

	#[test]
	fn opacity_changes_do_not_rebuild_the_simulation() {
		let data = graph();
		let mut state = ForceGraphState::new(&view_of(&data, &ViewState::default()), 800.0, 600.0, &Theme::default());
		settle(&mut state);
		let before = state.idx_of("business");

		let dimmed = ViewState {
			weight_threshold: 9.0,
			..ViewState::default()
		};
		state.sync(&view_of(&data, &dimmed), &Theme::default());
		assert_eq!(state.idx_of("business"), before);
		// Starts from the previous opacity and eases down.
		let business = before.unwrap();
		assert_eq!(state.emphasis.node_alpha(business), 1.0);
		settle(&mut state);
		assert_eq!(state.emphasis.node_alpha(business), 0.1);
		assert_eq!(state.emphasis.link_alpha(0), 0.05);
	}

	#[test]
	fn changing_visible_set_keeps_surviving_positions() {
		let data = graph();
		let mut state = ForceGraphState::new(&view_of(&data, &ViewState::default()), 800.0, 600.0, &Theme::default());
		let mut before = None;
		let design = state.idx_of("design").unwrap();
		state.graph.visit_nodes(|n| {
			if n.index() == design {
				before = Some((n.x(), n.y()));
			}
		});

		let system_a = ViewState {
			mode: crate::graph::DisplayMode::SystemA,
			..ViewState::default()
		};
		state.sync(&view_of(&data, &system_a), &Theme::default());
		assert!(state.idx_of("business").is_none());
		let design = state.idx_of("design").unwrap();
		let mut after = None;
		state.graph.visit_nodes(|n| {
			if n.index() == design {
				after = Some((n.x(), n.y()));
			}
		});
		assert_eq!(before, after);
		assert_eq!(state.node_id(design).as_deref(), Some("design"));
	}

	#[test]
	fn empty_view_skips_layout() {
		let mut state = ForceGraphState::new(&GraphView::default(), 800.0, 600.0, &Theme::default());
		state.tick(0.016);
		assert!(state.idx_of("design").is_none());
		assert_eq!(state.node_at_position(400.0, 300.0, &ScaleConfig::default()), None);
	}

	#[test]
	fn tooltip_holds_briefly_after_hover_ends() {
		let data = graph();
		let mut state = ForceGraphState::new(&view_of(&data, &ViewState::default()), 800.0, 600.0, &Theme::default());
		let design = state.idx_of("design");
		state.set_hover(design);
		settle(&mut state);
		assert_eq!(state.emphasis.tooltip_alpha(), 1.0);

		state.set_hover(None);
		state.emphasis.tick(0.05);
		assert_eq!(state.emphasis.tooltip_alpha(), 1.0);
		settle(&mut state);
		assert_eq!(state.emphasis.tooltip_alpha(), 0.0);
		assert_eq!(state.emphasis.tooltip_node, None);
	}

	#[test]
	fn duplicate_ids_take_the_first_opacity() {
		let node = |weight: f64| Node {
			id: "design".into(),
			weight,
			group: Group::SystemA,
		};
		let data = GraphData {
			nodes: vec![node(10.0), node(2.0)],
			links: vec![],
		};
		let view = ViewState {
			weight_threshold: 5.0,
			..ViewState::default()
		};
		let graph_view = view_of(&data, &view);
		assert_eq!(
			graph_view.nodes.iter().map(|n| n.opacity).collect::<Vec<_>>(),
			vec![1.0, 0.1]
		);

		let mut state = ForceGraphState::new(&graph_view, 800.0, 600.0, &Theme::default());
		settle(&mut state);
		let design = state.idx_of("design").unwrap();
		assert_eq!(state.emphasis.node_alpha(design), 1.0);

		// An opacity-only update keeps the first occurrence in charge.
		state.sync(&graph_view, &Theme::default());
		settle(&mut state);
		assert_eq!(state.emphasis.node_alpha(design), 1.0);
	}

	#[test]
	fn hit_testing_uses_weight_radius() {
		let data = graph();
		let state = ForceGraphState::new(&view_of(&data, &ViewState::default()), 800.0, 600.0, &Theme::default());
		let design = state.idx_of("design").unwrap();
		let mut pos = (0.0, 0.0);
		state.graph.visit_nodes(|n| {
			if n.index() == design {
				pos = (n.x() as f64, n.y() as f64);
			}
		});
		// Screen position of the node centre plus 20px (inside the 25px radius).
		let (sx, sy) = (pos.0 + 400.0 + 20.0, pos.1 + 300.0);
		assert_eq!(state.node_at_position(sx, sy, &ScaleConfig::default()), Some(design));
	}
}
