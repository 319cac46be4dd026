//! Zoom-dependent scaling configuration for graph visuals.
//!
//! Node radii and link widths are derived from the data (weight and strength)
//! in world units; everything else is tuned here per zoom level.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: The coordinate system of the graph. Values in world-space
//!   scale proportionally with zoom (appear larger when zoomed in).
//! - **Screen-space**: Pixel coordinates on the canvas. Values in screen-space
//!   remain constant regardless of zoom level.

/// Zoom limits for the wheel handler.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	/// `(min_screen_px, max_screen_px)` - use `f64::NEG_INFINITY` or `f64::INFINITY` for unbounded.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Compute the world-space value for a given base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				// screen_size = world_size * k
				let min_world = min_screen / k;
				let max_world = max_screen / k;
				base.clamp(min_world, max_world)
			}
		}
	}
}

/// Fades a visual out as the view zooms out.
#[derive(Clone, Debug)]
pub struct AlphaFade {
	/// At or below this zoom the alpha is zero.
	pub zero_alpha_k: f64,
	/// At or above this zoom the alpha is one.
	pub full_alpha_k: f64,
}

impl AlphaFade {
	/// Compute alpha multiplier for a given zoom level.
	pub fn apply(&self, k: f64) -> f64 {
		if self.zero_alpha_k == self.full_alpha_k {
			return 1.0;
		}
		let t = (k - self.zero_alpha_k) / (self.full_alpha_k - self.zero_alpha_k);
		t.clamp(0.0, 1.0)
	}
}

/// Configuration for node visual scaling.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// World units of radius per unit of node weight.
	pub radius_per_weight: f64,
	/// How the weight-derived radius scales with zoom.
	pub radius_behavior: ScaleBehavior,
	/// Extra hit-test slack around a node, in screen pixels.
	pub hit_padding: f64,
	/// Label font size in screen pixels (at zoom >= label_min_k).
	pub label_size: f64,
	/// Minimum zoom level for label font scaling.
	pub label_min_k: f64,
	/// Gap between node edge and its label, in world units.
	pub label_gap: f64,
}

/// Configuration for link visual scaling.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Line width of a zero-strength link, in world units.
	pub base_width: f64,
	/// Additional width per unit of strength, in world units.
	pub strength_width: f64,
	/// Relationship label font size in world units.
	pub label_size: f64,
	/// Relationship labels fade out when zoomed far out.
	pub label_alpha: AlphaFade,
}

/// Configuration for the common-node star marker.
#[derive(Clone, Debug)]
pub struct MarkerScaleConfig {
	/// Outer star radius.
	pub size: f64,
	pub size_behavior: ScaleBehavior,
	/// Gap between node edge and star centre.
	pub offset: f64,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
	pub marker: MarkerScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius_per_weight: 2.5,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 3.0,
					max_screen: f64::INFINITY,
				},
				hit_padding: 4.0,
				label_size: 12.0,
				label_min_k: 0.5,
				label_gap: 15.0,
			},
			edge: EdgeScaleConfig {
				base_width: 1.0,
				strength_width: 2.5,
				label_size: 8.0,
				label_alpha: AlphaFade {
					zero_alpha_k: 0.4,
					full_alpha_k: 0.8,
				},
			},
			marker: MarkerScaleConfig {
				size: 3.6,
				size_behavior: ScaleBehavior::World,
				offset: 6.0,
			},
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
/// All sizes are in world-space (ready to use after canvas transform).
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	radius_per_weight: f64,
	radius_behavior: ScaleBehavior,
	base_width: f64,
	strength_width: f64,
	/// Hit-test slack in world-space.
	pub hit_padding: f64,
	/// Node label font (e.g., "500 12px sans-serif").
	pub label_font: String,
	pub label_gap: f64,
	/// Relationship label font.
	pub edge_label_font: String,
	/// Relationship label alpha multiplier [0, 1].
	pub edge_label_alpha: f64,
	pub marker_size: f64,
	pub marker_offset: f64,
}

impl ScaledValues {
	/// Compute scaled values from configuration and current zoom level.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_font_size = config.node.label_size / k.max(config.node.label_min_k);
		Self {
			k,
			radius_per_weight: config.node.radius_per_weight,
			radius_behavior: config.node.radius_behavior.clone(),
			base_width: config.edge.base_width,
			strength_width: config.edge.strength_width,
			hit_padding: ScaleBehavior::Screen.apply(config.node.hit_padding, k),
			label_font: format!("500 {}px sans-serif", label_font_size),
			label_gap: config.node.label_gap,
			edge_label_font: format!("{}px sans-serif", config.edge.label_size),
			edge_label_alpha: config.edge.label_alpha.apply(k),
			marker_size: config.marker.size_behavior.apply(config.marker.size, k),
			marker_offset: config.marker.offset,
		}
	}

	/// World-space radius of a node of the given weight.
	pub fn node_radius(&self, weight: f64) -> f64 {
		self.radius_behavior
			.apply(weight.max(0.0) * self.radius_per_weight, self.k)
	}

	/// World-space line width of a link of the given strength.
	pub fn edge_width(&self, strength: f64) -> f64 {
		self.base_width + strength.clamp(0.0, 1.0) * self.strength_width
	}

	/// Convert a screen-pixel stroke width to world-space.
	pub fn screen_px(&self, px: f64) -> f64 {
		ScaleBehavior::Screen.apply(px, self.k)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn radius_follows_weight_at_unit_zoom() {
		let scale = ScaledValues::new(&ScaleConfig::default(), 1.0);
		assert_eq!(scale.node_radius(10.0), 25.0);
		assert_eq!(scale.node_radius(4.0), 10.0);
	}

	#[test]
	fn tiny_nodes_stay_visible_when_zoomed_out() {
		let scale = ScaledValues::new(&ScaleConfig::default(), 0.1);
		// 2.5 world units would be 0.25px on screen; clamped to 3px.
		assert!((scale.node_radius(1.0) * 0.1 - 3.0).abs() < 1e-9);
	}

	#[test]
	fn edge_width_tracks_strength() {
		let scale = ScaledValues::new(&ScaleConfig::default(), 1.0);
		assert_eq!(scale.edge_width(0.0), 1.0);
		assert_eq!(scale.edge_width(1.0), 3.5);
		assert_eq!(scale.edge_width(7.0), 3.5);
	}

	#[test]
	fn edge_labels_fade_when_zoomed_out() {
		let config = ScaleConfig::default();
		assert_eq!(ScaledValues::new(&config, 1.0).edge_label_alpha, 1.0);
		assert_eq!(ScaledValues::new(&config, 0.3).edge_label_alpha, 0.0);
		let mid = ScaledValues::new(&config, 0.6).edge_label_alpha;
		assert!(mid > 0.0 && mid < 1.0);
	}

	#[test]
	fn screen_widths_shrink_in_world_space_when_zoomed_in() {
		let scale = ScaledValues::new(&ScaleConfig::default(), 2.0);
		assert_eq!(scale.screen_px(3.0), 1.5);
		assert_eq!(scale.hit_padding, 2.0);
	}
}
