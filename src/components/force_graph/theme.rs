//! Visual theming for the force graph.
//!
//! Provides the group palette, link colours by kind, and the styles of node
//! labels, common-node markers and the hover tooltip.

use crate::graph::{Group, LinkKind};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// One colour per provenance group, indexed by group number.
#[derive(Clone, Debug)]
pub struct GroupPalette {
	pub colors: [Color; 5],
}

impl GroupPalette {
	/// Pink / teal / lime / orange / sky.
	pub fn vivid() -> Self {
		Self {
			colors: [
				Color::rgb(236, 72, 153),  // System A
				Color::rgb(20, 184, 166),  // System B
				Color::rgb(163, 230, 53),  // Bridge
				Color::rgb(249, 115, 22),  // Cluster 4
				Color::rgb(56, 189, 248),  // Cluster 5
			],
		}
	}

	pub fn get(&self, group: Group) -> Color {
		self.colors[usize::from(group.number()) - 1]
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Link visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// User-declared links
	pub explicit_color: Color,
	/// Model-inferred links
	pub generated_color: Color,
	/// Relationship label text
	pub label_color: Color,
}

impl EdgeStyle {
	pub fn color(&self, kind: LinkKind) -> Color {
		match kind {
			LinkKind::Explicit => self.explicit_color,
			LinkKind::Generated => self.generated_color,
		}
	}
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	pub border_color: Color,
	/// Border width in screen pixels
	pub border_width: f64,
	/// Border of the selected node
	pub selected_color: Color,
	pub selected_width: f64,
	pub label_color: Color,
	/// Halo drawn behind labels for legibility
	pub label_outline: Color,
}

/// Star marker on nodes shared by both systems.
#[derive(Clone, Debug)]
pub struct MarkerStyle {
	pub color: Color,
	pub outline: Color,
}

/// Hover tooltip box.
#[derive(Clone, Debug)]
pub struct TooltipStyle {
	pub background: Color,
	pub border: Color,
	pub text: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
	pub marker: MarkerStyle,
	pub tooltip: TooltipStyle,
	pub palette: GroupPalette,
}

impl Theme {
	/// Dark slate theme (default)
	pub fn default_theme() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(24, 30, 42),
				color_secondary: Color::rgb(31, 41, 55),
				use_gradient: true,
				vignette: 0.15,
			},
			edge: EdgeStyle {
				explicit_color: Color::rgb(163, 230, 53),
				generated_color: Color::rgb(153, 153, 153),
				label_color: Color::rgb(209, 213, 219),
			},
			node: NodeStyle {
				use_gradient: true,
				border_color: Color::rgb(31, 41, 55),
				border_width: 2.0,
				selected_color: Color::rgb(250, 204, 21),
				selected_width: 3.0,
				label_color: Color::rgb(229, 231, 235),
				label_outline: Color::rgb(17, 24, 39),
			},
			marker: MarkerStyle {
				color: Color::rgb(250, 204, 21),
				outline: Color::rgb(17, 24, 39),
			},
			tooltip: TooltipStyle {
				background: Color::rgba(17, 24, 39, 0.95),
				border: Color::rgb(75, 85, 99),
				text: Color::rgb(229, 231, 235),
			},
			palette: GroupPalette::vivid(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn palette_follows_group_number() {
		let palette = GroupPalette::vivid();
		assert_eq!(palette.get(Group::SystemA), palette.colors[0]);
		assert_eq!(palette.get(Group::Bridge), palette.colors[2]);
		assert_eq!(palette.get(Group::Cluster5), palette.colors[4]);
	}

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(236, 72, 153).to_css(), "#ec4899");
		assert_eq!(Color::rgb(0, 0, 0).with_alpha(0.5).to_css(), "rgba(0, 0, 0, 0.5)");
		assert_eq!(Color::rgb(100, 100, 100).lighten(1.0), Color::rgb(255, 255, 255));
		assert_eq!(Color::rgb(100, 100, 100).darken(1.0), Color::rgb(0, 0, 0));
	}
}
