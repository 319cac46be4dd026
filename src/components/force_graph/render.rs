//! Canvas rendering for the force graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Link lines, then relationship labels (world space)
//! 3. Dimmed nodes, then opaque nodes on top, each with its label and marker
//! 4. Vignette and hover tooltip (screen space)

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{ForceGraphState, NodeInfo};
use super::theme::Theme;

type Node = force_graph::Node<NodeInfo>;

/// Below this an element is not worth a draw call.
const MIN_VISIBLE_ALPHA: f64 = 0.01;

/// Renders the complete graph to the canvas.
pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) -> Result<(), JsValue> {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme)?;

	ctx.save();
	ctx.translate(state.transform.x, state.transform.y)?;
	ctx.scale(state.transform.k, state.transform.k)?;

	draw_links(state, ctx, &scale, theme);
	draw_link_labels(state, ctx, &scale, theme)?;
	draw_nodes(state, ctx, &scale, theme)?;

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(state, ctx, theme)?;
	}
	draw_tooltip(state, ctx, &scale, theme)
}

fn draw_background(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
) -> Result<(), JsValue> {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	if theme.background.use_gradient {
		let gradient =
			ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, state.width.max(state.height) * 0.8)?;
		gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css())?;
		gradient.add_color_stop(1.0, &theme.background.color.to_css())?;
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&theme.background.color.to_css());
	}
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	Ok(())
}

fn draw_vignette(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
) -> Result<(), JsValue> {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let gradient = ctx.create_radial_gradient(
		cx,
		cy,
		state.width.min(state.height) * 0.3,
		cx,
		cy,
		state.width.max(state.height) * 0.7,
	)?;
	gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)")?;
	gradient.add_color_stop(1.0, &format!("rgba(0, 0, 0, {})", theme.background.vignette))?;
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	Ok(())
}

fn draw_links(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	state.graph.visit_edges(|n1, n2, edge| {
		let i = edge.user_data.link;
		let Some(view_link) = state.view.links.get(i) else {
			return;
		};
		let alpha = state.emphasis.link_alpha(i);
		if alpha < MIN_VISIBLE_ALPHA {
			return;
		}

		let color = theme.edge.color(view_link.link.kind);
		ctx.set_stroke_style_str(&color.with_alpha(alpha).to_css());
		ctx.set_line_width(scale.edge_width(view_link.link.strength));
		ctx.begin_path();
		ctx.move_to(n1.x() as f64, n1.y() as f64);
		ctx.line_to(n2.x() as f64, n2.y() as f64);
		ctx.stroke();
	});
}

/// Relationship labels sit at each link's midpoint, rotated to follow it and
/// kept upright.
fn draw_link_labels(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) -> Result<(), JsValue> {
	if scale.edge_label_alpha < MIN_VISIBLE_ALPHA {
		return Ok(());
	}
	ctx.set_font(&scale.edge_label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	let mut result = Ok(());
	state.graph.visit_edges(|n1, n2, edge| {
		if result.is_err() {
			return;
		}
		let i = edge.user_data.link;
		let Some(view_link) = state.view.links.get(i) else {
			return;
		};
		let alpha = state.emphasis.label_alpha(i) * scale.edge_label_alpha;
		if view_link.link.label.is_empty() || alpha < MIN_VISIBLE_ALPHA {
			return;
		}
		result = draw_rotated_label(ctx, n1, n2, &view_link.link.label, || {
			ctx.set_fill_style_str(&theme.edge.label_color.with_alpha(alpha).to_css());
		});
	});
	result
}

fn draw_rotated_label(
	ctx: &CanvasRenderingContext2d,
	n1: &Node,
	n2: &Node,
	text: &str,
	style: impl FnOnce(),
) -> Result<(), JsValue> {
	let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
	let mut angle = (y2 - y1).atan2(x2 - x1);
	if angle > PI / 2.0 {
		angle -= PI;
	} else if angle < -PI / 2.0 {
		angle += PI;
	}

	ctx.save();
	ctx.translate((x1 + x2) / 2.0, (y1 + y2) / 2.0)?;
	ctx.rotate(angle)?;
	style();
	let drawn = ctx.fill_text(text, 0.0, 0.0);
	ctx.restore();
	drawn
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) -> Result<(), JsValue> {
	// Dimmed nodes first so emphasised ones are never hidden behind them.
	let mut result = Ok(());
	for front in [false, true] {
		state.graph.visit_nodes(|node| {
			if result.is_err() {
				return;
			}
			let alpha = state.emphasis.node_alpha(node.index());
			if (alpha >= 0.5) != front || alpha < MIN_VISIBLE_ALPHA {
				return;
			}
			result = draw_node(state, ctx, node, scale, theme, alpha);
		});
	}
	ctx.set_global_alpha(1.0);
	result
}

fn draw_node(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	node: &Node,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
) -> Result<(), JsValue> {
	let info = &node.data.user_data;
	let (x, y) = (node.x() as f64, node.y() as f64);
	let radius = scale.node_radius(info.weight);

	ctx.set_global_alpha(alpha);

	ctx.begin_path();
	ctx.arc(x, y, radius, 0.0, 2.0 * PI)?;
	if theme.node.use_gradient {
		let gradient =
			ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)?;
		gradient.add_color_stop(0.0, &info.color.lighten(0.4).to_css())?;
		gradient.add_color_stop(0.7, &info.color.to_css())?;
		gradient.add_color_stop(1.0, &info.color.darken(0.2).to_css())?;
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&info.color.to_css());
	}
	ctx.fill();

	let (border, width) = if state.is_selected(info) {
		(theme.node.selected_color, theme.node.selected_width)
	} else {
		(theme.node.border_color, theme.node.border_width)
	};
	if width > 0.0 {
		ctx.set_stroke_style_str(&border.to_css());
		ctx.set_line_width(scale.screen_px(width));
		ctx.stroke();
	}

	if info.common {
		draw_marker(ctx, x, y - radius - scale.marker_offset, scale, theme)?;
	}

	// Label below the node with a halo for legibility over links.
	ctx.set_font(&scale.label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let label_y = y + radius + scale.label_gap;
	ctx.set_line_width(scale.screen_px(3.0));
	ctx.set_stroke_style_str(&theme.node.label_outline.to_css());
	ctx.stroke_text(&info.id, x, label_y)?;
	ctx.set_fill_style_str(&theme.node.label_color.to_css());
	ctx.fill_text(&info.id, x, label_y)
}

/// Five-pointed star marking a keyword both systems share.
fn draw_marker(
	ctx: &CanvasRenderingContext2d,
	cx: f64,
	cy: f64,
	scale: &ScaledValues,
	theme: &Theme,
) -> Result<(), JsValue> {
	let outer = scale.marker_size;
	let inner = outer * 0.45;

	ctx.begin_path();
	for i in 0..10 {
		let r = if i % 2 == 0 { outer } else { inner };
		let angle = -PI / 2.0 + i as f64 * PI / 5.0;
		let (px, py) = (cx + r * angle.cos(), cy + r * angle.sin());
		if i == 0 {
			ctx.move_to(px, py);
		} else {
			ctx.line_to(px, py);
		}
	}
	ctx.close_path();
	ctx.set_fill_style_str(&theme.marker.color.to_css());
	ctx.fill();
	ctx.set_stroke_style_str(&theme.marker.outline.to_css());
	ctx.set_line_width(scale.screen_px(1.0));
	ctx.stroke();
	Ok(())
}

/// Keyword, weight and group of the hovered node, drawn in screen space.
fn draw_tooltip(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) -> Result<(), JsValue> {
	let alpha = state.emphasis.tooltip_alpha();
	let Some(idx) = state.emphasis.tooltip_node else {
		return Ok(());
	};
	if alpha < MIN_VISIBLE_ALPHA {
		return Ok(());
	}

	let mut anchor = None;
	state.graph.visit_nodes(|node| {
		if node.index() == idx {
			let info = &node.data.user_data;
			anchor = Some((
				node.x() as f64,
				node.y() as f64,
				info.weight,
				vec![
					info.id.clone(),
					format!("Weight: {}", info.weight),
					format!("Group: {}", info.group),
				],
			));
		}
	});
	let Some((gx, gy, weight, lines)) = anchor else {
		return Ok(());
	};

	let sx = gx * state.transform.k + state.transform.x;
	let sy = gy * state.transform.k + state.transform.y;
	let radius_px = scale.node_radius(weight) * state.transform.k;

	const PADDING: f64 = 8.0;
	const LINE_HEIGHT: f64 = 16.0;
	ctx.set_font("12px sans-serif");
	let mut text_width: f64 = 0.0;
	for line in &lines {
		text_width = text_width.max(ctx.measure_text(line)?.width());
	}
	let box_w = text_width + PADDING * 2.0;
	let box_h = LINE_HEIGHT * lines.len() as f64 + PADDING * 2.0 - 4.0;

	// Right of the node, flipped inside the canvas when it would overflow.
	let mut bx = sx + radius_px + 10.0;
	if bx + box_w > state.width {
		bx = sx - radius_px - 10.0 - box_w;
	}
	let by = (sy - box_h / 2.0).clamp(0.0, (state.height - box_h).max(0.0));

	ctx.set_global_alpha(alpha);
	ctx.set_fill_style_str(&theme.tooltip.background.to_css());
	ctx.fill_rect(bx, by, box_w, box_h);
	ctx.set_stroke_style_str(&theme.tooltip.border.to_css());
	ctx.set_line_width(1.0);
	ctx.stroke_rect(bx, by, box_w, box_h);

	ctx.set_fill_style_str(&theme.tooltip.text.to_css());
	ctx.set_text_align("left");
	ctx.set_text_baseline("top");
	for (i, line) in lines.iter().enumerate() {
		ctx.fill_text(line, bx + PADDING, by + PADDING + i as f64 * LINE_HEIGHT)?;
	}
	ctx.set_global_alpha(1.0);
	Ok(())
}
