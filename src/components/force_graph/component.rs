//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, selection, panning, and zooming. An animation
//! loop runs via `requestAnimationFrame`, stepping the physics simulation and
//! the opacity fades before rendering each frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::scale::{MAX_ZOOM, MIN_ZOOM, ScaleConfig};
use super::state::{CLICK_TOLERANCE, ForceGraphState};
use super::theme::Theme;
use super::types::GraphView;

/// Bundles graph simulation state with visual configuration.
struct GraphContext {
	state: ForceGraphState,
	scale: ScaleConfig,
	theme: Theme,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Size of the parent container, which the canvas fills.
fn canvas_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map_or((800.0, 600.0), |p| (p.client_width() as f64, p.client_height() as f64))
}

/// Canvas-relative pointer position.
fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders an interactive force-directed graph on a canvas element.
///
/// Pass the projected graph via the reactive `view` signal; opacity-only
/// changes ease in place while changes to the visible set rebuild the layout.
/// A click on a node (a press without dragging) reports its id through
/// `on_node_click`. The canvas sizes itself to its parent container and
/// follows window resizes.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] view: Signal<GraphView>,
	#[prop(into)] on_node_click: Callback<String>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = canvas_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("keyword-graph: 2d canvas context unavailable");
				return;
			}
		};

		let theme = Theme::default();
		*context_init.borrow_mut() = Some(GraphContext {
			state: ForceGraphState::new(&view.get_untracked(), w, h, &theme),
			scale: ScaleConfig::default(),
			theme,
		});

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = canvas_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.state.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let dt = 0.016;
				c.state.tick(dt);
				if let Err(e) = render::render(&c.state, &ctx, &c.scale, &c.theme) {
					debug!("keyword-graph: frame skipped: {:?}", e);
				}
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_sync = context.clone();
	Effect::new(move |_| {
		let next = view.get();
		if let Some(ref mut c) = *context_sync.borrow_mut() {
			c.state.sync(&next, &c.theme);
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			if let Some(idx) = c.state.node_at_position(x, y, &c.scale) {
				let state = &mut c.state;
				state.drag.active = true;
				state.drag.moved = false;
				state.drag.node_idx = Some(idx);
				state.drag.start_x = x;
				state.drag.start_y = y;
				let drag = &mut state.drag;
				state.graph.visit_nodes(|node| {
					if node.index() == idx {
						drag.node_start_x = node.x();
						drag.node_start_y = node.y();
					}
				});
			} else {
				c.state.pan.active = true;
				c.state.pan.start_x = x;
				c.state.pan.start_y = y;
				c.state.pan.transform_start_x = c.state.transform.x;
				c.state.pan.transform_start_y = c.state.transform.y;
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if !c.state.drag.active {
				let hovered = c.state.node_at_position(x, y, &c.scale);
				c.state.set_hover(hovered);
			}

			if c.state.drag.active {
				let (sx, sy) = (x - c.state.drag.start_x, y - c.state.drag.start_y);
				if !c.state.drag.moved && (sx * sx + sy * sy).sqrt() < CLICK_TOLERANCE {
					return;
				}
				c.state.drag.moved = true;
				if let Some(idx) = c.state.drag.node_idx {
					let k = c.state.transform.k;
					let (nx, ny) = (
						c.state.drag.node_start_x + (sx / k) as f32,
						c.state.drag.node_start_y + (sy / k) as f32,
					);
					c.state.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if c.state.pan.active {
				c.state.transform.x = c.state.pan.transform_start_x + (x - c.state.pan.start_x);
				c.state.transform.y = c.state.pan.transform_start_y + (y - c.state.pan.start_y);
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = {
			let mut guard = context_mu.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};
			let clicked = match c.state.drag.node_idx {
				Some(idx) if c.state.drag.active && !c.state.drag.moved => c.state.node_id(idx),
				_ => None,
			};
			if let Some(idx) = c.state.drag.node_idx {
				c.state.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.is_anchor = false;
					}
				});
			}
			c.state.drag = Default::default();
			c.state.pan.active = false;
			clicked
		};
		// Run outside the borrow: the handler feeds back into `view`.
		if let Some(id) = clicked {
			on_node_click.run(id);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			if let Some(idx) = c.state.drag.node_idx {
				c.state.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.is_anchor = false;
					}
				});
			}
			c.state.drag = Default::default();
			c.state.pan.active = false;
			c.state.set_hover(None);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (c.state.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
			let ratio = new_k / c.state.transform.k;
			c.state.transform.x = x - (x - c.state.transform.x) * ratio;
			c.state.transform.y = y - (y - c.state.transform.y) * ratio;
			c.state.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
