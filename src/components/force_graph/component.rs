use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::SharedGraph;

const FRAME_DT: f32 = 0.016;

fn viewport(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Pointer position relative to the canvas.
fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas drawing the shared traffic graph, animating until unmounted.
#[component]
pub fn ForceGraphCanvas(
	graph: SharedGraph,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let graph_init = graph.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window to draw the traffic graph in");
			return;
		};

		let (w, h) = match (fullscreen, viewport(&window)) {
			(true, Some(size)) => size,
			_ => {
				let parent = canvas.parent_element();
				let parent_size = |fallback: f64, pick: fn(&web_sys::Element) -> i32| {
					parent.as_ref().map_or(fallback, |p| pick(p) as f64)
				};
				(
					width.unwrap_or_else(|| parent_size(800.0, web_sys::Element::client_width)),
					height.unwrap_or_else(|| parent_size(600.0, web_sys::Element::client_height)),
				)
			}
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		graph_init.borrow_mut().fit_viewport(w, h);

		let Some(ctx) = context_2d(&canvas) else {
			error!("canvas has no 2d context");
			return;
		};

		if fullscreen {
			let (graph_resize, canvas_resize) = (graph_init.clone(), canvas.clone());
			*resize_cb.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				graph_resize.borrow_mut().fit_viewport(nw, nh);
			}));
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (graph_anim, animate_inner) = (graph_init.clone(), animate.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			{
				let mut state = graph_anim.borrow_mut();
				state.tick(FRAME_DT);
				render::render(&state, &ctx);
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let graph_md = graph.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let mut guard = graph_md.borrow_mut();
		let s = &mut *guard;
		let grabbed = s
			.node_at_position(x, y)
			.and_then(|idx| Some((idx, s.node_position(idx)?)));
		if let Some((idx, (nx, ny))) = grabbed {
			s.drag.node_idx = Some(idx);
			s.drag.start_x = x;
			s.drag.start_y = y;
			s.drag.node_start_x = nx;
			s.drag.node_start_y = ny;
		} else {
			s.pan.active = true;
			s.pan.start_x = x;
			s.pan.start_y = y;
			s.pan.transform_start_x = s.transform.x;
			s.pan.transform_start_y = s.transform.y;
		}
	};

	let graph_mm = graph.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let mut guard = graph_mm.borrow_mut();
		let s = &mut *guard;
		if let Some(idx) = s.drag.node_idx {
			let k = s.transform.k;
			let nx = s.drag.node_start_x + ((x - s.drag.start_x) / k) as f32;
			let ny = s.drag.node_start_y + ((y - s.drag.start_y) / k) as f32;
			s.pin_node(idx, nx, ny);
			return;
		}
		let hovered = s.node_at_position(x, y);
		s.set_hover(hovered);
		if s.pan.active {
			s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
			s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
		}
	};

	let graph_mu = graph.clone();
	let on_mouseup = move |_: MouseEvent| {
		let mut s = graph_mu.borrow_mut();
		s.drag.node_idx = None;
		s.pan.active = false;
	};

	let graph_ml = graph.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let mut s = graph_ml.borrow_mut();
		s.drag.node_idx = None;
		s.pan.active = false;
		s.set_hover(None);
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let mut guard = graph.borrow_mut();
		let s = &mut *guard;
		let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
		let new_k = (s.transform.k * factor).clamp(0.05, 10.0);
		let ratio = new_k / s.transform.k;
		s.transform.x = x - (x - s.transform.x) * ratio;
		s.transform.y = y - (y - s.transform.y) * ratio;
		s.transform.k = new_k;
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
