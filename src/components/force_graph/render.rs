use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{ANCHOR_RADIUS, ForceGraphState, NODE_RADIUS};
use super::types::NodeInfo;

const FADE_IN_SECS: f64 = 0.6;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn radius_of(info: &NodeInfo) -> f64 {
	if info.anchor { ANCHOR_RADIUS } else { NODE_RADIUS }
}

fn fade_in(info: &NodeInfo) -> f64 {
	ease_out_cubic((info.age / FADE_IN_SECS).min(1.0))
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (line_width, dash, gap, arrow) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		// self-traffic has nothing to draw
		if dist < 0.001 {
			return;
		}
		let (r1, r2) = (radius_of(&n1.data.user_data), radius_of(&n2.data.user_data));
		let fade = fade_in(&n1.data.user_data).min(fade_in(&n2.data.user_data));

		let lit = state.is_highlighted(n1.index()) && state.is_highlighted(n2.index());
		let (edge_alpha, arrow_alpha, width) = if lit {
			(0.6 + 0.3 * t, 0.8 + 0.1 * t, line_width * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, 0.8 - 0.45 * t, line_width * (1.0 - 0.3 * t))
		};

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.set_stroke_style_str(&format!("rgba(242, 177, 186, {})", edge_alpha * fade));
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * (r2 + arrow), y2 - uy * (r2 + arrow));
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&format!("rgba(242, 177, 186, {})", arrow_alpha * fade));
		draw_arrow_head(ctx, (x2 - ux * r2, y2 - uy * r2), (ux, uy), arrow);
	});
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_arrow_head(
	ctx: &CanvasRenderingContext2d,
	(tip_x, tip_y): (f64, f64),
	(ux, uy): (f64, f64),
	size: f64,
) {
	let (back_x, back_y) = (tip_x - ux * size, tip_y - uy * size);
	let (px, py) = (-uy * size * 0.5, ux * size * 0.5);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
	);

	// dimmed nodes first so the highlighted ones paint on top
	state.graph.visit_nodes(|node| {
		if has_highlight && state.is_highlighted(node.index()) {
			return;
		}
		let info = &node.data.user_data;
		let alpha = (1.0 - 0.7 * t) * fade_in(info);
		let radius = radius_of(info) * (1.0 - 0.15 * t);
		draw_node(state, ctx, (node.x() as f64, node.y() as f64), info, radius, alpha);
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let (pos, info) = ((node.x() as f64, node.y() as f64), &node.data.user_data);
		let hovered = state.is_hovered(idx);
		let base = radius_of(info);
		let (radius, glow, glow_alpha) = if hovered {
			(base * (1.0 + 0.35 * t), base * (1.8 + 1.2 * t), 0.35 * t)
		} else {
			(base * (1.0 + 0.2 * t), base * (1.4 + 0.6 * t), 0.2 * t)
		};
		if t > 0.01 {
			draw_glow(ctx, pos, radius, glow, glow_alpha);
		}
		draw_node(state, ctx, pos, info, radius, 1.0);
		if hovered && t > 0.01 {
			draw_ring(state, ctx, pos, radius, 0.7 * t);
			// full router hash under the short label
			let k = state.transform.k;
			ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", 0.6 * t));
			let _ = ctx.fill_text(&info.id, pos.0 + radius + 3.0, pos.1 + 3.0 + 12.0 / k.max(0.5));
		}
	});
}

fn draw_node(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	(x, y): (f64, f64),
	info: &NodeInfo,
	radius: f64,
	alpha: f64,
) {
	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(info.color);
	ctx.fill();
	ctx.set_global_alpha(1.0);

	if info.anchor {
		draw_ring(state, ctx, (x, y), radius, alpha * 0.8);
	}

	let k = state.transform.k;
	ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.8));
	ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
	let _ = ctx.fill_text(&info.label, x + radius + 3.0, y + 3.0);
}

fn draw_ring(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	(x, y): (f64, f64),
	radius: f64,
	alpha: f64,
) {
	let k = state.transform.k;
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", alpha));
	ctx.set_line_width(1.5 / k);
	ctx.stroke();
}

fn draw_glow(
	ctx: &CanvasRenderingContext2d,
	(x, y): (f64, f64),
	radius: f64,
	glow: f64,
	alpha: f64,
) {
	let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
	let _ = gradient.add_color_stop(0.6, &format!("rgba(242, 177, 186, {})", alpha * 0.3));
	let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
	ctx.begin_path();
	let _ = ctx.arc(x, y, glow, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}
