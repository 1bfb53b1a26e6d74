//! Graph rendering
//!
//! Drawing goes through the small [`Canvas`] trait so the same pass can
//! produce an SVG document or a recorded list of operations. All edges are
//! drawn before any node, so nodes sit on top of edge lines.

use std::f64::consts::PI;
use std::fmt::Write;

use super::{DependencyGraph, GraphNode, NODE_RADIUS, NodeKind, Point};

pub const ARROW_HEAD_LENGTH: f64 = 10.0;
const ARROW_HEAD_SPREAD: f64 = PI / 6.0;
const LABEL_OFFSET: f64 = 40.0;

pub const EDGE_COLOR: &str = "#94a3b8";
pub const MODULE_COLOR: &str = "#3b82f6";
pub const CAPABILITY_COLOR: &str = "#10b981";
const GLYPH_COLOR: &str = "#ffffff";
const LABEL_COLOR: &str = "#334155";

/// Minimal 2-D drawing surface
pub trait Canvas {
    fn line(&mut self, from: Point, to: Point, color: &str);
    fn circle(&mut self, center: Point, radius: f64, color: &str);
    /// Text centered on `at`
    fn text(&mut self, at: Point, text: &str, color: &str);
}

/// Color of a node's circle
pub fn node_color(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Module => MODULE_COLOR,
        NodeKind::Capability => CAPABILITY_COLOR,
    }
}

/// Glyph drawn in the middle of a node
pub fn node_glyph(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Module => "M",
        NodeKind::Capability => "C",
    }
}

/// Draw the whole graph onto `canvas`
pub fn render(graph: &DependencyGraph, canvas: &mut impl Canvas) {
    for edge in graph.edges() {
        // Skip edges where either endpoint is not a node
        if let (Some(from), Some(to)) = (graph.node(&edge.from), graph.node(&edge.to)) {
            draw_edge(canvas, from, to);
        }
    }

    for node in graph.nodes() {
        draw_node(canvas, node);
    }
}

fn draw_edge(canvas: &mut impl Canvas, from: &GraphNode, to: &GraphNode) {
    let start = from.position;
    let end = to.position;
    let angle = (end.y - start.y).atan2(end.x - start.x);

    // Stop at the target's rim so the arrowhead is not hidden by the node
    let tip = Point::new(
        end.x - NODE_RADIUS * angle.cos(),
        end.y - NODE_RADIUS * angle.sin(),
    );

    canvas.line(start, tip, EDGE_COLOR);
    for side in [-ARROW_HEAD_SPREAD, ARROW_HEAD_SPREAD] {
        let barb = Point::new(
            tip.x - ARROW_HEAD_LENGTH * (angle + side).cos(),
            tip.y - ARROW_HEAD_LENGTH * (angle + side).sin(),
        );
        canvas.line(tip, barb, EDGE_COLOR);
    }
}

fn draw_node(canvas: &mut impl Canvas, node: &GraphNode) {
    canvas.circle(node.position, NODE_RADIUS, node_color(node.kind));
    canvas.text(node.position, node_glyph(node.kind), GLYPH_COLOR);
    canvas.text(
        Point::new(node.position.x, node.position.y + LABEL_OFFSET),
        &node.name,
        LABEL_COLOR,
    );
}

/// A recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Line {
        from: Point,
        to: Point,
        color: String,
    },
    Circle {
        center: Point,
        radius: f64,
        color: String,
    },
    Text {
        at: Point,
        text: String,
        color: String,
    },
}

/// Canvas that records operations instead of drawing them
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl Canvas for RecordingCanvas {
    fn line(&mut self, from: Point, to: Point, color: &str) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color: color.to_string(),
        });
    }

    fn circle(&mut self, center: Point, radius: f64, color: &str) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color: color.to_string(),
        });
    }

    fn text(&mut self, at: Point, text: &str, color: &str) {
        self.ops.push(DrawOp::Text {
            at,
            text: text.to_string(),
            color: color.to_string(),
        });
    }
}

/// Canvas producing an SVG document
#[derive(Debug)]
pub struct SvgCanvas {
    view_box: (f64, f64, f64, f64),
    body: String,
}

impl SvgCanvas {
    const MARGIN: f64 = NODE_RADIUS + LABEL_OFFSET + 20.0;

    /// Size the view box so every node and its label fits
    pub fn for_graph(graph: &DependencyGraph) -> Self {
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (0.0f64, 0.0f64, 800.0f64, 600.0f64);
        for node in graph.nodes() {
            min_x = min_x.min(node.position.x - Self::MARGIN);
            min_y = min_y.min(node.position.y - Self::MARGIN);
            max_x = max_x.max(node.position.x + Self::MARGIN);
            max_y = max_y.max(node.position.y + Self::MARGIN);
        }

        Self {
            view_box: (min_x, min_y, max_x - min_x, max_y - min_y),
            body: String::new(),
        }
    }

    pub fn finish(self) -> String {
        let (x, y, w, h) = self.view_box;
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{:.1} {:.1} {:.1} {:.1}\" \
             font-family=\"sans-serif\" font-size=\"12\">\n{}</svg>\n",
            x, y, w, h, self.body
        )
    }
}

impl Canvas for SvgCanvas {
    fn line(&mut self, from: Point, to: Point, color: &str) {
        let _ = writeln!(
            self.body,
            "  <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"2\"/>",
            from.x, from.y, to.x, to.y, color
        );
    }

    fn circle(&mut self, center: Point, radius: f64, color: &str) {
        let _ = writeln!(
            self.body,
            "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"{}\"/>",
            center.x, center.y, radius, color
        );
    }

    fn text(&mut self, at: Point, text: &str, color: &str) {
        let _ = writeln!(
            self.body,
            "  <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>",
            at.x,
            at.y,
            color,
            escape_xml(text)
        );
    }
}

/// Render a graph straight to an SVG document
pub fn to_svg(graph: &DependencyGraph) -> String {
    let mut canvas = SvgCanvas::for_graph(graph);
    render(graph, &mut canvas);
    canvas.finish()
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
