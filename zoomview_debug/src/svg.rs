// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG snapshots of recorded frames.
//!
//! [`frame_to_svg`] turns a [`DrawCommand`] list into a standalone SVG
//! document, which is handy for eyeballing a frame from a failing test.
//! Colour indices map onto a fixed 16-entry palette; `None` colours draw in
//! black.

use std::fmt::Write as _;

use kurbo::{BezPath, Point, Rect};

use zoomview_core::geometry::{DevicePoint, DeviceRect};
use zoomview_core::screen::ColorIndex;

use crate::screen::DrawCommand;

const PALETTE: [&str; 16] = [
    "#ffffff", "#f2d4d4", "#d4f2d4", "#d4d4f2", "#f2f2d4", "#ff0000", "#f2d4f2", "#d4f2f2",
    "#e0e0e0", "#c8e6ff", "#ffe0b2", "#dcedc8", "#f8bbd0", "#d1c4e9", "#b2dfdb", "#fff9c4",
];

fn color_css(color: Option<ColorIndex>) -> &'static str {
    match color {
        Some(ColorIndex(i)) => PALETTE[i as usize % PALETTE.len()],
        None => "#000000",
    }
}

fn to_kurbo(rect: DeviceRect) -> Rect {
    Rect::new(
        f64::from(rect.left),
        f64::from(rect.top),
        f64::from(rect.right),
        f64::from(rect.bottom),
    )
}

fn to_point(p: DevicePoint) -> Point {
    Point::new(f64::from(p.x), f64::from(p.y))
}

fn polyline_path(points: &[DevicePoint]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter().copied().map(to_point);
    if let Some(first) = iter.next() {
        path.move_to(first);
        for p in iter {
            path.line_to(p);
        }
    }
    path
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders recorded draw commands as an SVG document of the given size.
///
/// Commands before the last [`DrawCommand::Blank`] are skipped, so passing a
/// multi-frame recording shows only the final frame.
#[must_use]
pub fn frame_to_svg(commands: &[DrawCommand], width: i32, height: i32) -> String {
    let start = commands
        .iter()
        .rposition(|c| matches!(c, DrawCommand::Blank))
        .map_or(0, |i| i + 1);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(
        svg,
        r##"  <rect x="0" y="0" width="{width}" height="{height}" fill="#ffffff"/>"##
    );

    for command in &commands[start..] {
        match command {
            DrawCommand::Blank => {}
            DrawCommand::Rect {
                rect,
                fill,
                outline,
                thickness,
            } => {
                let r = to_kurbo(*rect);
                let _ = write!(
                    svg,
                    r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
                    r.x0,
                    r.y0,
                    r.width(),
                    r.height(),
                    color_css(*fill),
                );
                if *thickness > 0 {
                    let _ = write!(
                        svg,
                        r#" stroke="{}" stroke-width="{thickness}""#,
                        color_css(*outline),
                    );
                }
                let _ = writeln!(svg, "/>");
            }
            DrawCommand::Label {
                text,
                rect,
                font_size,
                left,
                ..
            } => {
                let center = to_kurbo(*rect).center();
                let _ = writeln!(
                    svg,
                    r#"  <text x="{left}" y="{}" font-size="{font_size}" dominant-baseline="middle">{}</text>"#,
                    center.y,
                    escape(text),
                );
            }
            DrawCommand::Polyline {
                points,
                width: line_width,
                color,
            } => {
                let _ = writeln!(
                    svg,
                    r#"  <path d="{}" fill="none" stroke="{}" stroke-width="{line_width}"/>"#,
                    polyline_path(points).to_svg(),
                    color_css(*color),
                );
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(left: i32, top: i32, right: i32, bottom: i32) -> DeviceRect {
        DeviceRect {
            left,
            top,
            right,
            bottom,
        }
    }

    #[test]
    fn empty_frame_is_a_blank_canvas() {
        let svg = frame_to_svg(&[], 200, 100);
        assert!(svg.starts_with("<svg"), "got: {svg}");
        assert!(svg.contains(r#"width="200""#), "got: {svg}");
        assert!(svg.trim_end().ends_with("</svg>"), "got: {svg}");
    }

    #[test]
    fn rects_labels_and_lines_are_emitted() {
        let commands = vec![
            DrawCommand::Blank,
            DrawCommand::Rect {
                rect: rect(10, 20, 110, 70),
                fill: Some(ColorIndex(2)),
                outline: None,
                thickness: 1,
            },
            DrawCommand::Label {
                text: "a<b".to_owned(),
                rect: rect(10, 20, 110, 70),
                min_left: 0,
                font_size: 14,
                left: 11,
                right: 32,
            },
            DrawCommand::Polyline {
                points: vec![DevicePoint::new(5, 0), DevicePoint::new(5, 100)],
                width: 1,
                color: Some(ColorIndex::CROSSHAIR),
            },
        ];
        let svg = frame_to_svg(&commands, 200, 100);
        assert!(
            svg.contains(r##"<rect x="10" y="20" width="100" height="50" fill="#d4f2d4""##),
            "got: {svg}"
        );
        assert!(svg.contains(r#"stroke-width="1""#), "got: {svg}");
        assert!(svg.contains("a&lt;b"), "got: {svg}");
        assert!(svg.contains(r#"<path d="M5"#), "got: {svg}");
        assert!(svg.contains("#ff0000"), "got: {svg}");
    }

    #[test]
    fn only_last_frame_is_drawn() {
        let first = DrawCommand::Rect {
            rect: rect(0, 0, 1, 1),
            fill: Some(ColorIndex(3)),
            outline: None,
            thickness: 0,
        };
        let svg = frame_to_svg(&[DrawCommand::Blank, first, DrawCommand::Blank], 10, 10);
        assert!(!svg.contains("#d4d4f2"), "got: {svg}");
    }
}
