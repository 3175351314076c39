//! Static SVG snapshot of the map: boundary, fire circles and legends.

use std::fmt::Write;

use crate::boundary::coord;
use crate::fires::VisibleFire;
use crate::legend::{DurationLegend, GRADIENT_ID, SizeLegend};
use crate::symbology::{BoundaryStyle, CircleStyle, LegendCircleStyle};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Length of the axis tick marks below the duration legend.
const TICK_SIZE: f64 = 6.0;

#[derive(Debug, Clone)]
pub struct MapSvg<'a> {
    pub width: f64,
    pub height: f64,
    pub heading: Option<&'a str>,
    pub boundary_path: &'a str,
    pub fires: &'a [VisibleFire],
    pub duration_legend: &'a DurationLegend,
    pub size_legend: &'a SizeLegend,
}

impl MapSvg<'_> {
    pub fn render(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="{SVG_NS}" viewBox="0 0 {} {}" width="{}" height="{}" style="border: 1px solid #ccc">"#,
            self.width, self.height, self.width, self.height
        );
        if let Some(heading) = self.heading {
            let _ = writeln!(
                svg,
                r#"  <title>{}</title>"#,
                escape_text(heading)
            );
        }

        let boundary = BoundaryStyle::default();
        let _ = writeln!(
            svg,
            r#"  <path fill="{}" stroke="{}" d="{}"/>"#,
            boundary.fill, boundary.stroke, self.boundary_path
        );

        let circle = CircleStyle::default();
        svg.push_str("  <g>\n");
        for fire in self.fires {
            let _ = writeln!(
                svg,
                r#"    <circle data-key="{}" cx="{}" cy="{}" r="{}" fill="{}" fill-opacity="{}" stroke="{}" stroke-width="{}" style="cursor: {}"/>"#,
                escape_text(fire.key.as_str()),
                coord(fire.position.x),
                coord(fire.position.y),
                coord(fire.radius),
                fire.color,
                circle.fill_opacity,
                circle.stroke,
                circle.stroke_width,
                circle.cursor
            );
        }
        svg.push_str("  </g>\n");

        svg.push_str(&render_duration_legend(self.duration_legend));
        svg.push_str(&render_size_legend(self.size_legend));
        svg.push_str("</svg>\n");
        svg
    }
}

/// Gradient definition, title, bar and axis of the duration legend.
pub fn render_duration_legend(legend: &DurationLegend) -> String {
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"  <defs><linearGradient id="{GRADIENT_ID}" x1="0%" x2="100%">"#
    );
    for stop in &legend.stops {
        let _ = writeln!(
            svg,
            r#"    <stop offset="{}%" stop-color="{}"/>"#,
            stop.offset_percent, stop.color
        );
    }
    svg.push_str("  </linearGradient></defs>\n");

    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="{}" font-size="12px" font-weight="bold">{}</text>"#,
        coord(legend.title_position.x),
        coord(legend.title_position.y),
        escape_text(legend.title)
    );
    let _ = writeln!(
        svg,
        r#"  <rect x="{}" y="{}" width="{}" height="{}" stroke="{}" style="fill: url(#{GRADIENT_ID})"/>"#,
        coord(legend.origin.x),
        coord(legend.origin.y),
        coord(legend.width),
        coord(legend.height),
        legend.bar_stroke
    );

    let _ = writeln!(
        svg,
        r#"  <g transform="translate(0, {})" font-size="10" text-anchor="middle">"#,
        coord(legend.axis_y)
    );
    if let (Some(first), Some(last)) = (legend.ticks.first(), legend.ticks.last()) {
        let _ = writeln!(
            svg,
            r#"    <path fill="none" stroke="currentColor" d="M{},{}V0H{}V{}"/>"#,
            coord(first.x),
            TICK_SIZE,
            coord(last.x),
            TICK_SIZE
        );
    }
    for tick in &legend.ticks {
        let _ = writeln!(
            svg,
            r#"    <g transform="translate({}, 0)"><line stroke="currentColor" y2="{TICK_SIZE}"/><text fill="currentColor" y="9" dy="0.71em" style="font-size: 10px">{}</text></g>"#,
            coord(tick.x),
            escape_text(&tick.label)
        );
    }
    svg.push_str("  </g>\n");
    svg
}

pub fn render_size_legend(legend: &SizeLegend) -> String {
    let style = LegendCircleStyle::default();
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"  <g transform="translate({}, {})">"#,
        coord(legend.origin.x),
        coord(legend.origin.y)
    );
    for entry in &legend.entries {
        let _ = writeln!(
            svg,
            r#"    <circle cx="{}" cy="{}" r="{}" fill="{}" stroke="{}"/>"#,
            coord(entry.center.x),
            coord(entry.center.y),
            coord(entry.radius),
            style.fill,
            style.stroke
        );
        let _ = writeln!(
            svg,
            r#"    <text x="{}" y="{}" alignment-baseline="middle" font-size="11px">{}</text>"#,
            coord(entry.label_position.x),
            coord(entry.label_position.y),
            escape_text(&entry.label)
        );
    }
    let _ = writeln!(
        svg,
        r#"    <text x="{}" y="{}" font-size="12px" font-weight="bold">{}</text>"#,
        coord(legend.title_position.x),
        coord(legend.title_position.y),
        escape_text(legend.title)
    );
    svg.push_str("  </g>\n");
    svg
}

/// Escapes text content and attribute values.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
