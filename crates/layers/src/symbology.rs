/// Presentation attributes of a fire circle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CircleStyle {
    pub fill_opacity: f64,
    pub stroke: &'static str,
    pub stroke_width: f64,
    pub cursor: &'static str,
}

impl CircleStyle {
    pub const fn new(
        fill_opacity: f64,
        stroke: &'static str,
        stroke_width: f64,
        cursor: &'static str,
    ) -> Self {
        Self {
            fill_opacity,
            stroke,
            stroke_width,
            cursor,
        }
    }
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self::new(0.85, "#333", 0.3, "pointer")
    }
}

/// Fill and stroke of the state outline.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundaryStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
}

impl Default for BoundaryStyle {
    fn default() -> Self {
        Self {
            fill: "#f0f0f0",
            stroke: "#888",
        }
    }
}

/// Outline-only circles in the size legend.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LegendCircleStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
}

impl Default for LegendCircleStyle {
    fn default() -> Self {
        Self {
            fill: "none",
            stroke: "#555",
        }
    }
}
