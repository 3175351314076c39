//! Legend geometry for fire duration (color) and fire size (radius).

use foundation::color::{ColorRamp, Rgb};
use foundation::math::Vec2;

use crate::fires::DURATION_DOMAIN_DAYS;
use crate::scale::{LinearScale, SqrtScale};
use crate::tooltip::format_en_us;

pub const DURATION_LEGEND_TITLE: &str = "Fire Duration (days)";
pub const SIZE_LEGEND_TITLE: &str = "Fire Size";

pub const GRADIENT_ID: &str = "color-gradient";
const GRADIENT_STOPS: u32 = 100;

const DURATION_TICKS: [f64; 7] = [0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0];
const SIZE_LEGEND_ACRES: [f64; 3] = [10_000.0, 100_000.0, 500_000.0];
const SIZE_LEGEND_SPACING: f64 = 40.0;
const SIZE_LEGEND_RIGHT_MARGIN: f64 = 130.0;
const SIZE_LEGEND_TOP: f64 = 50.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GradientStop {
    pub offset_percent: u32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub x: f64,
    pub label: String,
}

/// Horizontal gradient bar with a labelled axis underneath.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationLegend {
    pub title: &'static str,
    /// Baseline of the title text.
    pub title_position: Vec2,
    /// Top-left corner of the gradient bar.
    pub origin: Vec2,
    pub width: f64,
    pub height: f64,
    pub bar_stroke: &'static str,
    pub stops: Vec<GradientStop>,
    /// Vertical position of the axis line, just below the bar.
    pub axis_y: f64,
    pub ticks: Vec<AxisTick>,
}

impl DurationLegend {
    pub fn new(ramp: &ColorRamp) -> Self {
        let origin = Vec2::new(40.0, 30.0);
        let (width, height) = (260.0, 12.0);
        let axis = LinearScale::new(DURATION_DOMAIN_DAYS, [origin.x, origin.x + width]);

        let stops = (0..=GRADIENT_STOPS)
            .map(|i| GradientStop {
                offset_percent: i,
                color: ramp.sample(i as f64 / GRADIENT_STOPS as f64),
            })
            .collect();

        let ticks = DURATION_TICKS
            .iter()
            .map(|&value| AxisTick {
                value,
                x: axis.apply(value),
                label: format!("{value} days"),
            })
            .collect();

        Self {
            title: DURATION_LEGEND_TITLE,
            title_position: Vec2::new(origin.x, origin.y - 10.0),
            origin,
            width,
            height,
            bar_stroke: "#ccc",
            stops,
            axis_y: origin.y + height,
            ticks,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizeLegendEntry {
    pub acres: f64,
    /// Circle center relative to the legend origin.
    pub center: Vec2,
    pub radius: f64,
    pub label_position: Vec2,
    pub label: String,
}

/// Reference circles stacked vertically near the top-right corner.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeLegend {
    pub title: &'static str,
    pub origin: Vec2,
    /// Relative to `origin`.
    pub title_position: Vec2,
    pub entries: Vec<SizeLegendEntry>,
}

impl SizeLegend {
    pub fn new(canvas_width: f64, size: &SqrtScale) -> Self {
        let entries = SIZE_LEGEND_ACRES
            .iter()
            .enumerate()
            .map(|(i, &acres)| {
                let y = i as f64 * SIZE_LEGEND_SPACING;
                SizeLegendEntry {
                    acres,
                    center: Vec2::new(0.0, y),
                    radius: size.apply(acres),
                    label_position: Vec2::new(40.0, y),
                    label: format!("{}k acres", format_en_us(acres / 1000.0)),
                }
            })
            .collect();

        Self {
            title: SIZE_LEGEND_TITLE,
            origin: Vec2::new(canvas_width - SIZE_LEGEND_RIGHT_MARGIN, SIZE_LEGEND_TOP),
            title_position: Vec2::new(0.0, -10.0),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DurationLegend, SizeLegend};
    use crate::fires::{RADIUS_RANGE_PX, SIZE_DOMAIN_ACRES};
    use crate::scale::SqrtScale;
    use foundation::color::{ColorRamp, Rgb};
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;

    #[test]
    fn duration_legend_layout() {
        let legend = DurationLegend::new(&ColorRamp::yl_or_rd());
        assert_eq!(legend.stops.len(), 101);
        assert_eq!(legend.stops[0].color, Rgb::new(255, 255, 204));
        assert_eq!(legend.stops[100].offset_percent, 100);
        assert_eq!(legend.stops[100].color, Rgb::new(128, 0, 38));
        assert_eq!(legend.title_position, Vec2::new(40.0, 20.0));
        assert_eq!(legend.axis_y, 42.0);

        for (i, tick) in legend.ticks.iter().enumerate() {
            let expected = 40.0 + i as f64 * 260.0 / 6.0;
            assert!((tick.x - expected).abs() < 1e-9, "tick {i}");
        }
        assert_eq!(legend.ticks[0].label, "0 days");
        assert_eq!(legend.ticks[6].label, "30 days");
    }

    #[test]
    fn size_legend_layout() {
        let scale = SqrtScale::new(SIZE_DOMAIN_ACRES, RADIUS_RANGE_PX);
        let legend = SizeLegend::new(700.0, &scale);
        assert_eq!(legend.origin, Vec2::new(570.0, 50.0));
        let labels: Vec<&str> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["10k acres", "100k acres", "500k acres"]);
        let ys: Vec<f64> = legend.entries.iter().map(|e| e.center.y).collect();
        assert_eq!(ys, vec![0.0, 40.0, 80.0]);
        assert!((legend.entries[2].radius - 21.213203435596427).abs() < 1e-9);
    }
}
