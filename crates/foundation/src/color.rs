/// 8-bit sRGB color.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `rrggbb` or `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// CSS functional notation, e.g. `rgb(255, 255, 204)`.
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    fn from_channels(c: [f64; 3]) -> Self {
        Self::new(to_channel(c[0]), to_channel(c[1]), to_channel(c[2]))
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

// Round half up, clamp, NaN -> 0.
fn to_channel(v: f64) -> u8 {
    let v = (v + 0.5).floor();
    if v.is_nan() {
        0
    } else {
        v.clamp(0.0, 255.0) as u8
    }
}

/// Nine-class yellow-orange-red sequential scheme.
pub const YL_OR_RD: [&str; 9] = [
    "ffffcc", "ffeda0", "fed976", "feb24c", "fd8d3c", "fc4e2a", "e31a1c", "bd0026", "800026",
];

/// Continuous color ramp through a list of control colors.
///
/// Each channel follows a uniform cubic B-spline through the control points,
/// so the ramp is smooth but does not pass exactly through the inner colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    channels: [Vec<f64>; 3],
}

impl ColorRamp {
    pub fn new(colors: &[Rgb]) -> Self {
        let mut channels: [Vec<f64>; 3] = Default::default();
        for c in colors {
            channels[0].push(c.r as f64);
            channels[1].push(c.g as f64);
            channels[2].push(c.b as f64);
        }
        Self { channels }
    }

    /// Builds a ramp from hex strings, skipping unparseable entries.
    pub fn from_hex(colors: &[&str]) -> Self {
        let parsed: Vec<Rgb> = colors.iter().filter_map(|h| Rgb::from_hex(h)).collect();
        Self::new(&parsed)
    }

    pub fn yl_or_rd() -> Self {
        Self::from_hex(&YL_OR_RD)
    }

    /// Samples the ramp at `t`, clamped to `[0, 1]`.
    pub fn sample(&self, t: f64) -> Rgb {
        Rgb::from_channels([
            basis_spline(&self.channels[0], t),
            basis_spline(&self.channels[1], t),
            basis_spline(&self.channels[2], t),
        ])
    }
}

fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

fn basis_spline(values: &[f64], t: f64) -> f64 {
    match values.len() {
        0 => return f64::NAN,
        1 => return values[0],
        _ => {}
    }

    let n = values.len() - 1;
    let (t, i) = if t.is_nan() || t <= 0.0 {
        (0.0, 0)
    } else if t >= 1.0 {
        (1.0, n - 1)
    } else {
        (t, ((t * n as f64).floor() as usize).min(n - 1))
    };

    let v1 = values[i];
    let v2 = values[i + 1];
    let v0 = if i > 0 { values[i - 1] } else { 2.0 * v1 - v2 };
    let v3 = if i < n - 1 {
        values[i + 2]
    } else {
        2.0 * v2 - v1
    };
    basis((t - i as f64 / n as f64) * n as f64, v0, v1, v2, v3)
}

#[cfg(test)]
mod tests {
    use super::{ColorRamp, Rgb};

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#800026"), Some(Rgb::new(128, 0, 38)));
        assert_eq!(Rgb::from_hex("ffffcc"), Some(Rgb::new(255, 255, 204)));
        assert_eq!(Rgb::from_hex("fff"), None);
        assert_eq!(Rgb::from_hex("zzzzzz"), None);
    }

    #[test]
    fn ramp_endpoints_match_spline_ends() {
        let ramp = ColorRamp::yl_or_rd();
        // The clamped B-spline ends on the first and last control colors.
        assert_eq!(ramp.sample(0.0), Rgb::new(255, 255, 204));
        assert_eq!(ramp.sample(1.0), Rgb::new(128, 0, 38));
        assert_eq!(ramp.sample(-3.0), ramp.sample(0.0));
        assert_eq!(ramp.sample(7.0), ramp.sample(1.0));
    }

    #[test]
    fn ramp_darkens_monotonically_in_green() {
        let ramp = ColorRamp::yl_or_rd();
        let mut last = 256u16;
        for i in 0..=20 {
            let g = ramp.sample(i as f64 / 20.0).g as u16;
            assert!(g <= last, "green channel should not increase");
            last = g;
        }
    }

    #[test]
    fn css_format() {
        assert_eq!(Rgb::new(1, 2, 3).to_css(), "rgb(1, 2, 3)");
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "rgb(1, 2, 3)");
    }
}
