//! Continuous scales mapping data values to visual channels.

use foundation::color::{ColorRamp, Rgb};

/// Linear interpolation between a numeric domain and range. Not clamped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearScale {
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

impl LinearScale {
    pub const fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let t = normalize(self.domain, value);
        self.range[0] + t * (self.range[1] - self.range[0])
    }
}

/// Square-root scale: linear in `sqrt(value)`, so circle area grows
/// linearly with the value. Negative input maps through `-sqrt(-value)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SqrtScale {
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

impl SqrtScale {
    pub const fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let domain = [signed_sqrt(self.domain[0]), signed_sqrt(self.domain[1])];
        let t = normalize(domain, signed_sqrt(value));
        self.range[0] + t * (self.range[1] - self.range[0])
    }
}

/// Maps a numeric domain onto a color ramp. Values outside the domain take
/// the nearest end color.
#[derive(Debug, Clone, PartialEq)]
pub struct SequentialScale {
    pub domain: [f64; 2],
    ramp: ColorRamp,
}

impl SequentialScale {
    pub fn new(domain: [f64; 2], ramp: ColorRamp) -> Self {
        Self { domain, ramp }
    }

    pub fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    pub fn apply(&self, value: f64) -> Rgb {
        self.ramp.sample(normalize(self.domain, value))
    }
}

fn signed_sqrt(v: f64) -> f64 {
    if v < 0.0 { -(-v).sqrt() } else { v.sqrt() }
}

// A degenerate domain maps everything to the middle of the range.
fn normalize(domain: [f64; 2], value: f64) -> f64 {
    let span = domain[1] - domain[0];
    if span == 0.0 {
        0.5
    } else {
        (value - domain[0]) / span
    }
}
