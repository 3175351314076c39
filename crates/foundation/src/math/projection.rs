//! Conic equal-area (Albers) projection.
//!
//! The pipeline matches the usual web-mapping convention:
//! rotate (degrees) -> raw conic projection (radians) -> scale, recenter and
//! translate into screen pixels with y pointing down.

use std::f64::consts::{PI, TAU};

use super::Vec2;

const EPSILON: f64 = 1e-6;

/// Fixed configuration of an Albers projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AlbersConfig {
    /// `[lambda, phi]` rotation in degrees.
    pub rotate_deg: [f64; 2],
    /// Center in the rotated frame, degrees.
    pub center_deg: [f64; 2],
    /// Standard parallels in degrees.
    pub parallels_deg: [f64; 2],
    pub scale: f64,
    /// Screen position of the center, pixels.
    pub translate: [f64; 2],
}

impl AlbersConfig {
    /// State-level Albers framing for California inside a `width` x `height` canvas.
    pub fn california(width: f64, height: f64) -> Self {
        Self {
            rotate_deg: [120.0, 0.0],
            center_deg: [0.0, 37.5],
            parallels_deg: [29.5, 45.5],
            scale: 4000.0,
            translate: [width / 2.0, height / 2.0],
        }
    }
}

impl Default for AlbersConfig {
    fn default() -> Self {
        Self::california(700.0, 900.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Raw {
    Conic { n: f64, c: f64, r0: f64 },
    // Degenerate case when the parallels are symmetric about the equator.
    Cylindrical { cos_phi0: f64 },
}

impl Raw {
    fn new(phi0: f64, phi1: f64) -> Self {
        let sy0 = phi0.sin();
        let n = (sy0 + phi1.sin()) / 2.0;
        if n.abs() < EPSILON {
            return Raw::Cylindrical {
                cos_phi0: phi0.cos(),
            };
        }
        let c = 1.0 + sy0 * (2.0 * n - sy0);
        Raw::Conic {
            n,
            c,
            r0: c.sqrt() / n,
        }
    }

    fn forward(&self, lambda: f64, phi: f64) -> (f64, f64) {
        match *self {
            Raw::Conic { n, c, r0 } => {
                let r = (c - 2.0 * n * phi.sin()).sqrt() / n;
                let x = lambda * n;
                (r * x.sin(), r0 - r * x.cos())
            }
            Raw::Cylindrical { cos_phi0 } => (lambda * cos_phi0, phi.sin() / cos_phi0),
        }
    }
}

/// A ready-to-use Albers projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AlbersProjection {
    config: AlbersConfig,
    raw: Raw,
    delta_lambda: f64,
    cos_delta_phi: f64,
    sin_delta_phi: f64,
    dx: f64,
    dy: f64,
}

impl AlbersProjection {
    pub fn new(config: AlbersConfig) -> Self {
        let raw = Raw::new(
            config.parallels_deg[0].to_radians(),
            config.parallels_deg[1].to_radians(),
        );
        let delta_phi = config.rotate_deg[1].to_radians();

        let (cx, cy) = raw.forward(
            config.center_deg[0].to_radians(),
            config.center_deg[1].to_radians(),
        );
        let k = config.scale;

        Self {
            config,
            raw,
            delta_lambda: config.rotate_deg[0].to_radians(),
            cos_delta_phi: delta_phi.cos(),
            sin_delta_phi: delta_phi.sin(),
            dx: config.translate[0] - k * cx,
            dy: config.translate[1] + k * cy,
        }
    }

    pub fn config(&self) -> AlbersConfig {
        self.config
    }

    /// Projects `(lon, lat)` in degrees to screen pixels.
    ///
    /// Non-finite input yields a non-finite point; callers check with
    /// [`Vec2::is_finite`].
    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> Vec2 {
        let (lambda, phi) = self.rotate(lon_deg.to_radians(), lat_deg.to_radians());
        let (x, y) = self.raw.forward(lambda, phi);
        let k = self.config.scale;
        Vec2::new(self.dx + k * x, self.dy - k * y)
    }

    fn rotate(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let mut lambda = lambda + self.delta_lambda;
        if lambda > PI {
            lambda -= TAU;
        } else if lambda < -PI {
            lambda += TAU;
        }

        if self.sin_delta_phi == 0.0 {
            return (lambda, phi);
        }

        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_delta_phi + x * self.sin_delta_phi;
        (
            y.atan2(x * self.cos_delta_phi - z * self.sin_delta_phi),
            k.asin(),
        )
    }
}

impl Default for AlbersProjection {
    fn default() -> Self {
        Self::new(AlbersConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{AlbersConfig, AlbersProjection};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn rotated_center_lands_on_translate() {
        let p = AlbersProjection::new(AlbersConfig::california(700.0, 900.0));
        let c = p.project(-120.0, 37.5);
        assert_close(c.x, 350.0, 1e-9);
        assert_close(c.y, 450.0, 1e-9);
    }

    #[test]
    fn east_is_right_and_north_is_up() {
        let p = AlbersProjection::default();
        let c = p.project(-120.0, 37.5);
        let east = p.project(-119.0, 37.5);
        let north = p.project(-120.0, 38.5);
        assert!(east.x > c.x);
        assert!(north.y < c.y);
        // Equal-area stretch makes one degree of latitude ~70px at this scale.
        assert_close(c.y - north.y, 70.5, 1.0);
    }

    #[test]
    fn california_fits_the_canvas() {
        let p = AlbersProjection::default();
        for (lon, lat) in [(-124.4, 42.0), (-114.1, 34.3), (-117.1, 32.5), (-120.0, 39.0)] {
            let s = p.project(lon, lat);
            assert!(s.x > 0.0 && s.x < 700.0, "x out of canvas for {lon},{lat}: {}", s.x);
            assert!(s.y > 0.0 && s.y < 900.0, "y out of canvas for {lon},{lat}: {}", s.y);
        }
    }

    #[test]
    fn nan_input_is_not_finite() {
        let p = AlbersProjection::default();
        assert!(!p.project(f64::NAN, 37.0).is_finite());
    }

    #[test]
    fn symmetric_parallels_fall_back_to_cylindrical() {
        let mut cfg = AlbersConfig::default();
        cfg.parallels_deg = [-10.0, 10.0];
        let p = AlbersProjection::new(cfg);
        assert!(p.project(-121.0, 36.0).is_finite());
    }

    #[test]
    fn phi_rotation_moves_center() {
        let mut cfg = AlbersConfig::default();
        cfg.rotate_deg = [120.0, -5.0];
        let p = AlbersProjection::new(cfg);
        let unrotated = AlbersProjection::default();
        assert!(p.project(-120.0, 37.5) != unrotated.project(-120.0, 37.5));
    }
}
