//! Float canonicalization for anything rendered to text or used as a key.

/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::canonical_f64;

    #[test]
    fn canonicalizes_negative_zero() {
        assert_eq!(canonical_f64(-0.0), 0.0);
        assert!(canonical_f64(-0.0).is_sign_positive());
        assert_eq!(canonical_f64(1.5), 1.5);
        assert!(canonical_f64(f64::NAN).is_nan());
    }
}
