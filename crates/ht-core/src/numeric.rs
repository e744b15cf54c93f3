use crate::{HtError, HtResult};

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> HtResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HtError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> HtResult<Real> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(HtError::OutOfRange {
            what,
            value: v,
            constraint: "must be > 0",
        })
    }
}

/// Finite and greater than or equal to zero.
pub fn ensure_non_negative(v: Real, what: &'static str) -> HtResult<Real> {
    let v = ensure_finite(v, what)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(HtError::OutOfRange {
            what,
            value: v,
            constraint: "must be >= 0",
        })
    }
}

/// Linear map of `v` from `[from_lo, from_hi]` onto `[to_lo, to_hi]`. No clamping.
#[inline]
pub fn rescale(v: Real, from_lo: Real, from_hi: Real, to_lo: Real, to_hi: Real) -> Real {
    to_lo + (v - from_lo) * (to_hi - to_lo) / (from_hi - from_lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_infinity() {
        let err = ensure_positive(0.0, "dt_s").unwrap_err();
        assert_eq!(err.what(), "dt_s");
        assert!(matches!(err, HtError::OutOfRange { .. }));

        let err = ensure_positive(Real::INFINITY, "dt_s").unwrap_err();
        assert!(matches!(err, HtError::NonFinite { .. }));

        assert_eq!(ensure_positive(0.1, "dt_s").unwrap(), 0.1);
    }

    #[test]
    fn ensure_non_negative_accepts_zero() {
        assert_eq!(ensure_non_negative(0.0, "td_s").unwrap(), 0.0);
        assert!(ensure_non_negative(-1e-9, "td_s").is_err());
    }

    #[test]
    fn rescale_maps_endpoints() {
        assert_eq!(rescale(0.0, 0.0, 10.0, 2.0, 4.0), 2.0);
        assert_eq!(rescale(10.0, 0.0, 10.0, 2.0, 4.0), 4.0);
        assert_eq!(rescale(5.0, 0.0, 10.0, 2.0, 4.0), 3.0);
        // Extrapolates outside the source range
        assert_eq!(rescale(20.0, 0.0, 10.0, 2.0, 4.0), 6.0);
    }
}
