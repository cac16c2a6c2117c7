//! A bracketed root finder shared by the iterative projection kernels
//! (AIR, MOL, PCO), per §4.4's numerical policy.

use crate::error::WcsError;

/// Iteration budget for every iterative solver in the projection engine (§4.4, §5).
pub const MAX_ITERATIONS: usize = 100;
/// Convergence tolerance on `|f(x)|` (§4.4, §5).
pub const TOLERANCE: f64 = 1e-12;

/// Finds a root of `f` in `[lo, hi]` by bisection, requiring `f(lo)` and
/// `f(hi)` to have opposite signs (or either endpoint to already satisfy the
/// tolerance). Returns [`WcsError::PixelBeyondProjection`] if the bracket is
/// invalid or convergence is not reached within [`MAX_ITERATIONS`].
///
/// Bisection rather than Brent's method is used throughout: every kernel
/// that needs a root here (AIR, MOL, PCO) has a narrow, well-behaved
/// bracket, so the extra convergence speed of Brent's method is not needed
/// and bisection's single, easily-audited branch matches the "document and
/// test the bracket selection rule" requirement of §9's open question on
/// AIR.
pub fn bisect(mut lo: f64, mut hi: f64, f: impl Fn(f64) -> f64) -> Result<f64, WcsError> {
    let mut f_lo = f(lo);
    if f_lo.abs() < TOLERANCE {
        return Ok(lo);
    }
    let mut f_hi = f(hi);
    if f_hi.abs() < TOLERANCE {
        return Ok(hi);
    }
    if f_lo.signum() == f_hi.signum() {
        return Err(WcsError::PixelBeyondProjection {
            reason: "bisection bracket does not change sign".to_string(),
        });
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid.abs() < TOLERANCE || (hi - lo).abs() < TOLERANCE {
            return Ok(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
            f_hi = f_mid;
        }
    }

    Err(WcsError::PixelBeyondProjection {
        reason: format!("root finder did not converge within {MAX_ITERATIONS} iterations"),
    })
}

/// Finds a root of `f` (with analytical derivative `fprime`) via Newton's
/// method, falling back to [`WcsError::PixelBeyondProjection`] if the
/// iteration budget is exhausted or the derivative vanishes.
pub fn newton(x0: f64, f: impl Fn(f64) -> f64, fprime: impl Fn(f64) -> f64) -> Result<f64, WcsError> {
    let mut x = x0;
    for _ in 0..MAX_ITERATIONS {
        let fx = f(x);
        if fx.abs() < TOLERANCE {
            return Ok(x);
        }
        let dfx = fprime(x);
        if dfx.abs() < 1e-300 {
            return Err(WcsError::PixelBeyondProjection {
                reason: "Newton iteration encountered a vanishing derivative".to_string(),
            });
        }
        x -= fx / dfx;
    }
    Err(WcsError::PixelBeyondProjection {
        reason: format!("Newton iteration did not converge within {MAX_ITERATIONS} iterations"),
    })
}

/// Clamps `v` to `[-1, 1]` with the tolerance required by §4.4 before
/// passing it to `asin`/`acos`, and returns a domain error if it is out of
/// range by more than `tolerance`.
pub fn clamp_unit(v: f64, tolerance: f64) -> Result<f64, WcsError> {
    if v > 1.0 + tolerance || v < -1.0 - tolerance {
        return Err(WcsError::PixelBeyondProjection {
            reason: format!("value {v} outside [-1,1] beyond tolerance {tolerance}"),
        });
    }
    Ok(v.clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bisect_finds_root_of_linear_function() {
        let root = bisect(-1.0, 1.0, |x| x - 0.25).unwrap();
        assert!((root - 0.25).abs() < 1e-9);
    }

    #[test]
    fn bisect_rejects_non_bracketing_interval() {
        assert!(bisect(1.0, 2.0, |x| x * x + 1.0).is_err());
    }

    #[test]
    fn newton_finds_root_of_quadratic() {
        let root = newton(1.0, |x| x * x - 2.0, |x| 2.0 * x).unwrap();
        assert!((root - 2_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn clamp_unit_tolerates_small_overshoot() {
        assert_eq!(clamp_unit(1.0 + 1e-13, 1e-12).unwrap(), 1.0);
        assert!(clamp_unit(1.1, 1e-12).is_err());
    }
}
