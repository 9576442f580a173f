//! Transcendental functions built on the CORDIC engine.
//!
//! Each wrapper reduces its argument into the convergence window of
//! the underlying invocation, runs the engine, and rescales by the
//! precomputed inverse gain. Everything stays in integer arithmetic.

use crate::cordic::{
    cordic, cordic_ln, Coord, Mode, INVERSE_GAIN_CIRCULAR, INVERSE_GAIN_HYPERBOLIC,
};
use crate::fault::ArithmeticFaultKind;
use crate::q::Q;

const TWO_PI: Q = Q::from_raw(Q::PI.raw().wrapping_mul(2));
const HALF_PI: Q = Q::from_raw(Q::PI.raw() / 2);
const QUARTER_PI: Q = Q::from_raw(Q::PI.raw() / 4);
/// ln(2^15), the largest exponent before exp saturates.
const LN_MAX: Q = Q::from_raw(0xA65AF);
/// Upper edge of the hyperbolic-vectoring window used by log.
const LN_WINDOW: Q = Q::from_raw(0x98000);

/// Sine and cosine of `theta` (radians), as `(sin, cos)`.
///
/// The angle folds to [-pi, pi], then to [-pi/2, pi/2] recording a
/// negation, then to [-pi/4, pi/4] recording a quadrant shift; the
/// shift swaps x/y on the way out.
pub fn sincos(theta: Q) -> (Q, Q) {
    let npi = Q::PI.negate();
    let mut theta = theta;
    while theta < npi {
        theta = theta + TWO_PI;
    }
    while theta > Q::PI {
        theta = theta - TWO_PI;
    }

    let mut negate = false;
    if theta < HALF_PI.negate() {
        theta = theta + Q::PI;
        negate = true;
    } else if theta > HALF_PI {
        theta = theta + npi;
        negate = true;
    }

    let mut shift = 0i32;
    if theta < QUARTER_PI.negate() {
        theta = theta + HALF_PI;
        shift = -1;
    } else if theta > QUARTER_PI {
        theta = theta - HALF_PI;
        shift = 1;
    }

    let mut x = INVERSE_GAIN_CIRCULAR;
    let mut y = Q::ZERO;
    let mut z = theta;
    cordic(Coord::Circular, Mode::Rotate, -1, &mut x, &mut y, &mut z);

    if shift > 0 {
        let yt = y;
        y = x;
        x = yt.negate();
    } else if shift < 0 {
        let yt = y;
        y = x.negate();
        x = yt;
    }
    if negate {
        x = x.negate();
        y = y.negate();
    }
    (y, x)
}

pub fn sin(theta: Q) -> Q {
    sincos(theta).0
}

pub fn cos(theta: Q) -> Q {
    sincos(theta).1
}

pub fn tan(theta: Q) -> Q {
    let (s, c) = sincos(theta);
    s.try_div(c)
        .unwrap_or(if s.is_negative() { Q::MIN } else { Q::MAX })
}

pub fn cot(theta: Q) -> Q {
    let (s, c) = sincos(theta);
    c.try_div(s)
        .unwrap_or(if c.is_negative() { Q::MIN } else { Q::MAX })
}

/// Arctangent by circular vectoring of (1, t).
pub fn atan(t: Q) -> Q {
    let mut x = Q::ONE;
    let mut y = t;
    let mut z = Q::ZERO;
    cordic(Coord::Circular, Mode::Vector, -1, &mut x, &mut y, &mut z);
    z
}

/// Quadrant-aware arctangent of a/b.
pub fn atan2(a: Q, b: Q) -> Q {
    if b == Q::ZERO {
        debug_assert!(a != Q::ZERO);
        return if a.is_negative() {
            HALF_PI.negate()
        } else {
            HALF_PI
        };
    }
    if b.is_negative() {
        return if a >= Q::ZERO {
            atan(a.saturating_div(b)).saturating_add(Q::PI)
        } else {
            atan(a.saturating_div(b)).saturating_sub(Q::PI)
        };
    }
    let mut x = b;
    let mut y = a;
    let mut z = Q::ZERO;
    cordic(Coord::Circular, Mode::Vector, -1, &mut x, &mut y, &mut z);
    z
}

pub fn asin(t: Q) -> Q {
    debug_assert!(t.abs() <= Q::ONE);
    atan2(t, sqrt(Q::ONE.saturating_sub(t.saturating_mul(t))))
}

pub fn acos(t: Q) -> Q {
    debug_assert!(t.abs() <= Q::ONE);
    atan2(sqrt(Q::ONE.saturating_sub(t.saturating_mul(t))), t)
}

/// Hyperbolic sine and cosine, as `(sinh, cosh)`.
pub fn sincosh(a: Q) -> (Q, Q) {
    let mut x = INVERSE_GAIN_HYPERBOLIC;
    let mut y = Q::ZERO;
    let mut z = a;
    cordic(Coord::Hyperbolic, Mode::Rotate, -1, &mut x, &mut y, &mut z);
    (y, x)
}

pub fn sinh(a: Q) -> Q {
    sincosh(a).0
}

pub fn cosh(a: Q) -> Q {
    sincosh(a).1
}

pub fn tanh(a: Q) -> Q {
    let (s, c) = sincosh(a);
    s.try_div(c)
        .unwrap_or(if s.is_negative() { Q::MIN } else { Q::MAX })
}

/// exp without range reduction; usable while |e| stays inside the
/// hyperbolic convergence window (about 1.12).
pub fn cordic_exp(e: Q) -> Q {
    let (s, h) = sincosh(e);
    s.saturating_add(h)
}

/// exp(e) = exp(e/2)^2 until the argument fits the CORDIC window.
pub fn exp(e: Q) -> Q {
    debug_assert!(e < LN_MAX);
    if e.abs() < Q::ONE {
        return cordic_exp(e);
    }
    exp(e.arith_shr(1)).sqr()
}

/// Natural logarithm. Halves the argument (collecting ln 2 each time)
/// until it fits the hyperbolic-vectoring window.
pub fn log(x: Q) -> Q {
    debug_assert!(x > Q::ZERO);
    if x <= Q::ZERO {
        return Q::MIN;
    }
    let mut x = x;
    let mut logs = Q::ZERO;
    while x > LN_WINDOW {
        logs = logs.saturating_add(Q::LN2);
        x = x.arith_shr(1);
    }
    logs.saturating_add(cordic_ln(x))
}

pub fn try_log(x: Q) -> Result<Q, ArithmeticFaultKind> {
    if x <= Q::ZERO {
        return Err(ArithmeticFaultKind::LogNonPositive);
    }
    Ok(log(x))
}

/// Newton-Raphson square root. The tolerance is on the squared
/// residual and widens for large arguments.
pub fn sqrt(x: Q) -> Q {
    debug_assert!(x >= Q::ZERO);
    if x <= Q::ZERO {
        return Q::ZERO;
    }
    let tolerance = if x > Q::from_raw(100 << 16) {
        Q::from_raw(0x0100)
    } else {
        Q::from_raw(0x0010)
    };
    let mut guess = if x > Q::SQRT2 { x.arith_shr(1) } else { Q::ONE };
    while guess.sqr().saturating_sub(x).abs() > tolerance {
        guess = x.saturating_div(guess).saturating_add(guess).arith_shr(1);
    }
    guess.abs()
}

pub fn try_sqrt(x: Q) -> Result<Q, ArithmeticFaultKind> {
    if x.is_negative() {
        return Err(ArithmeticFaultKind::SqrtNegative);
    }
    Ok(sqrt(x))
}

/// n^e via exp(e * ln n), with the sign and reciprocal cases peeled
/// off first. `pow(0, e >= 0)` is one by convention; a negative
/// exponent on zero is a domain fault.
pub fn pow(n: Q, e: Q) -> Q {
    debug_assert!(!n.is_negative() || e.is_integer());
    if n == Q::ZERO {
        debug_assert!(!e.is_negative());
        if e.is_negative() {
            return Q::MAX;
        }
        return Q::ONE;
    }
    if n.is_negative() {
        let abspow = pow(n.abs(), e);
        return if e.is_odd() { abspow.negate() } else { abspow };
    }
    if e.is_negative() {
        return Q::ONE.saturating_div(pow(n, e.abs()));
    }
    exp(log(n).saturating_mul(e))
}

/// sqrt(a^2 + b^2) by circular vectoring.
pub fn hypot(a: Q, b: Q) -> Q {
    let mut x = a.abs();
    let mut y = b.abs();
    let mut z = Q::ZERO;
    cordic(Coord::Circular, Mode::Vector, -1, &mut x, &mut y, &mut z);
    x.saturating_mul(INVERSE_GAIN_CIRCULAR)
}

pub fn atanh(x: Q) -> Q {
    debug_assert!(x.abs() < Q::ONE);
    if x.abs() >= Q::ONE {
        return if x.is_negative() { Q::MIN } else { Q::MAX };
    }
    let half = Q::from_raw(0x8000);
    log(Q::ONE.saturating_add(x).saturating_div(Q::ONE.saturating_sub(x))).saturating_mul(half)
}

pub fn asinh(x: Q) -> Q {
    log(x.saturating_add(sqrt(x.saturating_mul(x).saturating_add(Q::ONE))))
}

pub fn acosh(x: Q) -> Q {
    debug_assert!(x >= Q::ONE);
    if x < Q::ONE {
        return Q::ZERO;
    }
    log(x.saturating_add(sqrt(x.saturating_mul(x).saturating_sub(Q::ONE))))
}

pub fn deg2rad(deg: Q) -> Q {
    Q::PI.saturating_mul(deg).saturating_div(Q::from_raw(180 << 16))
}

pub fn rad2deg(rad: Q) -> Q {
    Q::from_raw(180 << 16).saturating_mul(rad).saturating_div(Q::PI)
}

/// Polar to rectangular: `(sin(theta), cos(theta))` scaled by the
/// magnitude, as `(i, j)`.
pub fn pol2rec(magnitude: Q, theta: Q) -> (Q, Q) {
    let (s, c) = sincos(theta);
    (s.saturating_mul(magnitude), c.saturating_mul(magnitude))
}

/// Rectangular to polar: `(magnitude, theta)` with the angle folded
/// into [0, 2pi) by quadrant.
pub fn rec2pol(i: Q, j: Q) -> (Q, Q) {
    let is = i.is_negative();
    let js = j.is_negative();
    let mut x = i.abs();
    let mut y = j.abs();
    let mut z = Q::ZERO;
    cordic(Coord::Circular, Mode::Vector, -1, &mut x, &mut y, &mut z);
    let magnitude = x.saturating_mul(INVERSE_GAIN_CIRCULAR);
    let theta = if is && js {
        z.saturating_add(Q::PI)
    } else if js {
        z.saturating_add(HALF_PI)
    } else if is {
        z.saturating_add(Q::from_raw(Q::PI.raw().wrapping_mul(3) / 2))
    } else {
        z
    };
    (magnitude, theta)
}
