//! Widened arithmetic over the Q16.16 word.
//!
//! Every binary operation widens both operands to `i64`, works there,
//! and maps the result back through a [`Bound`] policy. The default
//! policy saturates; the wrap policy folds back into range.

use crate::fault::ArithmeticFaultKind;
use crate::q::Q;

/// What happens when a widened intermediate leaves the representable range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Bound {
    #[default]
    Saturate,
    Wrap,
}

impl Bound {
    /// Map a widened intermediate back into a Q word.
    pub fn apply(self, wide: i64) -> Q {
        const MAX: i64 = i32::MAX as i64;
        const MIN: i64 = i32::MIN as i64;
        let raw = match self {
            Bound::Saturate => {
                if wide > MAX {
                    MAX
                } else if wide < MIN {
                    MIN
                } else {
                    wide
                }
            }
            Bound::Wrap => {
                if wide > MAX {
                    MIN + (wide % MAX)
                } else if wide < MIN {
                    MAX - ((-wide) % MAX)
                } else {
                    wide
                }
            }
        };
        Q::from_raw(raw as i32)
    }
}

/// (a * b + 2^15) >> 16 in i64; the bias rounds the product half up.
#[inline]
fn widened_mul(a: Q, b: Q) -> i64 {
    ((a.raw() as i64) * (b.raw() as i64) + 0x8000) >> Q::FRAC_BITS
}

/// (a << 16 +/- b/2) / b; the bias follows the quotient sign so ties
/// round half away from zero.
#[inline]
fn widened_div(a: Q, b: Q) -> i64 {
    let dd = (a.raw() as i64) << Q::FRAC_BITS;
    let mut bd2 = (b.raw() >> 1) as i64;
    if !((dd >= 0 && b.raw() > 0) || (dd < 0 && b.raw() < 0)) {
        bd2 = -bd2;
    }
    (dd + bd2) / (b.raw() as i64)
}

impl Q {
    pub fn add_bounded(self, rhs: Q, bound: Bound) -> Q {
        bound.apply(self.raw() as i64 + rhs.raw() as i64)
    }

    #[inline]
    pub fn saturating_add(self, rhs: Q) -> Q {
        self.add_bounded(rhs, Bound::Saturate)
    }

    pub fn sub_bounded(self, rhs: Q, bound: Bound) -> Q {
        bound.apply(self.raw() as i64 - rhs.raw() as i64)
    }

    #[inline]
    pub fn saturating_sub(self, rhs: Q) -> Q {
        self.sub_bounded(rhs, Bound::Saturate)
    }

    pub fn mul_bounded(self, rhs: Q, bound: Bound) -> Q {
        bound.apply(widened_mul(self, rhs))
    }

    #[inline]
    pub fn saturating_mul(self, rhs: Q) -> Q {
        self.mul_bounded(rhs, Bound::Saturate)
    }

    /// Fused multiply-add: the product stays widened until `addend`
    /// has been added, so only one saturation happens.
    pub fn fma(self, rhs: Q, addend: Q) -> Q {
        Bound::Saturate.apply(widened_mul(self, rhs) + addend.raw() as i64)
    }

    pub fn div_bounded(self, rhs: Q, bound: Bound) -> Q {
        debug_assert!(rhs.raw() != 0);
        if rhs.raw() == 0 {
            return if self.is_negative() { Q::MIN } else { Q::MAX };
        }
        bound.apply(widened_div(self, rhs))
    }

    #[inline]
    pub fn saturating_div(self, rhs: Q) -> Q {
        self.div_bounded(rhs, Bound::Saturate)
    }

    pub fn try_div(self, rhs: Q) -> Result<Q, ArithmeticFaultKind> {
        if rhs.raw() == 0 {
            return Err(ArithmeticFaultKind::DivByZero);
        }
        Ok(Bound::Saturate.apply(widened_div(self, rhs)))
    }

    /// Remainder: `a - trunc(a/b)*b`, sign of the dividend.
    pub fn rem_q(self, rhs: Q) -> Q {
        debug_assert!(rhs.raw() != 0);
        if rhs.raw() == 0 {
            return Q::ZERO;
        }
        self.saturating_sub(self.saturating_div(rhs).trunc().saturating_mul(rhs))
    }

    pub fn try_rem(self, rhs: Q) -> Result<Q, ArithmeticFaultKind> {
        if rhs.raw() == 0 {
            return Err(ArithmeticFaultKind::DivByZero);
        }
        Ok(self.rem_q(rhs))
    }

    /// Modulo: `a - floor(a/b)*b`, sign of the divisor.
    pub fn mod_q(self, rhs: Q) -> Q {
        debug_assert!(rhs.raw() != 0);
        if rhs.raw() == 0 {
            return Q::ZERO;
        }
        self.saturating_sub(self.saturating_div(rhs).floor().saturating_mul(rhs))
    }

    pub fn try_mod(self, rhs: Q) -> Result<Q, ArithmeticFaultKind> {
        if rhs.raw() == 0 {
            return Err(ArithmeticFaultKind::DivByZero);
        }
        Ok(self.mod_q(rhs))
    }

    #[inline]
    pub fn sqr(self) -> Q {
        self.saturating_mul(self)
    }
}

// Operator overloads: add/sub/mul are fixed to saturating semantics,
// div/rem carry the debug division-by-zero assertion.

impl std::ops::Add for Q {
    type Output = Q;
    #[inline]
    fn add(self, rhs: Q) -> Q {
        self.saturating_add(rhs)
    }
}

impl std::ops::Sub for Q {
    type Output = Q;
    #[inline]
    fn sub(self, rhs: Q) -> Q {
        self.saturating_sub(rhs)
    }
}

impl std::ops::Mul for Q {
    type Output = Q;
    #[inline]
    fn mul(self, rhs: Q) -> Q {
        self.saturating_mul(rhs)
    }
}

impl std::ops::Div for Q {
    type Output = Q;
    #[inline]
    fn div(self, rhs: Q) -> Q {
        self.saturating_div(rhs)
    }
}

impl std::ops::Rem for Q {
    type Output = Q;
    #[inline]
    fn rem(self, rhs: Q) -> Q {
        self.rem_q(rhs)
    }
}

impl std::ops::Neg for Q {
    type Output = Q;
    #[inline]
    fn neg(self) -> Q {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(v: i32) -> Q {
        Q::from_int(v)
    }

    #[test]
    fn add_sub_saturate() {
        assert_eq!(q(1) + q(1), q(2));
        assert_eq!(Q::MAX + Q::ONE, Q::MAX);
        assert_eq!(Q::MIN - Q::ONE, Q::MIN);
        assert_eq!(q(3) - q(7), q(-4));
    }

    #[test]
    fn wrap_policy_folds_back() {
        let over = (i32::MAX as i64) + 100;
        assert_eq!(
            Bound::Wrap.apply(over).raw(),
            i32::MIN + (over % i32::MAX as i64) as i32
        );
        let under = (i32::MIN as i64) - 100;
        assert_eq!(
            Bound::Wrap.apply(under).raw(),
            i32::MAX - ((-under) % i32::MAX as i64) as i32
        );
        assert_eq!(Bound::Wrap.apply(1234), Q::from_raw(1234));
    }

    #[test]
    fn mul_rounds_half_up() {
        assert_eq!(Q::from_raw(0x18000) * Q::from_raw(0x8000), Q::from_raw(0xC000));
        assert_eq!(q(100) * q(100), q(10000));
        assert_eq!(q(-3) * q(3), q(-9));
        // an exact half-ULP product rounds up instead of vanishing
        assert_eq!(Q::BIT * Q::from_raw(0x8000), Q::BIT);
    }

    #[test]
    fn div_rounds_half_away_from_zero() {
        assert_eq!(q(100) / q(2), q(50));
        assert_eq!(q(-9) / q(3), q(-3));
        assert_eq!(q(1) / q(-2), Q::from_raw(-0x8000));
        // 1/3 rounded: raw 65536/3 = 21845.33 -> 21845
        assert_eq!((q(1) / q(3)).raw(), 0x5555);
        assert_eq!(q(1).try_div(Q::ZERO), Err(ArithmeticFaultKind::DivByZero));
    }

    #[test]
    fn mul_div_inverse_within_one_ulp() {
        for (a, b) in [(100, 7), (-100, 7), (1, 3), (-5, -3), (32000, 13)] {
            let (a, b) = (q(a), q(b));
            let back = (a / b) * b;
            assert!(back.approx_eq(a, Q::from_raw(2)), "{a} {b} {back}");
        }
    }

    #[test]
    fn rem_takes_dividend_sign_mod_takes_divisor_sign() {
        let cases = [(7, 3), (-7, 3), (7, -3), (-7, -3)];
        for (a, b) in cases {
            let (a, b) = (q(a), q(b));
            let r = a.rem_q(b);
            let m = a.mod_q(b);
            if r != Q::ZERO {
                assert_eq!(r.is_negative(), a.is_negative(), "rem {a} {b}");
            }
            if m != Q::ZERO {
                assert_eq!(m.is_negative(), b.is_negative(), "mod {a} {b}");
            }
            assert!(r.abs() < b.abs());
            assert!(m.abs() < b.abs());
        }
        assert_eq!(q(-7).rem_q(q(3)), q(-1));
        assert_eq!(q(-7).mod_q(q(3)), q(2));
        assert_eq!(q(7).mod_q(q(-3)), q(-2));
    }

    #[test]
    fn fma_saturates_once() {
        // max * 1.5 overflows transiently; the fused form lands one raw
        // unit below max/2 instead of collapsing to the clamp.
        let r = Q::MAX.fma(Q::from_raw(0x18000), Q::MIN);
        assert_eq!(r.raw(), 0x3FFF_FFFF);
        let half_max = Q::MAX / q(2);
        assert!(r.approx_eq(half_max, Q::from_raw(2)));
        // versus the two-step version, which clamps and is far off
        let clamped = Q::MAX * Q::from_raw(0x18000) + Q::MIN;
        assert_eq!(clamped, Q::from_raw(-1));
    }
}
