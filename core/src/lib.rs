//! # qfix-core
//!
//! Deterministic signed Q16.16 fixed point for environments where
//! floating point is unavailable or unwanted. A Q value is one `i32`
//! (value * 2^16); every operation widens to `i64`, works in integer
//! arithmetic only and maps back through an explicit overflow policy,
//! so results are bit-identical on every platform.
//!
//! Layers, leaves first:
//! - [`q`]: the value itself, constants, predicates, rounding, packing
//! - [`arith`]: widened add/sub/mul/div/rem/mod/fma and the [`Bound`] policy
//! - [`text`]: radix 2..36 conversion both ways
//! - [`cordic`]: the universal shift-and-add engine
//! - [`trans`]: range-reduced transcendental wrappers
//! - [`furman`]: polynomial sine/cosine on 16-bit turn angles

pub mod arith;
pub mod conf;
pub mod cordic;
pub mod fault;
pub mod furman;
pub mod q;
pub mod text;
pub mod trans;

pub use arith::Bound;
pub use conf::{QConf, DP_ALL};
pub use cordic::{
    circular_gain, cordic, cordic_div, cordic_ln, cordic_mul, cordic_sqrt, hyperbolic_gain, Coord,
    Mode, INVERSE_GAIN_CIRCULAR, INVERSE_GAIN_HYPERBOLIC,
};
pub use fault::ArithmeticFaultKind;
pub use furman::{furman_cos, furman_from_q, furman_sin};
pub use q::{PackError, Q};
pub use text::{format_q, parse_q, ParseError};
pub use trans::{
    acos, acosh, asin, asinh, atan, atan2, atanh, cordic_exp, cos, cosh, cot, deg2rad, exp, hypot,
    log, pol2rec, pow, rad2deg, rec2pol, sin, sincos, sincosh, sinh, sqrt, tan, tanh, try_log,
    try_sqrt,
};

#[cfg(test)]
mod tests;
