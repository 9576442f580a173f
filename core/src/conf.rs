use crate::arith::Bound;

/// Number of fractional text digits meaning "emit until the residue is
/// zero" (capped at one digit past the fractional width).
pub const DP_ALL: i32 = -1;

/// Conversion and overflow configuration, passed by value into the
/// calls that need it. There is no process-wide mutable state; callers
/// that want the classic defaults use [`QConf::default`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QConf {
    /// Overflow policy applied by the bounded arithmetic wrappers.
    pub bound: Bound,
    /// Default radix for text conversion, 2..=36.
    pub base: u32,
    /// Fractional digits to print / accept; negative means [`DP_ALL`].
    pub dp: i32,
}

impl Default for QConf {
    fn default() -> Self {
        Self {
            bound: Bound::Saturate,
            base: 10,
            dp: 4,
        }
    }
}
