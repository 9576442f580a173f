use std::fmt;

/// Arithmetic domain faults reported by the checked kernel entry points.
///
/// The unchecked operations never propagate these: they assert the
/// precondition in debug builds and return a defined saturated value in
/// release builds. The checked `try_*` twins surface the fault instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArithmeticFaultKind {
    DivByZero,
    /// Logarithm of zero or a negative value.
    LogNonPositive,
    SqrtNegative,
}

impl ArithmeticFaultKind {
    pub fn code(&self) -> &'static str {
        match self {
            ArithmeticFaultKind::DivByZero => "E_MATH_DIV_ZERO",
            ArithmeticFaultKind::LogNonPositive => "E_MATH_LOG_NON_POSITIVE",
            ArithmeticFaultKind::SqrtNegative => "E_MATH_SQRT_NEGATIVE",
        }
    }
}

impl fmt::Display for ArithmeticFaultKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}
