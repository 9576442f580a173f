// qfix-lang/src/lib.rs
//
// Calculator front end for the Q16.16 kernel:
// - lexer.rs : numbers, identifiers, punctuation (longest match)
// - ops.rs   : sorted operator table, binary-search lookup
// - eval.rs  : two-stack shunting-yard evaluator with named variables

pub mod eval;
pub mod lexer;
pub mod ops;

pub use eval::{Evaluator, ExprError, Variable, DEFAULT_STACK_SIZE};
pub use lexer::{LexError, Lexer, Token};
pub use ops::{qop, Assoc, OpCheck, OpEval, QOp, OPS};

use qfix_core::Q;

/// Convenience entry point: evaluate one expression with the default
/// configuration and the constants preset.
pub fn eval_expression(expr: &str) -> Result<Q, ExprError> {
    Evaluator::with_constants(DEFAULT_STACK_SIZE).eval(expr)
}
