//! The operator table.
//!
//! A sorted static array of operator records; lookup is binary search
//! by name. Each record carries an arity-tagged eval function, an
//! optional precondition check of the same arity, precedence,
//! associativity and a hidden flag for the internal primitives.
//!
//! Eval functions take the evaluator so the `base` and `places`
//! pseudo-operators can adjust its configuration and so the
//! arithmetic rows honor the configured overflow policy; most other
//! operators ignore it.

use crate::eval::Evaluator;
use qfix_core::{cordic_div, cordic_exp, cordic_ln, cordic_mul, cordic_sqrt, trans, Q};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Assoc {
    None,
    Left,
    Right,
}

/// Arity-tagged evaluation function. `None` marks the paren sentinels,
/// which must never be evaluated.
#[derive(Copy, Clone)]
pub enum OpEval {
    None,
    Unary(fn(&mut Evaluator, Q) -> Q),
    Binary(fn(&mut Evaluator, Q, Q) -> Q),
}

/// Precondition of the same arity as the eval function; the error
/// text becomes the evaluator's message.
#[derive(Copy, Clone)]
pub enum OpCheck {
    Unary(fn(Q) -> Result<(), &'static str>),
    Binary(fn(Q, Q) -> Result<(), &'static str>),
}

pub struct QOp {
    pub name: &'static str,
    pub eval: OpEval,
    pub check: Option<OpCheck>,
    pub precedence: u8,
    pub assoc: Assoc,
    pub hidden: bool,
}

impl fmt::Debug for QOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("QOp")
            .field("name", &self.name)
            .field("precedence", &self.precedence)
            .field("arity", &self.arity())
            .finish_non_exhaustive()
    }
}

impl QOp {
    pub fn arity(&self) -> u8 {
        match self.eval {
            OpEval::None => 0,
            OpEval::Unary(_) => 1,
            OpEval::Binary(_) => 2,
        }
    }
}

/// Binary search over the sorted table.
pub fn qop(name: &str) -> Option<&'static QOp> {
    OPS.binary_search_by(|op| op.name.cmp(name))
        .ok()
        .map(|i| &OPS[i])
}

/* precondition checks */

fn c_div0(_a: Q, b: Q) -> Result<(), &'static str> {
    if b == Q::ZERO {
        return Err("division by zero");
    }
    Ok(())
}

fn c_not_less_zero(a: Q) -> Result<(), &'static str> {
    if a < Q::ZERO {
        return Err("negative argument");
    }
    Ok(())
}

fn c_not_less_equal_zero(a: Q) -> Result<(), &'static str> {
    if a <= Q::ZERO {
        return Err("negative or zero argument");
    }
    Ok(())
}

fn c_not_less_one(a: Q) -> Result<(), &'static str> {
    if a < Q::ONE {
        return Err("out of range [1, INF]");
    }
    Ok(())
}

fn c_abs_less_equal_one(a: Q) -> Result<(), &'static str> {
    if a.abs() > Q::ONE {
        return Err("out of range [-1, 1]");
    }
    Ok(())
}

/* eval shims: predicates return 0 or 1 as Q, shifts take the integer
 * part of the count */

fn qbool(v: bool) -> Q {
    if v {
        Q::ONE
    } else {
        Q::ZERO
    }
}

fn shift_count(b: Q) -> u32 {
    b.to_int().max(0) as u32
}

fn e_not(_: &mut Evaluator, a: Q) -> Q { a.not_q() }
fn e_unequal(_: &mut Evaluator, a: Q, b: Q) -> Q { qbool(a != b) }
fn e_rem(_: &mut Evaluator, a: Q, b: Q) -> Q { a.rem_q(b) }
fn e_and(_: &mut Evaluator, a: Q, b: Q) -> Q { a & b }
fn e_mul(ev: &mut Evaluator, a: Q, b: Q) -> Q { a.mul_bounded(b, ev.conf.bound) }
fn e_add(ev: &mut Evaluator, a: Q, b: Q) -> Q { a.add_bounded(b, ev.conf.bound) }
fn e_sub(ev: &mut Evaluator, a: Q, b: Q) -> Q { a.sub_bounded(b, ev.conf.bound) }
fn e_div(ev: &mut Evaluator, a: Q, b: Q) -> Q { a.div_bounded(b, ev.conf.bound) }
fn e_less(_: &mut Evaluator, a: Q, b: Q) -> Q { qbool(a < b) }
fn e_shl(_: &mut Evaluator, a: Q, b: Q) -> Q { a.logical_shl(shift_count(b)) }
fn e_eqless(_: &mut Evaluator, a: Q, b: Q) -> Q { qbool(a <= b) }
fn e_equal(_: &mut Evaluator, a: Q, b: Q) -> Q { qbool(a == b) }
fn e_more(_: &mut Evaluator, a: Q, b: Q) -> Q { qbool(a > b) }
fn e_eqmore(_: &mut Evaluator, a: Q, b: Q) -> Q { qbool(a >= b) }
fn e_shr(_: &mut Evaluator, a: Q, b: Q) -> Q { a.logical_shr(shift_count(b)) }
fn e_xor(_: &mut Evaluator, a: Q, b: Q) -> Q { a ^ b }
fn e_cordic_div(_: &mut Evaluator, a: Q, b: Q) -> Q { cordic_div(a, b) }
fn e_cordic_exp(_: &mut Evaluator, a: Q) -> Q { cordic_exp(a) }
fn e_cordic_ln(_: &mut Evaluator, a: Q) -> Q { cordic_ln(a) }
fn e_cordic_mul(_: &mut Evaluator, a: Q, b: Q) -> Q { cordic_mul(a, b) }
fn e_cordic_sqrt(_: &mut Evaluator, a: Q) -> Q { cordic_sqrt(a) }
fn e_abs(_: &mut Evaluator, a: Q) -> Q { a.abs() }
fn e_acos(_: &mut Evaluator, a: Q) -> Q { trans::acos(a) }
fn e_acosh(_: &mut Evaluator, a: Q) -> Q { trans::acosh(a) }
fn e_arshift(_: &mut Evaluator, a: Q, b: Q) -> Q { a.arith_shr(shift_count(b)) }
fn e_asin(_: &mut Evaluator, a: Q) -> Q { trans::asin(a) }
fn e_asinh(_: &mut Evaluator, a: Q) -> Q { trans::asinh(a) }
fn e_atan(_: &mut Evaluator, a: Q) -> Q { trans::atan(a) }
fn e_atan2(_: &mut Evaluator, a: Q, b: Q) -> Q { trans::atan2(a, b) }
fn e_atanh(_: &mut Evaluator, a: Q) -> Q { trans::atanh(a) }
fn e_ceil(_: &mut Evaluator, a: Q) -> Q { a.ceil() }
fn e_copysign(_: &mut Evaluator, a: Q, b: Q) -> Q { a.copysign(b) }
fn e_cos(_: &mut Evaluator, a: Q) -> Q { trans::cos(a) }
fn e_cosh(_: &mut Evaluator, a: Q) -> Q { trans::cosh(a) }
fn e_cot(_: &mut Evaluator, a: Q) -> Q { trans::cot(a) }
fn e_deg2rad(_: &mut Evaluator, a: Q) -> Q { trans::deg2rad(a) }
fn e_is_even(_: &mut Evaluator, a: Q) -> Q { qbool(a.is_even()) }
fn e_exp(_: &mut Evaluator, a: Q) -> Q { trans::exp(a) }
fn e_floor(_: &mut Evaluator, a: Q) -> Q { a.floor() }
fn e_hypot(_: &mut Evaluator, a: Q, b: Q) -> Q { trans::hypot(a, b) }
fn e_is_integer(_: &mut Evaluator, a: Q) -> Q { qbool(a.is_integer()) }
fn e_log(_: &mut Evaluator, a: Q) -> Q { trans::log(a) }
fn e_logical(_: &mut Evaluator, a: Q) -> Q { a.logical() }
fn e_max(_: &mut Evaluator, a: Q, b: Q) -> Q { a.max_q(b) }
fn e_min(_: &mut Evaluator, a: Q, b: Q) -> Q { a.min_q(b) }
fn e_mod(_: &mut Evaluator, a: Q, b: Q) -> Q { a.mod_q(b) }
fn e_is_negative(_: &mut Evaluator, a: Q) -> Q { qbool(a.is_negative()) }
fn e_negate(_: &mut Evaluator, a: Q) -> Q { a.negate() }
fn e_is_odd(_: &mut Evaluator, a: Q) -> Q { qbool(a.is_odd()) }
fn e_is_positive(_: &mut Evaluator, a: Q) -> Q { qbool(a.is_positive()) }
fn e_pow(_: &mut Evaluator, a: Q, b: Q) -> Q { trans::pow(a, b) }
fn e_rad2deg(_: &mut Evaluator, a: Q) -> Q { trans::rad2deg(a) }
fn e_round(_: &mut Evaluator, a: Q) -> Q { a.round() }
fn e_sign(_: &mut Evaluator, a: Q) -> Q { a.sign() }
fn e_signum(_: &mut Evaluator, a: Q) -> Q { a.signum() }
fn e_sin(_: &mut Evaluator, a: Q) -> Q { trans::sin(a) }
fn e_sinh(_: &mut Evaluator, a: Q) -> Q { trans::sinh(a) }
fn e_sqrt(_: &mut Evaluator, a: Q) -> Q { trans::sqrt(a) }
fn e_tan(_: &mut Evaluator, a: Q) -> Q { trans::tan(a) }
fn e_tanh(_: &mut Evaluator, a: Q) -> Q { trans::tanh(a) }
fn e_trunc(_: &mut Evaluator, a: Q) -> Q { a.trunc() }
fn e_or(_: &mut Evaluator, a: Q, b: Q) -> Q { a | b }
fn e_invert(_: &mut Evaluator, a: Q) -> Q { a.invert() }

/// Set the evaluator's text radix; echoes the argument, or -1 when it
/// is out of the 2..=36 range.
fn e_base(ev: &mut Evaluator, b: Q) -> Q {
    let nb = b.to_int();
    if !(2..=36).contains(&nb) {
        return Q::ONE.negate();
    }
    ev.conf.base = nb as u32;
    b
}

/// Set the evaluator's decimal places; echoes the argument.
fn e_places(ev: &mut Evaluator, p: Q) -> Q {
    ev.conf.dp = p.to_int();
    p
}

/// Sorted by name in byte order; `ops_table_is_sorted` keeps it honest.
pub static OPS: [QOp; 70] = [
    QOp { name: "!",        eval: OpEval::Unary(e_not),          check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "!=",       eval: OpEval::Binary(e_unequal),     check: None,                                   precedence: 2, assoc: Assoc::Left,  hidden: false },
    QOp { name: "%",        eval: OpEval::Binary(e_rem),         check: Some(OpCheck::Binary(c_div0)),          precedence: 3, assoc: Assoc::Left,  hidden: false },
    QOp { name: "&",        eval: OpEval::Binary(e_and),         check: None,                                   precedence: 2, assoc: Assoc::Left,  hidden: false },
    QOp { name: "(",        eval: OpEval::None,                  check: None,                                   precedence: 0, assoc: Assoc::None,  hidden: false },
    QOp { name: ")",        eval: OpEval::None,                  check: None,                                   precedence: 0, assoc: Assoc::None,  hidden: false },
    QOp { name: "*",        eval: OpEval::Binary(e_mul),         check: None,                                   precedence: 3, assoc: Assoc::Left,  hidden: false },
    QOp { name: "+",        eval: OpEval::Binary(e_add),         check: None,                                   precedence: 2, assoc: Assoc::Left,  hidden: false },
    QOp { name: "-",        eval: OpEval::Binary(e_sub),         check: None,                                   precedence: 2, assoc: Assoc::Left,  hidden: false },
    QOp { name: "/",        eval: OpEval::Binary(e_div),         check: Some(OpCheck::Binary(c_div0)),          precedence: 3, assoc: Assoc::Left,  hidden: false },
    QOp { name: "<",        eval: OpEval::Binary(e_less),        check: None,                                   precedence: 2, assoc: Assoc::Left,  hidden: false },
    QOp { name: "<<",       eval: OpEval::Binary(e_shl),         check: None,                                   precedence: 4, assoc: Assoc::Right, hidden: false },
    QOp { name: "<=",       eval: OpEval::Binary(e_eqless),      check: None,                                   precedence: 2, assoc: Assoc::Left,  hidden: false },
    QOp { name: "==",       eval: OpEval::Binary(e_equal),       check: None,                                   precedence: 2, assoc: Assoc::Left,  hidden: false },
    QOp { name: ">",        eval: OpEval::Binary(e_more),        check: None,                                   precedence: 2, assoc: Assoc::Left,  hidden: false },
    QOp { name: ">=",       eval: OpEval::Binary(e_eqmore),      check: None,                                   precedence: 2, assoc: Assoc::Left,  hidden: false },
    QOp { name: ">>",       eval: OpEval::Binary(e_shr),         check: None,                                   precedence: 4, assoc: Assoc::Right, hidden: false },
    QOp { name: "^",        eval: OpEval::Binary(e_xor),         check: None,                                   precedence: 2, assoc: Assoc::Left,  hidden: false },
    QOp { name: "_div",     eval: OpEval::Binary(e_cordic_div),  check: Some(OpCheck::Binary(c_div0)),          precedence: 5, assoc: Assoc::Right, hidden: true },
    QOp { name: "_exp",     eval: OpEval::Unary(e_cordic_exp),   check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: true },
    QOp { name: "_ln",      eval: OpEval::Unary(e_cordic_ln),    check: Some(OpCheck::Unary(c_not_less_equal_zero)), precedence: 5, assoc: Assoc::Right, hidden: true },
    QOp { name: "_mul",     eval: OpEval::Binary(e_cordic_mul),  check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: true },
    QOp { name: "_sqrt",    eval: OpEval::Unary(e_cordic_sqrt),  check: Some(OpCheck::Unary(c_not_less_zero)),  precedence: 5, assoc: Assoc::Right, hidden: true },
    QOp { name: "abs",      eval: OpEval::Unary(e_abs),          check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "acos",     eval: OpEval::Unary(e_acos),         check: Some(OpCheck::Unary(c_abs_less_equal_one)), precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "acosh",    eval: OpEval::Unary(e_acosh),        check: Some(OpCheck::Unary(c_not_less_one)),   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "arshift",  eval: OpEval::Binary(e_arshift),     check: None,                                   precedence: 4, assoc: Assoc::Right, hidden: true },
    QOp { name: "asin",     eval: OpEval::Unary(e_asin),         check: Some(OpCheck::Unary(c_abs_less_equal_one)), precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "asinh",    eval: OpEval::Unary(e_asinh),        check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "atan",     eval: OpEval::Unary(e_atan),         check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "atan2",    eval: OpEval::Binary(e_atan2),       check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: true },
    QOp { name: "atanh",    eval: OpEval::Unary(e_atanh),        check: Some(OpCheck::Unary(c_abs_less_equal_one)), precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "base",     eval: OpEval::Unary(e_base),         check: None,                                   precedence: 2, assoc: Assoc::Right, hidden: false },
    QOp { name: "ceil",     eval: OpEval::Unary(e_ceil),         check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "copysign", eval: OpEval::Binary(e_copysign),    check: None,                                   precedence: 4, assoc: Assoc::Right, hidden: true },
    QOp { name: "cos",      eval: OpEval::Unary(e_cos),          check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "cosh",     eval: OpEval::Unary(e_cosh),         check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "cot",      eval: OpEval::Unary(e_cot),          check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "deg2rad",  eval: OpEval::Unary(e_deg2rad),      check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "even?",    eval: OpEval::Unary(e_is_even),      check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "exp",      eval: OpEval::Unary(e_exp),          check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "floor",    eval: OpEval::Unary(e_floor),        check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "hypot",    eval: OpEval::Binary(e_hypot),       check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "int?",     eval: OpEval::Unary(e_is_integer),   check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "log",      eval: OpEval::Unary(e_log),          check: Some(OpCheck::Unary(c_not_less_equal_zero)), precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "logical",  eval: OpEval::Unary(e_logical),      check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "lshift",   eval: OpEval::Binary(e_shl),         check: None,                                   precedence: 4, assoc: Assoc::Right, hidden: true },
    QOp { name: "max",      eval: OpEval::Binary(e_max),         check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: true },
    QOp { name: "min",      eval: OpEval::Binary(e_min),         check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: true },
    QOp { name: "mod",      eval: OpEval::Binary(e_mod),         check: Some(OpCheck::Binary(c_div0)),          precedence: 3, assoc: Assoc::Left,  hidden: false },
    QOp { name: "neg?",     eval: OpEval::Unary(e_is_negative),  check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "negate",   eval: OpEval::Unary(e_negate),       check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "odd?",     eval: OpEval::Unary(e_is_odd),       check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "places",   eval: OpEval::Unary(e_places),       check: None,                                   precedence: 2, assoc: Assoc::Right, hidden: false },
    QOp { name: "pos?",     eval: OpEval::Unary(e_is_positive),  check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "pow",      eval: OpEval::Binary(e_pow),         check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "rad2deg",  eval: OpEval::Unary(e_rad2deg),      check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "rem",      eval: OpEval::Binary(e_rem),         check: Some(OpCheck::Binary(c_div0)),          precedence: 3, assoc: Assoc::Left,  hidden: false },
    QOp { name: "round",    eval: OpEval::Unary(e_round),        check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "rshift",   eval: OpEval::Binary(e_shr),         check: None,                                   precedence: 4, assoc: Assoc::Right, hidden: true },
    QOp { name: "sign",     eval: OpEval::Unary(e_sign),         check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "signum",   eval: OpEval::Unary(e_signum),       check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "sin",      eval: OpEval::Unary(e_sin),          check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "sinh",     eval: OpEval::Unary(e_sinh),         check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "sqrt",     eval: OpEval::Unary(e_sqrt),         check: Some(OpCheck::Unary(c_not_less_zero)),  precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "tan",      eval: OpEval::Unary(e_tan),          check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "tanh",     eval: OpEval::Unary(e_tanh),         check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "trunc",    eval: OpEval::Unary(e_trunc),        check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
    QOp { name: "|",        eval: OpEval::Binary(e_or),          check: None,                                   precedence: 2, assoc: Assoc::Left,  hidden: false },
    QOp { name: "~",        eval: OpEval::Unary(e_invert),       check: None,                                   precedence: 5, assoc: Assoc::Right, hidden: false },
];
