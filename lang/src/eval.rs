//! Two-stack shunting-yard evaluator.
//!
//! Numbers and operators go to separate bounded stacks; popping an
//! operator runs its precondition check and folds one or two numbers.
//! The first error wins: once the error slot is set every stack
//! operation is a no-op, the stacks are left as they were for
//! inspection, and the caller gets the buffered message.

use crate::lexer::{Lexer, Token};
use crate::ops::{qop, Assoc, OpCheck, OpEval, QOp};
use qfix_core::{QConf, Q};
use std::fmt;
use std::ptr;

pub const DEFAULT_STACK_SIZE: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExprError {
    pub message: String,
}

impl ExprError {
    pub fn code(&self) -> &'static str {
        "E_EXPR"
    }
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub struct Variable {
    pub name: String,
    pub value: Q,
}

pub struct Evaluator {
    ops: Vec<&'static QOp>,
    numbers: Vec<Q>,
    max_depth: usize,
    vars: Vec<Variable>,
    /// Conversion settings for number literals; the `base` and
    /// `places` operators mutate this.
    pub conf: QConf,
    hide_internal: bool,
    error: Option<ExprError>,
    lpar: &'static QOp,
    rpar: &'static QOp,
    negate: &'static QOp,
    minus: &'static QOp,
}

fn variable_name_is_valid(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Evaluator {
    pub fn new(max_depth: usize) -> Self {
        let max_depth = if max_depth == 0 {
            DEFAULT_STACK_SIZE
        } else {
            max_depth
        };
        // the sentinel operators are fixed rows of the static table
        let lpar = qop("(").expect("operator table entry \"(\"");
        let rpar = qop(")").expect("operator table entry \")\"");
        let negate = qop("negate").expect("operator table entry \"negate\"");
        let minus = qop("-").expect("operator table entry \"-\"");
        Self {
            ops: Vec::with_capacity(max_depth),
            numbers: Vec::with_capacity(max_depth),
            max_depth,
            vars: Vec::new(),
            conf: QConf::default(),
            hide_internal: false,
            error: None,
            lpar,
            rpar,
            negate,
            minus,
        }
    }

    /// Evaluator preloaded with the constants table as named variables.
    pub fn with_constants(max_depth: usize) -> Self {
        let mut e = Self::new(max_depth);
        let presets: [(&str, Q); 11] = [
            ("whole", Q::from_int(Q::WHOLE_BITS as i32)),
            ("fractional", Q::from_int(Q::FRAC_BITS as i32)),
            ("bit", Q::BIT),
            ("smallest", Q::MIN),
            ("biggest", Q::MAX),
            ("pi", Q::PI),
            ("e", Q::E),
            ("sqrt2", Q::SQRT2),
            ("sqrt3", Q::SQRT3),
            ("ln2", Q::LN2),
            ("ln10", Q::LN10),
        ];
        for (name, value) in presets {
            let _added = e.add_variable(name, value);
            debug_assert!(_added.is_ok());
        }
        e
    }

    /// Reject the hidden (internal) operators during evaluation.
    pub fn set_hide_internal(&mut self, hide: bool) {
        self.hide_internal = hide;
    }

    /// Define or overwrite a named variable.
    pub fn add_variable(&mut self, name: &str, value: Q) -> Result<(), ExprError> {
        if let Some(v) = self.vars.iter_mut().find(|v| v.name == name) {
            v.value = value;
            return Ok(());
        }
        if !variable_name_is_valid(name) {
            return Err(ExprError {
                message: format!("invalid variable name: {name}"),
            });
        }
        self.vars.push(Variable {
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Option<Q> {
        self.vars.iter().find(|v| v.name == name).map(|v| v.value)
    }

    pub fn error(&self) -> Option<&ExprError> {
        self.error.as_ref()
    }

    /// Evaluate one expression. Stacks and the error slot are reset on
    /// entry; variables and configuration persist between calls.
    pub fn eval(&mut self, expr: &str) -> Result<Q, ExprError> {
        self.error = None;
        self.ops.clear();
        self.numbers.clear();

        let mut lexer = Lexer::new(expr, self.conf);
        let mut firstop = true;
        let mut previous: Option<&'static QOp> = None;

        while self.error.is_none() {
            let token = match lexer.next_token() {
                Ok(token) => token,
                Err(err) => {
                    self.fail(format!("invalid symbol: {}", err.text));
                    break;
                }
            };
            match token {
                Token::End => break,
                Token::Number(q) => {
                    self.push_number(q);
                    previous = None;
                    firstop = false;
                }
                Token::Ident(name) => {
                    if let Some(value) = self.variable(&name) {
                        self.push_number(value);
                        previous = None;
                        firstop = false;
                    } else if let Some(op) = qop(&name) {
                        previous = Some(self.handle_operator(op, firstop, previous));
                        firstop = false;
                    } else {
                        self.fail(format!("invalid symbol: {name}"));
                        break;
                    }
                }
                Token::Op(op) => {
                    previous = Some(self.handle_operator(op, firstop, previous));
                    firstop = false;
                }
            }
        }

        while !self.ops.is_empty() {
            if !self.op_eval() || self.error.is_some() {
                break;
            }
        }
        if self.error.is_none() && self.numbers.len() != 1 {
            self.fail(format!("invalid expression: {}", self.numbers.len()));
        }
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.numbers[0]),
        }
    }

    /// A minus at the start of input or right after any operator but
    /// `)` is the unary negate; other binary operators there are a
    /// syntax error.
    fn handle_operator(
        &mut self,
        op: &'static QOp,
        firstop: bool,
        previous: Option<&'static QOp>,
    ) -> &'static QOp {
        let mut op = op;
        if self.hide_internal && op.hidden {
            self.fail(format!("unknown operator \"{}\"", op.name));
            return op;
        }
        let unary_position =
            firstop || previous.map(|p| !ptr::eq(p, self.rpar)).unwrap_or(false);
        if unary_position {
            if ptr::eq(op, self.minus) {
                op = self.negate;
            } else if op.arity() == 1 {
                // prefix operator, fine as-is
            } else if !ptr::eq(op, self.lpar) {
                self.fail(format!("invalid use of \"{}\"", op.name));
                return op;
            }
        }
        self.shunt(op);
        op
    }

    fn shunt(&mut self, op: &'static QOp) {
        if ptr::eq(op, self.lpar) {
            self.push_op(op);
            return;
        }
        if ptr::eq(op, self.rpar) {
            while self
                .ops
                .last()
                .map(|top| !ptr::eq(*top, self.lpar))
                .unwrap_or(false)
            {
                if !self.op_eval() || self.error.is_some() {
                    break;
                }
            }
            if self.error.is_some() {
                return;
            }
            match self.pop_op() {
                Some(popped) if ptr::eq(popped, self.lpar) => {}
                _ => {
                    self.error = None;
                    self.fail("expected \"(\"".to_string());
                }
            }
            return;
        }
        if op.assoc == Assoc::Right {
            while self
                .ops
                .last()
                .map(|top| op.precedence < top.precedence)
                .unwrap_or(false)
            {
                if !self.op_eval() || self.error.is_some() {
                    break;
                }
            }
        } else {
            while self
                .ops
                .last()
                .map(|top| op.precedence <= top.precedence)
                .unwrap_or(false)
            {
                if !self.op_eval() || self.error.is_some() {
                    break;
                }
            }
        }
        self.push_op(op);
    }

    /// Pop one operator and fold it into the number stack.
    fn op_eval(&mut self) -> bool {
        let Some(op) = self.pop_op() else {
            return false;
        };
        let Some(a) = self.pop_number() else {
            return false;
        };
        match op.eval {
            OpEval::None => {
                self.fail("syntax error".to_string());
                false
            }
            OpEval::Unary(eval) => {
                if let Some(OpCheck::Unary(check)) = op.check {
                    if let Err(message) = check(a) {
                        self.fail(message.to_string());
                        return false;
                    }
                }
                let result = eval(self, a);
                self.push_number(result)
            }
            OpEval::Binary(eval) => {
                let Some(b) = self.pop_number() else {
                    return false;
                };
                if let Some(OpCheck::Binary(check)) = op.check {
                    if let Err(message) = check(b, a) {
                        self.fail(message.to_string());
                        return false;
                    }
                }
                let result = eval(self, b, a);
                self.push_number(result)
            }
        }
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(ExprError { message });
        }
    }

    fn push_number(&mut self, q: Q) -> bool {
        if self.error.is_some() {
            return false;
        }
        if self.numbers.len() >= self.max_depth {
            self.fail("number stack overflow".to_string());
            return false;
        }
        self.numbers.push(q);
        true
    }

    fn pop_number(&mut self) -> Option<Q> {
        if self.error.is_some() {
            return None;
        }
        let popped = self.numbers.pop();
        if popped.is_none() {
            self.fail("number stack empty".to_string());
        }
        popped
    }

    fn push_op(&mut self, op: &'static QOp) -> bool {
        if self.error.is_some() {
            return false;
        }
        if self.ops.len() >= self.max_depth {
            self.fail("operator stack overflow".to_string());
            return false;
        }
        self.ops.push(op);
        true
    }

    fn pop_op(&mut self) -> Option<&'static QOp> {
        if self.error.is_some() {
            return None;
        }
        let popped = self.ops.pop();
        if popped.is_none() {
            self.fail("operator stack empty".to_string());
        }
        popped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> Evaluator {
        let mut e = Evaluator::new(DEFAULT_STACK_SIZE);
        e.add_variable("a", Q::from_int(3)).unwrap();
        e.add_variable("b", Q::from_int(4)).unwrap();
        e.add_variable("c", Q::from_int(-5)).unwrap();
        e
    }

    fn eval_ok(expr: &str) -> Q {
        evaluator().eval(expr).unwrap()
    }

    fn eval_err(expr: &str) -> ExprError {
        evaluator().eval(expr).unwrap_err()
    }

    #[test]
    fn built_in_self_test_table() {
        // (expect-error, result, expression)
        let table: &[(bool, i32, &str)] = &[
            (true, 0, ""),
            (true, 0, "("),
            (true, 0, ")"),
            (true, 0, "2**3"),
            (false, 0, "0"),
            (false, 2, "1+1"),
            (false, -1, "-1"),
            (false, 1, "--1"),
            (false, 14, "2+(3*4)"),
            (false, 23, "a+(b*5)"),
            (true, 0, "(2+(3* 4)"),
            (true, 0, "2+(3*4)("),
            (false, 14, "2+3*4"),
            (false, 0, "  2==3 "),
            (false, 1, "2 ==2"),
            (false, 1, "2== (1+1)"),
            (false, 20, "(2+3)*4"),
            (false, -4, "(2+(-3))*4"),
            (true, 0, "1/0"),
            (true, 0, "1%0"),
            (false, 50, "100/2"),
            (false, 2, "1--1"),
            (false, 0, "1---1"),
        ];
        for &(is_err, result, expr) in table {
            let got = evaluator().eval(expr);
            if is_err {
                assert!(got.is_err(), "{expr:?} should fail, got {got:?}");
            } else {
                assert_eq!(got, Ok(Q::from_int(result)), "{expr:?}");
            }
        }
    }

    #[test]
    fn division_by_zero_names_the_fault() {
        assert_eq!(eval_err("1/0").message, "division by zero");
        assert_eq!(eval_err("5 mod 0").message, "division by zero");
        assert_eq!(eval_err("(1/0)").message, "division by zero");
    }

    #[test]
    fn unary_checks_fire() {
        assert_eq!(eval_err("sqrt -1").message, "negative argument");
        assert_eq!(eval_err("log 0").message, "negative or zero argument");
        assert_eq!(eval_err("asin 2").message, "out of range [-1, 1]");
        assert_eq!(eval_err("acosh 0").message, "out of range [1, INF]");
    }

    #[test]
    fn unary_minus_chains() {
        assert_eq!(eval_ok("-1"), Q::from_int(-1));
        assert_eq!(eval_ok("--1"), Q::from_int(1));
        assert_eq!(eval_ok("1---1"), Q::ZERO);
        assert_eq!(eval_ok("-1 + 2"), Q::ONE);
        assert_eq!(eval_ok("2*-3"), Q::from_int(-6));
    }

    #[test]
    fn named_functions_apply_prefix() {
        assert_eq!(eval_ok("abs(c)"), Q::from_int(5));
        assert_eq!(eval_ok("abs c"), Q::from_int(5));
        assert_eq!(eval_ok("floor(2.7)"), Q::from_int(2));
        assert_eq!(eval_ok("round 2.5"), Q::from_int(3));
        assert!(eval_ok("sin 0").approx_eq(Q::ZERO, Q::from_raw(0x10)));
        assert_eq!(eval_ok("odd? 3"), Q::ONE);
        assert_eq!(eval_ok("even? 3"), Q::ZERO);
        assert_eq!(eval_ok("int? 2.5"), Q::ZERO);
        assert_eq!(eval_ok("neg? c"), Q::ONE);
        assert_eq!(eval_ok("pos? b"), Q::ONE);
    }

    #[test]
    fn infix_named_binaries() {
        assert_eq!(eval_ok("2 pow 3").round(), Q::from_int(8));
        assert_eq!(eval_ok("1 min 2"), Q::ONE);
        assert_eq!(eval_ok("1 max 2"), Q::from_int(2));
        assert_eq!(eval_ok("7 rem 3"), Q::ONE);
        assert_eq!(eval_ok("-7 mod 3"), Q::from_int(2));
        assert!(eval_ok("3 hypot 4").approx_eq(Q::from_int(5), Q::from_raw(0x40)));
    }

    #[test]
    fn bitwise_and_shifts() {
        assert_eq!(eval_ok("1 << 2"), Q::from_int(4));
        assert_eq!(eval_ok("4 >> 2"), Q::ONE);
        assert_eq!(eval_ok("! 0"), Q::ONE);
        assert_eq!(eval_ok("! 5"), Q::ZERO);
        assert_eq!(eval_ok("logical 5"), Q::ONE);
        assert_eq!(eval_ok("logical 0"), Q::ZERO);
        assert_eq!(eval_ok("logical 0.5"), Q::ONE);
        let ones = eval_ok("~ 0");
        assert_eq!(ones.raw(), -1);
    }

    #[test]
    fn preset_constants() {
        let mut e = Evaluator::with_constants(0);
        assert_eq!(e.eval("pi"), Ok(Q::PI));
        assert_eq!(e.eval("biggest"), Ok(Q::MAX));
        assert_eq!(e.eval("smallest"), Ok(Q::MIN));
        assert!(e
            .eval("sin(pi)")
            .unwrap()
            .approx_eq(Q::ZERO, Q::from_raw(0x10)));
        assert!(e
            .eval("e")
            .unwrap()
            .approx_eq(Q::E, Q::BIT));
    }

    #[test]
    fn hidden_operators_can_be_rejected() {
        let mut e = evaluator();
        assert!(e.eval("1 min 2").is_ok());
        e.set_hide_internal(true);
        let err = e.eval("1 min 2").unwrap_err();
        assert_eq!(err.message, "unknown operator \"min\"");
        // non-hidden names still work
        assert!(e.eval("1 + 2").is_ok());
    }

    #[test]
    fn base_and_places_adjust_the_next_expression() {
        let mut e = evaluator();
        assert_eq!(e.eval("base 16"), Ok(Q::from_int(16)));
        assert_eq!(e.conf.base, 16);
        assert_eq!(e.eval("10"), Ok(Q::from_int(16)));
        assert_eq!(e.eval("base 99"), Ok(Q::from_int(-1)));
        assert_eq!(e.conf.base, 16);
        assert_eq!(e.eval("places 2"), Ok(Q::from_int(2)));
        assert_eq!(e.conf.dp, 2);
    }

    #[test]
    fn stack_depth_is_bounded() {
        let mut e = Evaluator::new(4);
        let err = e.eval("1+(2+(3+(4+(5+(6+7)))))").unwrap_err();
        assert!(err.message.contains("stack overflow"), "{}", err.message);
    }

    #[test]
    fn variables_persist_and_overwrite() {
        let mut e = evaluator();
        assert_eq!(e.eval("a+b"), Ok(Q::from_int(7)));
        e.add_variable("a", Q::from_int(10)).unwrap();
        assert_eq!(e.eval("a+b"), Ok(Q::from_int(14)));
        assert!(e.add_variable("9bad", Q::ZERO).is_err());
        assert!(e.add_variable("_ok", Q::ZERO).is_ok());
    }

    #[test]
    fn overflow_policy_applies_to_arithmetic() {
        use qfix_core::Bound;
        let mut e = Evaluator::with_constants(0);
        assert_eq!(e.eval("biggest + 1"), Ok(Q::MAX));
        e.conf.bound = Bound::Wrap;
        let wrapped = e.eval("biggest + 1").unwrap();
        assert!(wrapped.is_negative());
    }

    #[test]
    fn first_error_wins() {
        let mut e = evaluator();
        let err = e.eval("1/0 + sqrt -1").unwrap_err();
        assert_eq!(err.message, "division by zero");
        assert!(e.error().is_some());
        // a later successful eval clears the slot
        assert_eq!(e.eval("1"), Ok(Q::ONE));
        assert!(e.error().is_none());
    }
}
