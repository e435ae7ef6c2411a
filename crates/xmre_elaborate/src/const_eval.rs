//! A small constant-expression evaluator for port and signal bit-ranges.
//!
//! Only needs to handle what actually shows up in a `[msb:lsb]` range:
//! integer literals, parameter references, and simple arithmetic. Anything
//! wider (casts, concatenations, function calls other than `$clog2`) falls
//! back to `None` and the caller assumes a 1-bit declaration.

use std::collections::HashMap;

use xmre_common::{Ident, Interner};
use xmre_source::SourceDb;
use xmre_sv::ast::{BinaryOp, Expr, UnaryOp};

/// Parameter name -> constant value bindings visible while evaluating a
/// module's declarations.
pub type ConstEnv = HashMap<Ident, i64>;

/// Evaluates an expression to a constant integer, given the current
/// parameter bindings.
pub fn eval_const_expr(
    expr: &Expr,
    source_db: &SourceDb,
    interner: &Interner,
    env: &ConstEnv,
) -> Option<i64> {
    match expr {
        Expr::Literal { span } => parse_verilog_literal(source_db.snippet(*span)),
        Expr::Identifier { name, .. } => env.get(name).copied(),
        Expr::Paren { inner, .. } => eval_const_expr(inner, source_db, interner, env),
        Expr::Unary { op, operand, .. } => {
            let v = eval_const_expr(operand, source_db, interner, env)?;
            Some(match op {
                UnaryOp::Plus => v,
                UnaryOp::Minus => -v,
                UnaryOp::BitNot => !v,
                UnaryOp::LogNot => i64::from(v == 0),
                _ => return None,
            })
        }
        Expr::Binary { left, op, right, .. } => {
            let l = eval_const_expr(left, source_db, interner, env)?;
            let r = eval_const_expr(right, source_db, interner, env)?;
            match op {
                BinaryOp::Add => Some(l + r),
                BinaryOp::Sub => Some(l - r),
                BinaryOp::Mul => Some(l * r),
                BinaryOp::Div if r != 0 => Some(l / r),
                BinaryOp::Mod if r != 0 => Some(l % r),
                BinaryOp::Pow => Some(l.checked_pow(r.max(0) as u32).unwrap_or(0)),
                BinaryOp::Shl => Some(l << r.max(0)),
                BinaryOp::Shr => Some(l >> r.max(0)),
                BinaryOp::BitAnd => Some(l & r),
                BinaryOp::BitOr => Some(l | r),
                BinaryOp::BitXor => Some(l ^ r),
                _ => None,
            }
        }
        Expr::SystemCall { name, args, .. } if args.len() == 1 => {
            if interner.resolve(*name) == "$clog2" {
                let v = eval_const_expr(&args[0], source_db, interner, env)?;
                Some(clog2(v))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Interns a parameter's resolved value so later declarations in the same
/// module can reference it.
pub fn bind_parameter(env: &mut ConstEnv, name: Ident, value: i64) {
    env.insert(name, value);
}

/// Parses a Verilog/SystemVerilog numeric literal from its source text.
///
/// Handles plain decimal (`42`), sized binary (`4'b1010`), sized hex
/// (`8'hFF`), sized octal (`8'o17`), sized decimal (`32'd100`), unsized
/// based literals (`'b1`), and underscore separators (`1_000`).
fn parse_verilog_literal(text: &str) -> Option<i64> {
    let text = text.replace('_', "");

    if let Some(tick_pos) = text.find('\'') {
        let after_tick = &text[tick_pos + 1..];
        if after_tick.is_empty() {
            return None;
        }
        let after_sign = if after_tick.starts_with(['s', 'S']) {
            &after_tick[1..]
        } else {
            after_tick
        };
        if after_sign.is_empty() {
            return None;
        }
        let base_char = after_sign.as_bytes()[0];
        let digits = &after_sign[1..];
        let radix = match base_char {
            b'b' | b'B' => 2,
            b'o' | b'O' => 8,
            b'd' | b'D' => 10,
            b'h' | b'H' => 16,
            _ => return None,
        };
        let clean: String = digits
            .chars()
            .filter_map(|c| match c {
                'x' | 'X' | 'z' | 'Z' | '?' => Some('0'),
                '_' => None,
                other => Some(other),
            })
            .collect();
        return i64::from_str_radix(&clean, radix).ok();
    }

    text.trim().parse::<i64>().ok()
}

fn clog2(n: i64) -> i64 {
    if n <= 1 {
        return 0;
    }
    let mut result = 0i64;
    let mut val = n - 1;
    while val > 0 {
        result += 1;
        val >>= 1;
    }
    result
}
