//! Text rendering of symbolic expressions
//!
//! Output follows the conventional computer-algebra `str` style:
//! `x**2`, `3*x/2`, `1/x`, `sqrt(x)`, `x - y`.

use crate::coeff::Coefficient;
use crate::expr::{SymExpr, SymExprKind};
use std::fmt;

const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_POW: u8 = 3;
const PREC_ATOM: u8 = 4;

impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

fn precedence(e: &SymExpr) -> u8 {
    match e.kind.as_ref() {
        SymExprKind::Num(c) => {
            if c.is_negative() {
                PREC_ADD
            } else if matches!(c, Coefficient::Rational(_, d) if *d != 1) {
                PREC_MUL
            } else {
                PREC_ATOM
            }
        }
        SymExprKind::Var(_) | SymExprKind::Func(_, _) => PREC_ATOM,
        SymExprKind::Add(_) | SymExprKind::Neg(_) => PREC_ADD,
        SymExprKind::Mul(_) => {
            if render_mul(e).0 {
                PREC_ADD
            } else {
                PREC_MUL
            }
        }
        SymExprKind::Pow(_, exp) => match exp.as_coeff() {
            Some(Coefficient::Rational(1, 2)) => PREC_ATOM,
            Some(Coefficient::Rational(-1, 1)) | Some(Coefficient::Rational(-1, 2)) => PREC_MUL,
            _ => PREC_POW,
        },
    }
}

/// Render `e`, wrapping it in parentheses when it binds looser than `min_prec`
fn paren(e: &SymExpr, min_prec: u8) -> String {
    if precedence(e) < min_prec {
        format!("({})", render(e))
    } else {
        render(e)
    }
}

fn render(e: &SymExpr) -> String {
    match e.kind.as_ref() {
        SymExprKind::Num(c) => c.to_string(),
        SymExprKind::Var(s) => s.name.clone(),
        SymExprKind::Add(terms) => render_add(terms),
        SymExprKind::Mul(_) => {
            let (negative, body) = render_mul(e);
            if negative {
                format!("-{body}")
            } else {
                body
            }
        }
        SymExprKind::Pow(base, exp) => render_pow(base, exp),
        SymExprKind::Neg(inner) => format!("-{}", paren(inner, PREC_MUL)),
        SymExprKind::Func(name, args) => {
            let args: Vec<_> = args.iter().map(render).collect();
            format!("{name}({})", args.join(", "))
        }
    }
}

/// Split a term into sign and magnitude text
fn render_signed(term: &SymExpr) -> (bool, String) {
    match term.kind.as_ref() {
        SymExprKind::Num(c) if c.is_negative() => (true, c.abs().to_string()),
        SymExprKind::Mul(_) => render_mul(term),
        SymExprKind::Neg(inner) => (true, paren(inner, PREC_MUL)),
        _ => (false, render(term)),
    }
}

fn render_add(terms: &[SymExpr]) -> String {
    let mut out = String::new();
    for (i, term) in terms.iter().enumerate() {
        let (negative, body) = render_signed(term);
        match (i, negative) {
            (0, true) => out.push('-'),
            (0, false) => {}
            (_, true) => out.push_str(" - "),
            (_, false) => out.push_str(" + "),
        }
        out.push_str(&body);
    }
    out
}

fn render_mul(e: &SymExpr) -> (bool, String) {
    let SymExprKind::Mul(factors) = e.kind.as_ref() else {
        return (false, render(e));
    };

    let mut coeff = Coefficient::int(1);
    let mut numerators = Vec::new();
    let mut denominators = Vec::new();
    for f in factors {
        match f.kind.as_ref() {
            SymExprKind::Num(c) => coeff = coeff * c.clone(),
            SymExprKind::Pow(base, exp) if exp.as_coeff().is_some_and(Coefficient::is_negative) => {
                let flipped = exp.as_coeff().map(|c| -c.clone()).unwrap_or_default();
                denominators.push((base, flipped));
            }
            _ => numerators.push(f),
        }
    }

    let negative = coeff.is_negative();
    let coeff = coeff.abs();

    let mut num_items = Vec::new();
    let mut den_items = Vec::new();
    match &coeff {
        Coefficient::Rational(p, q) => {
            if *p != 1 || (numerators.is_empty() && denominators.is_empty()) {
                num_items.push(p.to_string());
            }
            if *q != 1 {
                den_items.push(q.to_string());
            }
        }
        Coefficient::Float(_) => {
            if !coeff.is_one() || (numerators.is_empty() && denominators.is_empty()) {
                num_items.push(coeff.to_string());
            }
        }
    }
    num_items.extend(numerators.iter().map(|f| paren(f, PREC_MUL)));
    for (base, exp) in &denominators {
        if exp.is_one() {
            den_items.push(paren(base, PREC_MUL));
        } else {
            den_items.push(render_pow(base, &SymExpr::num(exp.clone())));
        }
    }

    let numerator = if num_items.is_empty() {
        "1".to_string()
    } else {
        num_items.join("*")
    };
    let body = match den_items.len() {
        0 => numerator,
        1 => format!("{numerator}/{}", den_items[0]),
        _ => format!("{numerator}/({})", den_items.join("*")),
    };
    (negative, body)
}

fn render_pow(base: &SymExpr, exp: &SymExpr) -> String {
    match exp.as_coeff() {
        Some(Coefficient::Rational(1, 2)) => return format!("sqrt({})", render(base)),
        Some(Coefficient::Rational(-1, 2)) => return format!("1/sqrt({})", render(base)),
        Some(Coefficient::Rational(-1, 1)) => return format!("1/{}", paren(base, PREC_ATOM)),
        _ => {}
    }
    // Power is right associative, so a power base always needs parentheses
    let base_text = paren(base, PREC_ATOM);
    let exp_text = paren(exp, PREC_ATOM);
    format!("{base_text}**{exp_text}")
}
