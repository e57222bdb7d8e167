//! Canonical ordering of sum terms and product factors
//!
//! Sum terms follow lexicographic monomial order: higher powers of
//! alphabetically earlier symbols come first, pure constants come last.
//! Product factors put numbers first, then symbols, functions and sums.

use crate::coeff::Coefficient;
use crate::expr::{SymExpr, SymExprKind};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Split a product into its numeric coefficient and remaining factors
pub(crate) fn split_coeff(term: &SymExpr) -> (Coefficient, Vec<SymExpr>) {
    match term.kind.as_ref() {
        SymExprKind::Num(c) => (c.clone(), Vec::new()),
        SymExprKind::Mul(factors) => {
            let mut coeff = Coefficient::int(1);
            let mut rest = Vec::new();
            for f in factors {
                match f.as_coeff() {
                    Some(c) => coeff = coeff * c.clone(),
                    None => rest.push(f.clone()),
                }
            }
            (coeff, rest)
        }
        _ => (Coefficient::int(1), vec![term.clone()]),
    }
}

struct Monomial {
    degrees: BTreeMap<String, f64>,
    other: Vec<String>,
}

fn monomial(factors: &[SymExpr]) -> Monomial {
    let mut degrees = BTreeMap::new();
    let mut other = Vec::new();
    for f in factors {
        match f.kind.as_ref() {
            SymExprKind::Var(s) => *degrees.entry(s.name.clone()).or_insert(0.0) += 1.0,
            SymExprKind::Pow(base, exp) => match (base.as_var(), exp.as_coeff()) {
                (Some(s), Some(c)) => *degrees.entry(s.name.clone()).or_insert(0.0) += c.to_f64(),
                _ => other.push(f.to_string()),
            },
            _ => other.push(f.to_string()),
        }
    }
    Monomial { degrees, other }
}

/// Order of two terms of a sum; `Less` means `a` is printed first.
pub(crate) fn compare_terms(a: &SymExpr, b: &SymExpr) -> Ordering {
    let (ca, fa) = split_coeff(a);
    let (cb, fb) = split_coeff(b);
    let ma = monomial(&fa);
    let mb = monomial(&fb);

    let names: BTreeSet<&String> = ma.degrees.keys().chain(mb.degrees.keys()).collect();
    for name in names {
        let ea = ma.degrees.get(name).copied().unwrap_or(0.0);
        let eb = mb.degrees.get(name).copied().unwrap_or(0.0);
        match eb.total_cmp(&ea) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }

    // Same monomial: symbolic leftovers before bare numbers
    ma.other
        .is_empty()
        .cmp(&mb.other.is_empty())
        .then_with(|| ma.other.cmp(&mb.other))
        .then_with(|| ca.cmp(&cb))
}

fn factor_rank(e: &SymExpr) -> u8 {
    match e.kind.as_ref() {
        SymExprKind::Num(_) => 0,
        SymExprKind::Var(_) => 1,
        SymExprKind::Func(_, _) => 2,
        SymExprKind::Add(_) => 3,
        SymExprKind::Pow(base, _) => factor_rank(base).max(1),
        SymExprKind::Mul(_) | SymExprKind::Neg(_) => 4,
    }
}

fn factor_base(e: &SymExpr) -> &SymExpr {
    match e.kind.as_ref() {
        SymExprKind::Pow(base, _) => base,
        _ => e,
    }
}

/// Order of two factors of a product
pub(crate) fn compare_factors(a: &SymExpr, b: &SymExpr) -> Ordering {
    factor_rank(a)
        .cmp(&factor_rank(b))
        .then_with(|| match (a.as_coeff(), b.as_coeff()) {
            (Some(ca), Some(cb)) => ca.cmp(cb),
            _ => factor_base(a)
                .to_string()
                .cmp(&factor_base(b).to_string()),
        })
        .then_with(|| a.to_string().cmp(&b.to_string()))
}
