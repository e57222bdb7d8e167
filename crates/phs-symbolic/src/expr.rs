//! Symbolic expression trees

use crate::coeff::Coefficient;
use crate::symbol::Symbol;
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymExprKind {
    Num(Coefficient),
    Var(Symbol),
    Add(Vec<SymExpr>),
    Mul(Vec<SymExpr>),
    Pow(SymExpr, SymExpr),
    Neg(SymExpr),
    /// Application of a named function, e.g. `sin(x)`
    Func(String, Vec<SymExpr>),
}

/// Immutable symbolic expression; clones share the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymExpr {
    pub kind: Arc<SymExprKind>,
}

impl SymExpr {
    fn from_kind(kind: SymExprKind) -> Self {
        SymExpr {
            kind: Arc::new(kind),
        }
    }

    pub fn num(c: Coefficient) -> Self {
        Self::from_kind(SymExprKind::Num(c))
    }

    pub fn int(n: i64) -> Self {
        Self::num(Coefficient::int(n))
    }

    pub fn rational(num: i64, den: i64) -> Self {
        Self::num(Coefficient::rational(num, den))
    }

    pub fn float(f: f64) -> Self {
        Self::num(Coefficient::float(f))
    }

    pub fn var(name: &str) -> Self {
        Self::symbol(Symbol::new(name))
    }

    pub fn symbol(symbol: Symbol) -> Self {
        Self::from_kind(SymExprKind::Var(symbol))
    }

    /// Sum of terms; an empty sum is 0 and a single term is returned as-is.
    pub fn add(mut terms: Vec<SymExpr>) -> Self {
        match terms.len() {
            0 => Self::int(0),
            1 => terms.remove(0),
            _ => Self::from_kind(SymExprKind::Add(terms)),
        }
    }

    /// Product of factors; an empty product is 1 and a single factor is
    /// returned as-is.
    pub fn mul(mut factors: Vec<SymExpr>) -> Self {
        match factors.len() {
            0 => Self::int(1),
            1 => factors.remove(0),
            _ => Self::from_kind(SymExprKind::Mul(factors)),
        }
    }

    pub fn pow(base: SymExpr, exp: SymExpr) -> Self {
        Self::from_kind(SymExprKind::Pow(base, exp))
    }

    pub fn neg(inner: SymExpr) -> Self {
        Self::from_kind(SymExprKind::Neg(inner))
    }

    pub fn func(name: impl Into<String>, args: Vec<SymExpr>) -> Self {
        Self::from_kind(SymExprKind::Func(name.into(), args))
    }

    pub fn sub(lhs: SymExpr, rhs: SymExpr) -> Self {
        Self::add(vec![lhs, Self::neg(rhs)])
    }

    pub fn div(lhs: SymExpr, rhs: SymExpr) -> Self {
        Self::mul(vec![lhs, Self::pow(rhs, Self::int(-1))])
    }

    pub fn as_coeff(&self) -> Option<&Coefficient> {
        match self.kind.as_ref() {
            SymExprKind::Num(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<&Symbol> {
        match self.kind.as_ref() {
            SymExprKind::Var(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_num(&self) -> bool {
        matches!(self.kind.as_ref(), SymExprKind::Num(_))
    }

    pub fn is_var(&self) -> bool {
        matches!(self.kind.as_ref(), SymExprKind::Var(_))
    }

    pub fn is_add(&self) -> bool {
        matches!(self.kind.as_ref(), SymExprKind::Add(_))
    }

    pub fn is_mul(&self) -> bool {
        matches!(self.kind.as_ref(), SymExprKind::Mul(_))
    }

    pub fn is_zero(&self) -> bool {
        self.as_coeff().is_some_and(Coefficient::is_zero)
    }

    pub fn is_one(&self) -> bool {
        self.as_coeff().is_some_and(Coefficient::is_one)
    }

    /// Total number of nodes in the tree
    pub fn node_count(&self) -> usize {
        1 + match self.kind.as_ref() {
            SymExprKind::Num(_) | SymExprKind::Var(_) => 0,
            SymExprKind::Add(items) | SymExprKind::Mul(items) | SymExprKind::Func(_, items) => {
                items.iter().map(SymExpr::node_count).sum()
            }
            SymExprKind::Pow(base, exp) => base.node_count() + exp.node_count(),
            SymExprKind::Neg(inner) => inner.node_count(),
        }
    }

    /// Names of all variables appearing in the expression, sorted
    pub fn free_vars(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars(&self, out: &mut BTreeSet<String>) {
        match self.kind.as_ref() {
            SymExprKind::Num(_) => {}
            SymExprKind::Var(s) => {
                out.insert(s.name.clone());
            }
            SymExprKind::Add(items) | SymExprKind::Mul(items) | SymExprKind::Func(_, items) => {
                for item in items {
                    item.collect_vars(out);
                }
            }
            SymExprKind::Pow(base, exp) => {
                base.collect_vars(out);
                exp.collect_vars(out);
            }
            SymExprKind::Neg(inner) => inner.collect_vars(out),
        }
    }

    /// True if any numeric node is infinite or NaN
    pub fn has_non_finite(&self) -> bool {
        match self.kind.as_ref() {
            SymExprKind::Num(c) => !c.is_finite(),
            SymExprKind::Var(_) => false,
            SymExprKind::Add(items) | SymExprKind::Mul(items) | SymExprKind::Func(_, items) => {
                items.iter().any(SymExpr::has_non_finite)
            }
            SymExprKind::Pow(base, exp) => base.has_non_finite() || exp.has_non_finite(),
            SymExprKind::Neg(inner) => inner.has_non_finite(),
        }
    }
}

impl From<Coefficient> for SymExpr {
    fn from(c: Coefficient) -> Self {
        SymExpr::num(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_sums_and_products() {
        assert!(SymExpr::add(vec![]).is_zero());
        assert!(SymExpr::mul(vec![]).is_one());
        assert!(SymExpr::add(vec![SymExpr::var("x")]).is_var());
    }

    #[test]
    fn test_free_vars_sorted() {
        let expr = SymExpr::add(vec![
            SymExpr::var("y"),
            SymExpr::mul(vec![SymExpr::var("x"), SymExpr::func("sin", vec![SymExpr::var("a")])]),
        ]);
        let vars: Vec<_> = expr.free_vars().into_iter().collect();
        assert_eq!(vars, vec!["a", "x", "y"]);
    }

    #[test]
    fn test_node_count() {
        let expr = SymExpr::pow(SymExpr::var("x"), SymExpr::int(2));
        assert_eq!(expr.node_count(), 3);
    }
}
