//! Staged normalization pipeline for symbolic expressions
//!
//! Normalization rewrites expressions into a canonical form so that:
//! - equal inputs print identically
//! - like terms and repeated factors are combined
//! - printed output is predictable

use crate::coeff::Coefficient;
use crate::expr::{SymExpr, SymExprKind};
use crate::order::{compare_factors, compare_terms, split_coeff};
use serde::{Deserialize, Serialize};

/// A normalization pass that can be applied to an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormPass {
    /// Rewrite `-x` as `(-1)*x`
    SimplifyNeg,
    /// Flatten nested Add/Mul operations
    Flatten,
    /// Fold numeric constants
    MergeConstants,
    /// Remove identity elements (x + 0 = x, x * 1 = x)
    RemoveIdentity,
    /// x^0 = 1, x^1 = x, (x^a)^n = x^(a*n), (x*y)^n = x^n*y^n
    SimplifyPowers,
    /// Combine repeated factors (x*x = x^2)
    CollectPowers,
    /// Combine like terms (x + x = 2*x)
    CollectLikeTerms,
    /// Distribute a numeric coefficient over a sum: 2*(x + y) = 2*x + 2*y
    DistributeCoefficient,
    /// Expand products of sums
    Expand,
    /// Sort terms/factors in canonical order
    Sort,
}

/// Staged normalization engine
///
/// Passes run in order; the whole sequence repeats until the expression
/// stops changing or `max_rounds` is reached.
#[derive(Debug, Clone)]
pub struct StagedNormalizer {
    passes: Vec<NormPass>,
    max_rounds: usize,
}

impl StagedNormalizer {
    pub fn new(passes: Vec<NormPass>) -> Self {
        StagedNormalizer {
            passes,
            max_rounds: 1,
        }
    }

    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds.max(1);
        self
    }

    /// Automatic simplification applied to every parsed value
    pub fn canonical() -> Self {
        Self::new(vec![
            NormPass::SimplifyNeg,
            NormPass::Flatten,
            NormPass::MergeConstants,
            NormPass::RemoveIdentity,
            NormPass::SimplifyPowers,
            NormPass::CollectPowers,
            NormPass::CollectLikeTerms,
            NormPass::DistributeCoefficient,
            NormPass::Sort,
        ])
        .with_max_rounds(32)
    }

    /// Canonical pipeline plus expansion of products of sums
    pub fn aggressive() -> Self {
        Self::new(vec![
            NormPass::SimplifyNeg,
            NormPass::Flatten,
            NormPass::MergeConstants,
            NormPass::RemoveIdentity,
            NormPass::SimplifyPowers,
            NormPass::Expand,
            NormPass::Flatten,
            NormPass::CollectPowers,
            NormPass::CollectLikeTerms,
            NormPass::MergeConstants,
            NormPass::DistributeCoefficient,
            NormPass::Sort,
        ])
        .with_max_rounds(32)
    }

    pub fn normalize(&self, expr: SymExpr) -> SymExpr {
        let mut current = expr;
        for round in 0..self.max_rounds {
            let start = current.clone();
            for pass in &self.passes {
                current = apply_pass(&current, *pass);
            }
            if current == start {
                log::trace!("normalized in {} round(s): {current}", round + 1);
                break;
            }
        }
        current
    }
}

impl Default for StagedNormalizer {
    fn default() -> Self {
        Self::canonical()
    }
}

fn apply_pass(expr: &SymExpr, pass: NormPass) -> SymExpr {
    match pass {
        NormPass::SimplifyNeg => simplify_neg(expr),
        NormPass::Flatten => flatten(expr),
        NormPass::MergeConstants => merge_constants(expr),
        NormPass::RemoveIdentity => remove_identity(expr),
        NormPass::SimplifyPowers => simplify_powers(expr),
        NormPass::CollectPowers => collect_powers(expr),
        NormPass::CollectLikeTerms => collect_like_terms(expr),
        NormPass::DistributeCoefficient => distribute_coefficient(expr),
        NormPass::Expand => expand(expr),
        NormPass::Sort => sort_terms(expr),
    }
}

/// Rebuild `expr` with `f` applied to every direct child
fn map_children(expr: &SymExpr, f: impl Fn(&SymExpr) -> SymExpr) -> SymExpr {
    match expr.kind.as_ref() {
        SymExprKind::Add(terms) => SymExpr::add(terms.iter().map(&f).collect()),
        SymExprKind::Mul(factors) => SymExpr::mul(factors.iter().map(&f).collect()),
        SymExprKind::Pow(base, exp) => SymExpr::pow(f(base), f(exp)),
        SymExprKind::Neg(inner) => SymExpr::neg(f(inner)),
        SymExprKind::Func(name, args) => SymExpr::func(name.clone(), args.iter().map(&f).collect()),
        SymExprKind::Num(_) | SymExprKind::Var(_) => expr.clone(),
    }
}

fn simplify_neg(expr: &SymExpr) -> SymExpr {
    match expr.kind.as_ref() {
        SymExprKind::Neg(inner) => {
            let inner = simplify_neg(inner);
            match inner.as_coeff() {
                Some(c) => SymExpr::num(-c.clone()),
                None => SymExpr::mul(vec![SymExpr::int(-1), inner]),
            }
        }
        _ => map_children(expr, simplify_neg),
    }
}

fn flatten(expr: &SymExpr) -> SymExpr {
    fn splice(items: &[SymExpr], nested: fn(&SymExpr) -> Option<&Vec<SymExpr>>) -> Vec<SymExpr> {
        let mut out = Vec::with_capacity(items.len());
        for item in items.iter().map(flatten) {
            match nested(&item) {
                Some(inner) => out.extend(inner.iter().cloned()),
                None => out.push(item),
            }
        }
        out
    }

    match expr.kind.as_ref() {
        SymExprKind::Add(terms) => SymExpr::add(splice(terms, |e| match e.kind.as_ref() {
            SymExprKind::Add(inner) => Some(inner),
            _ => None,
        })),
        SymExprKind::Mul(factors) => SymExpr::mul(splice(factors, |e| match e.kind.as_ref() {
            SymExprKind::Mul(inner) => Some(inner),
            _ => None,
        })),
        _ => map_children(expr, flatten),
    }
}

fn merge_constants(expr: &SymExpr) -> SymExpr {
    match expr.kind.as_ref() {
        SymExprKind::Add(terms) => {
            let mut sum = Coefficient::int(0);
            let mut non_const = Vec::new();

            for t in terms {
                let merged = merge_constants(t);
                if let Some(c) = merged.as_coeff() {
                    sum = sum + c.clone();
                } else {
                    non_const.push(merged);
                }
            }

            if !sum.is_zero() {
                non_const.insert(0, SymExpr::num(sum));
            }
            SymExpr::add(non_const)
        }
        SymExprKind::Mul(factors) => {
            let mut prod = Coefficient::int(1);
            let mut non_const = Vec::new();

            for f in factors {
                let merged = merge_constants(f);
                if let Some(c) = merged.as_coeff() {
                    prod = prod * c.clone();
                } else {
                    non_const.push(merged);
                }
            }

            if prod.is_zero() {
                return SymExpr::int(0);
            }
            if !prod.is_one() {
                non_const.insert(0, SymExpr::num(prod));
            }
            SymExpr::mul(non_const)
        }
        SymExprKind::Pow(base, exp) => {
            let new_base = merge_constants(base);
            let new_exp = merge_constants(exp);

            if let (Some(bc), Some(ec)) = (new_base.as_coeff(), new_exp.as_coeff()) {
                if let Some(value) = bc.checked_pow(ec) {
                    return SymExpr::num(value);
                }
            }
            SymExpr::pow(new_base, new_exp)
        }
        _ => map_children(expr, merge_constants),
    }
}

fn remove_identity(expr: &SymExpr) -> SymExpr {
    let simplified = map_children(expr, remove_identity);
    match simplified.kind.as_ref() {
        SymExprKind::Add(terms) if terms.iter().any(SymExpr::is_zero) => {
            SymExpr::add(terms.iter().filter(|t| !t.is_zero()).cloned().collect())
        }
        SymExprKind::Mul(factors) if factors.iter().any(SymExpr::is_zero) => SymExpr::int(0),
        SymExprKind::Mul(factors) if factors.iter().any(SymExpr::is_one) => {
            SymExpr::mul(factors.iter().filter(|f| !f.is_one()).cloned().collect())
        }
        SymExprKind::Neg(inner) if inner.is_zero() => SymExpr::int(0),
        _ => simplified,
    }
}

fn simplify_powers(expr: &SymExpr) -> SymExpr {
    match expr.kind.as_ref() {
        SymExprKind::Pow(base, exp) => {
            let new_base = simplify_powers(base);
            let new_exp = simplify_powers(exp);

            if new_exp.is_zero() {
                return SymExpr::int(1);
            }
            if new_exp.is_one() {
                return new_base;
            }
            if new_base.is_one() {
                return SymExpr::int(1);
            }
            // 0^n = 0 for n > 0
            if new_base.is_zero() {
                if let Some(c) = new_exp.as_coeff() {
                    if !c.is_negative() {
                        return SymExpr::int(0);
                    }
                }
            }

            let integer_exp = new_exp.as_coeff().and_then(Coefficient::as_integer);
            if integer_exp.is_some() {
                match new_base.kind.as_ref() {
                    // (x^a)^n = x^(a*n)
                    SymExprKind::Pow(inner_base, inner_exp) => {
                        return SymExpr::pow(
                            inner_base.clone(),
                            SymExpr::mul(vec![inner_exp.clone(), new_exp]),
                        );
                    }
                    // (x*y)^n = x^n * y^n
                    SymExprKind::Mul(factors) => {
                        return SymExpr::mul(
                            factors
                                .iter()
                                .map(|f| SymExpr::pow(f.clone(), new_exp.clone()))
                                .collect(),
                        );
                    }
                    _ => {}
                }
            }

            SymExpr::pow(new_base, new_exp)
        }
        _ => map_children(expr, simplify_powers),
    }
}

fn collect_powers(expr: &SymExpr) -> SymExpr {
    let SymExprKind::Mul(factors) = expr.kind.as_ref() else {
        return map_children(expr, collect_powers);
    };

    let mut numbers = Vec::new();
    // (base, exponents, original factors) in first-seen order
    let mut groups: Vec<(SymExpr, Vec<SymExpr>, Vec<SymExpr>)> = Vec::new();

    for f in factors.iter().map(collect_powers) {
        if f.is_num() {
            numbers.push(f);
            continue;
        }
        let (base, exp) = match f.kind.as_ref() {
            SymExprKind::Pow(b, e) => (b.clone(), e.clone()),
            _ => (f.clone(), SymExpr::int(1)),
        };
        match groups.iter_mut().find(|(b, _, _)| *b == base) {
            Some((_, exps, originals)) => {
                exps.push(exp);
                originals.push(f);
            }
            None => groups.push((base, vec![exp], vec![f])),
        }
    }

    let mut out = numbers;
    for (base, exps, mut originals) in groups {
        if originals.len() == 1 {
            out.append(&mut originals);
            continue;
        }
        let total = if exps.iter().all(SymExpr::is_num) {
            let sum = exps
                .iter()
                .filter_map(SymExpr::as_coeff)
                .fold(Coefficient::int(0), |acc, c| acc + c.clone());
            SymExpr::num(sum)
        } else {
            SymExpr::add(exps)
        };
        if total.is_zero() {
            continue;
        }
        out.push(SymExpr::pow(base, total));
    }
    SymExpr::mul(out)
}

fn collect_like_terms(expr: &SymExpr) -> SymExpr {
    let SymExprKind::Add(terms) = expr.kind.as_ref() else {
        return map_children(expr, collect_like_terms);
    };

    let mut groups: Vec<(SymExpr, Coefficient)> = Vec::new();
    let mut const_sum = Coefficient::int(0);

    for t in terms {
        let collected = collect_like_terms(t);

        if let Some(c) = collected.as_coeff() {
            const_sum = const_sum + c.clone();
            continue;
        }

        let (coeff, rest) = split_coeff(&collected);
        let base = SymExpr::mul(rest);
        match groups.iter_mut().find(|(b, _)| *b == base) {
            Some((_, c)) => *c = c.clone() + coeff,
            None => groups.push((base, coeff)),
        }
    }

    let mut result = Vec::new();
    if !const_sum.is_zero() {
        result.push(SymExpr::num(const_sum));
    }

    for (base, coeff) in groups {
        if coeff.is_zero() {
            continue;
        }
        if coeff.is_one() {
            result.push(base);
            continue;
        }
        // Keep the product flat so repeated rounds reach a fixpoint
        let mut factors = vec![SymExpr::num(coeff)];
        match base.kind.as_ref() {
            SymExprKind::Mul(inner) => factors.extend(inner.iter().cloned()),
            _ => factors.push(base.clone()),
        }
        result.push(SymExpr::mul(factors));
    }

    SymExpr::add(result)
}

fn distribute_coefficient(expr: &SymExpr) -> SymExpr {
    let distributed = map_children(expr, distribute_coefficient);
    if let SymExprKind::Mul(factors) = distributed.kind.as_ref() {
        if let [a, b] = factors.as_slice() {
            let pair = match (a.as_coeff(), b.as_coeff()) {
                (Some(c), None) => Some((c, b)),
                (None, Some(c)) => Some((c, a)),
                _ => None,
            };
            if let Some((c, other)) = pair {
                if let SymExprKind::Add(terms) = other.kind.as_ref() {
                    return SymExpr::add(
                        terms
                            .iter()
                            .map(|t| SymExpr::mul(vec![SymExpr::num(c.clone()), t.clone()]))
                            .collect(),
                    );
                }
            }
        }
    }
    distributed
}

/// Largest power of a sum that expansion multiplies out
const MAX_EXPAND_POWER: i64 = 8;

fn expand(expr: &SymExpr) -> SymExpr {
    match expr.kind.as_ref() {
        SymExprKind::Mul(factors) => {
            let expanded_factors: Vec<_> = factors.iter().map(expand).collect();

            let add_idx = expanded_factors.iter().position(SymExpr::is_add);

            if let Some(idx) = add_idx {
                if let SymExprKind::Add(terms) = expanded_factors[idx].kind.as_ref() {
                    // (a + b) * rest = a * rest + b * rest
                    let mut new_terms = Vec::new();
                    for t in terms {
                        let mut new_factors = expanded_factors.clone();
                        new_factors[idx] = t.clone();
                        new_terms.push(expand(&SymExpr::mul(new_factors)));
                    }
                    return SymExpr::add(new_terms);
                }
            }

            SymExpr::mul(expanded_factors)
        }
        SymExprKind::Pow(base, exp) => {
            let new_base = expand(base);
            let new_exp = expand(exp);

            let n = new_exp.as_coeff().and_then(Coefficient::as_integer);
            if let Some(n @ 2..=MAX_EXPAND_POWER) = n {
                if new_base.is_add() {
                    let copies = usize::try_from(n).unwrap_or(2);
                    return expand(&SymExpr::mul(vec![new_base; copies]));
                }
            }

            SymExpr::pow(new_base, new_exp)
        }
        _ => map_children(expr, expand),
    }
}

fn sort_terms(expr: &SymExpr) -> SymExpr {
    match expr.kind.as_ref() {
        SymExprKind::Add(terms) => {
            let mut sorted: Vec<_> = terms.iter().map(sort_terms).collect();
            sorted.sort_by(compare_terms);
            SymExpr::add(sorted)
        }
        SymExprKind::Mul(factors) => {
            let mut sorted: Vec<_> = factors.iter().map(sort_terms).collect();
            sorted.sort_by(compare_factors);
            SymExpr::mul(sorted)
        }
        _ => map_children(expr, sort_terms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> SymExpr {
        SymExpr::var("x")
    }

    fn y() -> SymExpr {
        SymExpr::var("y")
    }

    fn canonical(expr: SymExpr) -> String {
        StagedNormalizer::canonical().normalize(expr).to_string()
    }

    #[test]
    fn test_flatten() {
        let nested = SymExpr::add(vec![x(), SymExpr::add(vec![y(), SymExpr::var("z")])]);
        let flat = flatten(&nested);

        if let SymExprKind::Add(terms) = flat.kind.as_ref() {
            assert_eq!(terms.len(), 3);
        } else {
            panic!("Expected Add");
        }
    }

    #[test]
    fn test_merge_constants() {
        let expr = SymExpr::add(vec![SymExpr::int(1), SymExpr::int(2), x()]);
        let merged = merge_constants(&expr);

        if let SymExprKind::Add(terms) = merged.kind.as_ref() {
            assert_eq!(terms[0], SymExpr::int(3));
        } else {
            panic!("Expected Add");
        }
    }

    #[test]
    fn test_simplify_powers() {
        let x_pow_1 = SymExpr::pow(x(), SymExpr::int(1));
        assert!(simplify_powers(&x_pow_1).is_var());

        let x_pow_0 = SymExpr::pow(x(), SymExpr::int(0));
        assert!(simplify_powers(&x_pow_0).is_one());
    }

    #[test]
    fn test_like_terms() {
        assert_eq!(canonical(SymExpr::add(vec![x(), SymExpr::int(0), x()])), "2*x");
        assert_eq!(canonical(SymExpr::sub(x(), x())), "0");
    }

    #[test]
    fn test_repeated_factors() {
        assert_eq!(canonical(SymExpr::mul(vec![x(), x()])), "x**2");
        assert_eq!(canonical(SymExpr::div(x(), x())), "1");
    }

    #[test]
    fn test_coefficient_distributes_over_sum() {
        let expr = SymExpr::mul(vec![SymExpr::int(2), SymExpr::add(vec![x(), y()])]);
        assert_eq!(canonical(expr), "2*x + 2*y");
    }

    #[test]
    fn test_products_of_sums_stay_factored() {
        let expr = SymExpr::mul(vec![x(), SymExpr::add(vec![x(), y()])]);
        assert_eq!(canonical(expr), "x*(x + y)");
    }

    #[test]
    fn test_nested_powers() {
        let expr = SymExpr::pow(SymExpr::pow(x(), SymExpr::int(2)), SymExpr::int(3));
        assert_eq!(canonical(expr), "x**6");

        let expr = SymExpr::pow(SymExpr::mul(vec![SymExpr::int(2), x()]), SymExpr::int(2));
        assert_eq!(canonical(expr), "4*x**2");
    }

    #[test]
    fn test_expand() {
        let expr = SymExpr::pow(SymExpr::add(vec![x(), SymExpr::int(1)]), SymExpr::int(2));
        let expanded = StagedNormalizer::aggressive().normalize(expr);
        assert_eq!(expanded.to_string(), "x**2 + 2*x + 1");
    }
}
