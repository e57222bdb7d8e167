//! Numeric coefficients of symbolic expressions
//!
//! Integers and fractions stay exact; anything written with a decimal point
//! is a float and contaminates every operation it takes part in.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Integer `q`-th root of `n`, if it is exact
fn exact_root(n: i64, q: u32) -> Option<i64> {
    if n < 0 {
        if q % 2 == 0 {
            return None;
        }
        return n.checked_neg().and_then(|m| exact_root(m, q)).map(|r| -r);
    }
    let guess = (n as f64).powf(1.0 / f64::from(q)).round() as i64;
    (guess.saturating_sub(1)..=guess.saturating_add(1))
        .find(|r| *r >= 0 && r.checked_pow(q) == Some(n))
}

/// Greatest common divisor of the magnitudes; `u64` so that `i64::MIN`
/// has one
fn gcd(a: i64, b: i64) -> u64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// A numeric coefficient
///
/// Two coefficients of different kinds never compare equal: `1` and `1.0`
/// are distinct, which keeps `Eq` consistent with `Hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Coefficient {
    /// Exact rational number (numerator, denominator)
    /// Invariant: denominator > 0, gcd(num, den) == 1
    Rational(i64, i64),
    Float(f64),
}

impl Coefficient {
    pub fn int(n: i64) -> Self {
        Coefficient::Rational(n, 1)
    }

    /// Create a reduced rational; a zero denominator yields a signed
    /// infinity (or NaN for 0/0) which callers treat as a division by zero.
    pub fn rational(num: i64, den: i64) -> Self {
        if den == 0 {
            return Coefficient::Float(match num.cmp(&0) {
                Ordering::Greater => f64::INFINITY,
                Ordering::Less => f64::NEG_INFINITY,
                Ordering::Equal => f64::NAN,
            });
        }

        let (num, den) = if den < 0 {
            match (num.checked_neg(), den.checked_neg()) {
                (Some(num), Some(den)) => (num, den),
                _ => return Coefficient::Float(num as f64 / den as f64),
            }
        } else {
            (num, den)
        };
        // den > 0 bounds the divisor, so it fits back into i64
        let g = gcd(num, den) as i64;
        Coefficient::Rational(num / g, den / g)
    }

    pub fn float(f: f64) -> Self {
        Coefficient::Float(f)
    }

    /// Parse a numeric literal as written in an expression.
    ///
    /// Integer literals too large for `i64` fall back to floats.
    pub fn from_literal(lexeme: &str) -> Option<Self> {
        let is_float = lexeme.contains(['.', 'e', 'E']);
        if !is_float {
            if let Ok(n) = lexeme.parse::<i64>() {
                return Some(Coefficient::int(n));
            }
        }
        lexeme
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Coefficient::Float)
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Coefficient::Rational(n, _) => *n == 0,
            Coefficient::Float(f) => *f == 0.0,
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Coefficient::Rational(n, d) => *n == 1 && *d == 1,
            Coefficient::Float(f) => (*f - 1.0).abs() < 1e-15,
        }
    }

    pub fn is_neg_one(&self) -> bool {
        match self {
            Coefficient::Rational(n, d) => *n == -1 && *d == 1,
            Coefficient::Float(f) => (*f + 1.0).abs() < 1e-15,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Coefficient::Rational(n, _) => *n < 0,
            Coefficient::Float(f) => *f < 0.0,
        }
    }

    /// Exact integer (floats never count)
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Coefficient::Rational(n, 1) => Some(*n),
            _ => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Coefficient::Rational(_, _) => true,
            Coefficient::Float(f) => f.is_finite(),
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Coefficient::Float(_))
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Coefficient::Rational(n, d) => *n as f64 / *d as f64,
            Coefficient::Float(f) => *f,
        }
    }

    /// Power with integer exponent
    pub fn pow_int(&self, exp: i64) -> Self {
        let (n, d) = match self {
            Coefficient::Float(f) => return Coefficient::Float(f.powf(exp as f64)),
            Coefficient::Rational(n, d) => (*n, *d),
        };
        // x**-k == (1/x)**k
        let (n, d) = if exp < 0 { (d, n) } else { (n, d) };
        let approx = || (n as f64 / d as f64).powf(exp.unsigned_abs() as f64);
        match u32::try_from(exp.unsigned_abs()) {
            Ok(k) => exact_or_float(n.checked_pow(k), d.checked_pow(k), approx),
            Err(_) => Coefficient::Float(approx()),
        }
    }

    /// Power with a coefficient exponent.
    ///
    /// Returns `None` when the result cannot be represented exactly and no
    /// float is involved (e.g. `2**(1/2)`), so the caller can keep the
    /// power symbolic. Perfect roots such as `4**(1/2)` stay exact.
    pub fn checked_pow(&self, exp: &Coefficient) -> Option<Self> {
        match (self, exp) {
            (_, Coefficient::Rational(p, 1)) => Some(self.pow_int(*p)),
            (Coefficient::Rational(n, d), Coefficient::Rational(p, q)) => {
                let q = u32::try_from(*q).ok()?;
                let root = Coefficient::rational(exact_root(*n, q)?, exact_root(*d, q)?);
                Some(root.pow_int(*p))
            }
            _ => Some(Coefficient::Float(self.to_f64().powf(exp.to_f64()))),
        }
    }

    pub fn abs(&self) -> Self {
        match self {
            Coefficient::Rational(n, d) => match n.checked_abs() {
                Some(n) => Coefficient::Rational(n, *d),
                None => Coefficient::Float(self.to_f64().abs()),
            },
            Coefficient::Float(f) => Coefficient::Float(f.abs()),
        }
    }
}

impl PartialEq for Coefficient {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Coefficient::Rational(n1, d1), Coefficient::Rational(n2, d2)) => n1 == n2 && d1 == d2,
            (Coefficient::Float(f1), Coefficient::Float(f2)) => f1.to_bits() == f2.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Coefficient {}

impl PartialOrd for Coefficient {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coefficient {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_f64()
            .total_cmp(&other.to_f64())
            .then_with(|| self.is_float().cmp(&other.is_float()))
    }
}

impl std::hash::Hash for Coefficient {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Coefficient::Rational(n, d) => {
                state.write_u8(0);
                n.hash(state);
                d.hash(state);
            }
            Coefficient::Float(f) => {
                state.write_u8(1);
                f.to_bits().hash(state);
            }
        }
    }
}

impl Default for Coefficient {
    fn default() -> Self {
        Coefficient::int(0)
    }
}

impl From<i64> for Coefficient {
    fn from(n: i64) -> Self {
        Coefficient::int(n)
    }
}

impl From<f64> for Coefficient {
    fn from(f: f64) -> Self {
        Coefficient::Float(f)
    }
}

impl Neg for Coefficient {
    type Output = Coefficient;

    fn neg(self) -> Self::Output {
        match self {
            Coefficient::Rational(n, d) => match n.checked_neg() {
                Some(n) => Coefficient::Rational(n, d),
                None => Coefficient::Float(-(n as f64 / d as f64)),
            },
            Coefficient::Float(f) => Coefficient::Float(-f),
        }
    }
}

/// Exact result when every intermediate fits in `i64`, else the float
/// approximation
fn exact_or_float(num: Option<i64>, den: Option<i64>, approx: impl FnOnce() -> f64) -> Coefficient {
    match (num, den) {
        (Some(num), Some(den)) => Coefficient::rational(num, den),
        _ => Coefficient::Float(approx()),
    }
}

impl Add for Coefficient {
    type Output = Coefficient;

    fn add(self, rhs: Self) -> Self::Output {
        let (Coefficient::Rational(a, b), Coefficient::Rational(c, d)) = (&self, &rhs) else {
            return Coefficient::Float(self.to_f64() + rhs.to_f64());
        };
        let (a, b, c, d) = (*a, *b, *c, *d);
        let num = a
            .checked_mul(d)
            .zip(c.checked_mul(b))
            .and_then(|(ad, cb)| ad.checked_add(cb));
        exact_or_float(num, b.checked_mul(d), || self.to_f64() + rhs.to_f64())
    }
}

impl Sub for Coefficient {
    type Output = Coefficient;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Mul for Coefficient {
    type Output = Coefficient;

    fn mul(self, rhs: Self) -> Self::Output {
        let (Coefficient::Rational(a, b), Coefficient::Rational(c, d)) = (&self, &rhs) else {
            return Coefficient::Float(self.to_f64() * rhs.to_f64());
        };
        // Reduce crosswise first so the products stay small
        let g_ad = gcd(*a, *d).max(1) as i64;
        let g_cb = gcd(*c, *b).max(1) as i64;
        let (a, d) = (a / g_ad, d / g_ad);
        let (c, b) = (c / g_cb, b / g_cb);
        exact_or_float(a.checked_mul(c), b.checked_mul(d), || {
            self.to_f64() * rhs.to_f64()
        })
    }
}

impl Div for Coefficient {
    type Output = Coefficient;

    fn div(self, rhs: Self) -> Self::Output {
        match rhs {
            Coefficient::Rational(n, d) => self * Coefficient::rational(d, n),
            Coefficient::Float(f) => Coefficient::Float(self.to_f64() / f),
        }
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coefficient::Rational(n, 1) => write!(f, "{n}"),
            Coefficient::Rational(n, d) => write!(f, "{n}/{d}"),
            // Debug keeps a trailing `.0` on integral floats
            Coefficient::Float(v) => write!(f, "{v:?}"),
        }
    }
}
