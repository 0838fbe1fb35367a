//! Canonical cell representation used for result comparison.
//!
//! Every value a case can produce (SQLite columns) or declare (JSON rows in
//! the suite) is narrowed to [`Cell`]: null, a number, or text. Values
//! outside those three kinds are rendered to text; the coercion is one-way
//! and exists only so both sides of a comparison share a type.

use rusqlite::types::{Value as SqlValue, ValueRef};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

pub type Row = Vec<Cell>;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

/// `2^63`, the first real above every `i64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

impl Number {
    /// Exact numeric ordering across integer and real, with no rounding of
    /// the integer side. `-0.0` equals `0.0`; NaN sorts at the ends the way
    /// `f64::total_cmp` places it.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        match (*self, *other) {
            (Number::Integer(a), Number::Integer(b)) => a.cmp(&b),
            (Number::Real(a), Number::Real(b)) => cmp_reals(a, b),
            (Number::Integer(a), Number::Real(b)) => cmp_int_real(a, b),
            (Number::Real(a), Number::Integer(b)) => cmp_int_real(b, a).reverse(),
        }
    }
}

fn cmp_reals(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

fn cmp_int_real(i: i64, r: f64) -> Ordering {
    if r.is_nan() {
        return if r.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if r >= I64_BOUND {
        return Ordering::Less;
    }
    if r < -I64_BOUND {
        return Ordering::Greater;
    }
    // In range, so the integral part converts without loss.
    let whole = r.trunc();
    i.cmp(&(whole as i64)).then_with(|| {
        let frac = r - whole;
        if frac > 0.0 {
            Ordering::Less
        } else if frac < 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

/// Integer and real compare by exact value, so `1 == 1.0` but
/// `2^53 + 1 != 2^53 as f64`.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_value(other) == Ordering::Equal
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Integer(i) => write!(f, "{i}"),
            Number::Real(r) => f.write_str(&format_real(r)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Number(Number),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

/// Table rendering: null prints as empty text.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Conversion of a source value into its canonical [`Cell`].
///
/// Implementations must be total.
pub trait IntoCell {
    fn into_cell(self) -> Cell;
}

impl IntoCell for Cell {
    fn into_cell(self) -> Cell {
        self
    }
}

impl IntoCell for &Cell {
    fn into_cell(self) -> Cell {
        self.clone()
    }
}

impl IntoCell for ValueRef<'_> {
    fn into_cell(self) -> Cell {
        match self {
            ValueRef::Null => Cell::Null,
            ValueRef::Integer(i) => Cell::Number(Number::Integer(i)),
            ValueRef::Real(f) => Cell::Number(Number::Real(f)),
            ValueRef::Text(bytes) => Cell::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Cell::Text(blob_literal(bytes)),
        }
    }
}

impl IntoCell for SqlValue {
    fn into_cell(self) -> Cell {
        ValueRef::from(&self).into_cell()
    }
}

impl IntoCell for &serde_json::Value {
    fn into_cell(self) -> Cell {
        use serde_json::Value;
        match self {
            Value::Null => Cell::Null,
            Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Number(Number::Integer(i)),
                None => match n.as_f64() {
                    Some(f) => Cell::Number(Number::Real(f)),
                    None => Cell::Text(n.to_string()),
                },
            },
            Value::String(s) => Cell::Text(s.clone()),
            Value::Bool(b) => Cell::Text(b.to_string()),
            Value::Array(_) | Value::Object(_) => Cell::Text(self.to_string()),
        }
    }
}

impl IntoCell for serde_json::Value {
    fn into_cell(self) -> Cell {
        match self {
            serde_json::Value::String(s) => Cell::Text(s),
            other => (&other).into_cell(),
        }
    }
}

pub fn normalize<V: IntoCell>(value: V) -> Cell {
    value.into_cell()
}

pub fn normalize_rows<R, V>(rows: impl IntoIterator<Item = R>) -> Vec<Row>
where
    R: IntoIterator<Item = V>,
    V: IntoCell,
{
    rows.into_iter()
        .map(|row| row.into_iter().map(normalize).collect())
        .collect()
}

/// Renders a blob the way SQLite's `quote()` does: `X'0A1B'`.
fn blob_literal(bytes: &[u8]) -> String {
    format!("X'{}'", hex::encode_upper(bytes))
}

/// Float text in the conventional shortest-repr style: integral values keep
/// a `.0`, very large or very small magnitudes switch to `1e+16` notation.
pub fn format_real(r: f64) -> String {
    if !r.is_finite() {
        return if r.is_nan() {
            "nan".into()
        } else if r > 0.0 {
            "inf".into()
        } else {
            "-inf".into()
        };
    }
    let abs = r.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        let sci = format!("{r:e}");
        return match sci.split_once('e') {
            Some((mantissa, exp)) => {
                let exp: i32 = exp.parse().unwrap_or(0);
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            None => sci,
        };
    }
    if r.fract() == 0.0 {
        format!("{r:.1}")
    } else {
        format!("{r}")
    }
}
