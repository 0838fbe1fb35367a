//! Canonical row ordering for order-insensitive comparison.

use crate::normalize::{Cell, Number, Row};
use std::cmp::Ordering;

/// Per-cell sort key. Null is keyed as empty text, so it sorts first in
/// its position; text sorts before numbers.
#[derive(Debug, Clone, Copy)]
enum SortKey<'a> {
    Text(&'a str),
    Number(Number),
}

impl<'a> From<&'a Cell> for SortKey<'a> {
    fn from(cell: &'a Cell) -> Self {
        match cell {
            Cell::Null => SortKey::Text(""),
            Cell::Text(s) => SortKey::Text(s),
            Cell::Number(n) => SortKey::Number(*n),
        }
    }
}

impl Ord for SortKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.cmp_value(b),
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Less,
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for SortKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey<'_> {}

/// Lexicographic comparison of two rows by their sort keys. Rows whose keys
/// tie are split by null position, so a null orders before an empty string
/// and only rows with equal cells compare equal.
pub fn cmp_rows(a: &[Cell], b: &[Cell]) -> Ordering {
    a.iter()
        .map(SortKey::from)
        .cmp(b.iter().map(SortKey::from))
        .then_with(|| {
            let present = |c: &Cell| !c.is_null();
            a.iter().map(present).cmp(b.iter().map(present))
        })
}

/// Stable sort; the rows themselves are returned unchanged.
pub fn sort_rows(mut rows: Vec<Row>) -> Vec<Row> {
    rows.sort_by(|a, b| cmp_rows(a, b));
    rows
}
