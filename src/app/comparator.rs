// src/app/comparator.rs
// Row comparison for column sorting. Cells are untyped text, so each pair of cells is
// classified (empty, integer, duration, text) before it is compared.

use crate::app::state::{Row, SortKey};
use chrono::Duration;
use log::warn;
use regex::Regex;
use std::{
    cell::{Cell, RefCell},
    cmp::Ordering,
    sync::OnceLock,
};
use thiserror::Error;

/// Shape of a duration cell: days, hours, minutes, seconds, each optional, in that order.
fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:([0-9]+)日)?(?:([0-9]+)時間)?(?:([0-9]+)分)?(?:([0-9]+)秒)?$")
            .expect("duration pattern is valid")
    })
}

/// What a cell's text looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    /// ASCII digits only.
    Integer,
    /// Matches the `日/時間/分/秒` pattern.
    Duration,
    Text,
}

/// Classifies one cell. Integer takes precedence over duration.
pub fn classify(cell: &str) -> CellKind {
    if cell.is_empty() {
        CellKind::Empty
    } else if cell.bytes().all(|b| b.is_ascii_digit()) {
        CellKind::Integer
    } else if duration_pattern().is_match(cell) {
        CellKind::Duration
    } else {
        CellKind::Text
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("'{0}' is not a duration")]
    NotADuration(String),
    #[error("'{0}' uses an unsupported combination of duration components")]
    UnsupportedLayout(String),
    #[error("'{0}' is out of range")]
    OutOfRange(String),
}

/// Parses a duration cell into a normalized duration.
///
/// Only the layouts `S秒`, `M分S秒`, `H時間M分` and `D日H時間M分` are accepted.
/// Components are not range checked, so `90秒` is a minute and a half.
pub fn parse_duration(cell: &str) -> Result<Duration, DurationParseError> {
    let caps = duration_pattern()
        .captures(cell)
        .ok_or_else(|| DurationParseError::NotADuration(cell.to_string()))?;

    let component = |i: usize| -> Result<Option<i64>, DurationParseError> {
        caps.get(i)
            .map(|m| {
                m.as_str()
                    .parse::<i64>()
                    .map_err(|_| DurationParseError::OutOfRange(cell.to_string()))
            })
            .transpose()
    };
    let parts = (component(1)?, component(2)?, component(3)?, component(4)?);

    let (days, hours, minutes, seconds) = match parts {
        (None, None, None, Some(s)) => (0, 0, 0, s),
        (None, None, Some(m), Some(s)) => (0, 0, m, s),
        (None, Some(h), Some(m), None) => (0, h, m, 0),
        (Some(d), Some(h), Some(m), None) => (d, h, m, 0),
        _ => return Err(DurationParseError::UnsupportedLayout(cell.to_string())),
    };

    days.checked_mul(86_400)
        .and_then(|total| total.checked_add(hours.checked_mul(3_600)?))
        .and_then(|total| total.checked_add(minutes.checked_mul(60)?))
        .and_then(|total| total.checked_add(seconds))
        .and_then(Duration::try_seconds)
        .ok_or_else(|| DurationParseError::OutOfRange(cell.to_string()))
}

/// Numeric order for digit strings of any length.
fn compare_integers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compares two cells. Empty cells sort last in both directions.
///
/// A cell pair that looks like durations but fails to parse is logged and compared as text.
pub fn compare_cells(a: &str, b: &str, key: SortKey) -> Ordering {
    let (ordering, fault) = compare_cells_checked(a, b, key);
    if let Some(e) = fault {
        warn!("Duration comparison fell back to text in column {}: {}", key.column, e);
    }
    ordering
}

/// `compare_cells` without the logging: a duration parse fault is handed back instead.
fn compare_cells_checked(a: &str, b: &str, key: SortKey) -> (Ordering, Option<DurationParseError>) {
    let ordering = match (classify(a), classify(b)) {
        (CellKind::Empty, CellKind::Empty) => Ordering::Equal,
        (CellKind::Empty, _) => Ordering::Greater,
        (_, CellKind::Empty) => Ordering::Less,
        (CellKind::Integer, CellKind::Integer) => key.direction.apply(compare_integers(a, b)),
        (CellKind::Duration, CellKind::Duration) => match (parse_duration(a), parse_duration(b)) {
            (Ok(da), Ok(db)) => key.direction.apply(da.cmp(&db)),
            // TODO: surface malformed duration cells instead of quietly sorting them as text.
            (Err(e), _) | (_, Err(e)) => return (key.direction.apply(a.cmp(b)), Some(e)),
        },
        _ => key.direction.apply(a.cmp(b)),
    };
    (ordering, None)
}

/// The cell at `column`, or `""` when the row is too short.
fn cell(row: &Row, column: usize) -> &str {
    row.get(column).map_or("", String::as_str)
}

/// Compares two rows at the key's column. A missing cell counts as empty.
pub fn compare_rows(a: &Row, b: &Row, key: SortKey) -> Ordering {
    compare_cells(cell(a, key.column), cell(b, key.column), key)
}

/// Stable sort of a whole body by `key`. Returns how many comparisons fell back from
/// duration to text; they are reported in a single warning per pass.
///
/// Mixed integer and text cells can make the comparison cyclic (`9 < 10`, `10 < 1a`,
/// `1a < 9`), so this uses a merge sort that accepts any comparison result.
pub fn sort_rows(body: &mut Vec<Row>, key: SortKey) -> usize {
    let fallbacks = Cell::new(0usize);
    let first_fault = RefCell::new(None);

    let rows = std::mem::take(body);
    *body = merge_sort(rows, &|a: &Row, b: &Row| {
        let (ordering, fault) =
            compare_cells_checked(cell(a, key.column), cell(b, key.column), key);
        if let Some(e) = fault {
            fallbacks.set(fallbacks.get() + 1);
            first_fault.borrow_mut().get_or_insert(e);
        }
        ordering
    });

    let fallbacks = fallbacks.get();
    if let Some(e) = first_fault.into_inner() {
        warn!(
            "{} duration comparisons in column {} fell back to text (first: {}).",
            fallbacks, key.column, e
        );
    }
    fallbacks
}

fn merge_sort(mut rows: Vec<Row>, cmp: &dyn Fn(&Row, &Row) -> Ordering) -> Vec<Row> {
    if rows.len() <= 1 {
        return rows;
    }
    let right = rows.split_off(rows.len() / 2);
    let mut left = merge_sort(rows, cmp).into_iter().peekable();
    let mut right = merge_sort(right, cmp).into_iter().peekable();

    let mut merged = Vec::with_capacity(left.len() + right.len());
    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let take_right = cmp(r, l) == Ordering::Less;
        merged.extend(if take_right { right.next() } else { left.next() });
    }
    merged.extend(left);
    merged.extend(right);
    merged
}
