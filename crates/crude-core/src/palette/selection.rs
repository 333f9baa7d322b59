//! Keyboard selection over rendered rows, skipping separators.

use super::results::Row;

fn entry_indices(rows: &[Row]) -> impl DoubleEndedIterator<Item = usize> + '_ {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| !row.is_separator())
        .map(|(i, _)| i)
}

/// Row index after `current`, wrapping from the last entry row to the first.
/// With no current selection, the first entry row.
pub fn next_entry_row(rows: &[Row], current: Option<usize>) -> Option<usize> {
    let first = entry_indices(rows).next()?;
    let Some(current) = current else {
        return Some(first);
    };
    Some(entry_indices(rows).find(|&i| i > current).unwrap_or(first))
}

/// Row index before `current`, wrapping from the first entry row to the last.
/// With no current selection, the last entry row.
pub fn previous_entry_row(rows: &[Row], current: Option<usize>) -> Option<usize> {
    let last = entry_indices(rows).next_back()?;
    let Some(current) = current else {
        return Some(last);
    };
    Some(entry_indices(rows).rev().find(|&i| i < current).unwrap_or(last))
}
