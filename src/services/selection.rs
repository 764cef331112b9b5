//! Index range selection used to split work between contributors.

use thiserror::Error;

/// Errors from parsing a range selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("invalid number '{0}' in range selection (examples: '1-25', '1,5,10-15', 'all', '50')")]
    InvalidNumber(String),
    #[error("empty element in range selection '{0}'")]
    EmptyPart(String),
}

/// Parses a 1-based selection into sorted, deduplicated 0-based indices.
///
/// Accepted forms: `""` or `all` (everything), `50`, `1-25`, and
/// comma-separated combinations such as `1,5,10-15`. Ranges are inclusive
/// and clamped to `1..=len`; single numbers outside that span are ignored.
///
/// # Errors
///
/// Returns [`SelectionError`] for non-numeric or empty elements.
pub fn parse_range(input: &str, len: usize) -> Result<Vec<usize>, SelectionError> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("all") {
        return Ok((0..len).collect());
    }

    let mut selected = Vec::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Err(SelectionError::EmptyPart(input.to_string()));
        }

        if let Some((start, end)) = part.split_once('-') {
            let start = parse_number(start)?.max(1);
            let end = parse_number(end)?.min(len);
            if start <= end {
                selected.extend(start - 1..end);
            }
        } else {
            let number = parse_number(part)?;
            if (1..=len).contains(&number) {
                selected.push(number - 1);
            }
        }
    }

    selected.sort_unstable();
    selected.dedup();
    Ok(selected)
}

fn parse_number(raw: &str) -> Result<usize, SelectionError> {
    let raw = raw.trim();
    raw.parse()
        .map_err(|_| SelectionError::InvalidNumber(raw.to_string()))
}

/// Picks the selected items, preserving their order.
#[must_use]
pub fn select<'a, T>(items: &'a [T], indices: &[usize]) -> Vec<&'a T> {
    indices.iter().filter_map(|&i| items.get(i)).collect()
}
