//! Edit distance calculation.
//!
//! All functions compare `char`s, not bytes, and are case-sensitive; callers
//! that want case-insensitive matching lowercase both sides first.

use std::cmp::min;

/// Order two char slices as (longer, shorter).
fn longer_shorter<'a>(a: &'a [char], b: &'a [char]) -> (&'a [char], &'a [char]) {
    if a.len() >= b.len() { (a, b) } else { (b, a) }
}

/// Calculate the Levenshtein distance between two strings.
///
/// This is the minimum number of single-character insertions, deletions or
/// substitutions required to turn one string into the other. Only one row of
/// the dynamic programming table is kept, sized by the shorter string.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (long, short) = longer_shorter(&a_chars, &b_chars);

    if short.is_empty() {
        return long.len();
    }

    let mut row: Vec<usize> = (0..=short.len()).collect();

    for (i, &long_ch) in long.iter().enumerate() {
        // row[j] of the previous iteration, i.e. the diagonal cell
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, &short_ch) in short.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(long_ch != short_ch);

            row[j + 1] = min(
                min(
                    above + 1,  // deletion
                    row[j] + 1, // insertion
                ),
                diagonal + cost, // substitution
            );
            diagonal = above;
        }
    }

    row[short.len()]
}

/// Calculate Levenshtein distance, giving up once it must exceed `max`.
///
/// Returns `None` if the distance is greater than `max`. Cheaper than
/// [`edit_distance`] when most candidates are far away.
pub fn edit_distance_within(a: &str, b: &str, max: usize) -> Option<usize> {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (long, short) = longer_shorter(&a_chars, &b_chars);

    // Early termination if length difference exceeds threshold
    if long.len() - short.len() > max {
        return None;
    }
    if short.is_empty() {
        return Some(long.len());
    }

    let mut row: Vec<usize> = (0..=short.len()).collect();

    for (i, &long_ch) in long.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        let mut row_min = row[0];

        for (j, &short_ch) in short.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(long_ch != short_ch);
            row[j + 1] = min(min(above + 1, row[j] + 1), diagonal + cost);
            diagonal = above;
            row_min = min(row_min, row[j + 1]);
        }

        // Every path to the final cell crosses this row.
        if row_min > max {
            return None;
        }
    }

    let distance = row[short.len()];
    (distance <= max).then_some(distance)
}

/// Calculate Damerau-Levenshtein distance (optimal string alignment variant),
/// which also counts a swap of two adjacent characters as a single edit.
pub fn damerau_levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let width = b_chars.len() + 1;
    let mut before_prev: Vec<usize> = vec![0; width];
    let mut prev: Vec<usize> = (0..width).collect();
    let mut curr: Vec<usize> = vec![0; width];

    for i in 1..=a_chars.len() {
        curr[0] = i;
        for j in 1..width {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            curr[j] = min(min(prev[j] + 1, curr[j - 1] + 1), prev[j - 1] + cost);

            if i > 1
                && j > 1
                && a_chars[i - 1] == b_chars[j - 2]
                && a_chars[i - 2] == b_chars[j - 1]
            {
                curr[j] = min(curr[j], before_prev[j - 2] + 1); // transposition
            }
        }

        std::mem::swap(&mut before_prev, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[width - 1]
}

/// Normalized similarity between 0.0 (nothing in common) and 1.0 (identical).
///
/// Defined as `1 - distance / max(len(a), len(b))`; two empty strings are
/// identical.
pub fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    1.0 - edit_distance(a, b) as f64 / max_len as f64
}
