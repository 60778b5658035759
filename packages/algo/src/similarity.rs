//! String similarity metrics.
//!
//! Two metrics with different jobs: [`edit_distance`] counts keystroke-level
//! mistakes (typo tolerance in answer grading), [`similarity`] ranks whole
//! strings by resemblance (synonym selection, word difficulty).
//!
//! Both are case-sensitive and operate on Unicode scalar values; callers
//! lowercase first where case-insensitivity is wanted.

use std::collections::HashMap;

/// Jaro score above which the Winkler prefix boost is applied.
const WINKLER_BOOST_THRESHOLD: f64 = 0.7;

/// Winkler prefix scaling factor.
const WINKLER_PREFIX_SCALE: f64 = 0.1;

/// Maximum shared-prefix length considered by the Winkler boost.
const WINKLER_MAX_PREFIX: usize = 4;

/// Damerau-Levenshtein distance between two strings.
///
/// Minimum number of single-character insertions, deletions, substitutions
/// and adjacent transpositions needed to turn `a` into `b`. This is the
/// unrestricted variant: a transposed pair may be edited again later.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (rows, cols) = (a.len(), b.len());

    if rows == 0 {
        return cols;
    }
    if cols == 0 {
        return rows;
    }

    // Lowrance-Wagner matrix with a sentinel border row/column.
    let max_dist = rows + cols;
    let width = cols + 2;
    let mut d = vec![0usize; (rows + 2) * width];
    let at = |i: usize, j: usize| i * width + j;

    d[at(0, 0)] = max_dist;
    for i in 0..=rows {
        d[at(i + 1, 0)] = max_dist;
        d[at(i + 1, 1)] = i;
    }
    for j in 0..=cols {
        d[at(0, j + 1)] = max_dist;
        d[at(1, j + 1)] = j;
    }

    // Last row at which each character of `a` occurred.
    let mut last_row: HashMap<char, usize> = HashMap::new();

    for i in 1..=rows {
        // Last column in this row where a[i-1] matched b[..].
        let mut last_col = 0;

        for j in 1..=cols {
            let trans_row = *last_row.get(&b[j - 1]).unwrap_or(&0);
            let trans_col = last_col;

            let cost = if a[i - 1] == b[j - 1] {
                last_col = j;
                0
            } else {
                1
            };

            let substitution = d[at(i, j)] + cost;
            let insertion = d[at(i + 1, j)] + 1;
            let deletion = d[at(i, j + 1)] + 1;
            let transposition =
                d[at(trans_row, trans_col)] + (i - trans_row - 1) + 1 + (j - trans_col - 1);

            d[at(i + 1, j + 1)] = substitution
                .min(insertion)
                .min(deletion)
                .min(transposition);
        }

        last_row.insert(a[i - 1], i);
    }

    d[at(rows + 1, cols + 1)]
}

/// Jaro-Winkler similarity between two strings, in `[0, 1]`.
///
/// 0 means no resemblance, 1 means identical. Symmetric, and reflexively 1
/// for any string (including the empty string).
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let jaro = jaro_similarity(&a, &b);
    if jaro <= WINKLER_BOOST_THRESHOLD {
        return jaro;
    }

    let prefix = a
        .iter()
        .zip(b.iter())
        .take(WINKLER_MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();

    jaro + prefix as f64 * WINKLER_PREFIX_SCALE * (1.0 - jaro)
}

fn jaro_similarity(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);
    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ch) in a.iter().enumerate() {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(b.len());
        for j in lo..hi {
            if !b_matched[j] && b[j] == *ch {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Half-transpositions: matched characters out of order.
    let mut half_transpositions = 0usize;
    let mut j = 0usize;
    for (i, matched) in a_matched.iter().enumerate() {
        if !matched {
            continue;
        }
        while !b_matched[j] {
            j += 1;
        }
        if a[i] != b[j] {
            half_transpositions += 1;
        }
        j += 1;
    }
    let transpositions = half_transpositions / 2;

    let m = matches as f64;
    (m / a.len() as f64 + m / b.len() as f64 + (m - transpositions as f64) / m) / 3.0
}
