//! Token-set ratio.
//!
//! Algorithm:
//! 1. Normalize both inputs: keep ASCII alphanumerics and `_`, every other char becomes a
//!    space (non-ASCII is dropped), lower-case, trim.
//! 2. Split into word sets. `sect` = sorted intersection; `c1`/`c2` = `sect` followed by the
//!    sorted words unique to each side.
//! 3. Score = max(ratio(sect, c1), ratio(sect, c2), ratio(c1, c2)), where
//!    ratio = 2·LCS / (len_a + len_b) × 100, rounded half-to-even.

use std::collections::BTreeSet;

use super::MatchScore;

/// Computes the token-set similarity of two texts, `0..=100`.
pub fn token_set_ratio(a: &str, b: &str) -> MatchScore {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let sect = join(tokens_a.intersection(&tokens_b));
    let diff_ab = join(tokens_a.difference(&tokens_b));
    let diff_ba = join(tokens_b.difference(&tokens_a));

    let combined_ab = format!("{sect} {diff_ab}").trim().to_string();
    let combined_ba = format!("{sect} {diff_ba}").trim().to_string();

    [
        ratio(&sect, &combined_ab),
        ratio(&sect, &combined_ba),
        ratio(&combined_ab, &combined_ba),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

/// Indel similarity of two ASCII strings.
fn ratio(a: &str, b: &str) -> MatchScore {
    let total = a.len() + b.len();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let lcs = longest_common_subsequence(a.as_bytes(), b.as_bytes());
    let score = (200.0 * lcs as f64 / total as f64).round_ties_even();
    score.clamp(0.0, 100.0) as MatchScore
}

/// Two-row dynamic program; O(len_a × len_b) time, O(len_b) space.
fn longest_common_subsequence(a: &[u8], b: &[u8]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
