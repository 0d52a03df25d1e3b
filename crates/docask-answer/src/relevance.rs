//! Lexical relevance selection over chunks.
//!
//! The similarity measure is the classic sequence-matcher ratio: find the
//! longest common substring, recurse on the pieces to its left and right, and
//! score `2*M / T` where M is the total matched length and T the combined
//! length of both strings. It favors chunks sharing literal substrings with
//! the question; a heuristic overlap proxy, not semantic retrieval.

use std::collections::HashMap;

/// Pick the chunk most similar to the question.
///
/// Returns an empty string when `chunks` is empty. Ties go to the
/// earliest-occurring chunk.
pub fn find_relevant_chunk(question: &str, chunks: &[String]) -> String {
    let mut best: Option<(&str, f64)> = None;
    for chunk in chunks {
        let score = similarity_ratio(question, chunk);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((chunk, score)),
        }
    }
    best.map(|(chunk, _)| chunk.to_string()).unwrap_or_default()
}

/// Normalized similarity ratio in [0, 1] between two strings.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_len(&a, 0, a.len(), &b, 0, b.len());
    2.0 * matched as f64 / total as f64
}

/// Total length of matching blocks between a[alo..ahi] and b[blo..bhi]:
/// take the longest match, then recurse left and right of it.
fn matching_len(a: &[char], alo: usize, ahi: usize, b: &[char], blo: usize, bhi: usize) -> usize {
    let (i, j, size) = longest_match(a, alo, ahi, b, blo, bhi);
    if size == 0 {
        return 0;
    }
    size + matching_len(a, alo, i, b, blo, j)
        + matching_len(a, i + size, ahi, b, j + size, bhi)
}

/// Longest matching block between a[alo..ahi] and b[blo..bhi].
///
/// Among equal-length blocks the one starting earliest in `a` (then earliest
/// in `b`) wins, which keeps the recursion deterministic.
fn longest_match(
    a: &[char],
    alo: usize,
    ahi: usize,
    b: &[char],
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut besti = alo;
    let mut bestj = blo;
    let mut bestsize = 0usize;

    // j2len[j] = length of the match ending at a[i-1], b[j].
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut new_j2len: HashMap<usize, usize> = HashMap::new();
        for j in blo..bhi {
            if b[j] != a[i] {
                continue;
            }
            let k = if j > blo {
                j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
            } else {
                1
            };
            new_j2len.insert(j, k);
            if k > bestsize {
                besti = i + 1 - k;
                bestj = j + 1 - k;
                bestsize = k;
            }
        }
        j2len = new_j2len;
    }

    (besti, bestj, bestsize)
}
