//! Approximate substring matching
//!
//! Sellers' variant of the edit-distance recurrence: the pattern may start at
//! any position of the text at no cost, so the result is the smallest number
//! of edits needed to turn the pattern into *some* substring of the text.
//! Position within the text does not affect the result.

/// Outcome of matching one pattern against one text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternMatch {
    /// Edits needed (insertions, deletions, substitutions)
    pub errors: usize,
    /// Length of the matched region of the text, in characters
    pub matched_len: usize,
    /// `errors / pattern_len`; 0.0 is a perfect match
    pub score: f64,
}

/// A lowercased pattern prepared for repeated matching.
#[derive(Debug, Clone)]
pub struct Pattern {
    chars: Vec<char>,
    max_errors: usize,
}

impl Pattern {
    /// Prepare `text` for matching with the given similarity threshold.
    ///
    /// `threshold` is the tolerated fraction of errors: 0.0 admits exact
    /// substrings only.
    pub fn new(text: &str, threshold: f64) -> Self {
        let chars = fold(text);
        let max_errors = (threshold * chars.len() as f64).floor() as usize;
        Self { chars, max_errors }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn max_errors(&self) -> usize {
        self.max_errors
    }

    /// Match against already-folded text.
    pub fn find_in(&self, text: &[char]) -> Option<PatternMatch> {
        if self.chars.is_empty() {
            return None;
        }

        let m = self.chars.len();
        // Column of the DP table: cost[i] = edits for pattern[..i] ending here.
        // Each cell also remembers where the matched region starts.
        let mut cost: Vec<usize> = (0..=m).collect();
        let mut start: Vec<usize> = vec![0; m + 1];
        let mut best: Option<(usize, usize)> = None;

        for (j, &tc) in text.iter().enumerate() {
            let mut diag_cost = cost[0];
            let mut diag_start = start[0];
            cost[0] = 0;
            start[0] = j + 1;

            for i in 1..=m {
                let above = (cost[i - 1] + 1, start[i - 1]);
                let left = (cost[i] + 1, start[i]);
                let sub = if self.chars[i - 1] == tc {
                    (diag_cost, diag_start)
                } else {
                    (diag_cost + 1, diag_start)
                };
                diag_cost = cost[i];
                diag_start = start[i];

                let cell = [sub, above, left]
                    .into_iter()
                    .min_by_key(|(c, _)| *c)
                    .unwrap_or(sub);
                cost[i] = cell.0;
                start[i] = cell.1;
            }

            let errors = cost[m];
            if errors <= self.max_errors {
                let matched_len = j + 1 - start[m];
                match best {
                    Some((e, _)) if e <= errors => {}
                    _ => best = Some((errors, matched_len)),
                }
            }
        }

        best.map(|(errors, matched_len)| PatternMatch {
            errors,
            matched_len,
            score: errors as f64 / m as f64,
        })
    }
}

/// Lowercase a value into characters for case-insensitive comparison.
pub fn fold(text: &str) -> Vec<char> {
    text.chars().flat_map(char::to_lowercase).collect()
}
