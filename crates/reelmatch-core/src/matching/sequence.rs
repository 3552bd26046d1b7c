//! # Longest-Matching-Block Ratio
//!
//! Ratcliff/Obershelp style similarity: the query is decomposed against a
//! candidate by repeatedly taking the longest common contiguous block and
//! recursing on both sides. The ratio is `2·M / T`, where `M` is the total
//! size of the matched blocks and `T` the combined length.
//!
//! The query side (`b`) is preprocessed once and reused against every
//! candidate, which is how the fuzzy matcher scans a whole index.

use std::collections::HashMap;

/// Sequences at least this long get the "popular element" heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Matcher holding a preprocessed query string.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    b: Vec<char>,
    /// Positions of each char in `b`, minus popular chars.
    b2j: HashMap<char, Vec<usize>>,
    /// Counts of every char in `b`, popular chars included.
    full_count: HashMap<char, usize>,
}

impl SequenceMatcher {
    /// Preprocesses `b` as the fixed side of every comparison.
    #[must_use]
    pub fn new(b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        let mut full_count: HashMap<char, usize> = HashMap::new();

        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
            *full_count.entry(c).or_default() += 1;
        }

        // In long sequences, chars occurring in more than 1% of positions
        // are too common to anchor a match.
        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let ntest = n / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self {
            b,
            b2j,
            full_count,
        }
    }

    /// Length of the query side in chars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.b.len()
    }

    /// Returns `true` if the query side is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Similarity ratio of `a` against the query, in `[0.0, 1.0]`.
    #[must_use]
    pub fn ratio(&self, a: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        calculate_ratio(self.matching_total(&a), a.len() + self.b.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from char multiset overlap.
    #[must_use]
    pub fn quick_ratio(&self, a: &str) -> f64 {
        let mut avail: HashMap<char, isize> = HashMap::new();
        let mut matches = 0usize;
        let mut la = 0usize;

        for c in a.chars() {
            la += 1;
            let numb = *avail
                .entry(c)
                .or_insert_with(|| self.full_count.get(&c).copied().unwrap_or(0) as isize);
            avail.insert(c, numb - 1);
            if numb > 0 {
                matches += 1;
            }
        }

        calculate_ratio(matches, la + self.b.len())
    }

    /// Very cheap upper bound on [`ratio`](Self::ratio) from lengths alone.
    #[must_use]
    pub fn real_quick_ratio(&self, a: &str) -> f64 {
        let la = a.chars().count();
        let lb = self.b.len();
        calculate_ratio(la.min(lb), la + lb)
    }

    /// Total size of all matching blocks between `a` and the query.
    fn matching_total(&self, a: &[char]) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        total
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` within the given bounds.
    ///
    /// Among equally long blocks the one starting earliest in `a`, then
    /// earliest in `b`, wins.
    fn find_longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let b = &self.b;
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(&a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 {
                        j2len.get(&(j - 1)).copied().unwrap_or(0)
                    } else {
                        0
                    };
                    let k = prev + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Popular chars were left out of b2j; grow the block across them.
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}

fn calculate_ratio(matches: usize, length: usize) -> f64 {
    if length == 0 {
        return 1.0;
    }
    2.0 * matches as f64 / length as f64
}
