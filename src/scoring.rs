//! Similarity scoring between cleaned audio names and lyric filenames.
//!
//! The score is a Ratcliff/Obershelp ratio: find the longest common
//! contiguous block, recurse on both sides of it, and score
//! `2 * matched / (len(a) + len(b))`. It is a best-effort similarity, not a
//! metric; pathological ties can make it slightly asymmetric.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::models::MatchCandidate;

/// `b` lengths from which over-represented characters stop seeding blocks.
const AUTOJUNK_MIN_LEN: usize = 200;

// ============================================================================
// Matching Blocks
// ============================================================================

/// A run of `size` equal characters at `a[a_start..]` and `b[b_start..]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// Edit operation over character ranges, as used by the diff renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub a_range: (usize, usize),
    pub b_range: (usize, usize),
}

struct SequenceMatcher<'s> {
    a: &'s [char],
    b: &'s [char],
    /// Positions of each non-popular character of `b`, ascending
    b_index: FxHashMap<char, Vec<usize>>,
}

impl<'s> SequenceMatcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b_index: FxHashMap<char, Vec<usize>> = FxHashMap::default();
        for (j, &c) in b.iter().enumerate() {
            b_index.entry(c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b_index.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b_index }
    }

    /// Longest common block inside `a[alo..ahi]` x `b[blo..bhi]`.
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);

        // run_len[j] = length of the block ending at (i - 1, j)
        let mut run_len: FxHashMap<usize, usize> = FxHashMap::default();
        for i in alo..ahi {
            let mut next_run_len: FxHashMap<usize, usize> = FxHashMap::default();
            if let Some(positions) = self.b_index.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run_len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            run_len = next_run_len;
        }

        // Popular characters never seed a block but may extend one
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        Block {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }

    fn matching_blocks(&self) -> Vec<Block> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.size);
            blocks.push(block);
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        blocks.sort_by_key(|b| (b.a_start, b.b_start));

        // Merge blocks that touch end to end
        let mut merged: Vec<Block> = Vec::with_capacity(blocks.len());
        for block in blocks {
            match merged.last_mut() {
                Some(prev)
                    if prev.a_start + prev.size == block.a_start
                        && prev.b_start + prev.size == block.b_start =>
                {
                    prev.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged
    }
}

/// Non-overlapping matching blocks between `a` and `b`, in order.
pub fn matching_blocks(a: &str, b: &str) -> Vec<Block> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    SequenceMatcher::new(&a, &b).matching_blocks()
}

/// Edit script turning `a` into `b`, in character indices.
pub fn opcodes(a: &str, b: &str) -> Vec<Opcode> {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    let mut ops = Vec::new();
    let (mut i, mut j) = (0, 0);
    let sentinel = Block {
        a_start: a_len,
        b_start: b_len,
        size: 0,
    };
    for block in matching_blocks(a, b).into_iter().chain(std::iter::once(sentinel)) {
        let tag = match (i < block.a_start, j < block.b_start) {
            (true, true) => Some(OpTag::Replace),
            (true, false) => Some(OpTag::Delete),
            (false, true) => Some(OpTag::Insert),
            (false, false) => None,
        };
        if let Some(tag) = tag {
            ops.push(Opcode {
                tag,
                a_range: (i, block.a_start),
                b_range: (j, block.b_start),
            });
        }
        i = block.a_start + block.size;
        j = block.b_start + block.size;
        if block.size > 0 {
            ops.push(Opcode {
                tag: OpTag::Equal,
                a_range: (block.a_start, i),
                b_range: (block.b_start, j),
            });
        }
    }
    ops
}

// ============================================================================
// Ratio
// ============================================================================

/// Similarity in [0, 1]. Two empty strings are identical (1.0).
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = SequenceMatcher::new(&a, &b)
        .matching_blocks()
        .iter()
        .map(|block| block.size)
        .sum();
    2.0 * matched as f64 / total as f64
}

// ============================================================================
// Candidate Selection
// ============================================================================

/// Best-scoring candidate for `query`. Ties keep the first candidate seen,
/// so only an empty candidate list yields `None`.
pub fn best_match<S: AsRef<str>>(query: &str, candidates: &[S]) -> Option<MatchCandidate> {
    let mut best: Option<MatchCandidate> = None;
    for candidate in candidates {
        let candidate = candidate.as_ref();
        let score = sequence_ratio(query, candidate);
        let better = best.as_ref().map_or(true, |b| score > b.score);
        if better {
            best = Some(MatchCandidate {
                query: query.to_string(),
                lyric: candidate.to_string(),
                score,
            });
        }
    }
    best
}

/// Every candidate scored against `query`, best first. Equal scores keep
/// their input order.
pub fn rank_candidates<S: AsRef<str>>(query: &str, candidates: &[S]) -> Vec<MatchCandidate> {
    let mut ranked: Vec<MatchCandidate> = candidates
        .iter()
        .map(|c| MatchCandidate {
            query: query.to_string(),
            lyric: c.as_ref().to_string(),
            score: sequence_ratio(query, c.as_ref()),
        })
        .collect();
    ranked.sort_by(|x, y| y.score.total_cmp(&x.score));
    ranked
}

// ============================================================================
// TESTS
// ============================================================================
