//! Ratcliff/Obershelp similarity: `2 * M / T` over characters.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    a: usize,
    b: usize,
    len: usize,
}

/// Two empty strings score `1.0`; an empty string against a non-empty one
/// scores `0.0`. Operands are put in a canonical order before matching so that
/// `score(a, b) == score(b, a)` even when longest runs tie.
pub fn score(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let (first, second) = if a <= b { (a, b) } else { (b, a) };

    let first: Vec<char> = first.chars().collect();
    let second: Vec<char> = second.chars().collect();
    ratio(&first, &second)
}

pub fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(a, b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let Some(block) = longest_match(a, b, alo, ahi, blo, bhi) else {
            continue;
        };
        matched += block.len;

        if alo < block.a && blo < block.b {
            pending.push((alo, block.a, blo, block.b));
        }
        let (a_end, b_end) = (block.a + block.len, block.b + block.len);
        if a_end < ahi && b_end < bhi {
            pending.push((a_end, ahi, b_end, bhi));
        }
    }

    matched
}

/// Longest run common to `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties go to the run that ends first in `a`, then first in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> Option<Block> {
    let width = bhi - blo;
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];
    let mut best = Block {
        a: alo,
        b: blo,
        len: 0,
    };

    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo + 1;
            curr[col] = if a[i] == b[j] { prev[col - 1] + 1 } else { 0 };
            if curr[col] > best.len {
                let len = curr[col];
                best = Block {
                    a: i + 1 - len,
                    b: j + 1 - len,
                    len,
                };
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (best.len > 0).then_some(best)
}
