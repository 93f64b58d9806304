//! Index arithmetic for condensed (upper triangular) distance vectors.
//!
//! For `m` clusters the pairs `(i, j)` with `1 <= i < j <= m` are numbered
//! row by row starting at 1:
//!
//! ```text
//!        j=2  j=3  j=4
//! i=1     1    2    3
//! i=2          4    5
//! i=3               6
//! ```

/// Number of pairs among `m` clusters, i.e. the length of a condensed vector.
pub fn condensed_len(m: usize) -> usize {
    m * m.saturating_sub(1) / 2
}

/// 1-based condensed index of the pair `(i, j)` with `1 <= i < j <= m`.
pub fn pair_to_index(m: usize, i: usize, j: usize) -> usize {
    debug_assert!(1 <= i && i < j && j <= m);
    (i - 1) * m + j - i * (i + 1) / 2
}

/// 1-based condensed index of the unordered pair `{a, b}`, `a != b`.
pub fn unordered_pair_to_index(m: usize, a: usize, b: usize) -> usize {
    if a < b {
        pair_to_index(m, a, b)
    } else {
        pair_to_index(m, b, a)
    }
}

/// Inverts [pair_to_index]: returns the 1-based pair `(i, j)`, `i < j`,
/// stored at 1-based condensed index `k` among `m` clusters.
///
/// Uses the closed form `i = floor(m + 1/2 - sqrt(m^2 - m + 1/4 - 2(k - 1)))`.
/// The row is corrected by one step if floating point rounding put it off.
pub fn index_to_pair(m: usize, k: usize) -> (usize, usize) {
    debug_assert!(m >= 2 && k >= 1 && k <= condensed_len(m));
    let mf = m as f64;
    let disc = mf * mf - mf + 0.25 - 2.0 * (k as f64 - 1.0);
    let mut i = (mf + 0.5 - disc.max(0.0).sqrt()).floor() as usize;
    i = i.clamp(1, m - 1);

    // First index of row i is pair_to_index(m, i, i + 1)
    while i > 1 && pair_to_index(m, i, i + 1) > k {
        i -= 1;
    }
    while i < m - 1 && pair_to_index(m, i + 1, i + 2) <= k {
        i += 1;
    }

    let j = k + i + i * (i - 1) / 2 - (i - 1) * m;
    (i, j)
}
