//! Degree bound for Fibonacci heap nodes.
//!
//! In a Fibonacci heap holding `n` nodes, a node of degree `k` roots a subtree
//! of at least `F(k+2) >= φ^k` nodes, so no node can have more than
//!
//! ```text
//! D(n) = floor(log_φ(n)),   φ = (1 + √5) / 2
//! ```
//!
//! children. Consolidation uses this to size its degree-indexed bucket table.
//!
//! The table is never indexed on the strength of the closed form alone: it
//! starts with [`BUCKET_HEADROOM`] extra slots and consolidation grows it if a
//! link ever runs past the end.

/// The golden ratio φ.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Extra bucket slots allocated beyond `D(n) + 1`.
pub const BUCKET_HEADROOM: usize = 2;

/// Maximum degree of any node in a Fibonacci heap of `n` nodes.
///
/// Returns 0 for `n <= 1`.
///
/// # Example
///
/// ```rust
/// use mergeable_heap::rank::degree_bound;
///
/// assert_eq!(degree_bound(0), 0);
/// assert_eq!(degree_bound(1), 0);
/// assert_eq!(degree_bound(2), 1);
/// assert_eq!(degree_bound(100), 9);
/// ```
#[inline]
pub fn degree_bound(n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    ((n as f64).ln() / PHI.ln()).floor() as usize
}

/// Number of slots the consolidation bucket table starts with for `n` nodes.
#[inline]
pub fn bucket_capacity(n: usize) -> usize {
    degree_bound(n) + 1 + BUCKET_HEADROOM
}
