//! Permutation operators for tours.
//!
//! # Crossover
//!
//! - [`pmx_crossover`] (PMX): Goldberg & Lingle (1985). Swaps a contiguous
//!   segment between two parents and repairs the duplicates outside the
//!   segment through the segment's value mapping.
//!
//! # Mutation
//!
//! - [`swap_mutation`]: exchange two distinct positions. O(1).
//!
//! Both operators preserve the permutation property of [`Tour`]. Children
//! and mutated tours are left unevaluated.
//!
//! # References
//!
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use crate::error::{TspError, TspResult};
use crate::tsp::Tour;
use rand::Rng;

// ============================================================================
// Crossover
// ============================================================================

/// Partially Mapped Crossover (PMX) on two tours.
///
/// Draws the cut points with [`cut_points`] and delegates to
/// [`pmx_with_cuts`]. Tours with fewer than two nodes have no meaningful
/// segment, so the children are plain copies of the parents.
///
/// # Errors
/// [`TspError::InvalidInput`] if the parents differ in length;
/// [`TspError::InternalInvariant`] if duplicate resolution fails to
/// terminate.
pub fn pmx_crossover<R: Rng>(
    parent_a: &Tour,
    parent_b: &Tour,
    rng: &mut R,
) -> TspResult<(Tour, Tour)> {
    let n = parent_a.len();
    if n != parent_b.len() {
        return Err(TspError::invalid_input(format!(
            "parents must have equal length, got {} and {}",
            n,
            parent_b.len()
        )));
    }
    if n < 2 {
        return Ok((
            Tour::from_order_unchecked(parent_a.order().to_vec()),
            Tour::from_order_unchecked(parent_b.order().to_vec()),
        ));
    }

    let (cut1, cut2) = cut_points(n, rng);
    let (a, b) = pmx_with_cuts(parent_a.order(), parent_b.order(), cut1, cut2)?;
    Ok((Tour::from_order_unchecked(a), Tour::from_order_unchecked(b)))
}

/// Picks the PMX segment `[cut1, cut2]` inside `0..n`.
///
/// Both points are drawn independently; they are ordered, and an empty
/// segment is widened by one position when `n > 1`.
///
/// # Panics
/// Panics if `n == 0`.
pub fn cut_points<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let mut cut1 = rng.random_range(0..n);
    let mut cut2 = rng.random_range(0..n);
    if cut1 > cut2 {
        std::mem::swap(&mut cut1, &mut cut2);
    }
    if cut1 == cut2 {
        cut2 = (cut1 + 1).min(n - 1);
    }
    (cut1, cut2)
}

/// PMX with explicit cut points on raw orders over `1..=n`.
///
/// 1. Child A keeps `a[cut1..=cut2]`, child B keeps `b[cut1..=cut2]`.
/// 2. The segment pairs `(a[i], b[i])` form two value mappings; pairs with
///    `a[i] == b[i]` are skipped.
/// 3. Outside the segment child A takes `b[i]`. While that value already
///    sits in A's segment it is replaced through the mapping, possibly over
///    several hops. Child B mirrors this with `a[i]`.
///
/// # Errors
/// [`TspError::InvalidInput`] for mismatched lengths, cuts outside
/// `0..n`, or values outside `1..=n`; [`TspError::InternalInvariant`] if a
/// resolution chain exceeds `n + 1` hops or reaches an unmapped segment
/// value.
pub fn pmx_with_cuts(
    a: &[usize],
    b: &[usize],
    cut1: usize,
    cut2: usize,
) -> TspResult<(Vec<usize>, Vec<usize>)> {
    let n = a.len();
    if n != b.len() {
        return Err(TspError::invalid_input("parents must have equal length"));
    }
    if cut1 > cut2 || cut2 >= n {
        return Err(TspError::invalid_input(format!(
            "invalid cut points [{cut1}, {cut2}] for length {n}"
        )));
    }
    if let Some(&v) = a.iter().chain(b).find(|&&v| v == 0 || v > n) {
        return Err(TspError::invalid_input(format!("node {v} outside 1..={n}")));
    }

    // Node values are 1..=n.
    let dimension = n + 1;
    let mut a_to_b: Vec<Option<usize>> = vec![None; dimension];
    let mut b_to_a: Vec<Option<usize>> = vec![None; dimension];
    let mut in_segment_a = vec![false; dimension];
    let mut in_segment_b = vec![false; dimension];

    let mut child_a = vec![0; n];
    let mut child_b = vec![0; n];

    for i in cut1..=cut2 {
        let (x, y) = (a[i], b[i]);
        child_a[i] = x;
        child_b[i] = y;
        in_segment_a[x] = true;
        in_segment_b[y] = true;
        // A self-mapping would make resolution spin forever.
        if x != y {
            a_to_b[x] = Some(y);
            b_to_a[y] = Some(x);
        }
    }

    for i in (0..cut1).chain(cut2 + 1..n) {
        child_a[i] = resolve(b[i], &in_segment_a, &a_to_b, dimension)?;
        child_b[i] = resolve(a[i], &in_segment_b, &b_to_a, dimension)?;
    }

    Ok((child_a, child_b))
}

/// Follows `mapping` from `value` until it leaves the segment.
fn resolve(
    value: usize,
    in_segment: &[bool],
    mapping: &[Option<usize>],
    max_hops: usize,
) -> TspResult<usize> {
    let mut current = value;
    let mut hops = 0;
    while in_segment[current] {
        current = mapping[current].ok_or_else(|| {
            TspError::internal(format!(
                "PMX: segment value {current} has no mapping (start {value})"
            ))
        })?;
        hops += 1;
        if hops > max_hops {
            return Err(TspError::internal(format!(
                "PMX: resolution from {value} exceeded {max_hops} hops"
            )));
        }
    }
    Ok(current)
}

// ============================================================================
// Mutation
// ============================================================================

/// Swap mutation: exchange two distinct random positions.
///
/// No-op on tours with fewer than two nodes. Otherwise the tour becomes
/// unevaluated.
pub fn swap_mutation<R: Rng>(tour: &mut Tour, rng: &mut R) {
    let n = tour.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    // Draw from the n - 1 other positions.
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    tour.order_mut().swap(i, j);
}

// ============================================================================
// Tests
// ============================================================================
