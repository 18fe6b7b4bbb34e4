//! Weighted random choice
//!
//! Used for asteroid class selection and power-up kind selection. Tables are
//! plain slices of `(key, weight)` so the iteration order is the slice order.

use rand::Rng;

/// Pick a key with probability proportional to its weight.
///
/// Draws `u` in `[0, total)` and returns the first entry whose running total
/// exceeds it. Zero, negative, and non-finite weights never win a draw.
/// Returns `None` for an empty table and the first key when the total weight
/// is zero.
pub fn choose<K: Copy, R: Rng + ?Sized>(rng: &mut R, table: &[(K, f32)]) -> Option<K> {
    let (first, _) = *table.first()?;
    let total: f32 = table.iter().map(|&(_, w)| sanitize(w)).sum();
    if total <= 0.0 || !total.is_finite() {
        return Some(first);
    }

    let u = rng.random::<f32>() * total;
    let mut acc = 0.0;
    let mut last_positive = first;
    for &(key, weight) in table {
        let w = sanitize(weight);
        if w <= 0.0 {
            continue;
        }
        acc += w;
        last_positive = key;
        if u < acc {
            return Some(key);
        }
    }
    // Float rounding can leave u a hair above the accumulated total
    Some(last_positive)
}

#[inline]
fn sanitize(weight: f32) -> f32 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}
