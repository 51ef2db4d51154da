//! Shared math utilities.

/// Convert raw logits into a probability distribution in place.
///
/// Subtracts the maximum before exponentiating so large logits don't overflow.
pub fn softmax_in_place(v: &mut [f32]) {
    let max = v.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return;
    }
    let mut sum = 0.0f32;
    for x in v.iter_mut() {
        *x = (*x - max).exp();
        sum += *x;
    }
    if sum > f32::EPSILON {
        for x in v.iter_mut() {
            *x /= sum;
        }
    }
}
