//! Float helpers for `no_std`
//!
//! `core` has no `sqrt`, `round` or `floor` for `f32`. These cover the
//! ranges the models work in (non-huge, finite values) without pulling in
//! a maths library.

/// Absolute value
pub fn abs(x: f32) -> f32 {
    if x < 0.0 {
        -x
    } else {
        x
    }
}

/// Round half away from zero
pub fn round_to_i32(x: f32) -> i32 {
    if x < 0.0 {
        -((-x + 0.5) as i32)
    } else {
        (x + 0.5) as i32
    }
}

/// Largest integer not above `x`, for `x >= 0`
///
/// Saturates at `i32::MAX`.
pub fn floor_to_i32(x: f32) -> i32 {
    if x <= 0.0 {
        return 0;
    }
    if x >= i32::MAX as f32 {
        return i32::MAX;
    }
    x as i32
}

/// Smallest integer not below `x`, for `x >= 0`
///
/// Saturates at `i32::MAX`.
pub fn ceil_to_i32(x: f32) -> i32 {
    if x <= 0.0 {
        return 0;
    }
    if x >= i32::MAX as f32 {
        return i32::MAX;
    }
    let whole = x as i32;
    if (whole as f32) < x {
        whole.saturating_add(1)
    } else {
        whole
    }
}

/// Square root by Newton iteration
///
/// Returns 0 for non-positive input.
pub fn sqrt(x: f32) -> f32 {
    if !(x > 0.0) || !x.is_finite() {
        return if x.is_finite() { 0.0 } else { x };
    }

    // Seed from the exponent so a handful of iterations converge
    let mut guess = f32::from_bits((x.to_bits() >> 1) + 0x1fc0_0000);
    for _ in 0..4 {
        guess = 0.5 * (guess + x / guess);
    }
    guess
}
