//! Level conversions and small helpers shared by every processor.
//!
//! All functions are allocation-free and `no_std` friendly.
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//! - [`flush_denormal`] - Explicit denormal elimination for feedback paths
//! - [`wet_dry_mix`] - Dry/wet crossfade
//! - [`mono_sum`] - Stereo to mono average

use libm::{expf, logf};

/// Lowest level reported by [`linear_to_db`], in dB.
///
/// Anything quieter than `1e-5` linear is reported as this floor.
pub const DB_FLOOR: f32 = -100.0;

/// Linear magnitude that corresponds to [`DB_FLOOR`].
const LINEAR_FLOOR: f32 = 1e-5;

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use resona_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear magnitude to decibels, floored at [`DB_FLOOR`].
///
/// Negative inputs are treated by magnitude.
///
/// # Example
/// ```rust
/// use resona_core::{linear_to_db, DB_FLOOR};
///
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// assert_eq!(linear_to_db(0.0), DB_FLOOR);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    let magnitude = linear.abs();
    if magnitude <= LINEAR_FLOOR {
        return DB_FLOOR;
    }
    logf(magnitude) * FACTOR
}

/// Flush tiny values to zero.
///
/// Used wherever a signal can decay forever inside a feedback loop
/// (delay feedback, shelf filters in the reverb network, envelope state).
/// Values below `1e-20` are replaced with zero, well before the IEEE 754
/// subnormal range where arithmetic slows down dramatically.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between dry and wet signals.
///
/// `mix` = 0.0 is all dry, 1.0 is all wet.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}

/// Average of two channels.
#[inline]
pub fn mono_sum(left: f32, right: f32) -> f32 {
    (left + right) * 0.5
}
