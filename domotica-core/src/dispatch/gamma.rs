//! Perceptual dimming curve

use crate::config::ADC_MAX;

/// Map a linear 0..=1023 level onto the gamma curve, rounding to nearest.
///
/// `round((value / 1023) ^ gamma * 1023)`; inputs above full scale clamp.
pub fn gamma_correct(value: u16, gamma: f32) -> u16 {
    let full_scale = ADC_MAX as f32;
    let normalized = value.min(ADC_MAX) as f32 / full_scale;
    let corrected = libm::roundf(libm::powf(normalized, gamma) * full_scale);
    (corrected as u16).min(ADC_MAX)
}
