//! Distance falloff для push force и pull speed
//!
//! value = lerp(min, max, (reach - distance) / reach)
//! - distance 0 → max
//! - distance reach → min
//! Alpha зажат в [0, 1]: за пределами reach значение не уходит ниже min.

/// Linear falloff по расстоянию (ближе = сильнее)
pub fn reach_falloff(min: f32, max: f32, distance: f32, reach: f32) -> f32 {
    if reach <= 0.0 {
        return max;
    }

    let alpha = ((reach - distance) / reach).clamp(0.0, 1.0);
    min + (max - min) * alpha
}
