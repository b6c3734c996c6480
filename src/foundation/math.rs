/// `round(x * y / 255)` for 8-bit channel arithmetic.
#[inline]
pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Quantize a `[0, 1]` weight to an 8-bit blend factor.
#[inline]
pub(crate) fn weight_u8(w: f32) -> u16 {
    ((w.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}

/// Linear interpolation of one channel: `a * (1 - t) + b * t` with `t` in `0..=255`.
#[inline]
pub(crate) fn lerp_u8(a: u8, b: u8, t: u16) -> u8 {
    let it = 255u16 - t;
    (mul_div255_u16(u16::from(a), it) + mul_div255_u16(u16::from(b), t)).min(255) as u8
}
