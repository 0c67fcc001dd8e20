//! Viridis colormap for the surface.
//!
//! Values are normalised against the current field's range before sampling,
//! the same way a plotting library scales a colormap to its data.

/// Matplotlib's viridis at ten evenly spaced positions, sRGB 8-bit
const VIRIDIS: [[u8; 3]; 10] = [
    [0x44, 0x01, 0x54],
    [0x48, 0x28, 0x78],
    [0x3e, 0x49, 0x89],
    [0x31, 0x68, 0x8e],
    [0x26, 0x82, 0x8e],
    [0x1f, 0x9e, 0x89],
    [0x35, 0xb7, 0x79],
    [0x6e, 0xce, 0x58],
    [0xb5, 0xde, 0x2b],
    [0xfd, 0xe7, 0x25],
];

/// Map `value` into [0, 1] against `[lo, hi]`; a flat range maps to the middle.
pub fn normalize(value: f32, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Sample viridis at `v` in [0, 1] (clamped), interpolating in sRGB space
pub fn viridis(v: f32) -> [u8; 3] {
    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    let pos = v * (VIRIDIS.len() - 1) as f32;
    let i0 = (pos.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = pos - i0 as f32;
    let (a, b) = (VIRIDIS[i0], VIRIDIS[i0 + 1]);
    let mut out = [0u8; 3];
    for c in 0..3 {
        let x = a[c] as f32 + (b[c] as f32 - a[c] as f32) * frac;
        out[c] = x.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Sample viridis as linear-light floats for an sRGB render target
pub fn viridis_linear(v: f32) -> [f32; 3] {
    let rgb = viridis(v);
    [srgb_to_linear(rgb[0]), srgb_to_linear(rgb[1]), srgb_to_linear(rgb[2])]
}

pub fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(viridis(0.0), [0x44, 0x01, 0x54]);
        assert_eq!(viridis(1.0), [0xfd, 0xe7, 0x25]);
    }

    #[test]
    fn test_clamping_at_ends() {
        assert_eq!(viridis(-2.0), viridis(0.0));
        assert_eq!(viridis(7.5), viridis(1.0));
        assert_eq!(viridis(f32::NAN), viridis(0.0));
    }

    #[test]
    fn test_stops_are_hit_exactly() {
        for (i, stop) in VIRIDIS.iter().enumerate() {
            let v = i as f32 / (VIRIDIS.len() - 1) as f32;
            assert_eq!(viridis(v), *stop, "stop {}", i);
        }
    }

    #[test]
    fn test_midpoint_between_stops() {
        // Halfway between the first two stops
        let rgb = viridis(0.5 / 9.0);
        assert_eq!(rgb[0], 0x46);
        assert!((20..=21).contains(&rgb[1]));
        assert_eq!(rgb[2], 0x66);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(-10.0, -10.0, 10.0), 0.0);
        assert_eq!(normalize(10.0, -10.0, 10.0), 1.0);
        assert_eq!(normalize(0.0, -10.0, 10.0), 0.5);
        assert_eq!(normalize(20.0, -10.0, 10.0), 1.0);
        // Flat field
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.5);
    }

    #[test]
    fn test_srgb_to_linear() {
        assert_eq!(srgb_to_linear(0), 0.0);
        assert!((srgb_to_linear(255) - 1.0).abs() < 1e-6);
        // Mid-grey is darker in linear light
        assert!((srgb_to_linear(128) - 0.2158).abs() < 1e-3);
    }
}
