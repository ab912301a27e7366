//! Per-invocation mirrors of the three WGSL programs.

use super::{ChannelRing, LightUniform, Rgba};

/// Output of the shadow mask vertex stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MaskVarying {
    /// Clip-space position; `w` comes from the input `z`.
    pub clip: [f32; 4],
    pub mask: f32,
}

/// Shadow mask vertex stage: `z` becomes the homogeneous `w`, `uv.x` the mask.
#[inline]
pub fn shadow_mask_vertex(position: [f32; 3], uv: [f32; 2]) -> MaskVarying {
    MaskVarying {
        clip: [position[0], position[1], 0.0, position[2]],
        mask: uv[0],
    }
}

/// Shadow mask fragment stage: mask in red, everything else exactly zero.
#[inline]
pub fn shadow_mask_fragment(mask: f32) -> Rgba {
    Rgba::new(mask, 0.0, 0.0, 0.0)
}

/// Effect of writing `src` through a RED-only color write mask onto `dst`.
#[inline]
pub fn write_red(dst: Rgba, src: Rgba) -> Rgba {
    Rgba { r: src.r, ..dst }
}

/// `data.rgb * data.a * sampled.r`
#[inline]
pub fn light_contribution(sampled: Rgba, light: &LightUniform) -> [f32; 3] {
    let [r, g, b, intensity] = light.data;
    let k = intensity * sampled.r;
    [r * k, g * k, b * k]
}

/// Light accumulation fragment stage.
///
/// - not last: `(1.0, g + c.r, b + c.g, a + c.b)`
/// - last:     `(g + c.r, b + c.g, a + c.b, 1.0)`
pub fn light_accumulate(sampled: Rgba, light: &LightUniform) -> Rgba {
    let contribution = light_contribution(sampled, light);
    let mut ring = ChannelRing::from_texel(sampled);
    if light.is_last() {
        ring.resolve(contribution)
    } else {
        ring.park(contribution);
        ring.to_texel()
    }
}

/// Texture composite fragment stage.
#[inline]
pub fn composite(a: Rgba, b: Rgba) -> Rgba {
    a + b
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    // ── shadow mask ───────────────────────────────────────────────────────

    #[test]
    fn mask_vertex_moves_z_into_w() {
        let v = shadow_mask_vertex([0.5, -0.5, 0.0], [0.75, 0.9]);
        assert_eq!(v.clip, [0.5, -0.5, 0.0, 0.0]);
        assert_eq!(v.mask, 0.75);
    }

    #[test]
    fn mask_fragment_writes_red_only() {
        for m in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(shadow_mask_fragment(m), Rgba::new(m, 0.0, 0.0, 0.0));
        }
    }

    #[test]
    fn red_write_mask_preserves_other_channels() {
        let dst = Rgba::new(1.0, 0.2, 0.3, 0.4);
        let out = write_red(dst, shadow_mask_fragment(0.1));
        assert_eq!(out, Rgba::new(0.1, 0.2, 0.3, 0.4));
    }

    // ── accumulation ──────────────────────────────────────────────────────

    #[test]
    fn intermediate_pass_parks_contribution() {
        let (r0, g0, b0, a0) = (0.5, 0.1, 0.2, 0.3);
        let light = LightUniform::from_parts([0.8, 0.4, 0.2, 2.0], false);
        let out = light_accumulate(Rgba::new(r0, g0, b0, a0), &light);
        let expected = Rgba::new(
            1.0,
            g0 + 0.8 * 2.0 * r0,
            b0 + 0.4 * 2.0 * r0,
            a0 + 0.2 * 2.0 * r0,
        );
        assert!(out.approx_eq(expected, EPS), "{out:?}");
    }

    #[test]
    fn final_pass_unparks_into_rgb() {
        let (r0, g0, b0, a0) = (0.5, 0.1, 0.2, 0.3);
        let light = LightUniform::from_parts([0.8, 0.4, 0.2, 2.0], true);
        let out = light_accumulate(Rgba::new(r0, g0, b0, a0), &light);
        let expected = Rgba::new(
            g0 + 0.8 * 2.0 * r0,
            b0 + 0.4 * 2.0 * r0,
            a0 + 0.2 * 2.0 * r0,
            1.0,
        );
        assert!(out.approx_eq(expected, EPS), "{out:?}");
    }

    #[test]
    fn half_masked_red_light_on_empty_accumulator() {
        // Red is parked in G on a non-final pass, so the half mask lands in G, not A.
        let light = LightUniform::from_parts([1.0, 0.0, 0.0, 1.0], false);
        let out = light_accumulate(Rgba::new(0.5, 0.0, 0.0, 0.0), &light);
        assert_eq!(out, Rgba::new(1.0, 0.5, 0.0, 0.0));
    }

    #[test]
    fn fully_shadowed_pixel_gains_nothing() {
        let light = LightUniform::from_parts([1.0, 1.0, 1.0, 5.0], true);
        let out = light_accumulate(Rgba::new(0.0, 0.2, 0.3, 0.4), &light);
        assert_eq!(out, Rgba::new(0.2, 0.3, 0.4, 1.0));
    }

    #[test]
    fn accumulation_does_not_clamp() {
        let light = LightUniform::from_parts([1.0, 1.0, 1.0, 4.0], true);
        let out = light_accumulate(Rgba::new(1.0, 0.0, 0.0, 0.0), &light);
        assert_eq!(out, Rgba::new(4.0, 4.0, 4.0, 1.0));
    }

    #[test]
    fn zero_x_flag_counts_as_intermediate() {
        let light = LightUniform { data: [1.0, 1.0, 1.0, 1.0], last: [0.0, 1.0, 1.0, 1.0] };
        assert_eq!(light_accumulate(Rgba::new(1.0, 0.0, 0.0, 0.0), &light).r, 1.0);
    }

    // ── composite ─────────────────────────────────────────────────────────

    #[test]
    fn composite_sums_without_clamping() {
        let a = Rgba::new(0.75, 0.5, 0.25, 1.0);
        let b = Rgba::new(0.5, 0.5, 0.5, 1.0);
        assert_eq!(composite(a, b), Rgba::new(1.25, 1.0, 0.75, 2.0));
    }
}
