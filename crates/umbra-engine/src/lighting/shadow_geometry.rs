use bytemuck::{Pod, Zeroable};

use crate::coords::{Camera2d, Vec2, Viewport};

use super::{LightSource, Occluder};

/// Vertex consumed by the shadow mask pass.
///
/// `position.z` is the homogeneous `w`; `uv.x` is the mask value.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MaskVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl MaskVertex {
    #[inline]
    fn near(clip: Vec2, mask: f32) -> Self {
        Self { position: [clip.x, clip.y, 1.0], uv: [mask, 0.0] }
    }

    /// Point at infinity along `dir`.
    #[inline]
    fn far(dir: Vec2, mask: f32) -> Self {
        Self { position: [dir.x, dir.y, 0.0], uv: [mask, 0.0] }
    }
}

pub const VERTICES_PER_OCCLUDER: usize = 6;

/// Builds the shadow volume of every occluder as seen from `light`.
///
/// Each edge becomes a quad from the edge itself to infinity, away from the
/// light, emitted as two triangles. Edges that are degenerate or collinear
/// with the light cast no area and are skipped.
pub fn build_shadow_volume(
    light: &LightSource,
    occluders: &[Occluder],
    camera: &Camera2d,
    viewport: Viewport,
) -> Vec<MaskVertex> {
    let mut out = Vec::with_capacity(occluders.len() * VERTICES_PER_OCCLUDER);

    for o in occluders {
        if o.is_degenerate() {
            continue;
        }
        let edge = o.end - o.start;
        if edge.perp_dot(light.position - o.start).abs() <= f32::EPSILON {
            continue;
        }

        let m = o.visibility;
        let near_a = MaskVertex::near(camera.to_clip(o.start, viewport), m);
        let near_b = MaskVertex::near(camera.to_clip(o.end, viewport), m);
        let far_a = MaskVertex::far(camera.direction_to_clip(o.start - light.position, viewport), m);
        let far_b = MaskVertex::far(camera.direction_to_clip(o.end - light.position, viewport), m);

        out.extend_from_slice(&[near_a, near_b, far_b, near_a, far_b, far_a]);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::Rgba;

    fn light_at(x: f32, y: f32) -> LightSource {
        LightSource::new(Vec2::new(x, y), Rgba::WHITE, 1.0)
    }

    fn viewport() -> Viewport {
        Viewport::new(200.0, 200.0)
    }

    #[test]
    fn one_quad_per_occluder() {
        let occ = [
            Occluder::new(Vec2::new(10.0, -10.0), Vec2::new(10.0, 10.0), 0.0),
            Occluder::new(Vec2::new(-10.0, 20.0), Vec2::new(10.0, 20.0), 0.5),
        ];
        let verts = build_shadow_volume(&light_at(0.0, 0.0), &occ, &Camera2d::default(), viewport());
        assert_eq!(verts.len(), 2 * VERTICES_PER_OCCLUDER);
        assert!(verts[..6].iter().all(|v| v.uv[0] == 0.0));
        assert!(verts[6..].iter().all(|v| v.uv[0] == 0.5));
    }

    #[test]
    fn far_vertices_are_at_infinity_pointing_away_from_light() {
        let occ = [Occluder::new(Vec2::new(10.0, -10.0), Vec2::new(10.0, 10.0), 0.0)];
        let verts = build_shadow_volume(&light_at(0.0, 0.0), &occ, &Camera2d::default(), viewport());
        let w: Vec<f32> = verts.iter().map(|v| v.position[2]).collect();
        assert_eq!(w, vec![1.0, 1.0, 0.0, 1.0, 0.0, 0.0]);
        for v in verts.iter().filter(|v| v.position[2] == 0.0) {
            assert!(v.position[0] > 0.0, "far vertex should extend to +x: {v:?}");
        }
    }

    #[test]
    fn near_vertices_use_camera_clip_space() {
        let occ = [Occluder::new(Vec2::new(100.0, 0.0), Vec2::new(100.0, 100.0), 0.0)];
        let verts = build_shadow_volume(&light_at(0.0, 0.0), &occ, &Camera2d::default(), viewport());
        assert_eq!(verts[0].position, [1.0, 0.0, 1.0]);
        assert_eq!(verts[1].position, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn degenerate_and_collinear_edges_are_skipped() {
        let occ = [
            Occluder::new(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 0.0),
            Occluder::new(Vec2::new(5.0, 0.0), Vec2::new(10.0, 0.0), 0.0),
        ];
        let verts = build_shadow_volume(&light_at(0.0, 0.0), &occ, &Camera2d::default(), viewport());
        assert!(verts.is_empty());
    }

    #[test]
    fn vertex_stride_matches_attribute_layout() {
        assert_eq!(std::mem::size_of::<MaskVertex>(), 20);
    }
}
