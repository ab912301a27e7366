use crate::coords::{Transform2d, Vec2};

use super::LightingError;

/// One occluding edge in world space.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Occluder {
    pub start: Vec2,
    pub end: Vec2,
    /// Mask value written behind this edge (0.0 = opaque, 1.0 = no shadow).
    pub visibility: f32,
}

impl Occluder {
    #[inline]
    pub const fn new(start: Vec2, end: Vec2, visibility: f32) -> Self {
        Self { start, end, visibility }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        (self.end - self.start).length() <= f32::EPSILON
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Topology {
    /// Every three vertices form a triangle; each triangle contributes three edges.
    Triangles,
    /// A closed outline; consecutive vertices form edges, last wraps to first.
    Polygon,
}

/// Shadow-casting shape in local space.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowCaster {
    vertices: Vec<Vec2>,
    topology: Topology,
    visibility: f32,
}

impl ShadowCaster {
    /// Triangle-list caster, e.g. the vertex stream of a 2D mesh.
    pub fn triangles(vertices: Vec<Vec2>, visibility: f32) -> Result<Self, LightingError> {
        if vertices.len() % 3 != 0 {
            return Err(LightingError::MalformedCaster { vertex_count: vertices.len() });
        }
        Ok(Self { vertices, topology: Topology::Triangles, visibility })
    }

    /// Closed outline through `points`.
    pub fn polygon(points: Vec<Vec2>, visibility: f32) -> Self {
        Self { vertices: points, topology: Topology::Polygon, visibility }
    }

    /// Axis-aligned box centered on the local origin.
    pub fn rect(half_size: Vec2, visibility: f32) -> Self {
        let (hx, hy) = (half_size.x, half_size.y);
        Self::polygon(
            vec![
                Vec2::new(-hx, -hy),
                Vec2::new(hx, -hy),
                Vec2::new(hx, hy),
                Vec2::new(-hx, hy),
            ],
            visibility,
        )
    }

    #[inline]
    pub fn visibility(&self) -> f32 {
        self.visibility
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// World-space edges of this caster placed by `transform`.
    pub fn occluders(&self, transform: &Transform2d) -> Vec<Occluder> {
        let world: Vec<Vec2> = self.vertices.iter().map(|&v| transform.transform_point(v)).collect();
        let edge = |a: Vec2, b: Vec2| Occluder::new(a, b, self.visibility);

        match self.topology {
            Topology::Triangles => world
                .chunks_exact(3)
                .flat_map(|t| [edge(t[0], t[1]), edge(t[1], t[2]), edge(t[2], t[0])])
                .collect(),
            Topology::Polygon => {
                if world.len() < 2 {
                    return Vec::new();
                }
                (0..world.len())
                    .map(|i| edge(world[i], world[(i + 1) % world.len()]))
                    .collect()
            }
        }
    }
}
