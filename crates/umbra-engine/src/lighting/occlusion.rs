use crate::coords::Vec2;

use super::Occluder;

/// Proper intersection test between segments `p0-p1` and `q0-q1`.
///
/// Touching endpoints and collinear overlap do not count as crossing.
pub fn segments_intersect(p0: Vec2, p1: Vec2, q0: Vec2, q1: Vec2) -> bool {
    let d = p1 - p0;
    let e = q1 - q0;
    let o1 = d.perp_dot(q0 - p0);
    let o2 = d.perp_dot(q1 - p0);
    let o3 = e.perp_dot(p0 - q0);
    let o4 = e.perp_dot(p1 - q0);
    o1 * o2 < 0.0 && o3 * o4 < 0.0
}

/// Mask value at `point` for a light at `light`.
///
/// Overlapping shadows keep the darkest visibility; an unobstructed point is 1.0.
pub fn visibility_at(point: Vec2, light: Vec2, occluders: &[Occluder]) -> f32 {
    resolve_mask(
        occluders
            .iter()
            .filter(|o| !o.is_degenerate() && segments_intersect(light, point, o.start, o.end))
            .map(|o| o.visibility),
    )
}

/// Combines the mask values of every shadow covering one texel.
pub fn resolve_mask<I>(coverage: I) -> f32
where
    I: IntoIterator<Item = f32>,
{
    coverage.into_iter().fold(1.0, f32::min)
}
