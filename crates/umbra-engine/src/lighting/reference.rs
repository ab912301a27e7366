use crate::coords::Vec2;

use super::{visibility_at, FramePlan, LightSource, LightingError, Occluder, Rgba};

/// Full CPU lighting of one world-space point.
///
/// Computes each light's mask by ray casting against `occluders` and then runs
/// the standard frame plan, so the result is the pixel the GPU passes produce
/// at that point.
pub fn shade_point(
    point: Vec2,
    lights: &[LightSource],
    occluders: &[Occluder],
    ambient: Rgba,
    scene: Rgba,
) -> Result<Rgba, LightingError> {
    let masks: Vec<f32> = lights
        .iter()
        .map(|l| visibility_at(point, l.position, occluders))
        .collect();
    FramePlan::for_lights(lights.len(), ambient).simulate(&masks, lights, scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Transform2d;
    use crate::lighting::ShadowCaster;

    #[test]
    fn box_shadows_one_light_but_not_the_other() {
        let caster = ShadowCaster::rect(Vec2::splat(1.0), 0.0);
        let occluders = caster.occluders(&Transform2d::from_translation(Vec2::new(5.0, 0.0)));
        let lights = [
            LightSource::new(Vec2::new(0.0, 0.0), Rgba::rgb(1.0, 0.0, 0.0), 1.0),
            LightSource::new(Vec2::new(10.0, 10.0), Rgba::rgb(0.0, 0.0, 1.0), 1.0),
        ];

        let behind_box = Vec2::new(10.0, 0.0);
        let px = shade_point(behind_box, &lights, &occluders, Rgba::TRANSPARENT, Rgba::TRANSPARENT)
            .unwrap();
        assert!(px.approx_eq(Rgba::new(0.0, 0.0, 1.0, 1.0), 1e-6), "{px:?}");
    }

    #[test]
    fn translucent_caster_dims_instead_of_blocking() {
        let caster = ShadowCaster::rect(Vec2::splat(1.0), 0.5);
        let occluders = caster.occluders(&Transform2d::from_translation(Vec2::new(5.0, 0.0)));
        let lights = [LightSource::new(Vec2::zero(), Rgba::WHITE, 1.0)];
        let px = shade_point(Vec2::new(10.0, 0.0), &lights, &occluders, Rgba::TRANSPARENT, Rgba::TRANSPARENT)
            .unwrap();
        assert!(px.approx_eq(Rgba::new(0.5, 0.5, 0.5, 1.0), 1e-6), "{px:?}");
    }
}
