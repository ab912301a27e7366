use super::{
    composite, light_accumulate, shadow_mask_fragment, write_red, LightSource, LightUniform,
    LightingError, Rgba,
};

/// One GPU pass in a lighting frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Pass {
    /// Clears the first accumulator target.
    Clear { value: Rgba },
    /// Draws the shadow volume of `light` into the red channel of the current accumulator.
    ShadowMask { light: usize },
    /// Reads the current accumulator and writes the next one.
    Accumulate { light: usize, last: bool },
    /// Adds the lit accumulator to the scene texture on the output target.
    Composite,
}

/// Ordered list of passes for one frame.
///
/// The accumulator is a read-modify-write chain: every `Accumulate` reads what the
/// previous passes wrote, so the order here is the order the passes are recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    passes: Vec<Pass>,
}

impl FramePlan {
    /// Standard plan for `count` lights.
    ///
    /// With no lights the accumulator is cleared directly to the resolved
    /// ambient color, so the composite still adds ambient to the scene.
    pub fn for_lights(count: usize, ambient: Rgba) -> Self {
        let mut passes = Vec::with_capacity(2 + count * 2);

        if count == 0 {
            passes.push(Pass::Clear { value: Rgba::rgb(ambient.r, ambient.g, ambient.b) });
        } else {
            passes.push(Pass::Clear { value: Rgba::new(1.0, ambient.r, ambient.g, ambient.b) });
            for light in 0..count {
                passes.push(Pass::ShadowMask { light });
                passes.push(Pass::Accumulate { light, last: light + 1 == count });
            }
        }

        passes.push(Pass::Composite);
        Self { passes }
    }

    /// Wraps an arbitrary pass list; call [`validate`](Self::validate) before use.
    pub fn from_passes(passes: Vec<Pass>) -> Self {
        Self { passes }
    }

    #[inline]
    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    pub fn light_count(&self) -> usize {
        self.passes
            .iter()
            .filter(|p| matches!(p, Pass::Accumulate { .. }))
            .count()
    }

    /// Checks the ordering rules the accumulator chain depends on.
    ///
    /// - the plan starts with its only `Clear`
    /// - every `Accumulate` directly follows the `ShadowMask` of the same light
    /// - lights appear in order starting at 0
    /// - only the final `Accumulate` is marked `last`
    /// - the plan ends with exactly one `Composite`
    pub fn validate(&self) -> Result<(), LightingError> {
        let Some(first) = self.passes.first() else {
            return Err(LightingError::invalid_plan(0, "plan is empty"));
        };
        let Pass::Clear { value } = *first else {
            return Err(LightingError::invalid_plan(0, "plan must start with a clear"));
        };

        let total = self.light_count();
        if total > 0 && value.r != 1.0 {
            return Err(LightingError::invalid_plan(0, "accumulator must start fully lit"));
        }

        let mut next_light = 0usize;
        let mut composited = false;

        for (i, pass) in self.passes.iter().enumerate().skip(1) {
            let prev = self.passes[i - 1];

            if composited {
                return Err(LightingError::invalid_plan(i, "pass recorded after composite"));
            }
            if matches!(prev, Pass::ShadowMask { .. }) && !matches!(pass, Pass::Accumulate { .. }) {
                return Err(LightingError::invalid_plan(i, "shadow mask is not consumed"));
            }

            match *pass {
                Pass::Clear { .. } => {
                    return Err(LightingError::invalid_plan(i, "clear may only start a plan"));
                }
                Pass::ShadowMask { light } => {
                    if light != next_light {
                        return Err(LightingError::invalid_plan(i, "lights must be processed in order"));
                    }
                }
                Pass::Accumulate { light, last } => {
                    if prev != (Pass::ShadowMask { light }) {
                        return Err(LightingError::invalid_plan(
                            i,
                            "accumulate must follow the shadow mask of the same light",
                        ));
                    }
                    next_light += 1;
                    if last != (next_light == total) {
                        return Err(LightingError::invalid_plan(
                            i,
                            "only the final accumulate may be marked last",
                        ));
                    }
                }
                Pass::Composite => composited = true,
            }
        }

        if !composited {
            return Err(LightingError::invalid_plan(
                self.passes.len() - 1,
                "plan must end with a composite",
            ));
        }
        Ok(())
    }

    /// Runs the plan over a single texel on the CPU.
    ///
    /// `masks[i]` is the resolved shadow mask of light `i` at this texel
    /// (1.0 where no shadow volume covers it). Returns the composited pixel.
    pub fn simulate(
        &self,
        masks: &[f32],
        lights: &[LightSource],
        scene: Rgba,
    ) -> Result<Rgba, LightingError> {
        self.validate()?;

        let mut texel = Rgba::TRANSPARENT;
        let mut output = scene;

        for pass in &self.passes {
            match *pass {
                Pass::Clear { value } => texel = value,
                Pass::ShadowMask { light } => {
                    let mask = masks
                        .get(light)
                        .copied()
                        .ok_or(LightingError::MissingLightInput { light })?;
                    texel = write_red(texel, shadow_mask_fragment(mask));
                }
                Pass::Accumulate { light, last } => {
                    let source = lights.get(light).ok_or(LightingError::MissingLightInput { light })?;
                    texel = light_accumulate(texel, &LightUniform::new(source, last));
                }
                Pass::Composite => output = composite(scene, texel),
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    const EPS: f32 = 1e-5;

    fn light(r: f32, g: f32, b: f32, intensity: f32) -> LightSource {
        LightSource::new(Vec2::zero(), Rgba::rgb(r, g, b), intensity)
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn standard_plans_validate() {
        for n in 0..6 {
            FramePlan::for_lights(n, Rgba::rgb(0.1, 0.1, 0.1)).validate().unwrap();
        }
    }

    #[test]
    fn only_final_light_is_last() {
        let plan = FramePlan::for_lights(3, Rgba::BLACK);
        let flags: Vec<bool> = plan
            .passes()
            .iter()
            .filter_map(|p| match p {
                Pass::Accumulate { last, .. } => Some(*last),
                _ => None,
            })
            .collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn accumulate_without_mask_is_rejected() {
        let plan = FramePlan::from_passes(vec![
            Pass::Clear { value: Rgba::new(1.0, 0.0, 0.0, 0.0) },
            Pass::Accumulate { light: 0, last: true },
            Pass::Composite,
        ]);
        assert!(matches!(plan.validate(), Err(LightingError::InvalidPlan { pass: 1, .. })));
    }

    #[test]
    fn mask_for_a_different_light_is_rejected() {
        let plan = FramePlan::from_passes(vec![
            Pass::Clear { value: Rgba::new(1.0, 0.0, 0.0, 0.0) },
            Pass::ShadowMask { light: 0 },
            Pass::Accumulate { light: 1, last: true },
            Pass::Composite,
        ]);
        assert!(plan.validate().is_err());
    }

    #[test]
    fn missing_last_flag_is_rejected() {
        let plan = FramePlan::from_passes(vec![
            Pass::Clear { value: Rgba::new(1.0, 0.0, 0.0, 0.0) },
            Pass::ShadowMask { light: 0 },
            Pass::Accumulate { light: 0, last: false },
            Pass::Composite,
        ]);
        assert!(matches!(plan.validate(), Err(LightingError::InvalidPlan { pass: 2, .. })));
    }

    #[test]
    fn early_last_flag_is_rejected() {
        let plan = FramePlan::from_passes(vec![
            Pass::Clear { value: Rgba::new(1.0, 0.0, 0.0, 0.0) },
            Pass::ShadowMask { light: 0 },
            Pass::Accumulate { light: 0, last: true },
            Pass::ShadowMask { light: 1 },
            Pass::Accumulate { light: 1, last: true },
            Pass::Composite,
        ]);
        assert!(matches!(plan.validate(), Err(LightingError::InvalidPlan { pass: 2, .. })));
    }

    #[test]
    fn dangling_mask_is_rejected() {
        let plan = FramePlan::from_passes(vec![
            Pass::Clear { value: Rgba::new(1.0, 0.0, 0.0, 0.0) },
            Pass::ShadowMask { light: 0 },
            Pass::Composite,
        ]);
        assert!(plan.validate().is_err());
    }

    #[test]
    fn missing_composite_and_trailing_passes_are_rejected() {
        let no_composite = FramePlan::from_passes(vec![Pass::Clear { value: Rgba::BLACK }]);
        assert!(no_composite.validate().is_err());

        let trailing = FramePlan::from_passes(vec![
            Pass::Clear { value: Rgba::BLACK },
            Pass::Composite,
            Pass::Composite,
        ]);
        assert!(trailing.validate().is_err());
    }

    #[test]
    fn empty_plan_is_rejected() {
        assert!(FramePlan::from_passes(Vec::new()).validate().is_err());
    }

    // ── simulation ────────────────────────────────────────────────────────

    #[test]
    fn chained_lights_sum_their_masked_contributions() {
        let lights = [light(1.0, 0.0, 0.0, 1.0), light(0.0, 1.0, 0.0, 2.0), light(0.0, 0.0, 1.0, 0.5)];
        let masks = [0.5, 1.0, 0.2];
        let plan = FramePlan::for_lights(lights.len(), Rgba::TRANSPARENT);
        let out = plan.simulate(&masks, &lights, Rgba::TRANSPARENT).unwrap();
        assert!(out.approx_eq(Rgba::new(0.5, 2.0, 0.1, 1.0), EPS), "{out:?}");
    }

    #[test]
    fn single_light_resolves_immediately() {
        let lights = [light(1.0, 1.0, 1.0, 1.0)];
        let plan = FramePlan::for_lights(1, Rgba::TRANSPARENT);
        let out = plan.simulate(&[0.25], &lights, Rgba::TRANSPARENT).unwrap();
        assert!(out.approx_eq(Rgba::new(0.25, 0.25, 0.25, 1.0), EPS));
    }

    #[test]
    fn more_than_three_lights_lose_nothing() {
        let lights: Vec<LightSource> = (0..7).map(|_| light(0.1, 0.2, 0.3, 1.0)).collect();
        let masks = vec![1.0; lights.len()];
        let plan = FramePlan::for_lights(lights.len(), Rgba::TRANSPARENT);
        let out = plan.simulate(&masks, &lights, Rgba::TRANSPARENT).unwrap();
        assert!(out.approx_eq(Rgba::new(0.7, 1.4, 2.1, 1.0), EPS), "{out:?}");
    }

    #[test]
    fn ambient_and_scene_are_added() {
        let ambient = Rgba::rgb(0.1, 0.1, 0.1);
        let scene = Rgba::new(0.2, 0.3, 0.4, 1.0);
        let plan = FramePlan::for_lights(1, ambient);
        let out = plan.simulate(&[0.0], &[light(1.0, 1.0, 1.0, 1.0)], scene).unwrap();
        assert!(out.approx_eq(Rgba::new(0.3, 0.4, 0.5, 2.0), EPS), "{out:?}");
    }

    #[test]
    fn no_lights_composites_ambient() {
        let plan = FramePlan::for_lights(0, Rgba::rgb(0.1, 0.2, 0.3));
        let out = plan.simulate(&[], &[], Rgba::TRANSPARENT).unwrap();
        assert!(out.approx_eq(Rgba::new(0.1, 0.2, 0.3, 1.0), EPS));
    }

    #[test]
    fn missing_mask_is_reported() {
        let plan = FramePlan::for_lights(2, Rgba::TRANSPARENT);
        let lights = [light(1.0, 1.0, 1.0, 1.0), light(1.0, 1.0, 1.0, 1.0)];
        let err = plan.simulate(&[1.0], &lights, Rgba::TRANSPARENT).unwrap_err();
        assert_eq!(err, LightingError::MissingLightInput { light: 1 });
    }
}
