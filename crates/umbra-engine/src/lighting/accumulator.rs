use super::Rgba;

/// One accumulator texel viewed as a mask slot plus three parked color slots.
///
/// Only the red channel may be written by the mask pass, so accumulated light
/// has to live somewhere else until the last light: it is parked in G/B/A
/// (light R in G, light G in B, light B in A). `resolve` shifts the parked
/// slots back into RGB.
///
/// Capacity is fixed at [`ChannelRing::SLOTS`] color slots. Contributions add
/// into their slot, so any number of lights can be parked without loss.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChannelRing {
    mask: f32,
    parked: [f32; Self::SLOTS],
}

impl ChannelRing {
    /// Number of parked color slots (G, B, A).
    pub const SLOTS: usize = 3;

    /// Fresh accumulator: fully lit mask, parked slots seeded with `ambient` RGB.
    #[inline]
    pub fn cleared(ambient: Rgba) -> Self {
        Self { mask: 1.0, parked: [ambient.r, ambient.g, ambient.b] }
    }

    /// Reinterprets a stored texel; lossless in both directions.
    #[inline]
    pub fn from_texel(texel: Rgba) -> Self {
        Self { mask: texel.r, parked: [texel.g, texel.b, texel.a] }
    }

    #[inline]
    pub fn to_texel(self) -> Rgba {
        Rgba::new(self.mask, self.parked[0], self.parked[1], self.parked[2])
    }

    #[inline]
    pub fn mask(&self) -> f32 {
        self.mask
    }

    #[inline]
    pub fn parked(&self) -> [f32; Self::SLOTS] {
        self.parked
    }

    /// Red-only write performed by the shadow mask pass.
    #[inline]
    pub fn apply_mask(&mut self, mask: f32) {
        self.mask = mask;
    }

    /// Intermediate light: add into the parked slots and reset the mask to 1.0
    /// so the next mask pass starts from a fully lit texel.
    pub fn park(&mut self, contribution: [f32; Self::SLOTS]) {
        for (slot, c) in self.parked.iter_mut().zip(contribution) {
            *slot += c;
        }
        self.mask = 1.0;
    }

    /// Final light: move parked slots back into RGB, add the last contribution,
    /// and fix alpha to 1.0.
    pub fn resolve(self, contribution: [f32; Self::SLOTS]) -> Rgba {
        Rgba::new(
            self.parked[0] + contribution[0],
            self.parked[1] + contribution[1],
            self.parked[2] + contribution[2],
            1.0,
        )
    }
}
