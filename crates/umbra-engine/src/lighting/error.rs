use std::fmt;

/// Errors produced by the lighting model.
#[derive(Debug, Clone, PartialEq)]
pub enum LightingError {
    /// A triangle-list caster whose vertex count is not a multiple of three.
    MalformedCaster { vertex_count: usize },
    /// A pass plan that breaks the accumulator ordering rules.
    InvalidPlan {
        /// Index of the offending pass.
        pass: usize,
        reason: &'static str,
    },
    /// `FramePlan::simulate` was given fewer masks or lights than the plan references.
    MissingLightInput { light: usize },
    /// A render target was requested with a zero dimension.
    ZeroSizedTarget { width: u32, height: u32 },
}

impl LightingError {
    pub(crate) fn invalid_plan(pass: usize, reason: &'static str) -> Self {
        Self::InvalidPlan { pass, reason }
    }
}

impl fmt::Display for LightingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedCaster { vertex_count } => write!(
                f,
                "shadow caster has {vertex_count} vertices, expected a multiple of 3"
            ),
            Self::InvalidPlan { pass, reason } => {
                write!(f, "invalid lighting plan at pass {pass}: {reason}")
            }
            Self::MissingLightInput { light } => {
                write!(f, "no mask or light data supplied for light {light}")
            }
            Self::ZeroSizedTarget { width, height } => {
                write!(f, "render target size {width}x{height} has a zero dimension")
            }
        }
    }
}

impl std::error::Error for LightingError {}
