//! Full-screen post-processing effects
//!
//! Colour-remap effects are encoded directly by their wire id; kernel
//! effects share one shader path, selected by a sentinel id with the 3x3
//! convolution kernel uploaded alongside.

/// Wire id the composite shader interprets as "apply `kernel3x3`"
pub const KERNEL_EFFECT_ID: i32 = 3;

/// Post-processing effect applied by the composite pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostEffect {
    /// Pass the colour texture through unchanged
    #[default]
    None,
    /// Invert each colour channel
    InvertColors,
    /// Luminance-weighted greyscale
    Greyscale,
    /// 3x3 sharpen kernel
    Sharpen,
    /// 3x3 Gaussian-ish blur kernel
    Blur,
    /// 3x3 edge-detection kernel
    EdgeDetect,
}

impl PostEffect {
    /// Number of selectable effects
    pub const COUNT: usize = 6;

    /// Effect for a number-key index; out-of-range falls back to `None`
    pub fn from_index(index: usize) -> Self {
        match index {
            1 => Self::InvertColors,
            2 => Self::Greyscale,
            3 => Self::Sharpen,
            4 => Self::Blur,
            5 => Self::EdgeDetect,
            _ => Self::None,
        }
    }

    /// Id uploaded to the `effectToUse` uniform
    ///
    /// Colour-remap effects use their own id; all kernel effects collapse
    /// to [`KERNEL_EFFECT_ID`].
    pub fn wire_id(self) -> i32 {
        match self {
            Self::None => 0,
            Self::InvertColors => 1,
            Self::Greyscale => 2,
            Self::Sharpen | Self::Blur | Self::EdgeDetect => KERNEL_EFFECT_ID,
        }
    }

    /// Row-major 3x3 convolution kernel, for kernel effects only
    pub fn kernel(self) -> Option<[f32; 9]> {
        match self {
            Self::Sharpen => Some([
                -1.0, -1.0, -1.0, //
                -1.0, 9.0, -1.0, //
                -1.0, -1.0, -1.0,
            ]),
            Self::Blur => Some([
                1.0 / 16.0,
                2.0 / 16.0,
                1.0 / 16.0,
                2.0 / 16.0,
                4.0 / 16.0,
                2.0 / 16.0,
                1.0 / 16.0,
                2.0 / 16.0,
                1.0 / 16.0,
            ]),
            Self::EdgeDetect => Some([
                1.0, 1.0, 1.0, //
                1.0, -8.0, 1.0, //
                1.0, 1.0, 1.0,
            ]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn index_mapping_covers_all_effects_and_falls_back() {
        assert_eq!(PostEffect::from_index(0), PostEffect::None);
        assert_eq!(PostEffect::from_index(1), PostEffect::InvertColors);
        assert_eq!(PostEffect::from_index(2), PostEffect::Greyscale);
        assert_eq!(PostEffect::from_index(3), PostEffect::Sharpen);
        assert_eq!(PostEffect::from_index(4), PostEffect::Blur);
        assert_eq!(PostEffect::from_index(5), PostEffect::EdgeDetect);
        assert_eq!(PostEffect::from_index(99), PostEffect::None);
    }

    #[test]
    fn kernel_effects_share_the_sentinel_wire_id() {
        assert_eq!(PostEffect::Sharpen.wire_id(), KERNEL_EFFECT_ID);
        assert_eq!(PostEffect::Blur.wire_id(), KERNEL_EFFECT_ID);
        assert_eq!(PostEffect::EdgeDetect.wire_id(), KERNEL_EFFECT_ID);
        assert_eq!(PostEffect::None.wire_id(), 0);
        assert_eq!(PostEffect::InvertColors.wire_id(), 1);
        assert_eq!(PostEffect::Greyscale.wire_id(), 2);
    }

    #[test]
    fn blur_kernel_sums_to_one() {
        let kernel = PostEffect::Blur.kernel().expect("blur kernel");
        assert_relative_eq!(kernel.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn colour_remap_effects_carry_no_kernel() {
        assert!(PostEffect::None.kernel().is_none());
        assert!(PostEffect::InvertColors.kernel().is_none());
        assert!(PostEffect::Greyscale.kernel().is_none());
    }
}
