//! Colormaps for count-valued rasters and surfaces.

use plotters::style::RGBColor;
use strum_macros::{AsRefStr, Display, EnumString};

/// Piecewise-linear colormaps sampled from well-known control points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Colormap {
    /// Purple -> blue -> green -> yellow. Perceptually uniform.
    #[default]
    Viridis,
    /// Blue -> light grey -> red. Diverging.
    CoolWarm,
    /// Dark blue -> cyan -> green -> yellow -> orange -> red.
    Turbo,
}

const VIRIDIS: &[(f64, f64, f64)] = &[
    (0.267_004, 0.004_874, 0.329_415),
    (0.282_623, 0.140_926, 0.457_517),
    (0.163_625, 0.471_133, 0.558_148),
    (0.477_504, 0.821_444, 0.318_195),
    (0.993_248, 0.906_157, 0.143_936),
];

const COOL_WARM: &[(f64, f64, f64)] = &[
    (0.229_806, 0.298_718, 0.753_683),
    (0.552_011, 0.689_929, 0.996_341),
    (0.865_003, 0.865_003, 0.865_003),
    (0.956_871, 0.598_952, 0.486_029),
    (0.705_673, 0.015_556, 0.150_233),
];

const TURBO: &[(f64, f64, f64)] = &[
    (0.189_95, 0.071_76, 0.232_17),
    (0.117_70, 0.567_00, 0.750_88),
    (0.172_05, 0.887_97, 0.543_62),
    (0.895_67, 0.993_43, 0.296_85),
    (0.978_09, 0.554_14, 0.105_40),
    (0.788_01, 0.080_80, 0.060_51),
];

impl Colormap {
    /// Maps a normalized value in `[0.0, 1.0]` to a color. Out-of-range
    /// values (and NaN) are clamped.
    #[must_use]
    pub fn color(self, value: f64) -> RGBColor {
        let points = match self {
            Self::Viridis => VIRIDIS,
            Self::CoolWarm => COOL_WARM,
            Self::Turbo => TURBO,
        };
        interpolate(points, if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) })
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn interpolate(points: &[(f64, f64, f64)], v: f64) -> RGBColor {
    let to_byte = |c: f64| (c * 255.0).round() as u8;
    let last = points.len() - 1;

    let idx = v * last as f64;
    let i = idx.floor() as usize;
    if i >= last {
        let (r, g, b) = points[last];
        return RGBColor(to_byte(r), to_byte(g), to_byte(b));
    }

    let t = idx - i as f64;
    let (r0, g0, b0) = points[i];
    let (r1, g1, b1) = points[i + 1];
    RGBColor(
        to_byte(t.mul_add(r1 - r0, r0)),
        to_byte(t.mul_add(g1 - g0, g0)),
        to_byte(t.mul_add(b1 - b0, b0)),
    )
}

/// Normalizes a count against the grid maximum. An all-zero grid maps
/// every cell to `0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn intensity(count: u64, max: u64) -> f64 {
    if max == 0 {
        0.0
    } else {
        count as f64 / max as f64
    }
}
