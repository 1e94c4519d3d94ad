//! Channel colours: left takes a hue, right takes the opposite one.

use crate::waterfall::WaterfallPixel;

pub type Rgb = [u8; 3];

/// HSV (hue in degrees) to 8-bit RGB.
pub fn hsv_to_rgb(hue: f32, sat: f32, val: f32) -> Rgb {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = val * sat;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = val - c;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_u8 = |v: f32| ((v + m).clamp(0.0, 1.0) * 255.0).round() as u8;
    [to_u8(r), to_u8(g), to_u8(b)]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelColors {
    pub scope_dim: Rgb,
    pub scope: Rgb,
    pub curve_dim: Rgb,
    pub curve: Rgb,
    pub fill: Rgb,
}

impl ChannelColors {
    fn from_hue(hue: f32) -> ChannelColors {
        ChannelColors {
            scope_dim: hsv_to_rgb(hue, 1.0, 0.125),
            scope: hsv_to_rgb(hue, 1.0, 1.0),
            curve_dim: hsv_to_rgb(hue, 1.0, 0.25),
            curve: hsv_to_rgb(hue, 1.0, 0.5),
            fill: hsv_to_rgb(hue, 1.0, 0.5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub left: ChannelColors,
    pub right: ChannelColors,
}

impl Default for Palette {
    fn default() -> Self {
        Palette::from_hue(30.0)
    }
}

impl Palette {
    pub fn from_hue(hue_left: f32) -> Palette {
        let hue_right = (hue_left + 180.0).rem_euclid(360.0);
        Palette {
            left: ChannelColors::from_hue(hue_left),
            right: ChannelColors::from_hue(hue_right),
        }
    }

    /// Colour of one waterfall pixel: each channel's bright colour weighted
    /// by its intensity, summed with saturation.
    pub fn shade(&self, px: WaterfallPixel) -> Rgb {
        let [l, r] = px;
        let mut out = [0u8; 3];
        for (i, o) in out.iter_mut().enumerate() {
            let a = self.left.scope[i] as u32 * l as u32 / 255;
            let b = self.right.scope[i] as u32 * r as u32 / 255;
            *o = (a + b).min(255) as u8;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), [255, 0, 0]);
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), [0, 255, 0]);
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), [0, 0, 255]);
        assert_eq!(hsv_to_rgb(360.0, 1.0, 1.0), [255, 0, 0]);
        assert_eq!(hsv_to_rgb(77.0, 0.0, 0.5), [128, 128, 128]);
    }

    #[test]
    fn right_channel_is_complementary() {
        let p = Palette::from_hue(300.0);
        assert_eq!(p.left.scope, [255, 0, 255]);
        assert_eq!(p.right.scope, [0, 255, 0]);
    }

    #[test]
    fn shade_mixes_channels_by_intensity() {
        let p = Palette::from_hue(0.0);
        assert_eq!(p.shade([0, 0]), [0, 0, 0]);
        assert_eq!(p.shade([255, 0]), [255, 0, 0]);
        assert_eq!(p.shade([0, 255]), [0, 255, 255]);
        assert_eq!(p.shade([255, 255]), [255, 255, 255]);
    }
}
