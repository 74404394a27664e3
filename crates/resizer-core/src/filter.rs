//! Color-matrix filters baked into the exported image.
//!
//! Matrices follow the CSS Filter Effects definitions of
//! `grayscale(100%)` and `sepia(100%)` so the exported file matches the
//! CSS-filtered preview. Alpha is never modified.

use image::RgbaImage;

use crate::types::Filter;

/// 3x3 RGB color matrix, row-major.
type ColorMatrix = [[f32; 3]; 3];

/// `grayscale(1)`: Rec. 709 luma weights on every output channel.
const GRAYSCALE: ColorMatrix = [
    [0.2126, 0.7152, 0.0722],
    [0.2126, 0.7152, 0.0722],
    [0.2126, 0.7152, 0.0722],
];

/// `sepia(1)`.
const SEPIA: ColorMatrix = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

impl Filter {
    const fn matrix(self) -> Option<&'static ColorMatrix> {
        match self {
            Self::None => None,
            Self::Grayscale => Some(&GRAYSCALE),
            Self::Sepia => Some(&SEPIA),
        }
    }
}

/// Apply `filter` to every pixel of `image` in place.
///
/// [`Filter::None`] leaves the image untouched.
pub fn apply_filter(image: &mut RgbaImage, filter: Filter) {
    let Some(matrix) = filter.matrix() else {
        return;
    };

    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let rgb = [f32::from(r), f32::from(g), f32::from(b)];
        pixel.0 = [
            channel(&matrix[0], rgb),
            channel(&matrix[1], rgb),
            channel(&matrix[2], rgb),
            a,
        ];
    }
}

/// Dot one matrix row with the input color, rounding into `u8` range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(row: &[f32; 3], rgb: [f32; 3]) -> u8 {
    let value = row[2].mul_add(rgb[2], row[0].mul_add(rgb[0], row[1] * rgb[1]));
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(r: u8, g: u8, b: u8, a: u8) -> RgbaImage {
        RgbaImage::from_pixel(1, 1, image::Rgba([r, g, b, a]))
    }

    #[test]
    fn none_leaves_pixels_untouched() {
        let mut img = single(10, 200, 30, 128);
        apply_filter(&mut img, Filter::None);
        assert_eq!(img.get_pixel(0, 0).0, [10, 200, 30, 128]);
    }

    #[test]
    fn grayscale_equalizes_channels() {
        let mut img = RgbaImage::from_fn(16, 16, |x, y| {
            image::Rgba([
                u8::try_from(x * 16).unwrap_or(u8::MAX),
                u8::try_from(y * 16).unwrap_or(u8::MAX),
                u8::try_from((x + y) * 8).unwrap_or(u8::MAX),
                255,
            ])
        });
        apply_filter(&mut img, Filter::Grayscale);
        for p in img.pixels() {
            assert_eq!(p.0[0], p.0[1]);
            assert_eq!(p.0[1], p.0[2]);
        }
    }

    #[test]
    fn grayscale_uses_luma_weights() {
        let mut red = single(255, 0, 0, 255);
        apply_filter(&mut red, Filter::Grayscale);
        // 0.2126 * 255 = 54.2
        assert_eq!(red.get_pixel(0, 0).0, [54, 54, 54, 255]);

        let mut white = single(255, 255, 255, 255);
        apply_filter(&mut white, Filter::Grayscale);
        assert_eq!(white.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn sepia_matches_css_matrix() {
        let mut red = single(255, 0, 0, 255);
        apply_filter(&mut red, Filter::Sepia);
        // 0.393*255 = 100.2, 0.349*255 = 89.0, 0.272*255 = 69.4
        assert_eq!(red.get_pixel(0, 0).0, [100, 89, 69, 255]);
    }

    #[test]
    fn sepia_saturates_bright_pixels() {
        let mut white = single(255, 255, 255, 255);
        apply_filter(&mut white, Filter::Sepia);
        // Row sums 1.351 and 1.203 clip; 0.937*255 = 238.9
        assert_eq!(white.get_pixel(0, 0).0, [255, 255, 239, 255]);
    }

    #[test]
    fn alpha_is_preserved() {
        let mut img = single(90, 120, 150, 7);
        apply_filter(&mut img, Filter::Sepia);
        assert_eq!(img.get_pixel(0, 0).0[3], 7);
        apply_filter(&mut img, Filter::Grayscale);
        assert_eq!(img.get_pixel(0, 0).0[3], 7);
    }

    #[test]
    fn black_stays_black() {
        for filter in Filter::ALL {
            let mut img = single(0, 0, 0, 255);
            apply_filter(&mut img, filter);
            assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255], "{filter}");
        }
    }
}
