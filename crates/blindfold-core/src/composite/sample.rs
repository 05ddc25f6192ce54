//! Bilinear sampling and source-over blending on RGBA rasters.
//!
//! Sampling uses pixel-center conventions: the center of source pixel `i`
//! sits at `i + 0.5`. Interpolation happens on premultiplied values so
//! transparent texels never bleed their color into opaque neighbours.

use crate::decode::DecodedImage;

/// Premultiplied RGBA in the 0..=255 range.
pub type Premultiplied = [f64; 4];

/// Fetch a texel as premultiplied `f64`, clamping coordinates to the edge.
#[inline]
fn texel(image: &DecodedImage, x: i64, y: i64) -> Premultiplied {
    let px = x.clamp(0, i64::from(image.width) - 1) as u32;
    let py = y.clamp(0, i64::from(image.height) - 1) as u32;
    let [r, g, b, a] = image.pixel(px, py);
    let alpha = f64::from(a) / 255.0;
    [
        f64::from(r) * alpha,
        f64::from(g) * alpha,
        f64::from(b) * alpha,
        f64::from(a),
    ]
}

/// Sample `image` at continuous source coordinates `(u, v)`.
///
/// Bilinear interpolation considers the 4 nearest pixel centers and weights
/// their contribution based on distance. Coordinates past the edge clamp.
pub fn sample_bilinear(image: &DecodedImage, u: f64, v: f64) -> Premultiplied {
    let x = u - 0.5;
    let y = v - 0.5;

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = texel(image, x0, y0);
    let p10 = texel(image, x0 + 1, y0);
    let p01 = texel(image, x0, y0 + 1);
    let p11 = texel(image, x0 + 1, y0 + 1);

    let mut result = [0.0; 4];
    for i in 0..4 {
        result[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }
    result
}

/// Composite a premultiplied source color over a straight-alpha RGBA pixel.
#[inline]
pub fn blend_over(dst: &mut [u8], src: Premultiplied) {
    let src_a = (src[3] / 255.0).clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }

    let dst_a = f64::from(dst[3]) / 255.0;
    let keep = dst_a * (1.0 - src_a);
    let out_a = src_a + keep;

    for i in 0..3 {
        let premul = src[i] + f64::from(dst[i]) * keep;
        dst[i] = (premul / out_a).clamp(0.0, 255.0).round() as u8;
    }
    dst[3] = (out_a * 255.0).clamp(0.0, 255.0).round() as u8;
}
