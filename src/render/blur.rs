use crate::assets::decode::PosterImage;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{PosterError, PosterResult};

/// Gaussian blur of a premultiplied RGBA8 buffer. Edges clamp.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> PosterResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| PosterError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(PosterError::render(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> PosterResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(PosterError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(PosterError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Push rounding error into the center tap so the kernel sums to exactly 1.0.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

/// Downsampling factor for shadow masks.
pub const SHADOW_SCALE: u32 = 4;

/// A blurred silhouette ready to be drawn at `SHADOW_SCALE`× its pixel size.
#[derive(Clone, Debug)]
pub struct ShadowMask {
    pub width: u32,
    pub height: u32,
    /// Empty border around the silhouette, in mask pixels.
    pub pad: u32,
    pub rgba8_premul: Vec<u8>,
}

/// Build the drop shadow of `image` drawn at `dest_w`×`dest_h` device pixels.
///
/// `blur` follows the canvas convention: the gaussian sigma is half of it.
pub fn shadow_mask(
    image: &PosterImage,
    dest_w: f64,
    dest_h: f64,
    color: Rgba8,
    blur: f64,
) -> PosterResult<ShadowMask> {
    if !(dest_w.is_finite() && dest_h.is_finite()) || dest_w <= 0.0 || dest_h <= 0.0 {
        return Err(PosterError::render("shadow destination must be non-empty"));
    }
    if image.width == 0 || image.height == 0 {
        return Err(PosterError::render("shadow source image is empty"));
    }
    let scale = f64::from(SHADOW_SCALE);
    let sigma = (blur.max(0.0) / 2.0 / scale) as f32;
    let radius = (f64::from(sigma) * 3.0).ceil() as u32;
    let pad = radius;

    let inner_w = (dest_w / scale).ceil().max(1.0) as u32;
    let inner_h = (dest_h / scale).ceil().max(1.0) as u32;
    let width = inner_w + 2 * pad;
    let height = inner_h + 2 * pad;

    let mut buf = vec![0u8; width as usize * height as usize * 4];
    for my in 0..inner_h {
        let sy = ((f64::from(my) + 0.5) / f64::from(inner_h) * f64::from(image.height)) as u32;
        for mx in 0..inner_w {
            let sx =
                ((f64::from(mx) + 0.5) / f64::from(inner_w) * f64::from(image.width)) as u32;
            let a = image.alpha_at(sx.min(image.width - 1), sy.min(image.height - 1));
            if a == 0 {
                continue;
            }
            let px = color.scale_alpha(f32::from(a) / 255.0).to_premul();
            let idx = (((my + pad) * width + mx + pad) as usize) * 4;
            buf[idx..idx + 4].copy_from_slice(&px);
        }
    }

    let rgba8_premul = if radius == 0 {
        buf
    } else {
        blur_rgba8_premul(&buf, width, height, radius, sigma)?
    };
    Ok(ShadowMask {
        width,
        height,
        pad,
        rgba8_premul,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
