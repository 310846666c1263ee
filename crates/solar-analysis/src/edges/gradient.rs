//! Sobel gradients with replicated borders.

use image::GrayImage;

/// Horizontal and vertical derivatives plus L1 magnitude, row-major.
pub struct Gradients {
    pub gx: Vec<i32>,
    pub gy: Vec<i32>,
    pub magnitude: Vec<i32>,
    pub width: usize,
    pub height: usize,
}

/// Compute 3 x 3 Sobel derivatives.
///
/// Kernels:
/// Gx: [-1 0 1; -2 0 2; -1 0 1]
/// Gy: [-1 -2 -1; 0 0 0; 1 2 1]
///
/// Out-of-image samples repeat the nearest edge pixel.
pub fn sobel(gray: &GrayImage) -> Gradients {
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    let src = gray.as_raw();
    let n = width * height;

    let mut gx = vec![0i32; n];
    let mut gy = vec![0i32; n];
    let mut magnitude = vec![0i32; n];

    let at = |x: isize, y: isize| -> i32 {
        let cx = x.clamp(0, width as isize - 1) as usize;
        let cy = y.clamp(0, height as isize - 1) as usize;
        src[cy * width + cx] as i32
    };

    for y in 0..height as isize {
        for x in 0..width as isize {
            let p00 = at(x - 1, y - 1);
            let p10 = at(x, y - 1);
            let p20 = at(x + 1, y - 1);
            let p01 = at(x - 1, y);
            let p21 = at(x + 1, y);
            let p02 = at(x - 1, y + 1);
            let p12 = at(x, y + 1);
            let p22 = at(x + 1, y + 1);

            let dx = -p00 + p20 - 2 * p01 + 2 * p21 - p02 + p22;
            let dy = -p00 - 2 * p10 - p20 + p02 + 2 * p12 + p22;

            let idx = y as usize * width + x as usize;
            gx[idx] = dx;
            gy[idx] = dy;
            magnitude[idx] = dx.abs() + dy.abs();
        }
    }

    Gradients {
        gx,
        gy,
        magnitude,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_flat_image_has_no_gradient() {
        let gray = GrayImage::from_pixel(5, 5, Luma([123]));
        let g = sobel(&gray);
        assert!(g.magnitude.iter().all(|&m| m == 0));
    }

    #[test]
    fn test_vertical_step() {
        // Left half 0, right half 100
        let gray = GrayImage::from_fn(6, 3, |x, _| Luma([if x < 3 { 0 } else { 100 }]));
        let g = sobel(&gray);
        let idx = |x: usize, y: usize| y * 6 + x;
        assert_eq!(g.gx[idx(2, 1)], 400);
        assert_eq!(g.gx[idx(3, 1)], 400);
        assert_eq!(g.gy[idx(2, 1)], 0);
        assert_eq!(g.magnitude[idx(0, 1)], 0);
        assert_eq!(g.magnitude[idx(5, 1)], 0);
    }

    #[test]
    fn test_single_pixel_image() {
        let gray = GrayImage::from_pixel(1, 1, Luma([9]));
        let g = sobel(&gray);
        assert_eq!(g.magnitude, vec![0]);
    }
}
