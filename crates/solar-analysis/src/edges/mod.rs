//! Two-threshold gradient edge detection.
//!
//! A Canny-style detector without pre-smoothing: Sobel gradients, non-maximum
//! suppression along the gradient direction, then hysteresis. Pixels whose
//! magnitude exceeds `high` are definite edges; pixels above `low` survive
//! only when 8-connected to a definite edge.

mod gradient;

pub use gradient::{sobel, Gradients};

use image::{GrayImage, Luma};

pub const DEFAULT_EDGE_LOW: u32 = 100;
pub const DEFAULT_EDGE_HIGH: u32 = 200;

const EDGE: u8 = 255;

/// tan(22.5°) and tan(67.5°), the sector boundaries for direction quantization.
const TAN_22_5: f64 = 0.414_213_562_373_095;
const TAN_67_5: f64 = 2.414_213_562_373_095;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Class {
    Suppressed,
    Weak,
    Strong,
}

/// Detect edges in `gray`.
///
/// Thresholds compare against the L1 gradient magnitude `|gx| + |gy|`.
/// If `low > high` the two are swapped. The result holds 255 on edges and 0
/// elsewhere.
pub fn detect_edges(gray: &GrayImage, low: u32, high: u32) -> GrayImage {
    let (low, high) = if low > high { (high, low) } else { (low, high) };
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return GrayImage::new(width, height);
    }

    let gradients = sobel(gray);
    let mut classes = suppress_non_maxima(&gradients, low as i32, high as i32);
    let edges = hysteresis(&mut classes, gradients.width, gradients.height);

    GrayImage::from_fn(width, height, |x, y| {
        if edges[y as usize * gradients.width + x as usize] {
            Luma([EDGE])
        } else {
            Luma([0])
        }
    })
}

fn suppress_non_maxima(g: &Gradients, low: i32, high: i32) -> Vec<Class> {
    let (w, h) = (g.width, g.height);
    let mag = |x: isize, y: isize| -> i32 {
        if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
            0
        } else {
            g.magnitude[y as usize * w + x as usize]
        }
    };

    let mut classes = vec![Class::Suppressed; w * h];
    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let m = g.magnitude[idx];
            if m <= low {
                continue;
            }

            let (xi, yi) = (x as isize, y as isize);
            let ax = g.gx[idx].abs() as f64;
            let ay = g.gy[idx].abs() as f64;

            let is_max = if ay < ax * TAN_22_5 {
                m > mag(xi - 1, yi) && m >= mag(xi + 1, yi)
            } else if ay > ax * TAN_67_5 {
                m > mag(xi, yi - 1) && m >= mag(xi, yi + 1)
            } else {
                let s = if (g.gx[idx] < 0) != (g.gy[idx] < 0) { -1 } else { 1 };
                m > mag(xi - s, yi - 1) && m > mag(xi + s, yi + 1)
            };

            if is_max {
                classes[idx] = if m > high { Class::Strong } else { Class::Weak };
            }
        }
    }
    classes
}

/// Grow definite edges into connected weak pixels.
fn hysteresis(classes: &mut [Class], w: usize, h: usize) -> Vec<bool> {
    let mut edges = vec![false; w * h];
    let mut stack: Vec<usize> = classes
        .iter()
        .enumerate()
        .filter(|(_, &c)| c == Class::Strong)
        .map(|(i, _)| i)
        .collect();
    for &i in &stack {
        edges[i] = true;
    }

    while let Some(idx) = stack.pop() {
        let x = (idx % w) as isize;
        let y = (idx / w) as isize;
        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let nidx = ny as usize * w + nx as usize;
                if classes[nidx] == Class::Weak && !edges[nidx] {
                    edges[nidx] = true;
                    classes[nidx] = Class::Strong;
                    stack.push(nidx);
                }
            }
        }
    }

    edges
}
