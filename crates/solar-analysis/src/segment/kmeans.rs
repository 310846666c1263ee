//! Best-of-N k-means over 3-d color points.
//!
//! Each attempt starts from random centers inside the (widened) bounding box
//! of the data and alternates nearest-center assignment with mean updates
//! until the largest center movement drops to `epsilon` or `max_iterations`
//! is reached. The attempt with the lowest compactness wins.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::api::AnalysisError;

/// A point or center in color space.
pub type Point3 = [f32; 3];

/// Random centers may land this fraction of the data range outside the
/// bounding box on either side.
const INIT_MARGIN: f32 = 1.0 / 3.0;

/// Clustering parameters.
///
/// # Defaults
///
/// - `k`: 3
/// - `attempts`: 10
/// - `max_iterations`: 100
/// - `epsilon`: 0.2
/// - `seed`: `None` (entropy-seeded)
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansOptions {
    /// Number of clusters.
    pub k: usize,
    /// Number of full restarts; the lowest-compactness run is kept.
    pub attempts: usize,
    /// Iteration cap per attempt.
    pub max_iterations: usize,
    /// Convergence tolerance on center movement, in channel units.
    pub epsilon: f32,
    /// Seed for center initialization. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for KMeansOptions {
    fn default() -> Self {
        Self {
            k: 3,
            attempts: 10,
            max_iterations: 100,
            epsilon: 0.2,
            seed: None,
        }
    }
}

impl KMeansOptions {
    #[inline]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), AnalysisError> {
        if self.k == 0 {
            return Err(AnalysisError::InvalidParameter {
                name: "k",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.attempts == 0 {
            return Err(AnalysisError::InvalidParameter {
                name: "attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_iterations == 0 {
            return Err(AnalysisError::InvalidParameter {
                name: "max_iterations",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.epsilon.is_finite() && self.epsilon >= 0.0) {
            return Err(AnalysisError::InvalidParameter {
                name: "epsilon",
                reason: format!("must be a non-negative number, got {}", self.epsilon),
            });
        }
        Ok(())
    }
}

/// Result of a clustering run.
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Cluster index per input point.
    pub labels: Vec<u32>,
    /// Final centers, `k` entries.
    pub centers: Vec<Point3>,
    /// Sum of squared distances from each point to its center.
    pub compactness: f64,
    /// Iterations used by the winning attempt.
    pub iterations: usize,
}

/// Cluster `points` into `options.k` groups.
///
/// An empty point set yields empty labels and `k` zero centers.
pub fn kmeans(points: &[Point3], options: &KMeansOptions) -> Result<KMeansResult, AnalysisError> {
    options.validate()?;

    if points.is_empty() {
        return Ok(KMeansResult {
            labels: Vec::new(),
            centers: vec![[0.0; 3]; options.k],
            compactness: 0.0,
            iterations: 0,
        });
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let bounds = Bounds::of(points);

    let mut best: Option<KMeansResult> = None;
    for attempt in 0..options.attempts {
        let initial: Vec<Point3> = (0..options.k).map(|_| bounds.sample(&mut rng)).collect();
        let run = run_attempt(points, initial, options);

        tracing::debug!(
            attempt,
            iterations = run.iterations,
            compactness = run.compactness,
            "k-means attempt finished"
        );

        let better = best
            .as_ref()
            .map_or(true, |b| run.compactness < b.compactness);
        if better {
            best = Some(run);
        }
    }

    // attempts >= 1 is validated above
    best.ok_or(AnalysisError::InvalidParameter {
        name: "attempts",
        reason: "must be at least 1".to_string(),
    })
}

/// Per-channel bounding box of the data.
struct Bounds {
    min: Point3,
    max: Point3,
}

impl Bounds {
    fn of(points: &[Point3]) -> Self {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for p in points {
            for c in 0..3 {
                min[c] = min[c].min(p[c]);
                max[c] = max[c].max(p[c]);
            }
        }
        Self { min, max }
    }

    fn sample(&self, rng: &mut StdRng) -> Point3 {
        let mut center = [0.0; 3];
        for c in 0..3 {
            let range = self.max[c] - self.min[c];
            let t: f32 = rng.gen::<f32>() * (1.0 + 2.0 * INIT_MARGIN) - INIT_MARGIN;
            center[c] = self.min[c] + t * range;
        }
        center
    }
}

fn run_attempt(points: &[Point3], mut centers: Vec<Point3>, options: &KMeansOptions) -> KMeansResult {
    let mut labels = vec![0u32; points.len()];
    let mut iterations = 0;

    while iterations < options.max_iterations {
        iterations += 1;
        assign(points, &centers, &mut labels);
        let updated = update_centers(points, &labels, &centers);
        let shift = max_shift(&centers, &updated);
        centers = updated;
        if shift <= options.epsilon {
            break;
        }
    }

    let compactness = assign(points, &centers, &mut labels);
    KMeansResult {
        labels,
        centers,
        compactness,
        iterations,
    }
}

/// Label every point with its nearest center; returns the compactness.
fn assign(points: &[Point3], centers: &[Point3], labels: &mut [u32]) -> f64 {
    let mut compactness = 0.0f64;
    for (point, label) in points.iter().zip(labels.iter_mut()) {
        let (idx, dist) = nearest(point, centers);
        *label = idx as u32;
        compactness += dist as f64;
    }
    compactness
}

/// Index and squared distance of the nearest center. Ties go to the lower index.
#[inline]
fn nearest(point: &Point3, centers: &[Point3]) -> (usize, f32) {
    let mut best_idx = 0;
    let mut best_dist = f32::MAX;
    for (idx, center) in centers.iter().enumerate() {
        let d = distance_sq(point, center);
        if d < best_dist {
            best_dist = d;
            best_idx = idx;
        }
    }
    (best_idx, best_dist)
}

#[inline]
fn distance_sq(a: &Point3, b: &Point3) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

/// Recompute centers as cluster means.
///
/// A cluster that received no points is re-seeded at the point farthest from
/// its assigned center; every re-seed takes a different point.
fn update_centers(points: &[Point3], labels: &[u32], previous: &[Point3]) -> Vec<Point3> {
    let k = previous.len();
    let mut sums = vec![[0.0f64; 3]; k];
    let mut counts = vec![0usize; k];

    for (point, &label) in points.iter().zip(labels) {
        let sum = &mut sums[label as usize];
        sum[0] += point[0] as f64;
        sum[1] += point[1] as f64;
        sum[2] += point[2] as f64;
        counts[label as usize] += 1;
    }

    let mut centers: Vec<Point3> = sums
        .iter()
        .zip(&counts)
        .zip(previous)
        .map(|((sum, &count), prev)| {
            if count == 0 {
                *prev
            } else {
                let n = count as f64;
                [(sum[0] / n) as f32, (sum[1] / n) as f32, (sum[2] / n) as f32]
            }
        })
        .collect();

    let empty: Vec<usize> = (0..k).filter(|&c| counts[c] == 0).collect();
    if !empty.is_empty() {
        let mut distances: Vec<f32> = points
            .iter()
            .zip(labels)
            .map(|(p, &l)| distance_sq(p, &previous[l as usize]))
            .collect();

        for cluster in empty {
            let farthest = distances
                .iter()
                .enumerate()
                .fold((0usize, f32::MIN), |acc, (i, &d)| if d > acc.1 { (i, d) } else { acc })
                .0;
            centers[cluster] = points[farthest];
            distances[farthest] = f32::MIN;
        }
    }

    centers
}

fn max_shift(old: &[Point3], new: &[Point3]) -> f32 {
    old.iter()
        .zip(new)
        .map(|(a, b)| distance_sq(a, b))
        .fold(0.0f32, f32::max)
        .sqrt()
}
