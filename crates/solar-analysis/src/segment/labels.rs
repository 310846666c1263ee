//! Per-pixel cluster labels.

/// Row-major grid of cluster labels, co-indexed with the source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGrid {
    labels: Vec<u32>,
    width: u32,
    height: u32,
}

impl LabelGrid {
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `labels.len() == width * height`.
    pub fn new(labels: Vec<u32>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            labels.len(),
            width as usize * height as usize,
            "label count must match {}x{}",
            width,
            height
        );
        Self {
            labels,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.labels
    }

    /// Label at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.labels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Number of distinct labels that occur at least once.
    pub fn distinct(&self) -> usize {
        let mut seen: Vec<u32> = self.labels.clone();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}
