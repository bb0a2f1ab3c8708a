/// Per pixel forward depth of whatever was last written there. Walls and
/// flats fill it, sprites and masked walls test against it.
#[derive(Clone, Debug)]
pub struct DepthBuffer {
    /// Depth values for each pixel (camera space forward distance), row
    /// major. Smaller is closer.
    depths: Box<[f32]>,
    width: usize,
    height: usize,
}

impl DepthBuffer {
    /// Create a new depth buffer with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        let depths = vec![f32::INFINITY; size].into_boxed_slice();
        Self {
            depths,
            width,
            height,
        }
    }

    /// Reset the depth buffer for a new frame
    pub fn reset(&mut self) {
        // Reset all depths to infinity (farthest possible)
        self.depths.fill(f32::INFINITY);
    }

    /// Resize the depth buffer - recreates the buffer
    pub fn resize(&mut self, width: usize, height: usize) {
        let size = width * height;
        self.depths = vec![f32::INFINITY; size].into_boxed_slice();
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Depth at a pixel, infinity when off the buffer
    #[inline]
    pub fn depth(&self, x: usize, y: usize) -> f32 {
        if x >= self.width || y >= self.height {
            return f32::INFINITY;
        }
        self.depths[y * self.width + x]
    }

    /// Returns the pixel index if `depth` is strictly closer than what is
    /// stored, `None` if it is hidden or off the buffer
    #[inline]
    pub fn test_depth(&self, x: usize, y: usize, depth: f32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y * self.width + x;
        if depth < self.depths[index] {
            Some(index)
        } else {
            None
        }
    }

    /// Set depth at a pixel index from `test_depth`
    #[inline]
    pub fn set_depth(&mut self, depth: f32, index: usize) {
        if let Some(d) = self.depths.get_mut(index) {
            *d = depth;
        }
    }

    pub fn depths(&self) -> &[f32] {
        &self.depths
    }
}
