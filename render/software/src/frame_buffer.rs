use render_trait::{BufferSize, PixelBuffer, SOFT_PIXEL_CHANNELS};

use crate::depth_buffer::DepthBuffer;

/// Colour the frame is cleared to
pub const BACKGROUND: [u8; SOFT_PIXEL_CHANNELS] = [0, 0, 0, 255];

/// Row major RGBA colour buffer with a depth buffer alongside. Both are
/// reset at the start of every frame and only read once it is done.
pub struct FrameBuffer {
    size: BufferSize,
    /// Total length is width * height * CHANNELS
    buffer: Vec<u8>,
    stride: usize,
    depth: DepthBuffer,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            size: BufferSize::new(width, height),
            buffer: vec![0; width * height * SOFT_PIXEL_CHANNELS],
            stride: width * SOFT_PIXEL_CHANNELS,
            depth: DepthBuffer::new(width, height),
        }
    }

    /// Colour to background, depth to infinity
    pub fn reset(&mut self) {
        self.clear_with_colour(&BACKGROUND);
        self.depth.reset();
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.size = BufferSize::new(width, height);
        self.buffer = vec![0; width * height * SOFT_PIXEL_CHANNELS];
        self.stride = width * SOFT_PIXEL_CHANNELS;
        self.depth.resize(width, height);
    }

    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.size.width() && y < self.size.height()
    }

    /// Write colour and depth without testing, used by walls and flats
    #[inline]
    pub fn write(&mut self, x: i32, y: i32, depth: f32, colour: &[u8; SOFT_PIXEL_CHANNELS]) {
        if !self.in_bounds(x, y) {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        self.set_pixel(x, y, colour);
        self.depth.set_depth(depth, y * self.size.width_usize() + x);
    }

    /// Write colour and depth only if `depth` is strictly closer than what
    /// is there. Returns true if the pixel was written.
    #[inline]
    pub fn write_if_nearer(
        &mut self,
        x: i32,
        y: i32,
        depth: f32,
        colour: &[u8; SOFT_PIXEL_CHANNELS],
    ) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        match self.depth.test_depth(x, y, depth) {
            Some(index) => {
                self.set_pixel(x, y, colour);
                self.depth.set_depth(depth, index);
                true
            }
            None => false,
        }
    }
}

impl PixelBuffer for FrameBuffer {
    #[inline(always)]
    fn size(&self) -> &BufferSize {
        &self.size
    }

    fn clear(&mut self) {
        self.buffer.fill(0);
    }

    #[inline(always)]
    fn clear_with_colour(&mut self, colour: &[u8; SOFT_PIXEL_CHANNELS]) {
        self.buffer
            .chunks_mut(SOFT_PIXEL_CHANNELS)
            .for_each(|n| n.copy_from_slice(colour));
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, colour: &[u8; SOFT_PIXEL_CHANNELS]) {
        if x >= self.size.width_usize() || y >= self.size.height_usize() {
            return;
        }
        let pos = self.get_buf_index(x, y);
        self.buffer[pos..pos + SOFT_PIXEL_CHANNELS].copy_from_slice(colour);
    }

    /// Read the colour of a single pixel at X|Y
    #[inline]
    fn read_pixel(&self, x: usize, y: usize) -> [u8; SOFT_PIXEL_CHANNELS] {
        let mut slice = [0u8; SOFT_PIXEL_CHANNELS];
        if x >= self.size.width_usize() || y >= self.size.height_usize() {
            return slice;
        }
        let pos = self.get_buf_index(x, y);
        slice.copy_from_slice(&self.buffer[pos..pos + SOFT_PIXEL_CHANNELS]);
        slice
    }

    #[inline(always)]
    fn buf(&self) -> &[u8] {
        &self.buffer
    }

    #[inline(always)]
    fn buf_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    #[inline(always)]
    fn pitch(&self) -> usize {
        self.stride
    }

    #[inline(always)]
    fn channels(&self) -> usize {
        SOFT_PIXEL_CHANNELS
    }

    #[inline(always)]
    fn get_buf_index(&self, x: usize, y: usize) -> usize {
        y * self.stride + x * SOFT_PIXEL_CHANNELS
    }
}

#[cfg(test)]
mod tests {
    use super::{BACKGROUND, FrameBuffer};
    use render_trait::PixelBuffer;

    #[test]
    fn writes_and_bounds() {
        let mut frame = FrameBuffer::new(8, 4);
        frame.reset();
        assert_eq!(frame.read_pixel(7, 3), BACKGROUND);
        assert_eq!(frame.pitch(), 32);

        frame.set_pixel(8, 0, &[1, 2, 3, 4]);
        frame.write(-1, 0, 1.0, &[1, 2, 3, 4]);
        frame.write(0, 4, 1.0, &[1, 2, 3, 4]);
        assert!(frame.buf().chunks(4).all(|c| c == BACKGROUND));

        frame.write(2, 1, 50.0, &[9, 9, 9, 255]);
        assert_eq!(frame.read_pixel(2, 1), [9, 9, 9, 255]);
        assert_eq!(frame.depth().depth(2, 1), 50.0);
    }

    #[test]
    fn nearer_write_only() {
        let mut frame = FrameBuffer::new(4, 4);
        frame.reset();
        frame.write(1, 1, 20.0, &[1, 1, 1, 255]);
        assert!(!frame.write_if_nearer(1, 1, 30.0, &[2, 2, 2, 255]));
        assert!(!frame.write_if_nearer(1, 1, 20.0, &[2, 2, 2, 255]));
        assert_eq!(frame.read_pixel(1, 1), [1, 1, 1, 255]);
        assert!(frame.write_if_nearer(1, 1, 10.0, &[3, 3, 3, 255]));
        assert_eq!(frame.read_pixel(1, 1), [3, 3, 3, 255]);
        assert_eq!(frame.depth().depth(1, 1), 10.0);

        frame.reset();
        assert_eq!(frame.depth().depth(1, 1), f32::INFINITY);
        assert_eq!(frame.read_pixel(1, 1), BACKGROUND);
    }
}
