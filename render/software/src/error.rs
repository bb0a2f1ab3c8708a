use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("Screen size {width}x{height} is not usable")]
    InvalidSize { width: usize, height: usize },
    #[error("Horizontal FOV of {0} degrees is outside 0..180")]
    InvalidFov(f32),
    #[error("Screen scale must be at least 1, got {0}")]
    InvalidScale(usize),
}
