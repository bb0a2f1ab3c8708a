//! Renderer options. The screen distance is derived from the width and FOV
//! and cannot be set on its own.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::utilities::projection;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub screen_width: usize,
    pub screen_height: usize,
    /// Degrees
    pub horizontal_fov: f32,
    /// Integer upscale applied by whatever displays the frame
    pub screen_scale: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            screen_width: 320,
            screen_height: 200,
            horizontal_fov: 90.0,
            screen_scale: 3,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.screen_width < 2 || self.screen_height < 2 {
            return Err(RenderError::InvalidSize {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        if !(self.horizontal_fov > 0.0 && self.horizontal_fov < 180.0) {
            return Err(RenderError::InvalidFov(self.horizontal_fov));
        }
        if self.screen_scale == 0 {
            return Err(RenderError::InvalidScale(self.screen_scale));
        }
        Ok(())
    }

    pub fn fov_radians(&self) -> f32 {
        self.horizontal_fov.to_radians()
    }

    /// `(screen_width / 2) / tan(horizontal_fov / 2)`
    pub fn screen_distance(&self) -> f32 {
        projection(self.fov_radians(), self.screen_width as f32 / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::RenderConfig;
    use crate::error::RenderError;

    #[test]
    fn screen_distance_is_derived() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.screen_distance() - 160.0).abs() < 1e-3);

        let wide = RenderConfig {
            screen_width: 640,
            horizontal_fov: 60.0,
            ..RenderConfig::default()
        };
        assert!((wide.screen_distance() - 320.0 / 30f32.to_radians().tan()).abs() < 1e-2);
    }

    #[test]
    fn bad_values_are_rejected() {
        let config = RenderConfig {
            screen_width: 0,
            ..RenderConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(RenderError::InvalidSize {
                width: 0,
                height: 200
            })
        );

        for fov in [0.0, 180.0, -10.0, f32::NAN] {
            let config = RenderConfig {
                horizontal_fov: fov,
                ..RenderConfig::default()
            };
            assert!(matches!(config.validate(), Err(RenderError::InvalidFov(_))));
        }

        let config = RenderConfig {
            screen_scale: 0,
            ..RenderConfig::default()
        };
        assert_eq!(config.validate(), Err(RenderError::InvalidScale(0)));
    }
}
