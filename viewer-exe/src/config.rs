//! User configuration options.

use crate::{BASE_DIR, CLIOptions};
use dirs::config_dir;
use level::log::{error, info, warn};
use render_soft::RenderConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs::{File, OpenOptions, create_dir_all},
    io::{Read, Write},
    path::PathBuf,
};

const LOG_TAG: &str = "UserConfig";

fn get_cfg_file() -> Option<PathBuf> {
    let Some(mut dir) = config_dir() else {
        warn!(target: LOG_TAG, "Couldn't find the user config dir");
        return None;
    };
    dir.push(BASE_DIR);
    if !dir.exists() {
        if let Err(e) = create_dir_all(&dir) {
            warn!(target: LOG_TAG, "Couldn't create {dir:?}: {e}");
            return None;
        }
    }
    dir.push("user.toml");
    Some(dir)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    pub width: usize,
    pub height: usize,
    /// Degrees
    pub fov: f32,
    pub scale: usize,
}

impl Default for UserConfig {
    fn default() -> Self {
        let render = RenderConfig::default();
        Self {
            width: render.screen_width,
            height: render.screen_height,
            fov: render.horizontal_fov,
            scale: render.screen_scale,
        }
    }
}

impl UserConfig {
    /// `load` will attempt to read the config, falling back to defaults if
    /// it can't be read or parsed
    pub fn load() -> Self {
        let Some(path) = get_cfg_file() else {
            return UserConfig::default();
        };

        let mut file = match OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) => {
                warn!(target: LOG_TAG, "Couldn't open {path:?}, {e}");
                return UserConfig::default();
            }
        };
        let mut buf = String::new();
        if let Ok(read_len) = file.read_to_string(&mut buf) {
            if read_len == 0 {
                return UserConfig::create_default(&mut file);
            }
            if let Ok(data) = toml::from_str(&buf) {
                info!(target: LOG_TAG, "Loaded user config file");
                return data;
            }
            warn!(target: LOG_TAG, "Could not deserialise {path:?} recreating config");
        }
        UserConfig::create_default(&mut file)
    }

    fn create_default(file: &mut File) -> Self {
        let config = UserConfig::default();
        match toml::to_string(&config) {
            Ok(data) => {
                if let Err(e) = file.write_all(data.as_bytes()) {
                    error!(target: LOG_TAG, "Could not write default config: {e}");
                } else {
                    info!(target: LOG_TAG, "Created default user config file");
                }
            }
            Err(e) => error!(target: LOG_TAG, "Could not serialise config: {e}"),
        }
        config
    }

    pub fn write(&self) {
        let Some(path) = get_cfg_file() else {
            return;
        };
        let data = match toml::to_string_pretty(self) {
            Ok(data) => data,
            Err(e) => {
                error!(target: LOG_TAG, "Could not serialise config: {e}");
                return;
            }
        };
        match File::create(&path) {
            Ok(mut file) => file
                .write_all(data.as_bytes())
                .unwrap_or_else(|err| error!(target: LOG_TAG, "Could not write config: {err}")),
            Err(e) => error!(target: LOG_TAG, "Couldn't overwrite {path:?}: {e}"),
        }
    }

    /// Sync the CLI options and UserOptions with each other
    pub fn sync_cli(&mut self, cli: &mut CLIOptions) {
        info!(target: LOG_TAG, "Checking CLI options");

        if cli.width != 0 && cli.width != self.width {
            self.width = cli.width;
        } else {
            cli.width = self.width;
        }

        if cli.height != 0 && cli.height != self.height {
            self.height = cli.height;
        } else {
            cli.height = self.height;
        }

        if let Some(fov) = cli.fov {
            if fov != self.fov {
                self.fov = fov;
            }
        } else {
            cli.fov = Some(self.fov);
        }

        if let Some(scale) = cli.scale {
            if scale != self.scale {
                self.scale = scale;
            }
        } else {
            cli.scale = Some(self.scale);
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            screen_width: self.width,
            screen_height: self.height,
            horizontal_fov: self.fov,
            screen_scale: self.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UserConfig;
    use crate::CLIOptions;

    fn cli() -> CLIOptions {
        CLIOptions {
            verbose: None,
            width: 0,
            height: 0,
            fov: None,
            scale: None,
            output: String::new(),
            x: None,
            y: None,
            angle: None,
            no_sprites: false,
        }
    }

    #[test]
    fn unset_cli_takes_config() {
        let mut config = UserConfig::default();
        let mut options = cli();
        config.sync_cli(&mut options);
        assert_eq!(config, UserConfig::default());
        assert_eq!(options.width, 320);
        assert_eq!(options.height, 200);
        assert_eq!(options.fov, Some(90.0));
        assert_eq!(options.scale, Some(3));
    }

    #[test]
    fn cli_overrides_config() {
        let mut config = UserConfig::default();
        let mut options = cli();
        options.width = 640;
        options.fov = Some(75.0);
        config.sync_cli(&mut options);
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 200);
        assert_eq!(config.fov, 75.0);
        assert!(config.render_config().validate().is_ok());
    }

    #[test]
    fn config_survives_toml() {
        let config = UserConfig {
            width: 800,
            height: 600,
            fov: 100.0,
            scale: 1,
        };
        let data = toml::to_string_pretty(&config).unwrap();
        let back: UserConfig = toml::from_str(&data).unwrap();
        assert_eq!(back, config);
    }
}
