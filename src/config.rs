use std::{fs, path::Path, path::PathBuf};

use glam::{IVec2, UVec2};
use serde::{Deserialize, Serialize};

use crate::{
    app::App,
    color::{Color, BLACK},
    errors::Error,
    sprite::SheetLayout,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sprite Test".to_string(),
            width: 640,
            height: 480,
            vsync: true,
        }
    }
}

/// One sprite sheet: file, relative to the asset root, plus its grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub path: PathBuf,
    #[serde(flatten)]
    pub layout: SheetLayout,
}

impl AnimationConfig {
    pub fn new<P: Into<PathBuf>>(path: P, layout: SheetLayout) -> Self {
        Self {
            path: path.into(),
            layout,
        }
    }
}

/// Demo settings, loaded from JSON. Missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub clear_color: Color,
    /// Pixels moved per tick while an arrow key is held
    pub movement_speed: i32,
    pub idle: AnimationConfig,
    pub attack: AnimationConfig,
    /// Added to the position when the attack starts, subtracted when it ends
    pub attack_offset: IVec2,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            clear_color: BLACK,
            movement_speed: 4,
            idle: AnimationConfig::new("302001406_idle.png", SheetLayout::new(4, 3, 2, 8)),
            attack: AnimationConfig::new("302001406_atk.png", SheetLayout::new(22, 3, 8, 4)),
            attack_offset: IVec2::new(-154, -17),
        }
    }
}

impl DemoConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| Error::ParseConfig {
            path: path.to_owned(),
            source,
        })?;
        log::info!("Loaded config {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Window settings as an app builder
    pub fn app(&self) -> App {
        let WindowConfig {
            title,
            width,
            height,
            vsync,
        } = self.window.clone();
        App::default()
            .title(title)
            .window(UVec2::new(width, height))
            .vsync(vsync)
            .clear_color(self.clear_color)
    }
}
