use std::path::PathBuf;

use anyhow::Result;
use glam::UVec2;

use crate::{
    color::{Color, BLACK},
    engine::Engine,
    platform::platform_run,
    texture::default_asset_root,
};

#[derive(Debug)]
pub struct App {
    pub title: String,
    pub window: UVec2,
    pub vsync: bool,
    pub clear_color: Color,
    pub asset_root: PathBuf,
}

impl Default for App {
    fn default() -> Self {
        Self {
            title: "Sprite Test".to_string(),
            window: UVec2::new(640, 480),
            vsync: true,
            clear_color: BLACK,
            asset_root: default_asset_root(),
        }
    }
}

impl App {
    pub fn title(mut self, title: String) -> Self {
        self.title = title;
        self
    }

    pub fn window(mut self, window: UVec2) -> Self {
        self.window = window;
        self
    }

    pub fn vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn asset_root(mut self, root: PathBuf) -> Self {
        self.asset_root = root;
        self
    }

    /// Open the window and run until quit
    pub fn run<Setup: FnOnce(&mut Engine)>(self, setup: Setup) -> Result<()> {
        platform_run(self, setup)
    }
}
