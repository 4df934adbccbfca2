use anyhow::Result;
use glam::UVec2;

use crate::{
    app::App,
    color::Color,
    engine::Engine,
    errors::Error,
    handle::{Handle, HandleId},
    types::Rect,
};

pub mod headless;
mod sdl;

pub type DefaultPlatform = sdl::SDLPlatform;

pub trait Platform {
    fn prepare_frame(&mut self, clear_color: Color);
    fn end_frame(&mut self);
    fn cleanup(&mut self);
    /// Copy `src` from the texture to `dst` on screen
    fn draw(&mut self, texture: &Handle, src: Rect, dst: Rect);
    fn create_texture(&mut self, handle: &Handle, data: Vec<u8>, size: UVec2) -> Result<(), Error>;
    fn remove_texture(&mut self, handle_id: HandleId);
}

pub(crate) fn platform_run<Setup: FnOnce(&mut Engine)>(app: App, setup: Setup) -> Result<()> {
    sdl::run(app, setup)
}
