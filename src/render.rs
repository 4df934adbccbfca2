use glam::{IVec2, UVec2};

use crate::{
    color::{Color, BLACK},
    handle::Handle,
    platform::Platform,
    types::Rect,
};

/// Render subsystem
pub(crate) struct Render {
    pub(crate) platform: Box<dyn Platform>,
    view_size: UVec2,
    clear_color: Color,
    draw_calls: u32,
}

impl Render {
    pub(crate) fn new(platform: Box<dyn Platform>, view_size: UVec2) -> Self {
        Self {
            platform,
            view_size,
            clear_color: BLACK,
            draw_calls: 0,
        }
    }

    pub(crate) fn prepare_frame(&mut self) {
        self.draw_calls = 0;
        self.platform.prepare_frame(self.clear_color);
    }

    pub(crate) fn end_frame(&mut self) {
        self.platform.end_frame();
    }

    /// Draw `src` of the texture with its top-left corner at `pos`, unscaled
    pub(crate) fn draw(&mut self, texture: &Handle, src: Rect, pos: IVec2) {
        let dst = Rect::new(pos, src.size);
        let view = Rect::new(IVec2::ZERO, self.view_size);
        if !view.is_touching(&dst) {
            return;
        }
        self.draw_calls += 1;
        self.platform.draw(texture, src, dst);
    }

    pub(crate) fn draw_calls(&self) -> u32 {
        self.draw_calls
    }

    pub(crate) fn view_size(&self) -> UVec2 {
        self.view_size
    }

    pub(crate) fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub(crate) fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }
}
