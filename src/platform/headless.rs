//! Windowless platform that records what would have been drawn.

use std::{cell::RefCell, rc::Rc};

use glam::UVec2;
use hashbrown::HashMap;

use crate::{
    color::Color,
    errors::Error,
    handle::{Handle, HandleId},
    types::Rect,
};

use super::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub texture: HandleId,
    pub src: Rect,
    pub dst: Rect,
}

/// Everything the headless platform observed
#[derive(Debug, Default)]
pub struct Recording {
    /// Textures created and not yet removed
    pub textures: HashMap<HandleId, UVec2>,
    pub removed: Vec<HandleId>,
    /// Draw calls of the current frame
    pub draws: Vec<DrawCall>,
    pub frames: u64,
    pub clear_color: Color,
    /// Make texture creation fail
    pub fail_create: bool,
}

#[derive(Default)]
pub struct HeadlessPlatform {
    recording: Rc<RefCell<Recording>>,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the recording, stays valid after the platform is boxed
    pub fn recording(&self) -> Rc<RefCell<Recording>> {
        self.recording.clone()
    }
}

impl Platform for HeadlessPlatform {
    fn prepare_frame(&mut self, clear_color: Color) {
        let mut rec = self.recording.borrow_mut();
        rec.draws.clear();
        rec.clear_color = clear_color;
    }

    fn end_frame(&mut self) {
        self.recording.borrow_mut().frames += 1;
    }

    fn cleanup(&mut self) {
        let mut rec = self.recording.borrow_mut();
        let ids: Vec<_> = rec.textures.drain().map(|(id, _)| id).collect();
        rec.removed.extend(ids);
    }

    fn draw(&mut self, texture: &Handle, src: Rect, dst: Rect) {
        let mut rec = self.recording.borrow_mut();
        if !rec.textures.contains_key(&texture.id()) {
            log::debug!("Failed to get texture {}", texture.id());
            return;
        }
        rec.draws.push(DrawCall {
            texture: texture.id(),
            src,
            dst,
        });
    }

    fn create_texture(&mut self, handle: &Handle, data: Vec<u8>, size: UVec2) -> Result<(), Error> {
        let mut rec = self.recording.borrow_mut();
        if rec.fail_create {
            return Err(Error::CreateTexture("headless texture creation disabled".into()));
        }
        if data.len() != (size.x * size.y * 4) as usize {
            return Err(Error::CreateTexture(format!(
                "expected {} bytes, got {}",
                size.x * size.y * 4,
                data.len()
            )));
        }
        rec.textures.insert(handle.id(), size);
        Ok(())
    }

    fn remove_texture(&mut self, handle_id: HandleId) {
        let mut rec = self.recording.borrow_mut();
        if rec.textures.remove(&handle_id).is_some() {
            rec.removed.push(handle_id);
        }
    }
}
