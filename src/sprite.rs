//! Sprite sheet animation.
//!
//! A sheet is one bitmap split into a grid of equal cells. Frame `i` lives in
//! column `i % columns`, row `i / columns`. The sprite keeps a tick counter
//! and shows frame `tick / ticks_per_frame`.

use std::path::Path;

use glam::{IVec2, UVec2};
use serde::{Deserialize, Serialize};

use crate::{engine::Engine, errors::Error, handle::Handle, types::Rect};

/// How a bitmap is cut into frames and how fast they play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub frames: u32,
    pub columns: u32,
    pub rows: u32,
    /// Ticks each frame stays on screen
    pub ticks_per_frame: u32,
}

impl SheetLayout {
    pub const fn new(frames: u32, columns: u32, rows: u32, ticks_per_frame: u32) -> Self {
        Self {
            frames,
            columns,
            rows,
            ticks_per_frame,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        let Self {
            frames,
            columns,
            rows,
            ticks_per_frame,
        } = *self;
        if frames == 0 || columns == 0 || rows == 0 || ticks_per_frame == 0 {
            return Err(Error::InvalidLayout(format!(
                "zero value in {frames} frames, {columns}x{rows} grid, {ticks_per_frame} ticks per frame"
            )));
        }
        if (columns as u64) * (rows as u64) < frames as u64 {
            return Err(Error::InvalidLayout(format!(
                "{frames} frames do not fit a {columns}x{rows} grid"
            )));
        }
        Ok(())
    }

    /// Size of one grid cell on a sheet of `sheet_size` pixels
    pub fn cell_size(&self, sheet_size: UVec2) -> UVec2 {
        sheet_size / UVec2::new(self.columns, self.rows)
    }

    /// Source rectangle of every frame, in frame order
    pub fn frame_rects(&self, sheet_size: UVec2) -> Result<Vec<Rect>, Error> {
        self.validate()?;
        let cell = self.cell_size(sheet_size);
        if cell.x == 0 || cell.y == 0 {
            return Err(Error::InvalidLayout(format!(
                "{}x{} sheet is smaller than its {}x{} grid",
                sheet_size.x, sheet_size.y, self.columns, self.rows
            )));
        }
        let rects = (0..self.frames)
            .map(|i| {
                let col = i % self.columns;
                let row = i / self.columns;
                Rect::new((UVec2::new(col, row) * cell).as_ivec2(), cell)
            })
            .collect();
        Ok(rects)
    }

    /// Ticks in one full cycle
    pub fn cycle_ticks(&self) -> u32 {
        self.frames * self.ticks_per_frame
    }
}

struct Sheet {
    texture: Handle,
    layout: SheetLayout,
    frames: Vec<Rect>,
    cell: UVec2,
}

/// Animated sprite backed by a sprite sheet.
///
/// Starts empty; `load` fills it. Dropping the sprite or calling
/// `release` gives the texture back, at most once.
#[derive(Default)]
pub struct AnimatedSprite {
    sheet: Option<Sheet>,
    tick: u32,
}

impl AnimatedSprite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a sheet, replacing the current one.
    ///
    /// On error the sprite keeps whatever it had before.
    pub fn load<P: AsRef<Path>>(
        &mut self,
        eng: &mut Engine,
        path: P,
        layout: SheetLayout,
    ) -> Result<(), Error> {
        let path = path.as_ref();
        layout.validate()?;
        let image = eng.load_image(path)?;
        // reject the grid before a texture exists
        layout.frame_rects(image.size)?;
        let texture = eng.create_texture(image)?;
        self.set_texture(texture, layout)?;
        log::info!(
            "Loaded {} ({} frames, {}x{} grid)",
            path.display(),
            layout.frames,
            layout.columns,
            layout.rows
        );
        Ok(())
    }

    /// Use an already created texture as the sheet
    pub fn set_texture(&mut self, texture: Handle, layout: SheetLayout) -> Result<(), Error> {
        let frames = layout.frame_rects(texture.size())?;
        let cell = layout.cell_size(texture.size());
        self.release();
        self.sheet = Some(Sheet {
            texture,
            layout,
            frames,
            cell,
        });
        Ok(())
    }

    /// Draw the current frame with its top-left corner at `pos`
    pub fn render(&self, eng: &mut Engine, pos: IVec2) {
        let Some(sheet) = &self.sheet else {
            return;
        };
        let Some(src) = sheet.frames.get(self.current_frame() as usize) else {
            log::error!("Frame {} out of range", self.current_frame());
            return;
        };
        eng.draw_texture(&sheet.texture, *src, pos);
    }

    /// Step one tick. Returns true when the cycle completed and the counter
    /// went back to zero.
    pub fn advance(&mut self) -> bool {
        let Some(sheet) = &self.sheet else {
            return false;
        };
        self.tick += 1;
        if self.tick / sheet.layout.ticks_per_frame >= sheet.layout.frames {
            self.tick = 0;
            return true;
        }
        false
    }

    /// Top-left position that centers one cell in `viewport`
    pub fn center_position(&self, viewport: UVec2) -> IVec2 {
        (viewport.as_ivec2() - self.cell_size().as_ivec2()) / 2
    }

    /// Drop the sheet. Safe to call any number of times.
    pub fn release(&mut self) {
        if let Some(sheet) = self.sheet.take() {
            log::debug!("Release sprite texture {}", sheet.texture.id());
        }
        self.tick = 0;
    }

    pub fn is_loaded(&self) -> bool {
        self.sheet.is_some()
    }

    pub fn layout(&self) -> Option<SheetLayout> {
        self.sheet.as_ref().map(|sheet| sheet.layout)
    }

    pub fn texture(&self) -> Option<&Handle> {
        self.sheet.as_ref().map(|sheet| &sheet.texture)
    }

    pub fn frame_count(&self) -> u32 {
        self.sheet.as_ref().map_or(0, |sheet| sheet.layout.frames)
    }

    pub fn current_tick(&self) -> u32 {
        self.tick
    }

    pub fn current_frame(&self) -> u32 {
        self.sheet
            .as_ref()
            .map_or(0, |sheet| self.tick / sheet.layout.ticks_per_frame)
    }

    pub fn cell_size(&self) -> UVec2 {
        self.sheet.as_ref().map_or(UVec2::ZERO, |sheet| sheet.cell)
    }

    pub fn frames(&self) -> &[Rect] {
        self.sheet
            .as_ref()
            .map(|sheet| sheet.frames.as_slice())
            .unwrap_or_default()
    }

    pub fn frame_rect(&self, frame: u32) -> Option<Rect> {
        self.frames().get(frame as usize).copied()
    }
}
