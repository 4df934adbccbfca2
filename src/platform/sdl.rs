use anyhow::{anyhow, Result};
use glam::UVec2;
use hashbrown::HashMap;
use sdl2::{
    event::Event,
    keyboard::Scancode,
    pixels::PixelFormatEnum,
    render::{Canvas, Texture, TextureCreator},
    surface::Surface,
    video::{Window, WindowContext},
    EventPump,
};

use crate::{
    app::App,
    color::Color,
    engine::Engine,
    errors::Error,
    handle::{Handle, HandleId},
    input::{KeyCode, KeyState},
    types::Rect,
};

use super::Platform;

impl From<Color> for sdl2::pixels::Color {
    fn from(value: Color) -> Self {
        let Color { r, g, b, a } = value;
        Self::RGBA(r, g, b, a)
    }
}

impl From<Rect> for sdl2::rect::Rect {
    fn from(value: Rect) -> Self {
        sdl2::rect::Rect::new(value.pos.x, value.pos.y, value.size.x, value.size.y)
    }
}

struct ScreenBuffer {
    texture_creator: TextureCreator<WindowContext>,
    canvas: Canvas<Window>,
}

impl ScreenBuffer {
    fn new(canvas: Canvas<Window>) -> Self {
        let texture_creator = canvas.texture_creator();
        Self {
            canvas,
            texture_creator,
        }
    }

    fn present(&mut self) {
        self.canvas.present();
    }

    fn clear(&mut self, color: Color) {
        self.canvas.set_draw_color(color);
        self.canvas.clear();
    }
}

pub struct SDLPlatform {
    screen_buffer: ScreenBuffer,
    textures: HashMap<HandleId, Texture>,
}

impl SDLPlatform {
    fn new(screen_buffer: ScreenBuffer) -> Self {
        Self {
            screen_buffer,
            textures: Default::default(),
        }
    }
}

impl Platform for SDLPlatform {
    fn prepare_frame(&mut self, clear_color: Color) {
        self.screen_buffer.clear(clear_color);
    }

    fn end_frame(&mut self) {
        self.screen_buffer.present();
    }

    fn cleanup(&mut self) {
        for (id, texture) in self.textures.drain() {
            log::debug!("Destroy texture {id} on cleanup");
            // Safety: the canvas that created the texture is still alive
            unsafe { texture.destroy() };
        }
    }

    fn draw(&mut self, handle: &Handle, src: Rect, dst: Rect) {
        let Some(texture) = self.textures.get(&handle.id()) else {
            log::debug!("Failed to get texture {}", handle.id());
            return;
        };

        let src: sdl2::rect::Rect = src.into();
        let dst: sdl2::rect::Rect = dst.into();
        if let Err(err) = self.screen_buffer.canvas.copy(texture, src, dst) {
            log::error!("SDL draw {err}");
        }
    }

    fn create_texture(&mut self, handle: &Handle, mut data: Vec<u8>, size: UVec2) -> Result<(), Error> {
        let UVec2 {
            x: width,
            y: height,
        } = size;
        let pitch = width * 4;
        let surface = Surface::from_data(&mut data, width, height, pitch, PixelFormatEnum::RGBA32)
            .map_err(Error::CreateTexture)?;

        let texture = self
            .screen_buffer
            .texture_creator
            .create_texture_from_surface(surface)
            .map_err(|err| Error::CreateTexture(err.to_string()))?;

        log::debug!("Create texture {} ({width}x{height})", handle.id());
        if let Some(old) = self.textures.insert(handle.id(), texture) {
            // Safety: the replaced texture is no longer reachable from the map
            unsafe { old.destroy() };
        }
        Ok(())
    }

    fn remove_texture(&mut self, handle_id: HandleId) {
        if let Some(texture) = self.textures.remove(&handle_id) {
            log::debug!("Destroy texture {handle_id}");
            // Safety: removed from the map, so it is destroyed exactly once
            unsafe { texture.destroy() };
        }
    }
}

pub(crate) fn run<Setup: FnOnce(&mut Engine)>(app: App, setup: Setup) -> Result<()> {
    let App {
        title,
        window: UVec2 {
            x: width,
            y: height,
        },
        vsync,
        clear_color,
        asset_root,
    } = app;

    let sdl_ctx = sdl2::init().map_err(|err| anyhow!(err))?;
    let video_subsystem = sdl_ctx.video().map_err(|err| anyhow!(err))?;

    // Enable linear filtering
    if !sdl2::hint::set("SDL_RENDER_SCALE_QUALITY", "1") {
        log::warn!("Linear filtering could not be enabled");
    }

    let window = video_subsystem
        .window(&title, width, height)
        .position_centered()
        .build()
        .map_err(|err| anyhow!(err))?;
    let screen_buffer = {
        let mut builder = window.into_canvas().accelerated();
        if vsync {
            builder = builder.present_vsync();
        }
        let canvas = builder.build().map_err(|e| anyhow!(e))?;
        ScreenBuffer::new(canvas)
    };

    let mut event_handler = SDLEventHandler {
        event_pump: sdl_ctx.event_pump().map_err(|err| anyhow!(err))?,
        wants_to_exit: false,
    };

    let mut engine = {
        let platform = SDLPlatform::new(screen_buffer);
        Engine::new(Box::new(platform), UVec2::new(width, height), asset_root)
    };
    engine.set_clear_color(clear_color);
    setup(&mut engine);
    engine.init()?;
    log::info!("Game initialized");

    while !event_handler.wants_to_exit && !engine.wants_to_exit() {
        event_handler.pump_events(&mut engine);
        engine.update()?;
    }

    engine.cleanup();
    log::info!("Game finished after {} frames", engine.frame());

    Ok(())
}

struct SDLEventHandler {
    event_pump: EventPump,
    wants_to_exit: bool,
}

impl SDLEventHandler {
    fn pump_events(&mut self, engine: &mut Engine) {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::KeyUp { scancode, .. } | Event::KeyDown { scancode, .. } => {
                    let state = if matches!(event, Event::KeyDown { .. }) {
                        KeyState::down()
                    } else {
                        KeyState::up()
                    };
                    let Some(code) = scancode else {
                        continue;
                    };
                    let code = KeyCode::from(code);
                    if code != KeyCode::Invalid {
                        engine.input.set_input_state(code, state);
                    }
                }
                Event::Quit { .. } => {
                    self.wants_to_exit = true;
                }
                _ => {}
            }
        }
    }
}

impl From<Scancode> for KeyCode {
    fn from(value: Scancode) -> Self {
        // SDL scancodes share the USB HID numbering used by KeyCode
        match u8::try_from(value as i32) {
            Ok(code) => code.into(),
            Err(_) => KeyCode::Invalid,
        }
    }
}
