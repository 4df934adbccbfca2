use std::path::Path;

use glam::{IVec2, UVec2};

use crate::{
    color::Color,
    errors::Error,
    handle::Handle,
    input::InputState,
    platform::Platform,
    render::Render,
    texture::{DecodedImage, TextureStore},
    types::Rect,
};

// Scene trait
pub trait Scene {
    // Init the scene, use it to load assets.
    fn init(&mut self, _eng: &mut Engine) -> Result<(), Error> {
        Ok(())
    }

    // Update scene per frame, before drawing.
    fn update(&mut self, _eng: &mut Engine) {}

    // Draw scene per frame.
    fn draw(&mut self, _eng: &mut Engine) {}

    // Called when cleanup scene, release assets and resources.
    fn cleanup(&mut self, _eng: &mut Engine) {}
}

/// Context handed to scenes: owns the renderer, textures and input.
pub struct Engine {
    // The frame number. Increases by 1 for every frame.
    frame: u64,
    wants_to_exit: bool,
    scene: Option<Box<dyn Scene>>,
    scene_next: Option<Box<dyn Scene>>,
    pub(crate) render: Render,
    pub(crate) input: InputState,
    pub(crate) textures: TextureStore,
}

impl Engine {
    pub fn new<P: AsRef<Path>>(
        platform: Box<dyn Platform + 'static>,
        view_size: UVec2,
        asset_root: P,
    ) -> Self {
        Self {
            frame: 0,
            wants_to_exit: false,
            scene: None,
            scene_next: None,
            render: Render::new(platform, view_size),
            input: InputState::default(),
            textures: TextureStore::new(asset_root),
        }
    }

    pub(crate) fn with_platform<R, F: FnOnce(&mut dyn Platform) -> R>(&mut self, f: F) -> R {
        f(self.render.platform.as_mut())
    }

    /// Scene to run, it is initialized on the next `init` or `update`
    pub fn set_scene(&mut self, scene: impl Scene + 'static) {
        self.scene_next = Some(Box::new(scene));
    }

    /// Initialize the pending scene
    pub fn init(&mut self) -> Result<(), Error> {
        self.swap_scene()
    }

    fn swap_scene(&mut self) -> Result<(), Error> {
        let Some(mut next) = self.scene_next.take() else {
            return Ok(());
        };
        if let Some(mut scene) = self.scene.take() {
            scene.cleanup(self);
        }
        next.init(self)?;
        self.scene = Some(next);
        Ok(())
    }

    /// Run one frame of the current scene
    pub fn update(&mut self) -> Result<(), Error> {
        self.swap_scene()?;
        match self.scene.take() {
            Some(mut scene) => {
                self.step(scene.as_mut());
                self.scene = Some(scene);
            }
            None => {
                log::warn!("No scene to run");
                self.wants_to_exit = true;
            }
        }
        Ok(())
    }

    /// Run one frame of `scene`: input, update, draw, present.
    pub fn step(&mut self, scene: &mut dyn Scene) {
        self.release_textures();
        self.render.prepare_frame();
        scene.update(self);
        scene.draw(self);
        self.render.end_frame();
        self.input.clear();
        self.frame += 1;
    }

    /// Cleanup scene and every texture still alive
    pub fn cleanup(&mut self) {
        if let Some(mut scene) = self.scene.take() {
            scene.cleanup(self);
        }
        self.scene_next = None;
        self.release_textures();
        self.with_platform(|p| p.cleanup());
    }

    /// Destroy textures whose handles have been dropped
    pub fn release_textures(&mut self) -> usize {
        let released = self.textures.release_dropped(self.render.platform.as_mut());
        if released > 0 {
            log::debug!("Released {released} textures");
        }
        released
    }

    /// Decode an image relative to the asset root
    pub fn load_image<P: AsRef<Path>>(&self, path: P) -> Result<DecodedImage, Error> {
        self.textures.decode(path)
    }

    /// Upload decoded pixels as a texture
    pub fn create_texture(&mut self, image: DecodedImage) -> Result<Handle, Error> {
        self.textures.create(self.render.platform.as_mut(), image)
    }

    /// Draw `src` of a texture at `pos`
    pub fn draw_texture(&mut self, texture: &Handle, src: Rect, pos: IVec2) {
        self.render.draw(texture, src, pos);
    }

    /// Request exit at the end of the frame
    pub fn quit(&mut self) {
        self.wants_to_exit = true;
    }

    pub fn wants_to_exit(&self) -> bool {
        self.wants_to_exit
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn view_size(&self) -> UVec2 {
        self.render.view_size()
    }

    pub fn draw_calls(&self) -> u32 {
        self.render.draw_calls()
    }

    pub fn clear_color(&self) -> Color {
        self.render.clear_color()
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.render.set_clear_color(color)
    }

    pub fn live_textures(&self) -> usize {
        self.textures.live_count()
    }

    pub fn asset_root(&self) -> &Path {
        self.textures.root()
    }

    // Input
    pub fn input(&self) -> &InputState {
        &self.input
    }

    // Input mut
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        color::MIDNIGHT_BLUE,
        platform::headless::{HeadlessPlatform, Recording},
    };

    fn engine() -> (Engine, Rc<RefCell<Recording>>) {
        let platform = HeadlessPlatform::new();
        let recording = platform.recording();
        let eng = Engine::new(Box::new(platform), UVec2::new(640, 480), "assets");
        (eng, recording)
    }

    fn blank(size: UVec2) -> DecodedImage {
        DecodedImage::new(vec![0; (size.x * size.y * 4) as usize], size)
    }

    #[derive(Default)]
    struct Counter {
        inits: Rc<RefCell<u32>>,
        updates: Rc<RefCell<u32>>,
        cleanups: Rc<RefCell<u32>>,
    }

    impl Scene for Counter {
        fn init(&mut self, _eng: &mut Engine) -> Result<(), Error> {
            *self.inits.borrow_mut() += 1;
            Ok(())
        }

        fn update(&mut self, eng: &mut Engine) {
            *self.updates.borrow_mut() += 1;
            if *self.updates.borrow() == 3 {
                eng.quit();
            }
        }

        fn cleanup(&mut self, _eng: &mut Engine) {
            *self.cleanups.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_scene_lifecycle() {
        let (mut eng, recording) = engine();
        let scene = Counter::default();
        let (inits, updates, cleanups) = (
            scene.inits.clone(),
            scene.updates.clone(),
            scene.cleanups.clone(),
        );
        eng.set_scene(scene);
        eng.init().unwrap();
        assert_eq!(*inits.borrow(), 1);

        while !eng.wants_to_exit() {
            eng.update().unwrap();
        }
        assert_eq!(*updates.borrow(), 3);
        assert_eq!(eng.frame(), 3);
        assert_eq!(recording.borrow().frames, 3);

        eng.cleanup();
        assert_eq!(*cleanups.borrow(), 1);
    }

    #[test]
    fn test_update_without_scene_exits() {
        let (mut eng, _) = engine();
        eng.update().unwrap();
        assert!(eng.wants_to_exit());
    }

    #[test]
    fn test_clear_color_reaches_platform() {
        let (mut eng, recording) = engine();
        eng.set_clear_color(MIDNIGHT_BLUE);
        eng.step(&mut Counter::default());
        assert_eq!(recording.borrow().clear_color, MIDNIGHT_BLUE);
    }

    #[test]
    fn test_texture_destroyed_after_last_handle_dropped() {
        let (mut eng, recording) = engine();
        let handle = eng.create_texture(blank(UVec2::new(4, 4))).unwrap();
        let clone = handle.clone();
        assert_eq!(eng.live_textures(), 1);

        drop(handle);
        assert_eq!(eng.release_textures(), 0);
        assert_eq!(recording.borrow().textures.len(), 1);

        drop(clone);
        assert_eq!(eng.release_textures(), 1);
        assert_eq!(eng.live_textures(), 0);
        assert!(recording.borrow().textures.is_empty());
        assert_eq!(recording.borrow().removed.len(), 1);

        // nothing left to release twice
        assert_eq!(eng.release_textures(), 0);
        assert_eq!(recording.borrow().removed.len(), 1);
    }

    #[test]
    fn test_failed_texture_is_not_tracked() {
        let (mut eng, recording) = engine();
        recording.borrow_mut().fail_create = true;
        let err = eng.create_texture(blank(UVec2::new(2, 2))).unwrap_err();
        assert!(matches!(err, Error::CreateTexture(_)));
        assert_eq!(eng.live_textures(), 0);
        assert_eq!(eng.release_textures(), 0);
        assert!(recording.borrow().removed.is_empty());
    }

    #[test]
    fn test_offscreen_draw_is_culled() {
        let (mut eng, recording) = engine();
        let handle = eng.create_texture(blank(UVec2::new(8, 8))).unwrap();
        let src = Rect::new(IVec2::ZERO, UVec2::new(8, 8));

        eng.render.prepare_frame();
        eng.draw_texture(&handle, src, IVec2::new(-4, -4));
        eng.draw_texture(&handle, src, IVec2::new(700, 10));
        eng.draw_texture(&handle, src, IVec2::new(10, -8));
        assert_eq!(eng.draw_calls(), 1);
        assert_eq!(recording.borrow().draws.len(), 1);
        assert_eq!(
            recording.borrow().draws[0].dst,
            Rect::new(IVec2::new(-4, -4), UVec2::new(8, 8))
        );
    }
}
