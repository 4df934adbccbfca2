use std::{
    env,
    path::{Path, PathBuf},
    sync::mpsc::{channel, Receiver, Sender},
};

use glam::UVec2;
use hashbrown::HashSet;

use crate::{
    errors::Error,
    handle::{DropEvent, Handle, HandleId},
    platform::Platform,
};

/// Env var overriding the asset directory
pub const ASSET_ROOT_ENV: &str = "SPRITE_TEST_ASSET_ROOT";

/// Resolve the directory assets are loaded from.
///
/// Checks `SPRITE_TEST_ASSET_ROOT`, then `CARGO_MANIFEST_DIR/assets`, then
/// `assets` next to the executable.
pub fn default_asset_root() -> PathBuf {
    if let Ok(root) = env::var(ASSET_ROOT_ENV) {
        PathBuf::from(root)
    } else if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        PathBuf::from(manifest_dir).join("assets")
    } else {
        env::current_exe()
            .ok()
            .and_then(|path| path.parent().map(ToOwned::to_owned))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("assets")
    }
}

/// RGBA8 pixels decoded from an image file
#[derive(Clone)]
pub struct DecodedImage {
    pub data: Vec<u8>,
    pub size: UVec2,
}

impl DecodedImage {
    pub fn new(data: Vec<u8>, size: UVec2) -> Self {
        debug_assert_eq!(data.len(), (size.x * size.y * 4) as usize);
        Self { data, size }
    }
}

/// Owns texture ids and tracks which backend textures are alive.
pub struct TextureStore {
    root: PathBuf,
    next_id: HandleId,
    sender: Sender<DropEvent>,
    receiver: Receiver<DropEvent>,
    live: HashSet<HandleId>,
}

impl TextureStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let (sender, receiver) = channel();
        Self {
            root: root.as_ref().to_owned(),
            next_id: 0,
            sender,
            receiver,
            live: Default::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative paths are resolved against the asset root
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.root.join(path)
    }

    /// Number of backend textures currently alive
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    fn alloc_handle(&mut self, size: UVec2) -> Handle {
        let id = self.next_id;
        self.next_id += 1;
        Handle::new(id, size, self.sender.clone())
    }

    pub fn decode<P: AsRef<Path>>(&self, path: P) -> Result<DecodedImage, Error> {
        let path = self.resolve(path);
        let im = image::open(&path).map_err(|source| Error::Decode {
            path: path.clone(),
            source,
        })?;
        let im = im.to_rgba8();
        let size = UVec2::new(im.width(), im.height());
        log::debug!("Decoded {} ({}x{})", path.display(), size.x, size.y);
        Ok(DecodedImage::new(im.into_raw(), size))
    }

    pub(crate) fn create(
        &mut self,
        platform: &mut dyn Platform,
        image: DecodedImage,
    ) -> Result<Handle, Error> {
        let DecodedImage { data, size } = image;
        let handle = self.alloc_handle(size);
        platform.create_texture(&handle, data, size)?;
        self.live.insert(handle.id());
        if self.live.len() > 256 {
            log::warn!("Too many live textures");
        }
        Ok(handle)
    }

    /// Destroy backend textures whose handles have all been dropped
    pub(crate) fn release_dropped(&mut self, platform: &mut dyn Platform) -> usize {
        let mut released = 0;
        while let Ok(DropEvent(id)) = self.receiver.try_recv() {
            // ids that never reached the backend are not tracked
            if self.live.remove(&id) {
                platform.remove_texture(id);
                released += 1;
            }
        }
        released
    }
}
