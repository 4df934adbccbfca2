use std::{
    hash::Hash,
    sync::{mpsc::Sender, Arc},
};

use glam::UVec2;

pub type HandleId = u64;

/// Shared reference to a backend texture.
///
/// Clones share the texture. Once the last clone is dropped the texture
/// store is notified and the backend texture is destroyed on the next frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle(Arc<StrongHandle>);

impl Handle {
    pub(crate) fn new(id: HandleId, size: UVec2, drop_sender: Sender<DropEvent>) -> Self {
        Self(Arc::new(StrongHandle {
            id,
            size,
            drop_sender,
        }))
    }

    pub fn id(&self) -> HandleId {
        self.0.id
    }

    /// Pixel size of the texture
    pub fn size(&self) -> UVec2 {
        self.0.size
    }
}

#[derive(Debug)]
pub(crate) struct DropEvent(pub HandleId);

#[derive(Debug)]
struct StrongHandle {
    id: HandleId,
    size: UVec2,
    drop_sender: Sender<DropEvent>,
}

impl Hash for StrongHandle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        Hash::hash(&self.id, state)
    }
}

impl Eq for StrongHandle {}

impl PartialEq for StrongHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Drop for StrongHandle {
    fn drop(&mut self) {
        // the store may already be gone during shutdown
        let _ = self.drop_sender.send(DropEvent(self.id));
    }
}
