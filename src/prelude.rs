pub use crate::app::*;
pub use crate::color::*;
pub use crate::config::{AnimationConfig, DemoConfig, WindowConfig};
pub use crate::engine::{Engine, Scene};
pub use crate::errors::Error;
pub use crate::handle::Handle;
pub use crate::input::{ActionId, KeyCode, KeyState};
pub use crate::sprite::{AnimatedSprite, SheetLayout};
pub use crate::texture::DecodedImage;
pub use crate::types::Rect;
pub use glam::{self, IVec2, UVec2};
