//! Test fixtures.

use std::{
    fs,
    path::{Path, PathBuf},
};

use glam::UVec2;
use image::{Rgba, RgbaImage};

/// Fresh directory under the system temp dir
pub(crate) fn fixture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sprite-test-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create fixture dir");
    dir
}

/// Write a PNG sheet filled with a coarse gradient
pub(crate) fn write_sheet(dir: &Path, file: &str, size: UVec2) -> PathBuf {
    let path = dir.join(file);
    let im = RgbaImage::from_fn(size.x, size.y, |x, y| {
        Rgba([((x / 8 + y / 8) % 256) as u8, 0x40, 0x80, 0xff])
    });
    im.save(&path).expect("write fixture sheet");
    path
}
