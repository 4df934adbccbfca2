pub mod app;
pub mod color;
pub mod config;
pub mod demo;
pub mod engine;
pub mod errors;
pub mod handle;
pub mod input;
pub mod platform;
pub mod prelude;
mod render;
pub mod sprite;
#[cfg(test)]
mod testing;
pub mod texture;
pub mod types;
