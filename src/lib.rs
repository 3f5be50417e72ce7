// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod game;
pub mod geometry;
pub mod image_source;
pub mod point;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod ui;
pub mod viewport;
