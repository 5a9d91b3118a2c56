//! Tellus application: assembles the scene from the Scene and Planet control
//! panels, opens the window and runs the render loop.

pub mod actions;
mod error;
pub mod panels;
pub mod renderer;
pub mod scene;
pub mod ui;
pub mod window;

pub use error::AppError;
pub use window::run;
