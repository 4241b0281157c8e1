//! The components module contains all shared components for our app.

mod app;
mod icons;
mod notice;
mod player;
pub mod views;

pub use app::*;
pub use icons::*;
pub use notice::*;
pub use player::*;
// Views are accessed via views::ViewName
