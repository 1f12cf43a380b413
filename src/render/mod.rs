//! Boundary with the rendering layer: colors handed to views and the view
//! context that owns retained visuals.

mod color;
mod view;

pub use color::Color;
pub use view::{NullViewContext, ViewContext};
