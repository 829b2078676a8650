//! Sketchboard Render Library
//!
//! Paints the visual trees produced by shape utils. The default
//! implementation records into a Vello scene.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{RenderContext, Renderer, RendererError, GRID_SIZE};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
