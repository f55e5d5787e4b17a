//! Receipt document generation

mod renderer;

pub use renderer::{ReceiptRenderer, RenderedDocument};
