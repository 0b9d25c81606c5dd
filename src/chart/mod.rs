//! Chart description, palette and PNG rendering.

pub mod compose;
pub mod render;
pub mod theme;

pub use compose::{ChartRequest, ColorBy, LineSpec, ReferenceLine, Scale, SeriesKey};
pub use render::render_png;
pub use theme::{Rgb, Theme};
