pub mod controller;
pub mod history;
pub mod input;
pub mod model;
pub mod recorder;
pub mod render;
pub mod surface;

pub use controller::{CanvasCommand, CanvasState, SketchController};
pub use model::{Color, PenState, Point, Stroke};
pub use render::RasterSurface;
pub use surface::{CommandLog, Surface, SurfaceCall};
