pub mod surface;

pub use surface::{ParamSurface, SurfaceKind};
