pub mod window;

pub use window::{ProjectedMatrix, ReadSpan, WindowMaterializer};
