pub mod animate;
pub mod camera;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod input;
pub mod scene;
pub mod transform;

pub use animate::*;
pub use camera::*;
pub use config::*;
pub use dataset::*;
pub use input::*;
pub use scene::*;
pub use transform::*;
