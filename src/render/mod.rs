mod camera;
pub mod pick;

pub use camera::{CameraController, Viewport};
pub use pick::ray_pick;
