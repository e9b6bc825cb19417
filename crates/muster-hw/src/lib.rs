//! muster-hw — camera capture for the attendance workflows.
//!
//! V4L2-based single-frame capture. Frames come back grayscale regardless
//! of the negotiated wire format; persistence and comparison both work on
//! the luma channel.

pub mod camera;
pub mod frame;

pub use camera::{Camera, CameraError, DeviceInfo, PixelFormat};
pub use frame::Frame;
