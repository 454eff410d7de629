//! Camera port (interface).

use crate::domain::CapturedImage;
use crate::error::Result;

/// Port for still image capture.
pub trait CameraPort: Send + Sync {
    /// Capture one frame and return it base64 encoded.
    fn capture(&self) -> impl std::future::Future<Output = Result<CapturedImage>> + Send;
}
