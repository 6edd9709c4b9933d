//! QR rendering boundary.
//!
//! The core only produces the token text; turning it into a scannable
//! image is an external collaborator behind this trait. Implementations
//! are expected to be pure and fallible, nothing more.

use thiserror::Error;

/// QR rendering failure.
#[derive(Debug, Error)]
#[error("qr render failed: {0}")]
pub struct QrRenderError(pub String);

/// Renders token text into a scannable image.
pub trait QrRenderer: Send + Sync {
    /// Render the (opaque) token text. Returns encoded image bytes or a
    /// data URL, depending on the implementation.
    fn render(&self, text: &str) -> Result<Vec<u8>, QrRenderError>;
}

/// Renderer that returns the token text itself as bytes.
///
/// Stands in for a real image encoder in tests and in embeddings that
/// ship the token text to a client-side renderer.
pub struct PassthroughRenderer;

impl QrRenderer for PassthroughRenderer {
    fn render(&self, text: &str) -> Result<Vec<u8>, QrRenderError> {
        Ok(text.as_bytes().to_vec())
    }
}
