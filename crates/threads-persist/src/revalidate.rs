/// Receives cache-invalidation signals after successful writes.
///
/// `path` is an opaque route string owned by the rendering layer.
pub trait Revalidator: Send + Sync {
    fn revalidate(&self, path: &str);
}

/// Drops every signal
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRevalidator;

impl Revalidator for NoopRevalidator {
    fn revalidate(&self, path: &str) {
        tracing::trace!(path, "Revalidation ignored");
    }
}
