//! Deployment manager port
//!
//! A logical model may be served by several deployments. After a rate
//! limit the provider call layer asks for an alternate one before falling
//! back to backoff.

/// Selects the deployment a logical model is called through
pub trait DeploymentManager: Send + Sync {
    /// Deployment currently used for `model`.
    fn current(&self, model: &str) -> String;

    /// Move `model` off `from`, the deployment the caller was rate limited on.
    ///
    /// If another caller already moved `model` away from `from`, the
    /// deployment now in use is returned without advancing again. Returns
    /// `None` when there is no alternate.
    fn switch(&self, model: &str, from: &str) -> Option<String>;
}

/// One deployment per model, named after the model
pub struct SingleDeployment;

impl DeploymentManager for SingleDeployment {
    fn current(&self, model: &str) -> String {
        model.to_string()
    }

    fn switch(&self, _model: &str, _from: &str) -> Option<String> {
        None
    }
}
