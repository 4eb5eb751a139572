//! Provider adapters
//!
//! - [`OpenAiCompatibleClient`]: `ProviderClient` over HTTP
//! - [`IntervalRateGate`]: shared per-model throttle
//! - [`RotatingDeploymentManager`]: failover between deployments of a model

pub mod deployment;
pub mod openai;
pub mod rate_gate;

pub use deployment::RotatingDeploymentManager;
pub use openai::OpenAiCompatibleClient;
pub use rate_gate::IntervalRateGate;
