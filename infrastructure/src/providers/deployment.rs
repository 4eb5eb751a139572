//! Rotating deployment manager.

use std::collections::HashMap;
use std::sync::RwLock;
use tooltrial_application::DeploymentManager;
use tracing::info;

struct Rotation {
    deployments: Vec<String>,
    current: usize,
}

/// Per logical model, an ordered list of deployments and the one in use.
///
/// `switch` advances to the next deployment, wrapping around. Models with
/// a single deployment (or none configured) have no alternate. The rotation
/// is shared by all episodes, so a switch made after one episode hits a
/// rate limit moves every later call too. Only a caller that was limited on
/// the deployment still in use advances it; the others join the new one.
pub struct RotatingDeploymentManager {
    rotations: RwLock<HashMap<String, Rotation>>,
}

impl RotatingDeploymentManager {
    pub fn new<I, D>(deployments: I) -> Self
    where
        I: IntoIterator<Item = (String, D)>,
        D: IntoIterator<Item = String>,
    {
        let rotations = deployments
            .into_iter()
            .map(|(model, list)| {
                let deployments: Vec<String> = list.into_iter().collect();
                (
                    model,
                    Rotation {
                        deployments,
                        current: 0,
                    },
                )
            })
            .filter(|(_, r)| !r.deployments.is_empty())
            .collect();
        Self {
            rotations: RwLock::new(rotations),
        }
    }
}

impl DeploymentManager for RotatingDeploymentManager {
    fn current(&self, model: &str) -> String {
        let Ok(rotations) = self.rotations.read() else {
            return model.to_string();
        };
        rotations
            .get(model)
            .map(|r| r.deployments[r.current].clone())
            .unwrap_or_else(|| model.to_string())
    }

    fn switch(&self, model: &str, from: &str) -> Option<String> {
        let mut rotations = self.rotations.write().ok()?;
        let rotation = rotations.get_mut(model)?;
        if rotation.deployments.len() < 2 {
            return None;
        }
        let previous = rotation.current;
        if rotation.deployments[previous] != from {
            return Some(rotation.deployments[previous].clone());
        }
        rotation.current = (rotation.current + 1) % rotation.deployments.len();
        let next = rotation.deployments[rotation.current].clone();
        info!(
            "Switched {} from {} to {}",
            model, rotation.deployments[previous], next
        );
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> RotatingDeploymentManager {
        RotatingDeploymentManager::new([
            (
                "gpt-4o".to_string(),
                vec!["gpt-4o-east".to_string(), "gpt-4o-west".to_string()],
            ),
            ("qwen".to_string(), vec!["qwen-only".to_string()]),
        ])
    }

    #[test]
    fn test_unknown_model_uses_its_own_name() {
        let m = manager();
        assert_eq!(m.current("llama"), "llama");
        assert_eq!(m.switch("llama", "llama"), None);
    }

    #[test]
    fn test_switch_rotates_and_wraps() {
        let m = manager();
        assert_eq!(m.current("gpt-4o"), "gpt-4o-east");
        assert_eq!(
            m.switch("gpt-4o", "gpt-4o-east").as_deref(),
            Some("gpt-4o-west")
        );
        assert_eq!(m.current("gpt-4o"), "gpt-4o-west");
        assert_eq!(
            m.switch("gpt-4o", "gpt-4o-west").as_deref(),
            Some("gpt-4o-east")
        );
    }

    #[test]
    fn test_simultaneous_rate_limits_switch_once() {
        let m = manager();
        let seen_by_both = m.current("gpt-4o");

        let first = m.switch("gpt-4o", &seen_by_both);
        let second = m.switch("gpt-4o", &seen_by_both);

        assert_eq!(first.as_deref(), Some("gpt-4o-west"));
        assert_eq!(second.as_deref(), Some("gpt-4o-west"));
        assert_eq!(m.current("gpt-4o"), "gpt-4o-west");
    }

    #[test]
    fn test_concurrent_switches_from_same_deployment_advance_once() {
        let m = std::sync::Arc::new(RotatingDeploymentManager::new([(
            "gpt-4o".to_string(),
            vec![
                "gpt-4o-a".to_string(),
                "gpt-4o-b".to_string(),
                "gpt-4o-c".to_string(),
            ],
        )]));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let m = std::sync::Arc::clone(&m);
                std::thread::spawn(move || m.switch("gpt-4o", "gpt-4o-a"))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().as_deref(), Some("gpt-4o-b"));
        }
        assert_eq!(m.current("gpt-4o"), "gpt-4o-b");
    }

    #[test]
    fn test_single_deployment_has_no_alternate() {
        let m = manager();
        assert_eq!(m.current("qwen"), "qwen-only");
        assert_eq!(m.switch("qwen", "qwen-only"), None);
        assert_eq!(m.current("qwen"), "qwen-only");
    }
}
