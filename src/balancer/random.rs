//! Random selection policy.

use std::sync::Arc;

use rand::Rng;

use crate::balancer::policy::{NoHealthyBackends, RoutingPolicy};
use crate::registry::Backend;

/// Stateless uniform pick over the healthy set.
#[derive(Debug, Default)]
pub struct Random;

impl Random {
    pub fn new() -> Self {
        Self
    }
}

impl RoutingPolicy for Random {
    fn select(&self, healthy: &[Arc<Backend>]) -> Result<Arc<Backend>, NoHealthyBackends> {
        if healthy.is_empty() {
            return Err(NoHealthyBackends);
        }

        let index = rand::thread_rng().gen_range(0..healthy.len());
        Ok(healthy[index].clone())
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn backends(ports: &[u16]) -> Vec<Arc<Backend>> {
        ports
            .iter()
            .enumerate()
            .map(|(index, &port)| {
                Arc::new(Backend::new(
                    index,
                    "127.0.0.1".to_string(),
                    port,
                    "/health".to_string(),
                ))
            })
            .collect()
    }

    #[test]
    fn test_empty_set_fails() {
        let policy = Random::new();
        assert_eq!(policy.select(&[]).unwrap_err(), NoHealthyBackends);
    }

    #[test]
    fn test_picks_stay_in_set() {
        let policy = Random::new();
        let set = backends(&[9001, 9002, 9003]);

        for _ in 0..32 {
            let port = policy.select(&set).unwrap().port();
            assert!((9001..=9003).contains(&port));
        }
    }

    #[test]
    fn test_eventually_covers_the_set() {
        let policy = Random::new();
        let set = backends(&[9001, 9002, 9003]);

        // 96 draws over 3 members; missing one has probability (2/3)^96.
        let seen: HashSet<u16> = (0..96)
            .map(|_| policy.select(&set).unwrap().port())
            .collect();
        assert_eq!(seen.len(), 3);
    }
}
