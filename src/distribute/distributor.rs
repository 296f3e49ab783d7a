//! Fan-out of a machine config to every registered agent.

use super::pusher::ConfigPusher;
use crate::models::{AgentAddress, MachineConfig};
use futures::future::join_all;
use indicatif::ProgressBar;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Restricts which agents receive a push. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentFilter {
    /// Agent ids to include; empty means all.
    pub ids: Vec<String>,
    /// Only agents using this protocol (case-insensitive).
    pub protocol: Option<String>,
}

impl AgentFilter {
    pub fn matches(&self, agent: &AgentAddress) -> bool {
        let id_ok = self.ids.is_empty() || self.ids.iter().any(|id| id == &agent.id);
        let protocol_ok = self
            .protocol
            .as_deref()
            .map_or(true, |p| p.eq_ignore_ascii_case(&agent.protocol));
        id_ok && protocol_ok
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.protocol.is_none()
    }
}

/// Pushes a config to agents, trying each transport in order per agent.
pub struct ConfigDistributor {
    pushers: Vec<Box<dyn ConfigPusher>>,
    progress: Option<ProgressBar>,
}

impl ConfigDistributor {
    pub fn new(pushers: Vec<Box<dyn ConfigPusher>>) -> Self {
        Self {
            pushers,
            progress: None,
        }
    }

    /// Tick `progress` once per finished agent.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Agents from `config` selected by `filter`, in config order.
    pub fn targets<'a>(
        config: &'a MachineConfig,
        filter: Option<&AgentFilter>,
    ) -> Vec<&'a AgentAddress> {
        config
            .network
            .agents
            .iter()
            .filter(|agent| filter.map_or(true, |f| f.matches(agent)))
            .collect()
    }

    /// Push `config` to the selected agents and report success per agent id.
    ///
    /// Transport errors are logged and count as a failed attempt; an agent
    /// no transport accepted is marked `false` and not retried.
    pub async fn distribute(
        &self,
        config: &MachineConfig,
        filter: Option<&AgentFilter>,
    ) -> BTreeMap<String, bool> {
        let agents = Self::targets(config, filter);
        info!("Distributing config to {} agents", agents.len());

        if let Some(ref pb) = self.progress {
            pb.set_length(agents.len() as u64);
        }

        let pushes = agents.into_iter().map(|agent| async move {
            let pushed = self.push_to_agent(agent, config).await;
            if let Some(ref pb) = self.progress {
                pb.inc(1);
            }
            (agent.id.clone(), pushed)
        });

        let results: BTreeMap<String, bool> = join_all(pushes).await.into_iter().collect();

        if let Some(ref pb) = self.progress {
            pb.finish_and_clear();
        }

        let succeeded = results.values().filter(|ok| **ok).count();
        info!("Config accepted by {}/{} agents", succeeded, results.len());

        results
    }

    async fn push_to_agent(&self, agent: &AgentAddress, config: &MachineConfig) -> bool {
        for pusher in &self.pushers {
            match pusher.push(agent, config).await {
                Ok(true) => {
                    debug!("Agent {} accepted config via {}", agent.id, pusher.name());
                    return true;
                }
                Ok(false) => {
                    debug!("Transport {} did not deliver to {}", pusher.name(), agent.id);
                }
                Err(e) => {
                    warn!("Push to {} via {} failed: {}", agent.id, pusher.name(), e);
                }
            }
        }

        warn!("No transport delivered config to agent {}", agent.id);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PushError;
    use crate::models::MachineNetwork;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Accepts agents whose protocol matches, counting calls.
    struct ProtocolPusher {
        protocol: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ConfigPusher for ProtocolPusher {
        fn name(&self) -> &str {
            self.protocol
        }

        async fn push(&self, agent: &AgentAddress, _config: &MachineConfig) -> Result<bool, PushError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(agent.protocol == self.protocol)
        }
    }

    struct BrokenPusher;

    #[async_trait]
    impl ConfigPusher for BrokenPusher {
        fn name(&self) -> &str {
            "broken"
        }

        async fn push(&self, agent: &AgentAddress, _config: &MachineConfig) -> Result<bool, PushError> {
            Err(PushError::Connect {
                endpoint: agent.endpoint.clone(),
            })
        }
    }

    fn agent(id: &str, protocol: &str) -> AgentAddress {
        AgentAddress {
            id: id.to_string(),
            protocol: protocol.to_string(),
            endpoint: format!("{}://{}.lab.local", protocol, id),
            api_key: None,
        }
    }

    fn config_with(agents: Vec<AgentAddress>) -> MachineConfig {
        MachineConfig {
            network: MachineNetwork { agents },
            ..MachineConfig::default()
        }
    }

    fn counting(protocol: &'static str) -> (Box<dyn ConfigPusher>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let pusher = ProtocolPusher {
            protocol,
            calls: Arc::clone(&calls),
        };
        (Box::new(pusher), calls)
    }

    #[tokio::test]
    async fn test_first_successful_transport_wins() {
        let (http, http_calls) = counting("http");
        let (grpc, grpc_calls) = counting("grpc");
        let distributor = ConfigDistributor::new(vec![http, grpc]);
        let config = config_with(vec![agent("a1", "http"), agent("a2", "grpc")]);

        let results = distributor.distribute(&config, None).await;

        assert_eq!(results.get("a1"), Some(&true));
        assert_eq!(results.get("a2"), Some(&true));
        assert_eq!(http_calls.load(Ordering::SeqCst), 2);
        // a1 stops at the http transport.
        assert_eq!(grpc_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_swallowed_and_next_transport_tried() {
        let (http, _) = counting("http");
        let distributor = ConfigDistributor::new(vec![Box::new(BrokenPusher), http]);
        let config = config_with(vec![agent("a1", "http"), agent("a2", "serial")]);

        let results = distributor.distribute(&config, None).await;

        assert_eq!(results.get("a1"), Some(&true));
        assert_eq!(results.get("a2"), Some(&false));
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_filter_selects_agents() {
        let (http, calls) = counting("http");
        let distributor = ConfigDistributor::new(vec![http]);
        let config = config_with(vec![
            agent("a1", "http"),
            agent("a2", "http"),
            agent("a3", "grpc"),
        ]);

        let filter = AgentFilter {
            ids: vec!["a2".to_string(), "a3".to_string()],
            protocol: Some("HTTP".to_string()),
        };
        let results = distributor.distribute(&config, Some(&filter)).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results.get("a2"), Some(&true));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_transports_marks_all_failed() {
        let distributor = ConfigDistributor::new(Vec::new());
        let config = config_with(vec![agent("a1", "http")]);
        let results = tokio_test::block_on(distributor.distribute(&config, None));
        assert_eq!(results.get("a1"), Some(&false));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = AgentFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&agent("x", "custom")));
        let config = config_with(vec![agent("a1", "http"), agent("a2", "grpc")]);
        assert_eq!(ConfigDistributor::targets(&config, Some(&filter)).len(), 2);
    }
}
