//! Destination registry: the configured tag bindings plus their match counters.

use crate::models::TagBinding;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// A binding and the number of messages routed to it so far
#[derive(Debug)]
pub struct Destination {
    binding: TagBinding,
    count: AtomicU64,
}

impl Destination {
    fn new(binding: TagBinding) -> Self {
        Self {
            binding,
            count: AtomicU64::new(0),
        }
    }

    pub fn binding(&self) -> &TagBinding {
        &self.binding
    }

    /// Count one routing match and return the new total
    pub fn record_match(&self) -> u64 {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

/// Read-only view of one destination for the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationStatus {
    pub tag: String,
    pub channel: String,
    pub count: u64,
}

/// Immutable set of destinations in configuration order.
///
/// Built once at startup and shared behind an `Arc`; only the per-binding
/// counters change afterwards.
#[derive(Debug, Default)]
pub struct DestinationRegistry {
    destinations: Vec<Destination>,
}

impl DestinationRegistry {
    pub fn new(bindings: impl IntoIterator<Item = TagBinding>) -> Self {
        Self {
            destinations: bindings.into_iter().map(Destination::new).collect(),
        }
    }

    /// Destinations bound to `tag`, in stored order
    pub fn matching<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Destination> + 'a {
        self.destinations
            .iter()
            .filter(move |d| d.binding.tag == tag)
    }

    pub fn snapshot(&self) -> Vec<DestinationStatus> {
        self.destinations
            .iter()
            .map(|d| DestinationStatus {
                tag: d.binding.tag.clone(),
                channel: d.binding.channel.clone(),
                count: d.count(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn binding(tag: &str, channel: &str) -> TagBinding {
        TagBinding {
            tag: tag.to_string(),
            channel: channel.to_string(),
            username: None,
            icon_emoji: None,
            parse: None,
        }
    }

    #[test]
    fn test_matching_keeps_stored_order() {
        let registry = DestinationRegistry::new(vec![
            binding("deploy", "#deploy"),
            binding("alerts", "#alerts"),
            binding("deploy", "#ops"),
        ]);

        let channels: Vec<_> = registry
            .matching("deploy")
            .map(|d| d.binding().channel.as_str())
            .collect();
        assert_eq!(channels, vec!["#deploy", "#ops"]);
        assert_eq!(registry.matching("unknown").count(), 0);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_tags_match_exactly() {
        let registry = DestinationRegistry::new(vec![binding("Deploy", "#deploy")]);
        assert_eq!(registry.matching("deploy").count(), 0);
        assert_eq!(registry.matching("Deploy").count(), 1);
    }

    #[test]
    fn test_record_match_and_snapshot() {
        let registry = DestinationRegistry::new(vec![binding("alerts", "#alerts")]);
        let destination = registry.matching("alerts").next().unwrap();

        assert_eq!(destination.record_match(), 1);
        assert_eq!(destination.record_match(), 2);
        assert_eq!(
            registry.snapshot(),
            vec![DestinationStatus {
                tag: "alerts".to_string(),
                channel: "#alerts".to_string(),
                count: 2,
            }]
        );
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let registry = Arc::new(DestinationRegistry::new(vec![binding("alerts", "#alerts")]));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        for destination in registry.matching("alerts") {
                            destination.record_match();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot()[0].count, 8_000);
    }

    #[test]
    fn test_empty_registry() {
        let registry = DestinationRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.snapshot().is_empty());
    }
}
