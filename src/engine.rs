//! The running engine: owns the topic registry and the currently loaded
//! configuration, and implements the handful of operations the transport
//! layer exposes over HTTP.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use crate::data::ConfigFileStore;
use crate::domain::{ConfigLoader, Graph, Message, TopicRegistry, build_graph};
use crate::error::{EngineError, Result};

/// One row of [`Engine::topic_snapshot`]: a topic's name, most recently
/// published value, wiring, and derived role.
#[derive(Debug, Clone, Serialize)]
pub struct TopicSnapshot {
    pub name: String,
    pub last_value: String,
    /// When the last published message was created, if any.
    pub last_updated: Option<DateTime<Utc>>,
    pub subscribers: Vec<String>,
    pub publishers: Vec<String>,
    pub role: &'static str,
}

/// Owns the shared [`TopicRegistry`] and the [`ConfigLoader`] for whatever
/// configuration is currently active. A fresh [`load_config`](Self::load_config)
/// replaces both: the old loader's agents are closed, the registry is wiped,
/// and a new loader instantiates the incoming configuration against the same
/// registry.
pub struct Engine {
    registry: Arc<TopicRegistry>,
    loader: Mutex<ConfigLoader>,
    config_store: ConfigFileStore,
}

impl Engine {
    pub fn new(config_store: ConfigFileStore) -> Self {
        let registry = Arc::new(TopicRegistry::new());
        let loader = Mutex::new(ConfigLoader::new(registry.clone()));
        Self {
            registry,
            loader,
            config_store,
        }
    }

    /// Persist the raw payload, then close whatever is currently loaded,
    /// clear the registry, and instantiate `text` against a fresh loader.
    /// The payload is persisted before parsing so a rejected load still
    /// leaves a record of what was sent.
    pub fn load_config(&self, name: Option<&str>, text: &str) -> Result<()> {
        tracing::debug!(
            preview = %crate::utils::string::truncate_preview(text, crate::utils::string::PREVIEW_MAX_LENGTH),
            "loading configuration"
        );
        self.config_store.persist(name, text)?;

        let mut loader = self.loader.lock();
        loader.close();
        self.registry.clear();
        *loader = ConfigLoader::new(self.registry.clone());
        loader.create(text)
    }

    /// Publish `text` to `topic`. The topic must already exist (via prior
    /// configuration wiring) and must not be output-only or intermediate.
    pub fn publish(&self, topic: &str, text: &str) -> Result<()> {
        if !self.registry.contains(topic) {
            return Err(EngineError::not_found(topic));
        }
        let handle = self.registry.get(topic);
        if !handle.role().accepts_external_publish() {
            return Err(EngineError::protected_topic(topic));
        }
        handle.publish(Message::from_text(text));
        Ok(())
    }

    pub fn topic_snapshot(&self) -> Vec<TopicSnapshot> {
        self.registry
            .topics()
            .iter()
            .map(|topic| TopicSnapshot {
                name: topic.name().to_string(),
                last_value: topic.last_value_text(),
                last_updated: topic.last_message().map(|m| m.created_at()),
                subscribers: topic.subscriber_names(),
                publishers: topic.publisher_names(),
                role: topic.role().as_str(),
            })
            .collect()
    }

    pub fn graph_snapshot(&self) -> Graph {
        build_graph(&self.registry)
    }

    /// When the registry was last wiped by a `load_config` call, if ever.
    /// Surfaced alongside the topic snapshot as a "recently reset" hint.
    pub fn last_clear_time(&self) -> Option<DateTime<Utc>> {
        self.registry.last_clear_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn engine_for_test() -> Engine {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config_files")).unwrap();
        let storage = crate::core::storage::AppStorage::init_for_test(dir.path().to_path_buf());
        // Leak the tempdir so it outlives the engine under test.
        std::mem::forget(dir);
        Engine::new(ConfigFileStore::new(storage))
    }

    #[test]
    fn publish_to_unknown_topic_is_not_found() {
        let engine = engine_for_test();
        let err = engine.publish("A", "1").unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn publish_to_protected_topic_is_rejected() {
        let engine = engine_for_test();
        engine.load_config(None, "add\nA,B\nS").unwrap();
        let err = engine.publish("S", "1").unwrap_err();
        assert!(matches!(err, EngineError::ProtectedTopic(_)));
    }

    #[test]
    fn publish_to_input_topic_runs_the_chain() {
        let engine = engine_for_test();
        engine.load_config(None, "add\nA,B\nS").unwrap();
        engine.publish("A", "2").unwrap();
        engine.publish("B", "3").unwrap();

        let snapshot = engine.topic_snapshot();
        let s = snapshot.iter().find(|t| t.name == "S").unwrap();
        assert_eq!(s.last_value, "5");
        assert_eq!(s.role, "output-only");
        assert!(s.last_updated.is_some());

        let a = snapshot.iter().find(|t| t.name == "A").unwrap();
        assert!(a.last_updated.is_some());
    }

    #[test]
    fn reloading_config_tears_down_the_previous_wiring() {
        let engine = engine_for_test();
        engine.load_config(None, "add\nA,B\nS").unwrap();
        engine.publish("A", "1").unwrap();
        engine.publish("B", "1").unwrap();
        assert_eq!(engine.topic_snapshot().len(), 3);

        engine.load_config(None, "inc\nX\nY").unwrap();
        let names: Vec<_> = engine.topic_snapshot().iter().map(|t| t.name.clone()).collect();
        assert_eq!(names, vec!["X", "Y"]);
    }

    #[test]
    fn last_clear_time_is_set_once_a_config_has_loaded() {
        let engine = engine_for_test();
        assert!(engine.last_clear_time().is_none());
        engine.load_config(None, "inc\nA\nB").unwrap();
        assert!(engine.last_clear_time().is_some());
    }

    #[test]
    fn graph_snapshot_reflects_current_wiring() {
        let engine = engine_for_test();
        engine.load_config(None, "inc\nA\nB").unwrap();
        let graph = engine.graph_snapshot();
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 2);
    }
}
