//! Process-wide name -> Topic mapping with get-or-create and global clear

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::topic::Topic;

/// Process-wide, ordered-insertion `name -> Topic` mapping.
///
/// Topics are owned by the registry; they outlive the agents that reference
/// them. `clear()` drops every topic's subscriber/publisher back-references
/// before removing the topics themselves, so no agent is closed while a
/// topic still holds a reference to it.
pub struct TopicRegistry {
    topics: RwLock<HashMap<String, Arc<Topic>>>,
    order: RwLock<Vec<String>>,
    last_clear_time: RwLock<Option<DateTime<Utc>>>,
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            order: RwLock::new(Vec::new()),
            last_clear_time: RwLock::new(None),
        }
    }

    /// Return the existing topic or create one. Concurrent get-of-same-name
    /// yields the same instance: the write lock is taken unconditionally
    /// only on the creation path, and `entry()` makes the check-then-insert
    /// atomic with respect to other writers.
    pub fn get(&self, name: &str) -> Arc<Topic> {
        if let Some(topic) = self.topics.read().get(name) {
            return topic.clone();
        }
        let mut topics = self.topics.write();
        if let Some(topic) = topics.get(name) {
            return topic.clone();
        }
        let topic = Arc::new(Topic::new(name));
        topics.insert(name.to_string(), topic.clone());
        self.order.write().push(name.to_string());
        topic
    }

    /// True iff a topic by this name has already been created. Unlike
    /// [`get`](Self::get), never creates one.
    pub fn contains(&self, name: &str) -> bool {
        self.topics.read().contains_key(name)
    }

    /// Snapshot enumeration, safe under concurrent get.
    pub fn topics(&self) -> Vec<Arc<Topic>> {
        let topics = self.topics.read();
        self.order
            .read()
            .iter()
            .filter_map(|name| topics.get(name).cloned())
            .collect()
    }

    /// For each topic, drop subscribers/publishers/last-message, then remove
    /// every topic from the map, then record `last_clear_time`. Safe to call
    /// while publishes are in flight: a racing publish may observe either
    /// the pre-clear or post-clear topic set, but never a half-torn one.
    pub fn clear(&self) {
        let topics = self.topics.write();
        for topic in topics.values() {
            topic.clear_all();
        }
        drop(topics);
        self.topics.write().clear();
        self.order.write().clear();
        *self.last_clear_time.write() = Some(Utc::now());
    }

    pub fn last_clear_time(&self) -> Option<DateTime<Utc>> {
        *self.last_clear_time.read()
    }
}
