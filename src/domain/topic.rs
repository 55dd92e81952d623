//! Named channels: subscriber/publisher sets plus last-value retention

use std::sync::Arc;

use parking_lot::RwLock;

use super::message::Message;

/// Thread-safe handle to an agent, as seen by a [`Topic`].
///
/// Topics only ever hold this handle, never a bare [`super::agent::Agent`] —
/// in practice every agent wired up by the configuration loader is wrapped in
/// a [`super::parallel::ParallelAgent`], which implements this trait directly
/// by enqueuing onto its worker.
pub trait AgentHandle: Send + Sync {
    fn name(&self) -> &str;
    fn reset(&self);
    fn on_message(&self, topic_name: &str, message: &Message);
    fn close(&self);
}

/// A named channel with a subscriber set, a publisher set, and the most
/// recently published message.
pub struct Topic {
    name: String,
    subscribers: RwLock<Vec<Arc<dyn AgentHandle>>>,
    publishers: RwLock<Vec<Arc<dyn AgentHandle>>>,
    last_message: RwLock<Option<Message>>,
}

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subscribers: RwLock::new(Vec::new()),
            publishers: RwLock::new(Vec::new()),
            last_message: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add-if-absent by pointer identity. Idempotent.
    pub fn subscribe(&self, agent: Arc<dyn AgentHandle>) {
        let mut subs = self.subscribers.write();
        if !subs.iter().any(|a| Arc::ptr_eq(a, &agent)) {
            subs.push(agent);
        }
    }

    pub fn unsubscribe(&self, agent: &Arc<dyn AgentHandle>) {
        self.subscribers.write().retain(|a| !Arc::ptr_eq(a, agent));
    }

    pub fn add_publisher(&self, agent: Arc<dyn AgentHandle>) {
        let mut pubs = self.publishers.write();
        if !pubs.iter().any(|a| Arc::ptr_eq(a, &agent)) {
            pubs.push(agent);
        }
    }

    pub fn remove_publisher(&self, agent: &Arc<dyn AgentHandle>) {
        self.publishers.write().retain(|a| !Arc::ptr_eq(a, agent));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    pub fn publisher_count(&self) -> usize {
        self.publishers.read().len()
    }

    pub fn subscriber_names(&self) -> Vec<String> {
        self.subscribers
            .read()
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    pub fn publisher_names(&self) -> Vec<String> {
        self.publishers
            .read()
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    /// Atomically set `last_message`, then invoke every current subscriber's
    /// `on_message`. Subscribers are snapshotted before invocation so that a
    /// concurrent subscribe/unsubscribe never observes (or causes) a
    /// partially-mutated collection; a subscribe racing with this call
    /// becomes visible on the *next* publish, not this one.
    pub fn publish(&self, msg: Message) {
        *self.last_message.write() = Some(msg.clone());
        let subs = self.subscribers.read().clone();
        for sub in subs.iter() {
            sub.on_message(&self.name, &msg);
        }
    }

    pub fn last_message(&self) -> Option<Message> {
        self.last_message.read().clone()
    }

    pub fn last_value_text(&self) -> String {
        self.last_message
            .read()
            .as_ref()
            .map(|m| m.text().to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Drop subscribers, publishers, and last-message.
    pub fn clear_all(&self) {
        self.subscribers.write().clear();
        self.publishers.write().clear();
        *self.last_message.write() = None;
    }

    /// `input-only` / `output-only` / `intermediate` / `inactive`, derived
    /// from non-empty subscriber/publisher sets.
    pub fn role(&self) -> TopicRole {
        let has_subs = self.subscriber_count() > 0;
        let has_pubs = self.publisher_count() > 0;
        match (has_pubs, has_subs) {
            (true, false) => TopicRole::OutputOnly,
            (false, true) => TopicRole::InputOnly,
            (true, true) => TopicRole::Intermediate,
            (false, false) => TopicRole::Inactive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicRole {
    InputOnly,
    OutputOnly,
    Intermediate,
    Inactive,
}

impl TopicRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicRole::InputOnly => "input-only",
            TopicRole::OutputOnly => "output-only",
            TopicRole::Intermediate => "intermediate",
            TopicRole::Inactive => "inactive",
        }
    }

    /// External publish is only permitted on input-only topics.
    pub fn accepts_external_publish(&self) -> bool {
        matches!(self, TopicRole::InputOnly | TopicRole::Inactive)
    }
}
