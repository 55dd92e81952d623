//! Agent contract shared by every computational unit in the graph

use super::message::Message;

/// A computational unit subscribing to zero or more input topics and
/// publishing to zero or more output topics.
///
/// No ordering guarantee is required between concurrent `on_message`
/// invocations unless the agent is wrapped in [`super::parallel::ParallelAgent`],
/// which serialises delivery onto a single worker thread. Unwrapped agents
/// are therefore not `Send + Sync` safe to share across threads on their own.
pub trait Agent: Send {
    /// Display name. Not required to be unique — the graph model
    /// intentionally collides agents that share a display name.
    fn name(&self) -> &str;

    /// Restore initial state (clear any retained input slots).
    fn reset(&mut self);

    /// Handle an incoming publication on `topic_name`.
    fn on_message(&mut self, topic_name: &str, message: &Message);

    /// Release any resources. Most agents hold none and this is a no-op.
    fn close(&mut self) {}
}
