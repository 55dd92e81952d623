//! Dataflow engine core: messages, topics, agents, and the graph view built
//! from their wiring.
//!
//! - `message` - immutable payload carried between agents
//! - `topic` - pub/sub channel with identity-based subscriber/publisher sets
//! - `registry` - process-wide get-or-create map of topics
//! - `agent` - the operator contract
//! - `operators` - the built-in arithmetic/bitwise/comparison agents
//! - `parallel` - gives any agent its own bounded queue and worker thread
//! - `loader` - parses configuration text into wired, running agents
//! - `graph` - read-only topic/agent wiring view and cycle detection

pub mod agent;
pub mod graph;
pub mod loader;
pub mod message;
pub mod operators;
pub mod parallel;
pub mod registry;
pub mod topic;

pub use agent::Agent;
pub use graph::{Graph, build_graph, has_cycles};
pub use loader::ConfigLoader;
pub use message::Message;
pub use registry::TopicRegistry;
pub use topic::{AgentHandle, Topic, TopicRole};
