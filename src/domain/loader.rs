//! Configuration loader: parses a 3-line-per-agent text spec, instantiates
//! agents by name, wires them to topics, and tracks their lifecycle

use std::sync::Arc;

use super::agent::Agent;
use super::message::Message;
use super::operators::{AddAgent, BitwiseAgent, BitwiseOp, CompareAgent, IncAgent, NotAgent};
use super::parallel::{ParallelAgent, capacity_for_input_count};
use super::registry::TopicRegistry;
use super::topic::AgentHandle;
use crate::error::{EngineError, Result};

/// Split on `,` with no whitespace trimming; a blank line yields a single
/// empty-string element rather than an empty array.
fn split_fields(line: &str) -> Vec<String> {
    line.split(',').map(str::to_string).collect()
}

fn make_publish(registry: Arc<TopicRegistry>) -> Box<dyn Fn(&str, Message) + Send> {
    Box::new(move |topic: &str, msg: Message| {
        registry.get(topic).publish(msg);
    })
}

/// Resolve `type_name` via the compile-time factory table (replacing the
/// reflection-based dispatch of the original design), instantiate, and wrap
/// in a [`ParallelAgent`] sized per the capacity policy.
fn build_agent(
    type_name: &str,
    inputs: &[String],
    outputs: &[String],
    registry: &Arc<TopicRegistry>,
) -> Result<Arc<ParallelAgent>> {
    let publish = make_publish(registry.clone());
    let inner: Box<dyn Agent> = match type_name {
        "add" => Box::new(AddAgent::new(inputs, outputs, publish)),
        "inc" => Box::new(IncAgent::new(inputs, outputs, publish)),
        "and" => Box::new(BitwiseAgent::new(BitwiseOp::And, inputs, outputs, publish)),
        "or" => Box::new(BitwiseAgent::new(BitwiseOp::Or, inputs, outputs, publish)),
        "xor" => Box::new(BitwiseAgent::new(BitwiseOp::Xor, inputs, outputs, publish)),
        "not" => Box::new(NotAgent::new(inputs, outputs, publish)),
        "compare" => Box::new(CompareAgent::new(inputs, outputs, publish)),
        other => return Err(EngineError::parse(format!("unregistered agent type: {other}"))),
    };
    let capacity = capacity_for_input_count(inputs.len());
    Ok(ParallelAgent::new(inner, capacity))
}

/// An instantiated agent together with the topic names it was wired to, so
/// that closing it can drop the matching back-references.
struct WiredAgent {
    handle: Arc<ParallelAgent>,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

/// Owns the agents instantiated from one configuration load and wires them
/// into the shared [`TopicRegistry`].
pub struct ConfigLoader {
    registry: Arc<TopicRegistry>,
    agents: Vec<WiredAgent>,
}

impl ConfigLoader {
    pub fn new(registry: Arc<TopicRegistry>) -> Self {
        Self {
            registry,
            agents: Vec::new(),
        }
    }

    /// Parse and instantiate every 3-line block in `text`. The total line
    /// count (after trimming trailing whitespace per line) must be a
    /// multiple of three, or the whole call fails without partial effects
    /// beyond what had already been wired by earlier `create()` calls.
    /// Individual block failures (unregistered agent type) are logged and
    /// skipped rather than aborting the load.
    pub fn create(&mut self, text: &str) -> Result<()> {
        let lines: Vec<&str> = text.lines().map(|l| l.trim_end()).collect();
        if !lines.is_empty() && lines.len() % 3 != 0 {
            return Err(EngineError::parse(format!(
                "configuration has {} lines, which is not a multiple of 3",
                lines.len()
            )));
        }

        for block in lines.chunks(3) {
            let (type_name, in_line, out_line) = (block[0], block[1], block[2]);
            let inputs = split_fields(in_line);
            let outputs = split_fields(out_line);

            match build_agent(type_name, &inputs, &outputs, &self.registry) {
                Ok(wrapped) => {
                    let handle: Arc<dyn AgentHandle> = wrapped.clone();
                    for input in &inputs {
                        self.registry.get(input).subscribe(handle.clone());
                    }
                    for output in &outputs {
                        self.registry.get(output).add_publisher(handle.clone());
                    }
                    self.agents.push(WiredAgent {
                        handle: wrapped,
                        inputs,
                        outputs,
                    });
                }
                Err(e) => {
                    tracing::warn!(agent_type = %type_name, error = %e, "skipping unresolvable agent block");
                }
            }
        }

        Ok(())
    }

    /// Drops every wired agent's subscriber/publisher back-references before
    /// closing it, in construction order, so the topic side never holds a
    /// handle to an agent past its close (the invariant also upheld by
    /// [`TopicRegistry::clear`](super::registry::TopicRegistry::clear) for a
    /// full reset). Continues past individual failures — `ParallelAgent::close`
    /// already swallows its own drain-timeout error.
    pub fn close(&mut self) {
        for wired in self.agents.drain(..) {
            let handle: Arc<dyn AgentHandle> = wired.handle.clone();
            for input in &wired.inputs {
                self.registry.get(input).unsubscribe(&handle);
            }
            for output in &wired.outputs {
                self.registry.get(output).remove_publisher(&handle);
            }
            wired.handle.close();
        }
    }
}

impl Drop for ConfigLoader {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message::Message;

    #[test]
    fn rejects_line_count_not_multiple_of_three() {
        let registry = Arc::new(TopicRegistry::new());
        let mut loader = ConfigLoader::new(registry);
        let err = loader.create("add\nA,B").unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
    }

    #[test]
    fn skips_unknown_agent_type_but_continues() {
        let registry = Arc::new(TopicRegistry::new());
        let mut loader = ConfigLoader::new(registry.clone());
        loader
            .create("bogus\nA\nB\ninc\nC\nD")
            .expect("unknown-type blocks are skipped, not fatal");
        // only the "inc" block wired anything up; the bogus block left its
        // topics untouched
        assert_eq!(registry.get("A").subscriber_count(), 0);
        assert_eq!(registry.get("C").subscriber_count(), 1);
    }

    #[test]
    fn sum_chain_end_to_end() {
        let registry = Arc::new(TopicRegistry::new());
        let mut loader = ConfigLoader::new(registry.clone());
        loader.create("add\nA,B\nS\ninc\nS\nR").unwrap();

        registry.get("A").publish(Message::from_text("2.0"));
        registry.get("B").publish(Message::from_text("3.0"));

        assert_eq!(registry.get("R").last_value_text(), "6");
    }

    #[test]
    fn close_drops_topic_back_references_before_stopping_workers() {
        let registry = Arc::new(TopicRegistry::new());
        let mut loader = ConfigLoader::new(registry.clone());
        loader.create("inc\nA\nB").unwrap();
        assert_eq!(registry.get("A").subscriber_count(), 1);
        assert_eq!(registry.get("B").publisher_count(), 1);

        loader.close();
        assert_eq!(registry.get("A").subscriber_count(), 0);
        assert_eq!(registry.get("B").publisher_count(), 0);
    }

    #[test]
    fn blank_io_line_yields_single_empty_field() {
        let registry = Arc::new(TopicRegistry::new());
        let mut loader = ConfigLoader::new(registry.clone());
        // "not" needs one input/output; supplying a blank line still parses
        // (as a single empty-string field) rather than erroring.
        loader.create("not\n\n\n").unwrap();
        assert_eq!(registry.get("").subscriber_count(), 1);
    }
}
