//! Bipartite topic/agent graph view and cycle detection

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::registry::TopicRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Topic { name: String },
    Agent { name: String },
}

impl Node {
    fn key(&self) -> String {
        match self {
            Node::Topic { name } => format!("T:{name}"),
            Node::Agent { name } => format!("A:{name}"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

/// A transient bipartite view of the current registry: topic nodes
/// `T:<name>`, agent nodes `A:<name>`, and edges `T->A` (subscriptions) /
/// `A->T` (publishers).
#[derive(Debug, Clone, Serialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// True iff any node lies on a directed cycle.
    pub fn has_cycles(&self) -> bool {
        has_cycles(self)
    }
}

/// Enumerate topics, collect the union of subscribers/publishers across all
/// topics (agents sharing a display name collide intentionally, mirroring
/// the registry's identity policy), and add `T->A` / `A->T` edges.
pub fn build_graph(registry: &TopicRegistry) -> Graph {
    let mut node_keys: HashSet<String> = HashSet::new();
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    let mut push_node = |node: Node, nodes: &mut Vec<Node>, seen: &mut HashSet<String>| {
        if seen.insert(node.key()) {
            nodes.push(node);
        }
    };

    for topic in registry.topics() {
        let topic_node = Node::Topic {
            name: topic.name().to_string(),
        };
        push_node(topic_node.clone(), &mut nodes, &mut node_keys);
        let topic_key = topic_node.key();

        for agent_name in topic.subscriber_names() {
            let agent_node = Node::Agent { name: agent_name };
            push_node(agent_node.clone(), &mut nodes, &mut node_keys);
            edges.push(Edge {
                from: topic_key.clone(),
                to: agent_node.key(),
            });
        }

        for agent_name in topic.publisher_names() {
            let agent_node = Node::Agent { name: agent_name };
            push_node(agent_node.clone(), &mut nodes, &mut node_keys);
            edges.push(Edge {
                from: agent_node.key(),
                to: topic_key.clone(),
            });
        }
    }

    Graph { nodes, edges }
}

/// True iff any node lies on a directed cycle. DFS with a per-root path set
/// (not a global visited set): every reachable cycle is reported, at the
/// cost of possibly revisiting nodes across different roots. Acceptable
/// because these graphs are bipartite and small. Self-edges count.
pub fn has_cycles(graph: &Graph) -> bool {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        adjacency.entry(&edge.from).or_default().push(&edge.to);
    }

    let keys: Vec<String> = graph.nodes.iter().map(|n| n.key()).collect();

    for root in &keys {
        let mut path: HashSet<&str> = HashSet::new();
        if dfs_has_cycle(root, &adjacency, &mut path) {
            return true;
        }
    }
    false
}

fn dfs_has_cycle<'a>(
    node: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    path: &mut HashSet<&'a str>,
) -> bool {
    if path.contains(node) {
        return true;
    }
    path.insert(node);
    if let Some(neighbors) = adjacency.get(node) {
        for next in neighbors {
            if dfs_has_cycle(next, adjacency, path) {
                return true;
            }
        }
    }
    path.remove(node);
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::loader::ConfigLoader;
    use std::sync::Arc;

    #[test]
    fn acyclic_sum_chain_has_no_cycles() {
        let registry = Arc::new(TopicRegistry::new());
        let mut loader = ConfigLoader::new(registry.clone());
        loader.create("add\nA,B\nS\ninc\nS\nR").unwrap();
        let graph = build_graph(&registry);
        assert!(!has_cycles(&graph));
    }

    #[test]
    fn mutual_inc_cycle_is_detected() {
        let registry = Arc::new(TopicRegistry::new());
        let mut loader = ConfigLoader::new(registry.clone());
        loader.create("inc\nA\nB\ninc\nB\nA").unwrap();
        let graph = build_graph(&registry);
        assert!(has_cycles(&graph));
    }

    #[test]
    fn self_loop_counts_as_a_cycle() {
        let graph = Graph {
            nodes: vec![Node::Agent {
                name: "a".to_string(),
            }],
            edges: vec![Edge {
                from: "A:a".to_string(),
                to: "A:a".to_string(),
            }],
        };
        assert!(has_cycles(&graph));
    }
}
