use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The hand-authored entity graph shipped with the dashboard. Fixture
/// data, not derived from the corpus.
const PEOPLE_GRAPH_JSON: &str = include_str!("../assets/people_graph.json");

/// A person or organization, tagged with one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub group: String,
}

/// A directed relation between two nodes, with a free-text label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub relation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl GraphData {
    /// Node ids referenced by links but missing from the node set.
    ///
    /// Loading does not enforce this invariant; the check exists so the
    /// fixture can be linted in tests.
    pub fn dangling_links(&self) -> Vec<&str> {
        let ids: std::collections::HashSet<&str> =
            self.nodes.iter().map(|n| n.id.as_str()).collect();

        let mut dangling = Vec::new();
        for link in &self.links {
            for endpoint in [&link.source, &link.target] {
                if !ids.contains(endpoint.as_str()) {
                    dangling.push(endpoint.as_str());
                }
            }
        }
        dangling
    }
}

/// Deserialize the embedded people/organizations graph.
pub fn people_graph() -> Result<GraphData> {
    Ok(serde_json::from_str(PEOPLE_GRAPH_JSON)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_parses() {
        let graph = people_graph().unwrap();
        assert!(graph.nodes.len() > 50);
        assert!(graph.links.len() > 30);
    }

    #[test]
    fn fixture_has_no_dangling_links() {
        let graph = people_graph().unwrap();
        assert_eq!(graph.dangling_links(), Vec::<&str>::new());
    }

    #[test]
    fn known_entities_present() {
        let graph = people_graph().unwrap();
        let pok = graph
            .nodes
            .iter()
            .find(|n| n.id == "Protectors of Kronos (POK)")
            .unwrap();
        assert_eq!(pok.group, "POK");

        assert!(graph.links.iter().any(|l| {
            l.source == "Edvard Vann"
                && l.target == "Juliana Vann"
                && l.relation == "Father"
        }));
    }

    #[test]
    fn dangling_detection_reports_missing_ids() {
        let graph = GraphData {
            nodes: vec![Node {
                id: "A".into(),
                group: "G".into(),
            }],
            links: vec![Link {
                source: "A".into(),
                target: "Ghost".into(),
                relation: "knows".into(),
            }],
        };
        assert_eq!(graph.dangling_links(), vec!["Ghost"]);
    }
}
