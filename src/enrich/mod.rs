//! # Enricher
//!
//! First pass of the pipeline. Walks the architecture document and
//! attaches a `securityFlags` record to every known node (from the
//! constant catalog in [`nodes`]) and to every edge (derived by the rule
//! function in [`edges`]). Existing records are overwritten wholesale,
//! never merged, so enrichment is idempotent: running it twice on the
//! same graph shape yields an identical document.
//!
//! The document is rewritten in place, pretty-printed. Read, parse, or
//! write failures propagate; there is no recovery path.

pub mod edges;
pub mod nodes;

use std::path::Path;

use crate::document::GraphDocument;
use crate::AtlasResult;

/// What one enrichment pass touched, plus coverage statistics.
#[derive(Debug, Clone)]
pub struct EnrichmentSummary {
    /// (node id, label) for each node that received a catalog record.
    pub nodes_flagged: Vec<(String, String)>,

    /// (edge id, source, target) for each edge that received a record.
    pub edges_flagged: Vec<(String, String, String)>,

    /// Total node count in the document.
    pub total_nodes: usize,

    /// Total edge count in the document.
    pub total_edges: usize,

    /// Nodes whose attached flags declare encryption at rest.
    pub nodes_encrypted_at_rest: usize,

    /// Edges whose attached flags declare the connection encrypted.
    pub edges_encrypted: usize,
}

impl EnrichmentSummary {
    /// Integer percentage of nodes with encryption at rest.
    pub fn at_rest_percentage(&self) -> usize {
        if self.total_nodes == 0 {
            0
        } else {
            self.nodes_encrypted_at_rest * 100 / self.total_nodes
        }
    }

    /// Integer percentage of edges marked encrypted.
    pub fn encrypted_edge_percentage(&self) -> usize {
        if self.total_edges == 0 {
            0
        } else {
            self.edges_encrypted * 100 / self.total_edges
        }
    }
}

/// Attach security flags to every known node and every edge.
///
/// Pure in-memory transform; the caller decides whether to persist.
pub fn enrich_document(doc: &mut GraphDocument) -> EnrichmentSummary {
    let mut nodes_flagged = Vec::new();
    for node in &mut doc.nodes {
        if let Some(flags) = nodes::flags_for(&node.id) {
            node.data.security_flags = Some(flags);
            nodes_flagged.push((node.id.clone(), node.data.label.clone()));
        }
    }

    let mut edges_flagged = Vec::new();
    for edge in &mut doc.edges {
        let protocol = edge.label.as_deref().unwrap_or("");
        let flags = edges::derive_edge_flags(&edge.id, protocol, &edge.source, &edge.target);
        edge.data.security_flags = Some(flags);
        edges_flagged.push((edge.id.clone(), edge.source.clone(), edge.target.clone()));
    }

    let nodes_encrypted_at_rest = doc
        .nodes
        .iter()
        .filter(|n| {
            n.data
                .security_flags
                .as_ref()
                .is_some_and(|f| f.encrypted_at_rest)
        })
        .count();

    let edges_encrypted = doc
        .edges
        .iter()
        .filter(|e| e.data.security_flags.as_ref().is_some_and(|f| f.encrypted))
        .count();

    EnrichmentSummary {
        nodes_flagged,
        edges_flagged,
        total_nodes: doc.nodes.len(),
        total_edges: doc.edges.len(),
        nodes_encrypted_at_rest,
        edges_encrypted,
    }
}

/// Load the document, enrich it, rewrite it in place, and report progress.
pub fn run(grid_path: &Path) -> AtlasResult<EnrichmentSummary> {
    let mut doc = GraphDocument::load(grid_path)?;
    let summary = enrich_document(&mut doc);
    doc.save(grid_path)?;

    for (id, label) in &summary.nodes_flagged {
        println!("Added securityFlags to node {} ({})", id, label);
    }
    for (id, source, target) in &summary.edges_flagged {
        println!("Added securityFlags to edge {} ({} -> {})", id, source, target);
    }

    println!();
    println!(
        "Updated {} nodes and {} edges in {}",
        summary.total_nodes,
        summary.total_edges,
        grid_path.display(),
    );
    println!();
    println!("Security statistics:");
    println!(
        "  Nodes with encryption at rest: {}/{} ({}%)",
        summary.nodes_encrypted_at_rest,
        summary.total_nodes,
        summary.at_rest_percentage(),
    );
    println!(
        "  Encrypted connections:         {}/{} ({}%)",
        summary.edges_encrypted,
        summary.total_edges,
        summary.encrypted_edge_percentage(),
    );

    log::info!(
        "Enrichment complete: {} nodes flagged, {} edges flagged",
        summary.nodes_flagged.len(),
        summary.edges_flagged.len(),
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Edge, EdgeData, GraphDocument, Node, NodeData};
    use serde_json::Map;

    fn node(id: &str, label: &str, node_type: Option<&str>) -> Node {
        Node {
            id: id.to_string(),
            data: NodeData {
                label: label.to_string(),
                node_type: node_type.map(String::from),
                security_flags: None,
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    fn edge(id: &str, source: &str, target: &str, label: &str) -> Edge {
        Edge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            label: Some(label.to_string()),
            data: EdgeData::default(),
            extra: Map::new(),
        }
    }

    fn small_doc() -> GraphDocument {
        GraphDocument {
            version: "2.1.0".to_string(),
            architecture_security_metadata: Default::default(),
            nodes: vec![
                node("1", "React Frontend PWA", Some("frontend")),
                node("7", "PostgreSQL Primary", Some("database")),
                node("99", "Unknown Appliance", None),
            ],
            edges: vec![edge("e1-2", "1", "2", "HTTPS"), edge("e5-7", "5", "7", "mTLS")],
            extra: Map::new(),
        }
    }

    #[test]
    fn test_known_nodes_get_catalog_flags() {
        let mut doc = small_doc();
        let summary = enrich_document(&mut doc);

        assert_eq!(summary.nodes_flagged.len(), 2);
        assert_eq!(summary.edges_flagged.len(), 2);

        let db = doc.nodes.iter().find(|n| n.id == "7").unwrap();
        let flags = db.data.security_flags.as_ref().unwrap();
        assert_eq!(*flags, nodes::flags_for("7").unwrap());
    }

    #[test]
    fn test_unknown_node_left_untouched() {
        let mut doc = small_doc();
        enrich_document(&mut doc);
        let unknown = doc.nodes.iter().find(|n| n.id == "99").unwrap();
        assert!(unknown.data.security_flags.is_none());
    }

    #[test]
    fn test_every_edge_gets_flags() {
        let mut doc = small_doc();
        let summary = enrich_document(&mut doc);
        assert!(doc.edges.iter().all(|e| e.data.security_flags.is_some()));
        assert_eq!(summary.edges_encrypted, 2);
        assert_eq!(summary.encrypted_edge_percentage(), 100);
    }

    #[test]
    fn test_enrichment_is_idempotent() {
        let mut doc = small_doc();
        enrich_document(&mut doc);
        let first = doc.clone();
        enrich_document(&mut doc);
        assert_eq!(doc, first);
    }

    #[test]
    fn test_existing_flags_are_overwritten_not_merged() {
        let mut doc = small_doc();
        enrich_document(&mut doc);

        // Tamper with an attached record, then re-enrich
        doc.nodes[1]
            .data
            .security_flags
            .as_mut()
            .unwrap()
            .encrypted_at_rest = false;
        enrich_document(&mut doc);

        let flags = doc.nodes[1].data.security_flags.as_ref().unwrap();
        assert!(flags.encrypted_at_rest, "tampered field must be restored");
    }

    #[test]
    fn test_summary_percentages_on_empty_doc() {
        let mut doc = GraphDocument {
            version: String::new(),
            architecture_security_metadata: Default::default(),
            nodes: vec![],
            edges: vec![],
            extra: Map::new(),
        };
        let summary = enrich_document(&mut doc);
        assert_eq!(summary.at_rest_percentage(), 0);
        assert_eq!(summary.encrypted_edge_percentage(), 0);
    }
}
