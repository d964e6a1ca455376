use std::collections::{BTreeMap, HashMap};

use petgraph::Direction::{Incoming, Outgoing};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use tracing::info;

use crate::dot_ast::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub attrs: BTreeMap<String, Id>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub attrs: BTreeMap<String, Id>,
}

impl Edge {
    pub fn declared(attrs: BTreeMap<String, Id>) -> Self {
        Self { attrs }
    }

    pub fn bypass() -> Self {
        Self {
            attrs: BTreeMap::from([
                ("color".to_string(), Id::new("gray")),
                ("dir".to_string(), Id::new("none")),
            ]),
        }
    }
}

/// A directed graph without self-loops or parallel edges, keyed by node name.
#[derive(Debug, Clone, Default)]
pub struct DotGraph {
    graph: StableDiGraph<Node, Edge>,
    names: HashMap<String, NodeIndex>,
}

impl DotGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Nodes ──────────────────────────────────────────────────

    pub fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.names.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(Node {
            name: name.to_string(),
            attrs: BTreeMap::new(),
        });
        self.names.insert(name.to_string(), idx);
        idx
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.graph.node_weight(idx)
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> Option<&mut Node> {
        self.graph.node_weight_mut(idx)
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeIndex> {
        self.names.get(name).copied()
    }

    pub fn nodes(&self) -> Vec<NodeIndex> {
        self.graph.node_indices().collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn remove_node(&mut self, idx: NodeIndex) -> Option<Node> {
        let node = self.graph.remove_node(idx)?;
        self.names.remove(&node.name);
        Some(node)
    }

    // ─── Edges ──────────────────────────────────────────────────

    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) -> Option<EdgeIndex> {
        self.add_edge_with(from, to, Edge::declared(BTreeMap::new()))
    }

    /// No-op for self-loops and for an ordered pair that already has an edge.
    pub fn add_edge_with(&mut self, from: NodeIndex, to: NodeIndex, edge: Edge) -> Option<EdgeIndex> {
        if from == to || self.graph.contains_edge(from, to) {
            return None;
        }
        Some(self.graph.add_edge(from, to, edge))
    }

    pub fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.graph.contains_edge(from, to)
    }

    pub fn edge_between(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.graph.find_edge_undirected(a, b).is_some()
    }

    pub fn edge(&self, from: NodeIndex, to: NodeIndex) -> Option<&Edge> {
        let idx = self.graph.find_edge(from, to)?;
        self.graph.edge_weight(idx)
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn edges(&self) -> Vec<(NodeIndex, NodeIndex)> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .collect()
    }

    // ─── Hiding ─────────────────────────────────────────────────

    /// Removes `idx`, linking each scanned neighbor pair `(from, to)` with a
    /// bypass edge `to -> from` unless the two are already adjacent.
    pub fn hide_node(&mut self, idx: NodeIndex) -> Vec<(NodeIndex, NodeIndex)> {
        let Some(hidden) = self.graph.node_weight(idx).map(|n| n.name.clone()) else {
            return Vec::new();
        };
        let mut preds: Vec<NodeIndex> = self.graph.neighbors_directed(idx, Incoming).collect();
        let mut succs: Vec<NodeIndex> = self.graph.neighbors_directed(idx, Outgoing).collect();
        preds.sort();
        succs.sort();

        let mut created = Vec::new();
        for (froms, tos) in [
            (&preds, &succs),
            (&succs, &preds),
            (&preds, &preds),
            (&succs, &succs),
        ] {
            for &from in froms {
                for &to in tos {
                    if from == to || self.edge_between(from, to) {
                        continue;
                    }
                    if self.add_edge_with(to, from, Edge::bypass()).is_some() {
                        info!(
                            hidden = %hidden,
                            from = %self.graph[to].name,
                            to = %self.graph[from].name,
                            "link"
                        );
                        created.push((to, from));
                    }
                }
            }
        }

        self.remove_node(idx);
        created
    }

    // ─── Conversion ─────────────────────────────────────────────

    pub fn from_document(doc: &Graph) -> Self {
        let mut graph = Self::new();
        graph.collect_stmts(&doc.stmts);
        graph
    }

    fn collect_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            match stmt {
                Stmt::Node(n) => {
                    let idx = self.add_node(n.vertex.id.as_str());
                    let node = &mut self.graph[idx];
                    for attr in &n.attrs {
                        node.attrs
                            .insert(attr.key.as_str().to_string(), attr.value.clone());
                    }
                }
                Stmt::Edge(e) => self.collect_edge(e),
                Stmt::Subgraph(sg) => self.collect_stmts(&sg.stmts),
                Stmt::Attr(_) | Stmt::Assign(_) => {}
            }
        }
    }

    fn collect_edge(&mut self, stmt: &EdgeStmt) {
        let attrs: BTreeMap<String, Id> = stmt
            .attrs
            .iter()
            .map(|a| (a.key.as_str().to_string(), a.value.clone()))
            .collect();

        let mut from = self.endpoint_nodes(&stmt.from);
        let mut rhs = Some(&stmt.to);
        while let Some(hop) = rhs {
            let to = self.endpoint_nodes(&hop.vertex);
            for &f in &from {
                for &t in &to {
                    self.add_edge_with(f, t, Edge::declared(attrs.clone()));
                }
            }
            from = to;
            rhs = hop.to.as_deref();
        }
    }

    fn endpoint_nodes(&mut self, endpoint: &Endpoint) -> Vec<NodeIndex> {
        match endpoint {
            Endpoint::Vertex(v) => vec![self.add_node(v.id.as_str())],
            Endpoint::Subgraph(sg) => {
                self.collect_stmts(&sg.stmts);
                let mut names = Vec::new();
                subgraph_vertices(&sg.stmts, &mut names);
                names.iter().map(|name| self.add_node(name)).collect()
            }
        }
    }

    pub fn to_document(&self, root: &str) -> Graph {
        let vertex = |idx: NodeIndex| Vertex {
            id: Id::new(&self.graph[idx].name),
            port: None,
        };
        let attr_list = |attrs: &BTreeMap<String, Id>| -> Vec<Attribute> {
            attrs
                .iter()
                .map(|(k, v)| Attribute {
                    key: Id::new(k),
                    value: v.clone(),
                })
                .collect()
        };

        let mut stmts: Vec<Stmt> = self
            .graph
            .node_indices()
            .map(|idx| {
                Stmt::Node(NodeStmt {
                    vertex: vertex(idx),
                    attrs: attr_list(&self.graph[idx].attrs),
                })
            })
            .collect();

        for e in self.graph.edge_indices() {
            let Some((from, to)) = self.graph.edge_endpoints(e) else {
                continue;
            };
            stmts.push(Stmt::Edge(EdgeStmt {
                from: Endpoint::Vertex(vertex(from)),
                to: EdgeRhs {
                    op: EdgeOp::Directed,
                    vertex: Endpoint::Vertex(vertex(to)),
                    to: None,
                },
                attrs: attr_list(&self.graph[e].attrs),
            }));
        }

        Graph {
            strict: false,
            directed: true,
            id: Some(Id::new(root)),
            stmts,
        }
    }
}

fn subgraph_vertices(stmts: &[Stmt], names: &mut Vec<String>) {
    fn push(names: &mut Vec<String>, id: &Id) {
        if !names.iter().any(|n| n == id.as_str()) {
            names.push(id.as_str().to_string());
        }
    }

    for stmt in stmts {
        match stmt {
            Stmt::Node(n) => push(names, &n.vertex.id),
            Stmt::Edge(e) => {
                let mut endpoint = Some(&e.from);
                let mut rhs = Some(&e.to);
                while let Some(ep) = endpoint {
                    match ep {
                        Endpoint::Vertex(v) => push(names, &v.id),
                        Endpoint::Subgraph(sg) => subgraph_vertices(&sg.stmts, names),
                    }
                    endpoint = rhs.map(|r| &r.vertex);
                    rhs = rhs.and_then(|r| r.to.as_deref());
                }
            }
            Stmt::Subgraph(sg) => subgraph_vertices(&sg.stmts, names),
            Stmt::Attr(_) | Stmt::Assign(_) => {}
        }
    }
}
