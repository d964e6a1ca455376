//! Key-path lookup into the statement tree.
//!
//! A key-path is a dotted list of field names such as `from.port.id`. Resolution
//! never fails: a field that does not exist resolves to the empty string, and an
//! empty path resolves to the value's canonical rendering.

use std::fmt::Display;

use crate::dot_ast::*;

pub fn split_key(key: &str) -> Vec<String> {
    if key.is_empty() {
        return Vec::new();
    }
    key.split('.').map(str::to_string).collect()
}

pub trait Resolve: Display {
    fn field(&self, _name: &str, _rest: &[String]) -> String {
        String::new()
    }

    fn resolve(&self, path: &[String]) -> String {
        match path.split_first() {
            Some((name, rest)) if !name.is_empty() => self.field(name, rest),
            _ => self.to_string(),
        }
    }
}

fn lookup_attr(attrs: &[Attribute], key: &str) -> String {
    attrs
        .iter()
        .rev()
        .find(|a| a.key.as_str() == key)
        .map(|a| a.value.as_str().to_string())
        .unwrap_or_default()
}

impl Resolve for Stmt {
    fn resolve(&self, path: &[String]) -> String {
        match self {
            Stmt::Node(n) => n.resolve(path),
            Stmt::Edge(e) => e.resolve(path),
            Stmt::Subgraph(sg) => sg.resolve(path),
            Stmt::Attr(a) => a.resolve(path),
            Stmt::Assign(a) => a.resolve(path),
        }
    }
}

impl Resolve for NodeStmt {
    fn field(&self, name: &str, rest: &[String]) -> String {
        match name {
            "id" => self.vertex.id.as_str().to_string(),
            "port" => match &self.vertex.port {
                Some(port) => port.resolve(rest),
                None => String::new(),
            },
            key => lookup_attr(&self.attrs, key),
        }
    }
}

impl Resolve for Port {
    fn field(&self, name: &str, rest: &[String]) -> String {
        match name {
            "id" => self
                .id
                .as_ref()
                .map(|id| id.as_str().to_string())
                .unwrap_or_default(),
            "compass_point" => match &self.compass_point {
                Some(cp) => cp.resolve(rest),
                None => String::new(),
            },
            _ => String::new(),
        }
    }
}

impl Resolve for CompassPoint {}

impl Resolve for EdgeStmt {
    fn field(&self, name: &str, rest: &[String]) -> String {
        match name {
            "from" => self.from.resolve(rest),
            "to" => self.to.resolve(rest),
            key => lookup_attr(&self.attrs, key),
        }
    }
}

impl Resolve for EdgeRhs {
    fn field(&self, name: &str, rest: &[String]) -> String {
        match name {
            "vertex" => self.vertex.resolve(rest),
            "to" => match &self.to {
                Some(next) => next.resolve(rest),
                None => String::new(),
            },
            _ => String::new(),
        }
    }
}

impl Resolve for Endpoint {
    fn resolve(&self, path: &[String]) -> String {
        match self {
            Endpoint::Vertex(v) => v.resolve(path),
            Endpoint::Subgraph(sg) => sg.resolve(path),
        }
    }
}

// A bare vertex has no addressable fields.
impl Resolve for Vertex {
    fn resolve(&self, _path: &[String]) -> String {
        self.to_string()
    }
}

impl Resolve for Subgraph {
    fn field(&self, name: &str, _rest: &[String]) -> String {
        match (name, &self.id) {
            ("id", Some(id)) => id.as_str().to_string(),
            _ => String::new(),
        }
    }
}

impl Resolve for AttrStmt {}

impl Resolve for Attribute {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dot_parser::parse_dot;
    use pretty_assertions::assert_eq;

    fn first_stmt(src: &str) -> Stmt {
        parse_dot(src).unwrap().stmts.remove(0)
    }

    fn resolve(stmt: &Stmt, key: &str) -> String {
        stmt.resolve(&split_key(key))
    }

    #[test]
    fn empty_path_renders_whole_statement() {
        let stmt = first_stmt("digraph { a [label=foo] }");
        assert_eq!(resolve(&stmt, ""), "a [label=foo]");
        assert_eq!(stmt.resolve(&[String::new(), "id".to_string()]), "a [label=foo]");
    }

    #[test]
    fn node_id_and_attributes() {
        let stmt = first_stmt("digraph { \"my node\" [label=foo, color=red, label=bar] }");
        assert_eq!(resolve(&stmt, "id"), "my node");
        assert_eq!(resolve(&stmt, "color"), "red");
        assert_eq!(resolve(&stmt, "label"), "bar", "last attribute wins");
        assert_eq!(resolve(&stmt, "shape"), "");
    }

    #[test]
    fn node_port_fields() {
        let stmt = first_stmt("digraph { a:p1:ne }");
        assert_eq!(resolve(&stmt, "port"), ":p1:ne");
        assert_eq!(resolve(&stmt, "port.id"), "p1");
        assert_eq!(resolve(&stmt, "port.compass_point"), "ne");
        assert_eq!(resolve(&stmt, "port.compass_point.x"), "");
        assert_eq!(resolve(&stmt, "port.other"), "");

        let no_port = first_stmt("digraph { a }");
        assert_eq!(resolve(&no_port, "port.id"), "");
    }

    #[test]
    fn edge_endpoints() {
        let stmt = first_stmt("digraph { a:p -> b -> c [weight=2] }");
        assert_eq!(resolve(&stmt, "from"), "a:p");
        assert_eq!(resolve(&stmt, "from.id"), "a:p", "a bare vertex renders whole");
        assert_eq!(resolve(&stmt, "to"), " -> b -> c");
        assert_eq!(resolve(&stmt, "to.vertex"), "b");
        assert_eq!(resolve(&stmt, "to.to.vertex"), "c");
        assert_eq!(resolve(&stmt, "to.to.to.vertex"), "");
        assert_eq!(resolve(&stmt, "to.nope"), "");
        assert_eq!(resolve(&stmt, "weight"), "2");
    }

    #[test]
    fn subgraph_endpoint_and_statement() {
        let stmt = first_stmt("digraph { subgraph s1 { x } }");
        assert_eq!(resolve(&stmt, "id"), "s1");
        assert_eq!(resolve(&stmt, "label"), "");
        assert_eq!(resolve(&stmt, ""), "subgraph s1 { x; }");

        let edge = first_stmt("digraph { {x y} -> z }");
        assert_eq!(resolve(&edge, "from"), "subgraph { x; y; }");
        assert_eq!(resolve(&edge, "from.id"), "");
    }

    #[test]
    fn attr_and_assign_statements_have_no_fields() {
        let attr = first_stmt("digraph { node [shape=box] }");
        assert_eq!(resolve(&attr, "shape"), "");
        assert_eq!(resolve(&attr, ""), "node [shape=box]");

        let assign = first_stmt("digraph { rankdir=LR }");
        assert_eq!(resolve(&assign, "rankdir"), "");
    }
}
