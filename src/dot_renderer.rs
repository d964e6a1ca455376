use std::fmt::{self, Display, Formatter, Write};

use crate::dot_ast::*;

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Id::Plain(s) => f.write_str(s),
            Id::Quoted(s) => write!(f, "\"{}\"", escape_quoted(s)),
            Id::Html(s) => write!(f, "<{s}>"),
        }
    }
}

fn escape_quoted(text: &str) -> String {
    let mut escaped = text.replace('"', "\\\"");
    let trailing = escaped.chars().rev().take_while(|&c| c == '\\').count();
    if trailing % 2 == 1 {
        escaped.push('\\');
    }
    escaped
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

struct AttrList<'a>(&'a [Attribute]);

impl Display for AttrList<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        let items: Vec<String> = self.0.iter().map(|a| a.to_string()).collect();
        write!(f, " [{}]", items.join(", "))
    }
}

impl Display for CompassPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl Display for Port {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(id) = &self.id {
            write!(f, ":{id}")?;
        }
        if let Some(cp) = &self.compass_point {
            write!(f, ":{cp}")?;
        }
        Ok(())
    }
}

impl Display for Vertex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some(port) = &self.port {
            write!(f, "{port}")?;
        }
        Ok(())
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Vertex(v) => write!(f, "{v}"),
            Endpoint::Subgraph(sg) => write!(f, "{sg}"),
        }
    }
}

impl Display for EdgeOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EdgeOp::Directed => f.write_str("->"),
            EdgeOp::Undirected => f.write_str("--"),
        }
    }
}

impl Display for EdgeRhs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, " {} {}", self.op, self.vertex)?;
        if let Some(next) = &self.to {
            write!(f, "{next}")?;
        }
        Ok(())
    }
}

impl Display for EdgeStmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.from, self.to, AttrList(&self.attrs))
    }
}

impl Display for NodeStmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.vertex, AttrList(&self.attrs))
    }
}

impl Display for AttrTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AttrTarget::Graph => f.write_str("graph"),
            AttrTarget::Node => f.write_str("node"),
            AttrTarget::Edge => f.write_str("edge"),
        }
    }
}

impl Display for AttrStmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.attrs.is_empty() {
            return write!(f, "{} []", self.target);
        }
        write!(f, "{}{}", self.target, AttrList(&self.attrs))
    }
}

impl Display for Subgraph {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("subgraph ")?;
        if let Some(id) = &self.id {
            write!(f, "{id} ")?;
        }
        write_block(f, &self.stmts)
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Node(n) => write!(f, "{n}"),
            Stmt::Edge(e) => write!(f, "{e}"),
            Stmt::Attr(a) => write!(f, "{a}"),
            Stmt::Assign(a) => write!(f, "{a}"),
            Stmt::Subgraph(sg) => write!(f, "{sg}"),
        }
    }
}

impl Display for Graph {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_header(f, self)?;
        write_block(f, &self.stmts)
    }
}

fn write_header(out: &mut impl Write, graph: &Graph) -> fmt::Result {
    if graph.strict {
        out.write_str("strict ")?;
    }
    out.write_str(if graph.directed { "digraph " } else { "graph " })?;
    if let Some(id) = &graph.id {
        write!(out, "{id} ")?;
    }
    Ok(())
}

fn write_block(f: &mut Formatter<'_>, stmts: &[Stmt]) -> fmt::Result {
    if stmts.is_empty() {
        return f.write_str("{ }");
    }
    f.write_str("{ ")?;
    for stmt in stmts {
        write!(f, "{stmt}; ")?;
    }
    f.write_str("}")
}

/// Renders a whole document, one statement per line, subgraphs indented by
/// `indent` spaces per nesting level.
pub fn render(graph: &Graph, indent: usize) -> String {
    let mut out = String::new();
    let _ = write_header(&mut out, graph);
    out.push_str("{\n");
    render_stmts(&mut out, &graph.stmts, indent, 1);
    out.push_str("}\n");
    out
}

fn render_stmts(out: &mut String, stmts: &[Stmt], indent: usize, depth: usize) {
    let pad = " ".repeat(indent * depth);
    for stmt in stmts {
        match stmt {
            Stmt::Subgraph(sg) => {
                out.push_str(&pad);
                out.push_str("subgraph ");
                if let Some(id) = &sg.id {
                    out.push_str(&id.to_string());
                    out.push(' ');
                }
                out.push_str("{\n");
                render_stmts(out, &sg.stmts, indent, depth + 1);
                out.push_str(&pad);
                out.push_str("}\n");
            }
            other => {
                out.push_str(&pad);
                out.push_str(&other.to_string());
                out.push_str(";\n");
            }
        }
    }
}
