#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub strict: bool,
    pub directed: bool,
    pub id: Option<Id>,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Node(NodeStmt),
    Edge(EdgeStmt),
    Attr(AttrStmt),
    Assign(Attribute),
    Subgraph(Subgraph),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeStmt {
    pub vertex: Vertex,
    pub attrs: Vec<Attribute>,
}

/// An edge chain `a -> b -> c`: `from` is the first endpoint, `to` links the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStmt {
    pub from: Endpoint,
    pub to: EdgeRhs,
    pub attrs: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRhs {
    pub op: EdgeOp,
    pub vertex: Endpoint,
    pub to: Option<Box<EdgeRhs>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOp {
    Directed,
    Undirected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    Vertex(Vertex),
    Subgraph(Subgraph),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttrStmt {
    pub target: AttrTarget,
    pub attrs: Vec<Attribute>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrTarget {
    Graph,
    Node,
    Edge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subgraph {
    pub id: Option<Id>,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vertex {
    pub id: Id,
    pub port: Option<Port>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Port {
    pub id: Option<Id>,
    pub compass_point: Option<CompassPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompassPoint {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Center,
    Any,
}

impl CompassPoint {
    pub fn from_keyword(s: &str) -> Option<Self> {
        let point = match s {
            "n" => CompassPoint::North,
            "ne" => CompassPoint::NorthEast,
            "e" => CompassPoint::East,
            "se" => CompassPoint::SouthEast,
            "s" => CompassPoint::South,
            "sw" => CompassPoint::SouthWest,
            "w" => CompassPoint::West,
            "nw" => CompassPoint::NorthWest,
            "c" => CompassPoint::Center,
            "_" => CompassPoint::Any,
            _ => return None,
        };
        Some(point)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            CompassPoint::North => "n",
            CompassPoint::NorthEast => "ne",
            CompassPoint::East => "e",
            CompassPoint::SouthEast => "se",
            CompassPoint::South => "s",
            CompassPoint::SouthWest => "sw",
            CompassPoint::West => "w",
            CompassPoint::NorthWest => "nw",
            CompassPoint::Center => "c",
            CompassPoint::Any => "_",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub key: Id,
    pub value: Id,
}

impl Attribute {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: Id::new(key),
            value: Id::new(value),
        }
    }
}

/// A DOT identifier. Quoted text is stored unescaped; the renderer re-escapes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Id {
    Plain(String),
    Quoted(String),
    Html(String),
}

impl Id {
    /// Picks the bare form when `s` is a valid DOT identifier or numeral.
    pub fn new(s: &str) -> Self {
        if is_plain_identifier(s) || is_numeral(s) {
            Id::Plain(s.to_string())
        } else {
            Id::Quoted(s.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Id::Plain(s) | Id::Quoted(s) | Id::Html(s) => s,
        }
    }
}

fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || !c.is_ascii())
        && !is_keyword(s)
}

fn is_numeral(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || digits == "." {
        return false;
    }
    let mut seen_dot = false;
    digits.chars().all(|c| match c {
        '0'..='9' => true,
        '.' if !seen_dot => {
            seen_dot = true;
            true
        }
        _ => false,
    })
}

pub fn is_keyword(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "strict" | "graph" | "digraph" | "node" | "edge" | "subgraph"
    )
}
