use winnow::prelude::*;
use winnow::ascii::{Caseless, digit0, digit1, multispace1, till_line_ending};
use winnow::combinator::{alt, eof, not, opt, preceded, repeat, terminated};
use winnow::error::{ContextError, ParserError};
use winnow::token::{any, one_of, take_till, take_until, take_while};

use crate::dot_ast::*;
use crate::error::{Error, Result};

pub fn parse_dot(input: &str) -> Result<Graph> {
    let mut input = input;
    graph(&mut input).map_err(|_| {
        let context = input.trim_start().lines().next().unwrap_or("").trim();
        let context_display = if context.chars().count() > 40 {
            format!("{}...", context.chars().take(40).collect::<String>())
        } else {
            context.to_string()
        };
        Error::Parse(format!("syntax error in dot graph: unexpected `{context_display}`"))
    })
}

fn graph(input: &mut &str) -> winnow::Result<Graph> {
    let strict = opt(keyword("strict")).parse_next(input)?.is_some();
    let directed = alt((
        keyword("digraph").value(true),
        keyword("graph").value(false),
    ))
    .parse_next(input)?;
    let id = opt(id).parse_next(input)?;
    let stmts = block.parse_next(input)?;
    ws.parse_next(input)?;
    eof.parse_next(input)?;

    Ok(Graph {
        strict,
        directed,
        id,
        stmts,
    })
}

/// Whitespace, `//` and `/* */` comments, and `#` preprocessor lines.
fn ws(input: &mut &str) -> winnow::Result<()> {
    repeat(
        0..,
        alt((
            multispace1.void(),
            ("//", till_line_ending).void(),
            ("#", till_line_ending).void(),
            ("/*", take_until(0.., "*/"), "*/").void(),
        )),
    )
    .parse_next(input)
}

fn sym<'s>(literal: &'static str) -> impl Parser<&'s str, &'s str, ContextError> {
    preceded(ws, literal)
}

fn keyword<'s>(kw: &'static str) -> impl Parser<&'s str, &'s str, ContextError> {
    preceded(ws, terminated(Caseless(kw), not(one_of(is_ident_char))))
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || !c.is_ascii()
}

fn block(input: &mut &str) -> winnow::Result<Vec<Stmt>> {
    sym("{").parse_next(input)?;
    separators.parse_next(input)?;
    let stmts = repeat(0.., terminated(stmt, separators)).parse_next(input)?;
    sym("}").parse_next(input)?;
    Ok(stmts)
}

fn separators(input: &mut &str) -> winnow::Result<()> {
    repeat(0.., sym(";")).parse_next(input)
}

fn stmt(input: &mut &str) -> winnow::Result<Stmt> {
    alt((
        attr_stmt.map(Stmt::Attr),
        subgraph_or_edge,
        assign.map(Stmt::Assign),
        vertex_or_edge,
    ))
    .parse_next(input)
}

fn subgraph_or_edge(input: &mut &str) -> winnow::Result<Stmt> {
    let sg = subgraph.parse_next(input)?;
    edge_tail(input, Endpoint::Subgraph(sg))
}

fn vertex_or_edge(input: &mut &str) -> winnow::Result<Stmt> {
    let vertex = vertex.parse_next(input)?;
    edge_tail(input, Endpoint::Vertex(vertex))
}

fn edge_tail(input: &mut &str, from: Endpoint) -> winnow::Result<Stmt> {
    let rhs = opt(edge_rhs).parse_next(input)?;
    let attrs = opt(attr_list).parse_next(input)?.unwrap_or_default();
    Ok(match (from, rhs) {
        (from, Some(to)) => Stmt::Edge(EdgeStmt { from, to, attrs }),
        (Endpoint::Vertex(vertex), None) => Stmt::Node(NodeStmt { vertex, attrs }),
        (Endpoint::Subgraph(sg), None) if attrs.is_empty() => Stmt::Subgraph(sg),
        (Endpoint::Subgraph(_), None) => return Err(ParserError::from_input(input)),
    })
}

fn attr_stmt(input: &mut &str) -> winnow::Result<AttrStmt> {
    let target = alt((
        keyword("graph").value(AttrTarget::Graph),
        keyword("node").value(AttrTarget::Node),
        keyword("edge").value(AttrTarget::Edge),
    ))
    .parse_next(input)?;
    let attrs = attr_list.parse_next(input)?;
    Ok(AttrStmt { target, attrs })
}

fn assign(input: &mut &str) -> winnow::Result<Attribute> {
    attribute.parse_next(input)
}

fn edge_rhs(input: &mut &str) -> winnow::Result<EdgeRhs> {
    let op = edge_op.parse_next(input)?;
    let vertex = endpoint.parse_next(input)?;
    let to = opt(edge_rhs).parse_next(input)?.map(Box::new);
    Ok(EdgeRhs { op, vertex, to })
}

fn edge_op(input: &mut &str) -> winnow::Result<EdgeOp> {
    preceded(
        ws,
        alt(("->".value(EdgeOp::Directed), "--".value(EdgeOp::Undirected))),
    )
    .parse_next(input)
}

fn endpoint(input: &mut &str) -> winnow::Result<Endpoint> {
    alt((
        subgraph.map(Endpoint::Subgraph),
        vertex.map(Endpoint::Vertex),
    ))
    .parse_next(input)
}

fn subgraph(input: &mut &str) -> winnow::Result<Subgraph> {
    let id = opt(preceded(keyword("subgraph"), opt(id)))
        .parse_next(input)?
        .flatten();
    let stmts = block.parse_next(input)?;
    Ok(Subgraph { id, stmts })
}

fn vertex(input: &mut &str) -> winnow::Result<Vertex> {
    let id = id.parse_next(input)?;
    let port = opt(port).parse_next(input)?;
    Ok(Vertex { id, port })
}

fn port(input: &mut &str) -> winnow::Result<Port> {
    sym(":").parse_next(input)?;
    let first = id.parse_next(input)?;
    let second = opt(preceded(sym(":"), id)).parse_next(input)?;

    match second {
        Some(cp) => match CompassPoint::from_keyword(cp.as_str()) {
            Some(compass_point) => Ok(Port {
                id: Some(first),
                compass_point: Some(compass_point),
            }),
            None => Err(ParserError::from_input(input)),
        },
        None => match (&first, CompassPoint::from_keyword(first.as_str())) {
            (Id::Plain(_), Some(compass_point)) => Ok(Port {
                id: None,
                compass_point: Some(compass_point),
            }),
            _ => Ok(Port {
                id: Some(first),
                compass_point: None,
            }),
        },
    }
}

fn attr_list(input: &mut &str) -> winnow::Result<Vec<Attribute>> {
    let lists: Vec<Vec<Attribute>> = repeat(1.., bracketed_attrs).parse_next(input)?;
    Ok(lists.into_iter().flatten().collect())
}

fn bracketed_attrs(input: &mut &str) -> winnow::Result<Vec<Attribute>> {
    sym("[").parse_next(input)?;
    let attrs = repeat(0.., terminated(attribute, opt(alt((sym(";"), sym(",")))))).parse_next(input)?;
    sym("]").parse_next(input)?;
    Ok(attrs)
}

fn attribute(input: &mut &str) -> winnow::Result<Attribute> {
    let key = id.parse_next(input)?;
    sym("=").parse_next(input)?;
    let value = id.parse_next(input)?;
    Ok(Attribute { key, value })
}

fn id(input: &mut &str) -> winnow::Result<Id> {
    ws.parse_next(input)?;
    alt((quoted_id, html_id, numeral_id, plain_id)).parse_next(input)
}

fn plain_id(input: &mut &str) -> winnow::Result<Id> {
    (one_of(is_ident_start), take_while(0.., is_ident_char))
        .take()
        .verify(|s: &str| !is_keyword(s))
        .map(|s: &str| Id::Plain(s.to_string()))
        .parse_next(input)
}

fn numeral_id(input: &mut &str) -> winnow::Result<Id> {
    (
        opt('-'),
        alt((('.', digit1).void(), (digit1, opt(('.', digit0))).void())),
    )
        .take()
        .map(|s: &str| Id::Plain(s.to_string()))
        .parse_next(input)
}

fn quoted_id(input: &mut &str) -> winnow::Result<Id> {
    '"'.parse_next(input)?;
    let mut text = String::new();
    loop {
        let chunk = take_till(0.., ['"', '\\']).parse_next(input)?;
        text.push_str(chunk);
        if any.parse_next(input)? == '"' {
            break;
        }
        match any.parse_next(input)? {
            '"' => text.push('"'),
            '\n' => {}
            other => {
                text.push('\\');
                text.push(other);
            }
        }
    }
    Ok(Id::Quoted(text))
}

fn html_id(input: &mut &str) -> winnow::Result<Id> {
    '<'.parse_next(input)?;
    let mut text = String::new();
    let mut depth = 1;
    loop {
        let c = any.parse_next(input)?;
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
        text.push(c);
    }
    Ok(Id::Html(text))
}
