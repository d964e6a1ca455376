pub mod config;
pub mod dot_ast;
pub mod dot_parser;
pub mod dot_renderer;
pub mod error;
pub mod filter;
pub mod graph;
pub mod key_path;
pub mod rule;
pub mod walker;

pub use config::{Config, Representation, Shortcuts};
pub use error::{Error, Result};

use filter::TreeRuleSet;
use graph::DotGraph;
use rule::NodeRule;

pub const ROOT_GRAPH_ID: &str = "root";
pub const GRAPH_INDENT: usize = 2;

pub fn filter_graph(input: &str, rules: &[NodeRule]) -> Result<String> {
    let doc = dot_parser::parse_dot(input)?;
    let mut graph = DotGraph::from_document(&doc);
    rule::apply_rules(&mut graph, rules);
    Ok(dot_renderer::render(
        &graph.to_document(ROOT_GRAPH_ID),
        GRAPH_INDENT,
    ))
}

pub fn filter_tree(input: &str, rules: &TreeRuleSet, indent: usize) -> Result<String> {
    let mut doc = dot_parser::parse_dot(input)?;
    walker::rewrite(&mut doc, rules);
    Ok(dot_renderer::render(&doc, indent))
}

/// Rules are built before `input` is parsed.
pub fn run(input: &str, config: &Config, repr: Representation, indent: usize) -> Result<String> {
    match repr {
        Representation::Graph => {
            let rules = config.node_rules()?;
            filter_graph(input, &rules)
        }
        Representation::Tree => {
            let rules = config.tree_rules()?;
            filter_tree(input, &rules, indent)
        }
    }
}
