use std::collections::BTreeMap;

use regex::Regex;
use tracing::info;

use crate::dot_ast::Id;
use crate::error::{Error, Result};
use crate::graph::DotGraph;

/// A string predicate: a compiled pattern, optionally negated.
#[derive(Debug, Clone)]
pub enum Matcher {
    Pattern(Regex),
    Not(Box<Matcher>),
}

impl Matcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Matcher::Pattern(re))
    }

    pub fn negate(self) -> Self {
        Matcher::Not(Box::new(self))
    }

    pub fn is_match(&self, s: &str) -> bool {
        match self {
            Matcher::Pattern(re) => re.is_match(s),
            Matcher::Not(inner) => !inner.is_match(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Include,
    Exclude,
}

impl Direction {
    pub fn from_keyword(s: &str) -> Result<Self> {
        match s {
            "" | "include" => Ok(Direction::Include),
            "exclude" => Ok(Direction::Exclude),
            other => Err(Error::UnknownDirection(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAction {
    Remove,
    Hide,
    ModAttr(BTreeMap<String, String>),
}

#[derive(Debug, Clone)]
pub struct NodeRule {
    pub matcher: Matcher,
    pub action: NodeAction,
}

impl NodeRule {
    pub fn new(matcher: Matcher, action: NodeAction) -> Self {
        Self { matcher, action }
    }
}

/// Applies each rule in order to every node present when that rule starts.
pub fn apply_rules(graph: &mut DotGraph, rules: &[NodeRule]) {
    for rule in rules {
        for idx in graph.nodes() {
            let Some(node) = graph.node(idx) else {
                continue;
            };
            if !rule.matcher.is_match(&node.name) {
                continue;
            }
            let name = node.name.clone();

            match &rule.action {
                NodeAction::Remove => {
                    info!(node = %name, "remove");
                    graph.remove_node(idx);
                }
                NodeAction::Hide => {
                    info!(node = %name, "hide");
                    graph.hide_node(idx);
                }
                NodeAction::ModAttr(attrs) => {
                    if let Some(node) = graph.node_mut(idx) {
                        for (k, v) in attrs {
                            node.attrs.insert(k.clone(), Id::new(v));
                        }
                    }
                }
            }
        }
    }
}
