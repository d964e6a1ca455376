use tracing::debug;

use crate::dot_ast::{Attribute, Stmt};
use crate::error::{Error, Result};
use crate::key_path::{Resolve, split_key};
use crate::rule::Matcher;

#[derive(Debug, Clone)]
pub enum Filter {
    Include { key: Vec<String>, matcher: Matcher },
    Exclude(Box<Filter>),
    NodeOnly(Box<Filter>),
    EdgeOnly(Box<Filter>),
}

impl Filter {
    pub fn include(key: &str, pattern: &str) -> Result<Self> {
        Ok(Filter::Include {
            key: split_key(key),
            matcher: Matcher::new(pattern)?,
        })
    }

    pub fn exclude(self) -> Self {
        Filter::Exclude(Box::new(self))
    }

    pub fn node_only(self) -> Self {
        Filter::NodeOnly(Box::new(self))
    }

    pub fn edge_only(self) -> Self {
        Filter::EdgeOnly(Box::new(self))
    }

    // First token ends up innermost.
    pub fn wrap_expr(self, expr: &str) -> Result<Self> {
        expr.split('.')
            .filter(|token| !token.is_empty())
            .try_fold(self, |filter, token| match token {
                "node" => Ok(filter.node_only()),
                "edge" => Ok(filter.edge_only()),
                "exclude" => Ok(filter.exclude()),
                other => Err(Error::UnknownFilterExpr(other.to_string())),
            })
    }

    pub fn matches(&self, stmt: &Stmt) -> bool {
        match self {
            Filter::Include { key, matcher } => matcher.is_match(&stmt.resolve(key)),
            Filter::Exclude(inner) => !inner.matches(stmt),
            Filter::NodeOnly(inner) => matches!(stmt, Stmt::Node(_)) && inner.matches(stmt),
            Filter::EdgeOnly(inner) => matches!(stmt, Stmt::Edge(_)) && inner.matches(stmt),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Keep,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TreeAction {
    Delete,
    ModAttr(Vec<Attribute>),
}

#[derive(Debug, Clone)]
pub struct TreeRule {
    pub filter: Filter,
    pub action: TreeAction,
}

impl TreeRule {
    pub fn new(filter: Filter, action: TreeAction) -> Self {
        Self { filter, action }
    }

    pub fn apply(&self, stmt: &mut Stmt) -> Outcome {
        if !self.filter.matches(stmt) {
            return Outcome::Keep;
        }

        match &self.action {
            TreeAction::Delete => {
                debug!(stmt = %stmt, "delete");
                Outcome::Delete
            }
            TreeAction::ModAttr(attrs) => {
                let target = match stmt {
                    Stmt::Node(n) => &mut n.attrs,
                    Stmt::Edge(e) => &mut e.attrs,
                    Stmt::Attr(_) | Stmt::Assign(_) | Stmt::Subgraph(_) => return Outcome::Keep,
                };
                target.extend(attrs.iter().cloned());
                debug!(stmt = %stmt, "append attributes");
                Outcome::Keep
            }
        }
    }
}

/// Rules applied in order as one composite; the first deletion wins.
#[derive(Debug, Clone, Default)]
pub struct TreeRuleSet {
    rules: Vec<TreeRule>,
}

impl TreeRuleSet {
    pub fn new(rules: Vec<TreeRule>) -> Self {
        Self { rules }
    }

    pub fn apply(&self, stmt: &mut Stmt) -> Outcome {
        for rule in &self.rules {
            if rule.apply(stmt) == Outcome::Delete {
                return Outcome::Delete;
            }
        }
        Outcome::Keep
    }
}
