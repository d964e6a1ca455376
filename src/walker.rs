use std::mem;

use crate::dot_ast::{Graph, Stmt};
use crate::error::{Error, Result};
use crate::filter::{Outcome, TreeRuleSet};

/// Depth-first; the document itself is never matched.
pub fn rewrite(graph: &mut Graph, rules: &TreeRuleSet) {
    visit_children(&mut graph.stmts, rules);
}

pub fn rewrite_stmt(stmt: &mut Stmt, rules: &TreeRuleSet) -> Result<()> {
    match visit(stmt, rules) {
        Outcome::Keep => Ok(()),
        Outcome::Delete => Err(Error::DeletionOutsideContainer),
    }
}

fn visit(stmt: &mut Stmt, rules: &TreeRuleSet) -> Outcome {
    if rules.apply(stmt) == Outcome::Delete {
        return Outcome::Delete;
    }
    if let Stmt::Subgraph(sg) = stmt {
        visit_children(&mut sg.stmts, rules);
    }
    Outcome::Keep
}

fn visit_children(stmts: &mut Vec<Stmt>, rules: &TreeRuleSet) {
    let mut kept = Vec::with_capacity(stmts.len());
    for mut stmt in mem::take(stmts) {
        match visit(&mut stmt, rules) {
            Outcome::Keep => kept.push(stmt),
            Outcome::Delete => {}
        }
    }
    *stmts = kept;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dot_ast::Attribute;
    use crate::dot_parser::parse_dot;
    use crate::dot_renderer::render;
    use crate::filter::{Filter, TreeAction, TreeRule};
    use pretty_assertions::assert_eq;

    fn delete(key: &str, pattern: &str) -> TreeRule {
        TreeRule::new(Filter::include(key, pattern).unwrap(), TreeAction::Delete)
    }

    #[test]
    fn deletes_matching_node_inside_subgraph() {
        let mut graph = parse_dot("digraph { subgraph s { X [label=foo]; Y [label=bar] } }").unwrap();
        let rules = TreeRuleSet::new(vec![TreeRule::new(
            Filter::include("id", "^X$").unwrap().node_only(),
            TreeAction::Delete,
        )]);
        rewrite(&mut graph, &rules);
        assert_eq!(graph.to_string(), "digraph { subgraph s { Y [label=bar]; }; }");
    }

    #[test]
    fn deletion_keeps_sibling_order_and_visits_later_siblings() {
        let mut graph = parse_dot("digraph { A; B; subgraph C { c1; c2 }; D }").unwrap();
        let rules = TreeRuleSet::new(vec![
            delete("id", "^B$"),
            delete("id", "^c1$"),
        ]);
        rewrite(&mut graph, &rules);
        assert_eq!(graph.to_string(), "digraph { A; subgraph C { c2; }; D; }");
    }

    #[test]
    fn consecutive_deletions() {
        let mut graph = parse_dot("digraph { a1; a2; a3; b; a4 }").unwrap();
        let rules = TreeRuleSet::new(vec![TreeRule::new(
            Filter::include("id", "^a").unwrap().node_only(),
            TreeAction::Delete,
        )]);
        rewrite(&mut graph, &rules);
        assert_eq!(graph.to_string(), "digraph { b; }");
    }

    #[test]
    fn deleted_subgraph_takes_its_children() {
        let mut graph = parse_dot("digraph { subgraph drop_me { x; y }; z }").unwrap();
        let rules = TreeRuleSet::new(vec![delete("id", "^drop_me$")]);
        rewrite(&mut graph, &rules);
        assert_eq!(graph.to_string(), "digraph { z; }");
    }

    #[test]
    fn no_matching_rules_leaves_document_unchanged() {
        let src = "digraph G { rankdir=LR; node [shape=box]; a -> b [x=1]; subgraph s { c:p:n } }";
        let mut graph = parse_dot(src).unwrap();
        let before = graph.clone();
        let rules = TreeRuleSet::new(vec![
            delete("id", "^nothing$"),
            TreeRule::new(
                Filter::include("from", "^zzz$").unwrap().edge_only(),
                TreeAction::ModAttr(vec![Attribute::new("color", "red")]),
            ),
        ]);
        rewrite(&mut graph, &rules);
        assert_eq!(graph, before);
    }

    #[test]
    fn document_is_never_matched() {
        let mut graph = parse_dot("digraph { a; b }").unwrap();
        let rules = TreeRuleSet::new(vec![TreeRule::new(
            Filter::include("id", "^a$").unwrap().exclude(),
            TreeAction::Delete,
        )]);
        rewrite(&mut graph, &rules);
        assert_eq!(graph.to_string(), "digraph { a; }");
    }

    #[test]
    fn rewrite_stmt_filters_subgraph_children() {
        let mut graph = parse_dot("digraph { subgraph s { x; y } }").unwrap();
        let rules = TreeRuleSet::new(vec![delete("id", "^x$")]);
        rewrite_stmt(&mut graph.stmts[0], &rules).unwrap();
        assert_eq!(graph.stmts[0].to_string(), "subgraph s { y; }");
    }

    #[test]
    fn deleting_a_detached_statement_is_an_error() {
        let mut graph = parse_dot("digraph { subgraph s { x } }").unwrap();
        let rules = TreeRuleSet::new(vec![delete("id", "^s$")]);
        let err = rewrite_stmt(&mut graph.stmts[0], &rules).unwrap_err();
        assert!(matches!(err, Error::DeletionOutsideContainer));
    }

    #[test]
    fn mod_attr_applies_through_nested_subgraphs() {
        let mut graph = parse_dot("digraph { subgraph s { a -> b [style=bold] } a -> c }").unwrap();
        let rules = TreeRuleSet::new(vec![TreeRule::new(
            Filter::include("from", "^a$").unwrap().edge_only(),
            TreeAction::ModAttr(vec![Attribute::new("color", "red")]),
        )]);
        rewrite(&mut graph, &rules);
        let expected = "\
digraph {
  subgraph s {
    a -> b [style=bold, color=red];
  }
  a -> c [color=red];
}
";
        assert_eq!(render(&graph, 2), expected);
    }
}
