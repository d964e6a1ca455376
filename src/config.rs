use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::dot_ast::Attribute;
use crate::error::{Error, Result};
use crate::filter::{Filter, TreeAction, TreeRule, TreeRuleSet};
use crate::rule::{Direction, Matcher, NodeAction, NodeRule};

pub const ACTION_REMOVE: &str = "REMOVE";
pub const ACTION_HIDE: &str = "HIDE";
pub const ACTION_DELETE: &str = "DELETE";
pub const ACTION_MOD_ATTR: &str = "MOD_ATTR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Graph,
    Tree,
}

/// Rule configuration, as read from a TOML file with `[[rule]]` tables.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub keyword: String,
    #[serde(default, rename = "attr")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub filter: Option<FilterConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub expr: String,
}

#[derive(Debug, Clone, Default)]
pub struct Shortcuts {
    pub only: Option<String>,
    pub remove: Option<String>,
    pub show: Option<String>,
    pub hide: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Appends one rule per given shortcut, in `only`, `remove`, `show`,
    /// `hide` order. In tree mode `only` and `remove` delete node statements
    /// by id.
    pub fn push_shortcuts(&mut self, shortcuts: &Shortcuts, repr: Representation) {
        let entries = [
            (&shortcuts.only, ACTION_REMOVE, "exclude"),
            (&shortcuts.remove, ACTION_REMOVE, "include"),
            (&shortcuts.show, ACTION_HIDE, "exclude"),
            (&shortcuts.hide, ACTION_HIDE, "include"),
        ];
        for (keyword, action, direction) in entries {
            let Some(keyword) = keyword.as_deref().filter(|k| !k.is_empty()) else {
                continue;
            };
            let rule = match (repr, action) {
                (Representation::Tree, ACTION_REMOVE) => RuleConfig {
                    action: ACTION_DELETE.to_string(),
                    filter: Some(FilterConfig {
                        key: "id".to_string(),
                        keyword: keyword.to_string(),
                        expr: match direction {
                            "exclude" => "exclude.node",
                            _ => "node",
                        }
                        .to_string(),
                    }),
                    ..RuleConfig::default()
                },
                _ => RuleConfig {
                    action: action.to_string(),
                    direction: direction.to_string(),
                    keyword: keyword.to_string(),
                    ..RuleConfig::default()
                },
            };
            self.rules.push(rule);
        }
    }

    pub fn node_rules(&self) -> Result<Vec<NodeRule>> {
        self.rules.iter().map(RuleConfig::node_rule).collect()
    }

    pub fn tree_rules(&self) -> Result<TreeRuleSet> {
        let rules = self
            .rules
            .iter()
            .map(RuleConfig::tree_rule)
            .collect::<Result<Vec<_>>>()?;
        Ok(TreeRuleSet::new(rules))
    }
}

impl RuleConfig {
    pub fn matcher(&self) -> Result<Matcher> {
        let matcher = Matcher::new(&self.keyword)?;
        match Direction::from_keyword(&self.direction)? {
            Direction::Include => Ok(matcher),
            Direction::Exclude => Ok(matcher.negate()),
        }
    }

    pub fn node_action(&self) -> Result<NodeAction> {
        match self.action.as_str() {
            ACTION_REMOVE => Ok(NodeAction::Remove),
            ACTION_HIDE => Ok(NodeAction::Hide),
            ACTION_MOD_ATTR => Ok(NodeAction::ModAttr(self.attrs.clone())),
            other => Err(Error::UnknownAction(other.to_string())),
        }
    }

    pub fn node_rule(&self) -> Result<NodeRule> {
        let matcher = self.matcher()?;
        let action = self.node_action()?;
        Ok(NodeRule::new(matcher, action))
    }

    pub fn filter(&self) -> Result<Filter> {
        let filter = match &self.filter {
            Some(fc) => Filter::include(&fc.key, &fc.keyword)?.wrap_expr(&fc.expr)?,
            None => Filter::include("", &self.keyword)?,
        };
        match Direction::from_keyword(&self.direction)? {
            Direction::Include => Ok(filter),
            Direction::Exclude => Ok(filter.exclude()),
        }
    }

    pub fn tree_action(&self) -> Result<TreeAction> {
        match self.action.as_str() {
            ACTION_DELETE => Ok(TreeAction::Delete),
            ACTION_MOD_ATTR => Ok(TreeAction::ModAttr(
                self.attrs
                    .iter()
                    .map(|(k, v)| Attribute::new(k, v))
                    .collect(),
            )),
            other => Err(Error::UnknownAction(other.to_string())),
        }
    }

    pub fn tree_rule(&self) -> Result<TreeRule> {
        let filter = self.filter()?;
        let action = self.tree_action()?;
        Ok(TreeRule::new(filter, action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
[[rule]]
action = "HIDE"
keyword = "^internal_"

[[rule]]
action = "MOD_ATTR"
direction = "exclude"
keyword = "^core"
[rule.attr]
color = "red"
style = "dashed"

[[rule]]
action = "DELETE"
[rule.filter]
key = "from.id"
keyword = "^a$"
expr = "edge"
"#;

    #[test]
    fn parse_rule_tables() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.rules.len(), 3);
        assert_eq!(config.rules[0].action, "HIDE");
        assert_eq!(config.rules[0].direction, "");
        assert_eq!(config.rules[1].attrs.get("style").map(String::as_str), Some("dashed"));
        assert_eq!(
            config.rules[2].filter,
            Some(FilterConfig {
                key: "from.id".to_string(),
                keyword: "^a$".to_string(),
                expr: "edge".to_string(),
            })
        );
    }

    #[test]
    fn empty_config_has_no_rules() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.rules.is_empty());
    }

    #[test]
    fn node_rules_reject_tree_actions() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert!(matches!(
            config.node_rules(),
            Err(Error::UnknownAction(a)) if a == "DELETE"
        ));
    }

    #[test]
    fn tree_rules_reject_graph_actions() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert!(matches!(
            config.tree_rules(),
            Err(Error::UnknownAction(a)) if a == "HIDE"
        ));
    }

    #[test]
    fn node_rule_direction() {
        let rule = RuleConfig {
            action: "REMOVE".to_string(),
            direction: "exclude".to_string(),
            keyword: "^keep".to_string(),
            ..RuleConfig::default()
        }
        .node_rule()
        .unwrap();
        assert_eq!(rule.action, NodeAction::Remove);
        assert!(rule.matcher.is_match("drop"));
        assert!(!rule.matcher.is_match("keep_me"));
    }

    #[test]
    fn unknown_direction_is_rejected() {
        let rc = RuleConfig {
            action: "REMOVE".to_string(),
            direction: "both".to_string(),
            keyword: "x".to_string(),
            ..RuleConfig::default()
        };
        assert!(matches!(rc.node_rule(), Err(Error::UnknownDirection(d)) if d == "both"));
        assert!(matches!(rc.tree_rule(), Err(Error::UnknownDirection(d)) if d == "both"));
    }

    #[test]
    fn pattern_errors_come_before_action_errors() {
        let rc = RuleConfig {
            action: "EXPLODE".to_string(),
            keyword: "(".to_string(),
            ..RuleConfig::default()
        };
        assert!(matches!(rc.node_rule(), Err(Error::InvalidPattern { .. })));
    }

    #[test]
    fn tree_mod_attr_appends_in_key_order() {
        let rc = RuleConfig {
            action: "MOD_ATTR".to_string(),
            keyword: ".".to_string(),
            attrs: BTreeMap::from([
                ("z".to_string(), "1".to_string()),
                ("a".to_string(), "2".to_string()),
            ]),
            ..RuleConfig::default()
        };
        assert_eq!(
            rc.tree_action().unwrap(),
            TreeAction::ModAttr(vec![Attribute::new("a", "2"), Attribute::new("z", "1")])
        );
    }

    #[test]
    fn shortcuts_expand_in_fixed_order() {
        let mut config = Config::default();
        let shortcuts = Shortcuts {
            only: Some("o".to_string()),
            remove: Some("r".to_string()),
            show: Some("s".to_string()),
            hide: Some("h".to_string()),
        };
        config.push_shortcuts(&shortcuts, Representation::Graph);
        let summary: Vec<(&str, &str, &str)> = config
            .rules
            .iter()
            .map(|r| (r.action.as_str(), r.direction.as_str(), r.keyword.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("REMOVE", "exclude", "o"),
                ("REMOVE", "include", "r"),
                ("HIDE", "exclude", "s"),
                ("HIDE", "include", "h"),
            ]
        );
    }

    #[test]
    fn shortcuts_delete_nodes_by_id_in_tree_mode() {
        let mut config = Config::default();
        let shortcuts = Shortcuts {
            only: Some("^keep".to_string()),
            remove: Some("r".to_string()),
            hide: Some(String::new()),
            ..Shortcuts::default()
        };
        config.push_shortcuts(&shortcuts, Representation::Tree);
        let summary: Vec<(&str, &str, Option<&FilterConfig>)> = config
            .rules
            .iter()
            .map(|r| (r.action.as_str(), r.direction.as_str(), r.filter.as_ref()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (
                    "DELETE",
                    "",
                    Some(&FilterConfig {
                        key: "id".to_string(),
                        keyword: "^keep".to_string(),
                        expr: "exclude.node".to_string(),
                    })
                ),
                (
                    "DELETE",
                    "",
                    Some(&FilterConfig {
                        key: "id".to_string(),
                        keyword: "r".to_string(),
                        expr: "node".to_string(),
                    })
                ),
            ]
        );
        assert!(config.tree_rules().is_ok());
    }
}
