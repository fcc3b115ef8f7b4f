use super::expr::{CompiledExpr, Expr};

/// A named rule: a name in `named_nodes` and the expression it evaluates.
///
/// Rules are created via [`RuleGraphBuilder`](super::RuleGraphBuilder) or by
/// loading a JSON document with [`RuleGraph::from_json()`](super::RuleGraph::from_json).
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: String,
    pub body: Expr,
}

/// A rule whose field paths and rule references have been resolved.
///
/// Compiled rules live in dependency order: every rule a rule references
/// sits at a smaller position in [`RuleGraph`](super::RuleGraph).
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) name: String,
    pub(crate) body: CompiledExpr,
}

impl CompiledRule {
    /// Indices of the rules this rule references, in first-use order.
    pub(crate) fn dependencies(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.body.walk(&mut |expr| {
            if let CompiledExpr::RuleRef(idx) = expr {
                if !out.contains(idx) {
                    out.push(*idx);
                }
            }
        });
        out
    }

    /// Every `(template name, argument count)` pair used by this rule.
    pub(crate) fn template_uses(&self) -> Vec<(&str, usize)> {
        let mut out = Vec::new();
        self.body.walk(&mut |expr| {
            if let CompiledExpr::Template { name, args } = expr {
                out.push((name.as_str(), args.len()));
            }
        });
        out
    }
}
