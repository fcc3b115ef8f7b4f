use std::time::Instant;

use crate::config::MAX_EVAL_DEPTH;
use crate::types::{CompiledExpr, CompiledRule};
use crate::{Context, EvalError, EvaluationReport, RuleGraph, StringTable, Value};

/// Evaluate the rule at `index` of `graph` against `ctx`.
pub(crate) fn evaluate(
    graph: &RuleGraph,
    strings: &StringTable,
    budget: usize,
    index: usize,
    ctx: &Context<'_>,
) -> Result<Option<Value>, EvalError> {
    Evaluator::new(&graph.rules, strings, budget).eval_rule(index, ctx)
}

/// Evaluate a compiled free-standing expression against `ctx`.
pub(crate) fn evaluate_expr(
    graph: &RuleGraph,
    strings: &StringTable,
    budget: usize,
    expr: &CompiledExpr,
    ctx: &Context<'_>,
) -> Result<Option<Value>, EvalError> {
    Evaluator::new(&graph.rules, strings, budget).eval(expr, ctx)
}

pub(crate) fn evaluate_detailed(
    graph: &RuleGraph,
    strings: &StringTable,
    budget: usize,
    index: usize,
    ctx: &Context<'_>,
) -> Result<EvaluationReport, EvalError> {
    let start = Instant::now();
    let mut evaluator = Evaluator::new(&graph.rules, strings, budget);
    evaluator.trace = Some(Vec::new());
    let output = evaluator.eval_rule(index, ctx)?;
    let duration = start.elapsed();
    Ok(EvaluationReport::new(
        output,
        evaluator.trace.unwrap_or_default(),
        evaluator.steps,
        duration,
    ))
}

/// Recursive interpreter over compiled expressions. Holds no state besides
/// the step counter, the current nesting depth and the optional call trace;
/// the context is passed down explicitly.
struct Evaluator<'g> {
    rules: &'g [CompiledRule],
    strings: &'g StringTable,
    budget: usize,
    steps: usize,
    depth: usize,
    trace: Option<Vec<String>>,
}

fn truthy(value: Option<&Value>) -> bool {
    value.is_some_and(Value::is_truthy)
}

fn non_empty(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_empty())
}

impl<'g> Evaluator<'g> {
    fn new(rules: &'g [CompiledRule], strings: &'g StringTable, budget: usize) -> Self {
        Self {
            rules,
            strings,
            budget,
            steps: 0,
            depth: 0,
            trace: None,
        }
    }

    fn step(&mut self) -> Result<(), EvalError> {
        self.steps += 1;
        if self.steps > self.budget {
            return Err(EvalError::StepBudgetExceeded {
                budget: self.budget,
            });
        }
        Ok(())
    }

    fn eval_rule(&mut self, index: usize, ctx: &Context<'_>) -> Result<Option<Value>, EvalError> {
        let rules = self.rules;
        let rule = rules.get(index).ok_or_else(|| EvalError::UndefinedRule {
            name: format!("#{index}"),
        })?;
        tracing::trace!(rule = %rule.name, "evaluating rule");
        if let Some(trace) = self.trace.as_mut() {
            trace.push(rule.name.clone());
        }
        self.eval(&rule.body, ctx)
    }

    fn eval(&mut self, expr: &CompiledExpr, ctx: &Context<'_>) -> Result<Option<Value>, EvalError> {
        self.step()?;
        if self.depth >= MAX_EVAL_DEPTH {
            return Err(EvalError::DepthExceeded {
                limit: MAX_EVAL_DEPTH,
            });
        }
        self.depth += 1;
        let value = self.eval_node(expr, ctx);
        self.depth -= 1;
        value
    }

    fn eval_node(
        &mut self,
        expr: &CompiledExpr,
        ctx: &Context<'_>,
    ) -> Result<Option<Value>, EvalError> {
        let value = match expr {
            CompiledExpr::Text(text) => Some(Value::String(text.clone())),
            CompiledExpr::Bool(b) => Some(Value::Bool(*b)),
            CompiledExpr::Field(path) => ctx.read(path)?,
            CompiledExpr::RuleRef(idx) => self.eval_rule(*idx, ctx)?,
            CompiledExpr::Template { name, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    match non_empty(self.eval(arg, ctx)?) {
                        Some(v) => values.push(v),
                        None => return Ok(None),
                    }
                }
                Some(Value::String(self.strings.resolve(name, &values)?))
            }
            CompiledExpr::Compare { left, op, right } => {
                let left = self.eval(left, ctx)?;
                let right = self.eval(right, ctx)?;
                let result = match (&left, &right) {
                    (Some(l), Some(r)) => l.compare(*op, r),
                    _ => op.absent_result(left.is_none() && right.is_none()),
                };
                Some(Value::Bool(result))
            }
            CompiledExpr::And(a, b) => {
                let result =
                    truthy(self.eval(a, ctx)?.as_ref()) && truthy(self.eval(b, ctx)?.as_ref());
                Some(Value::Bool(result))
            }
            CompiledExpr::Or(a, b) => {
                let result =
                    truthy(self.eval(a, ctx)?.as_ref()) || truthy(self.eval(b, ctx)?.as_ref());
                Some(Value::Bool(result))
            }
            CompiledExpr::Not(inner) => Some(Value::Bool(!truthy(self.eval(inner, ctx)?.as_ref()))),
            CompiledExpr::If {
                condition,
                then,
                otherwise,
            } => {
                if truthy(self.eval(condition, ctx)?.as_ref()) {
                    self.eval(then, ctx)?
                } else if let Some(otherwise) = otherwise {
                    self.eval(otherwise, ctx)?
                } else {
                    None
                }
            }
            CompiledExpr::Fallback(items) => {
                let mut found = None;
                for item in items {
                    if let Some(v) = non_empty(self.eval(item, ctx)?) {
                        found = Some(v);
                        break;
                    }
                }
                found
            }
            CompiledExpr::Join { parts, separator } => {
                let mut pieces = Vec::new();
                for part in parts {
                    if let Some(v) = self.eval(part, ctx)? {
                        v.push_text(&mut pieces);
                    }
                }
                (!pieces.is_empty()).then(|| Value::String(pieces.join(separator)))
            }
            CompiledExpr::ForEachChild { collection, body } => {
                let actions = ctx.read_actions(*collection)?;
                let mut items = Vec::new();
                for action in &actions {
                    let child = ctx.with_action(action);
                    if let Some(v) = non_empty(self.eval(body, &child)?) {
                        items.push(v);
                    }
                }
                (!items.is_empty()).then_some(Value::List(items))
            }
            CompiledExpr::ForReference { field, body } => match ctx.read_action(*field)? {
                Some(action) => self.eval(body, &ctx.with_action(&action))?,
                None => None,
            },
            CompiledExpr::Switch { key, cases } => {
                let key = self.eval(key, ctx)?.and_then(|k| k.as_key());
                match key.and_then(|k| cases.get(&k)) {
                    Some(case) => self.eval(case, ctx)?,
                    None => None,
                }
            }
            CompiledExpr::ConditionalPrepend { prefix, value } => {
                match non_empty(self.eval(value, ctx)?) {
                    None => None,
                    Some(value) => {
                        let value = value.to_text();
                        let text = match non_empty(self.eval(prefix, ctx)?) {
                            Some(prefix) => format!("{} {value}", prefix.to_text()),
                            None => value,
                        };
                        Some(Value::String(text))
                    }
                }
            }
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        conditional_prepend, fallback, field, for_each_child, for_reference, join, rule_ref,
        switch, template, text, ActionId, ActionInfo, Expr, GlobalFlags, NodeField, NodeProvider,
        NodeSnapshot, RuleGraphBuilder, StaleContextError,
    };

    fn strings() -> StringTable {
        StringTable::new()
            .with("select", "Select")
            .and_then(|t| t.with("hint_clickable", "%1$s to activate."))
            .and_then(|t| t.with("long_press_to", "Long press to"))
            .and_then(|t| t.with("expand", "%1$s to expand."))
            .unwrap()
    }

    fn eval_with(
        builder: RuleGraphBuilder,
        rule: &str,
        node: &dyn NodeProvider,
        globals: &GlobalFlags,
    ) -> Result<Option<Value>, EvalError> {
        let graph = builder.compile().unwrap();
        let index = graph.rule_index(rule).unwrap();
        let ctx = Context::new(node, globals);
        evaluate(&graph, &strings(), 1_000, index, &ctx)
    }

    fn eval_one(body: Expr, node: &NodeSnapshot) -> Option<Value> {
        eval_with(
            RuleGraphBuilder::new().rule("r", body),
            "r",
            node,
            &GlobalFlags::new(),
        )
        .unwrap()
    }

    /// Fails every read, as a recycled platform node would.
    struct StaleNode;

    impl NodeProvider for StaleNode {
        fn field(&self, field: NodeField) -> Result<Option<Value>, StaleContextError> {
            Err(StaleContextError::new(field.name()))
        }
    }

    #[test]
    fn absent_field_is_no_result() {
        assert_eq!(eval_one(field("node.role"), &NodeSnapshot::new()), None);
        assert_eq!(eval_one(field("action.label"), &NodeSnapshot::new()), None);
    }

    #[test]
    fn conditional_without_else() {
        let body = field("node.isClickable").then(text("yes"));
        assert_eq!(eval_one(body.clone(), &NodeSnapshot::new()), None);
        assert_eq!(
            eval_one(body, &NodeSnapshot::new().clickable(true)),
            Some(Value::from("yes"))
        );
    }

    #[test]
    fn conditional_else_branch() {
        let body = field("node.isChecked").then(text("on")).otherwise(text("off"));
        assert_eq!(eval_one(body, &NodeSnapshot::new()), Some(Value::from("off")));
    }

    #[test]
    fn absent_condition_is_falsy() {
        let body = field("node.role").then(text("a")).otherwise(text("b"));
        assert_eq!(eval_one(body, &NodeSnapshot::new()), Some(Value::from("b")));
    }

    #[test]
    fn boolean_operators_produce_bools() {
        let node = NodeSnapshot::new().clickable(true);
        assert_eq!(
            eval_one(field("node.isClickable").and(field("node.role")), &node),
            Some(Value::Bool(false))
        );
        assert_eq!(
            eval_one(field("node.role").or(field("node.isClickable")), &node),
            Some(Value::Bool(true))
        );
        assert_eq!(eval_one(!field("node.role"), &node), Some(Value::Bool(true)));
    }

    #[test]
    fn comparisons() {
        let node = NodeSnapshot::new().role("pager");
        assert_eq!(
            eval_one(field("node.role").eq(text("pager")), &node),
            Some(Value::Bool(true))
        );
        assert_eq!(
            eval_one(field("node.role").neq(text("pager")), &node),
            Some(Value::Bool(false))
        );
        let plain = NodeSnapshot::new();
        assert_eq!(
            eval_one(field("node.role").eq(text("pager")), &plain),
            Some(Value::Bool(false))
        );
        assert_eq!(
            eval_one(field("node.role").neq(text("pager")), &plain),
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn fallback_first_non_empty() {
        let body = fallback(vec![field("node.role"), text(""), text("second"), text("third")]);
        assert_eq!(eval_one(body, &NodeSnapshot::new()), Some(Value::from("second")));
        assert_eq!(eval_one(fallback(vec![]), &NodeSnapshot::new()), None);
    }

    #[test]
    fn fallback_short_circuits() {
        let body = fallback(vec![text("first"), field("node.isEnabled")]);
        let result = eval_with(
            RuleGraphBuilder::new().rule("r", body),
            "r",
            &StaleNode,
            &GlobalFlags::new(),
        );
        assert_eq!(result, Ok(Some(Value::from("first"))));
    }

    #[test]
    fn stale_node_propagates() {
        let result = eval_with(
            RuleGraphBuilder::new().rule("r", field("node.isEnabled")),
            "r",
            &StaleNode,
            &GlobalFlags::new(),
        );
        assert!(matches!(result, Err(EvalError::Stale(e)) if e.field() == "isEnabled"));
    }

    #[test]
    fn join_skips_absent_and_empty() {
        let body = join(vec![text("a"), field("node.role"), text(""), text("b")]);
        assert_eq!(eval_one(body, &NodeSnapshot::new()), Some(Value::from("a b")));
        let empty = join(vec![field("node.role"), text("")]);
        assert_eq!(eval_one(empty, &NodeSnapshot::new()), None);
    }

    #[test]
    fn join_custom_separator() {
        let body = Expr::Join {
            parts: vec![text("a"), text("b")],
            separator: ", ".into(),
        };
        assert_eq!(eval_one(body, &NodeSnapshot::new()), Some(Value::from("a, b")));
    }

    #[test]
    fn for_each_child_collects_in_order() {
        let node = NodeSnapshot::new()
            .action(ActionInfo::custom(1, "Archive"))
            .action(ActionInfo::new(ActionId::Click))
            .action(ActionInfo::custom(2, "Pin"));
        let body = for_each_child("$node.actions", field("action.label"));
        assert_eq!(
            eval_one(body.clone(), &node),
            Some(Value::List(vec![Value::from("Archive"), Value::from("Pin")]))
        );
        assert_eq!(eval_one(body, &NodeSnapshot::new()), None);
    }

    #[test]
    fn join_flattens_iteration_results() {
        let node = NodeSnapshot::new()
            .action(ActionInfo::custom(1, "Archive"))
            .action(ActionInfo::custom(2, "Pin"));
        let body = join(vec![
            for_each_child("$node.customActions", field("action.label")),
            text("done"),
        ]);
        assert_eq!(eval_one(body, &node), Some(Value::from("Archive Pin done")));
    }

    #[test]
    fn referenced_rule_sees_bound_action() {
        let node = NodeSnapshot::new().action(ActionInfo::custom(7, "Share"));
        let builder = RuleGraphBuilder::new()
            .rule("label_of_action", field("action.label"))
            .rule(
                "r",
                for_each_child("$node.actions", rule_ref("label_of_action")),
            );
        let result = eval_with(builder, "r", &node, &GlobalFlags::new()).unwrap();
        assert_eq!(result, Some(Value::List(vec![Value::from("Share")])));
    }

    #[test]
    fn for_reference_binds_single_action() {
        let node = NodeSnapshot::new().action(ActionInfo::new(ActionId::LongClick).with_label("share"));
        let body = for_reference(
            "$node.actionLongClick",
            conditional_prepend(template("long_press_to", vec![]), field("action.label")),
        );
        assert_eq!(
            eval_one(body.clone(), &node),
            Some(Value::from("Long press to share"))
        );
        assert_eq!(eval_one(body, &NodeSnapshot::new()), None);
    }

    #[test]
    fn conditional_prepend_edge_cases() {
        let empty_value = conditional_prepend(text("prefix"), text(""));
        assert_eq!(eval_one(empty_value, &NodeSnapshot::new()), None);
        let no_prefix = conditional_prepend(field("node.role"), text("value"));
        assert_eq!(
            eval_one(no_prefix, &NodeSnapshot::new()),
            Some(Value::from("value"))
        );
    }

    #[test]
    fn switch_matches_and_misses() {
        let body = switch(
            field("action.id"),
            [("ACTION_EXPAND", template("expand", vec![rule_ref("label")]))],
        );
        let builder = || {
            RuleGraphBuilder::new()
                .rule("label", template("select", vec![]))
                .rule("r", for_each_child("$node.actions", body.clone()))
        };

        let expand = NodeSnapshot::new().action(ActionInfo::new(ActionId::Expand));
        assert_eq!(
            eval_with(builder(), "r", &expand, &GlobalFlags::new()).unwrap(),
            Some(Value::List(vec![Value::from("Select to expand.")]))
        );

        let dismiss = NodeSnapshot::new().action(ActionInfo::new(ActionId::Dismiss));
        assert_eq!(
            eval_with(builder(), "r", &dismiss, &GlobalFlags::new()).unwrap(),
            None
        );
    }

    #[test]
    fn template_with_absent_argument_is_no_result() {
        let body = template("hint_clickable", vec![field("node.role")]);
        assert_eq!(eval_one(body, &NodeSnapshot::new()), None);
    }

    #[test]
    fn template_errors() {
        let missing = eval_with(
            RuleGraphBuilder::new().rule("r", template("nope", vec![])),
            "r",
            &NodeSnapshot::new(),
            &GlobalFlags::new(),
        );
        assert!(matches!(missing, Err(EvalError::MissingTemplate { name }) if name == "nope"));

        let arity = eval_with(
            RuleGraphBuilder::new().rule("r", template("hint_clickable", vec![])),
            "r",
            &NodeSnapshot::new(),
            &GlobalFlags::new(),
        );
        assert!(matches!(arity, Err(EvalError::TemplateArity(_))));
    }

    #[test]
    fn global_flags_are_visible() {
        let globals = GlobalFlags::new().set("useAutoSelect", true);
        let result = eval_with(
            RuleGraphBuilder::new().rule(
                "r",
                field("global.useAutoSelect").then(text("auto")).otherwise(text("manual")),
            ),
            "r",
            &NodeSnapshot::new(),
            &globals,
        );
        assert_eq!(result, Ok(Some(Value::from("auto"))));
    }

    #[test]
    fn step_budget_trips() {
        let graph = RuleGraphBuilder::new()
            .rule("r", join(vec![text("a"); 50]))
            .compile()
            .unwrap();
        let node = NodeSnapshot::new();
        let globals = GlobalFlags::new();
        let ctx = Context::new(&node, &globals);
        let result = evaluate(&graph, &strings(), 10, 0, &ctx);
        assert_eq!(result, Err(EvalError::StepBudgetExceeded { budget: 10 }));
    }

    #[test]
    fn nesting_limit_is_a_typed_error() {
        let mut body = field("node.isClickable");
        for _ in 0..(MAX_EVAL_DEPTH + 10) {
            body = !body;
        }
        let graph = RuleGraphBuilder::new().rule("r", body).compile().unwrap();
        let node = NodeSnapshot::new();
        let globals = GlobalFlags::new();
        let ctx = Context::new(&node, &globals);
        let result = evaluate(&graph, &strings(), usize::MAX, 0, &ctx);
        assert_eq!(
            result,
            Err(EvalError::DepthExceeded {
                limit: MAX_EVAL_DEPTH
            })
        );
    }

    #[test]
    fn nesting_depth_unwinds_between_siblings() {
        let mut deep = field("node.isClickable");
        for _ in 0..(MAX_EVAL_DEPTH - 4) {
            deep = !deep;
        }
        let graph = RuleGraphBuilder::new()
            .rule("r", join(vec![deep.clone(), deep]))
            .compile()
            .unwrap();
        let node = NodeSnapshot::new();
        let globals = GlobalFlags::new();
        let ctx = Context::new(&node, &globals);
        let result = evaluate(&graph, &strings(), usize::MAX, 0, &ctx);
        assert!(result.is_ok(), "got {result:?}");
    }

    #[test]
    fn detailed_report_traces_rule_calls() {
        let graph = RuleGraphBuilder::new()
            .rule("leaf", text("x"))
            .rule("top", join(vec![rule_ref("leaf"), rule_ref("leaf")]))
            .compile()
            .unwrap();
        let node = NodeSnapshot::new();
        let globals = GlobalFlags::new();
        let ctx = Context::new(&node, &globals);
        let index = graph.rule_index("top").unwrap();
        let report = evaluate_detailed(&graph, &strings(), 100, index, &ctx).unwrap();
        assert_eq!(report.invoked(), &["top", "leaf", "leaf"]);
        assert_eq!(report.text().as_deref(), Some("x x"));
        assert_eq!(report.steps(), 5);
    }
}
