use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::config::MAX_REFERENCE_DEPTH;
use crate::types::{CompiledExpr, CompiledRule};
use crate::{
    EventTable, Expr, FeedbackDescriptor, FieldKind, FieldPath, NodeField, Rule, RuleGraph,
    RuleGraphError,
};

pub(crate) fn compile(
    rules: &[Rule],
    events: BTreeMap<String, FeedbackDescriptor>,
) -> Result<RuleGraph, RuleGraphError> {
    check_duplicates(rules)?;

    let positions: HashMap<&str, usize> = rules
        .iter()
        .enumerate()
        .map(|(i, r)| (r.name.as_str(), i))
        .collect();

    check_references(rules, &positions)?;

    let order = topological_sort(rules, &positions)?;

    let rule_indices: HashMap<String, usize> = order
        .iter()
        .enumerate()
        .map(|(i, &pos)| (rules[pos].name.clone(), i))
        .collect();

    let compiled_rules = order
        .iter()
        .map(|&pos| {
            let rule = &rules[pos];
            Ok(CompiledRule {
                name: rule.name.clone(),
                body: compile_expr(&rule.body, &rule.name, &rule_indices)?,
            })
        })
        .collect::<Result<Vec<_>, RuleGraphError>>()?;

    check_reference_depth(&compiled_rules)?;

    tracing::debug!(
        rules = compiled_rules.len(),
        events = events.len(),
        "compiled rule graph"
    );

    Ok(RuleGraph {
        rules: compiled_rules,
        rule_indices,
        events: EventTable::from_map(events),
    })
}

fn check_duplicates(rules: &[Rule]) -> Result<(), RuleGraphError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if !seen.insert(&rule.name) {
            return Err(RuleGraphError::DuplicateRule {
                name: rule.name.clone(),
            });
        }
    }
    Ok(())
}

fn check_references(
    rules: &[Rule],
    positions: &HashMap<&str, usize>,
) -> Result<(), RuleGraphError> {
    for rule in rules {
        if let Some(missing) = collect_rule_refs(&rule.body)
            .into_iter()
            .find(|name| !positions.contains_key(name))
        {
            return Err(RuleGraphError::UndefinedRuleRef {
                rule: rule.name.clone(),
                reference: missing.to_owned(),
            });
        }
    }
    Ok(())
}

/// Distinct rule references of an expression, in first-use order.
fn collect_rule_refs(expr: &Expr) -> Vec<&str> {
    let mut refs = Vec::new();
    collect_rule_refs_inner(expr, &mut refs);
    refs
}

fn collect_rule_refs_inner<'a>(expr: &'a Expr, refs: &mut Vec<&'a str>) {
    match expr {
        Expr::RuleRef(name) => {
            if !refs.contains(&name.as_str()) {
                refs.push(name);
            }
        }
        Expr::Text(_) | Expr::Bool(_) | Expr::Field(_) => {}
        Expr::Template { args: items, .. }
        | Expr::Fallback(items)
        | Expr::Join { parts: items, .. } => {
            for item in items {
                collect_rule_refs_inner(item, refs);
            }
        }
        Expr::Compare { left, right, .. }
        | Expr::And(left, right)
        | Expr::Or(left, right)
        | Expr::ConditionalPrepend {
            prefix: left,
            value: right,
        } => {
            collect_rule_refs_inner(left, refs);
            collect_rule_refs_inner(right, refs);
        }
        Expr::Not(inner)
        | Expr::ForEachChild { body: inner, .. }
        | Expr::ForReference { body: inner, .. } => collect_rule_refs_inner(inner, refs),
        Expr::If {
            condition,
            then,
            otherwise,
        } => {
            collect_rule_refs_inner(condition, refs);
            collect_rule_refs_inner(then, refs);
            if let Some(otherwise) = otherwise {
                collect_rule_refs_inner(otherwise, refs);
            }
        }
        Expr::Switch { key, cases } => {
            collect_rule_refs_inner(key, refs);
            for case in cases.values() {
                collect_rule_refs_inner(case, refs);
            }
        }
    }
}

/// Kahn's algorithm over declaration positions. Ties are broken by
/// declaration order, so the result is deterministic.
fn topological_sort(
    rules: &[Rule],
    positions: &HashMap<&str, usize>,
) -> Result<Vec<usize>, RuleGraphError> {
    let deps: Vec<Vec<usize>> = rules
        .iter()
        .map(|rule| {
            collect_rule_refs(&rule.body)
                .into_iter()
                .filter_map(|name| positions.get(name).copied())
                .collect()
        })
        .collect();

    // dependents[x] = rules that reference x
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); rules.len()];
    let mut in_degree: Vec<usize> = vec![0; rules.len()];
    for (pos, rule_deps) in deps.iter().enumerate() {
        for &dep in rule_deps {
            dependents[dep].push(pos);
            in_degree[pos] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..rules.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut sorted = Vec::with_capacity(rules.len());

    while let Some(pos) = queue.pop_front() {
        for &dependent in &dependents[pos] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
        sorted.push(pos);
    }

    if sorted.len() != rules.len() {
        let path = find_cycle(&deps)
            .into_iter()
            .map(|pos| rules[pos].name.clone())
            .collect();
        return Err(RuleGraphError::CyclicDependency { path });
    }

    Ok(sorted)
}

/// Reject graphs whose longest `%reference` chain exceeds
/// [`MAX_REFERENCE_DEPTH`]. `rules` must be in dependency order.
pub(crate) fn check_reference_depth(rules: &[CompiledRule]) -> Result<(), RuleGraphError> {
    let mut depths: Vec<usize> = Vec::with_capacity(rules.len());
    for rule in rules {
        let depth = 1 + rule
            .dependencies()
            .into_iter()
            .filter_map(|dep| depths.get(dep).copied())
            .max()
            .unwrap_or(0);
        if depth > MAX_REFERENCE_DEPTH {
            return Err(RuleGraphError::ReferenceChainTooDeep {
                rule: rule.name.clone(),
                depth,
                limit: MAX_REFERENCE_DEPTH,
            });
        }
        depths.push(depth);
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DfsState {
    Unvisited,
    InStack,
    Done,
}

/// DFS-based cycle finder for error reporting. The returned path repeats
/// its first rule at the end.
///
/// Frames are `(rule, next edge)` pairs on an explicit stack, so long
/// cycles cannot exhaust the thread stack.
fn find_cycle(deps: &[Vec<usize>]) -> Vec<usize> {
    let mut state = vec![DfsState::Unvisited; deps.len()];
    let mut frames: Vec<(usize, usize)> = Vec::new();

    for start in 0..deps.len() {
        if state[start] != DfsState::Unvisited {
            continue;
        }
        state[start] = DfsState::InStack;
        frames.push((start, 0));

        while let Some(frame) = frames.last_mut() {
            let (node, edge) = *frame;
            let Some(&next) = deps[node].get(edge) else {
                frames.pop();
                state[node] = DfsState::Done;
                continue;
            };
            frame.1 += 1;

            match state[next] {
                DfsState::InStack => {
                    if let Some(at) = frames.iter().position(|&(n, _)| n == next) {
                        let mut cycle: Vec<usize> = frames[at..].iter().map(|&(n, _)| n).collect();
                        cycle.push(next);
                        return cycle;
                    }
                }
                DfsState::Unvisited => {
                    state[next] = DfsState::InStack;
                    frames.push((next, 0));
                }
                DfsState::Done => {}
            }
        }
    }
    Vec::new()
}

fn resolve_field(rule: &str, path: &str) -> Result<FieldPath, RuleGraphError> {
    FieldPath::resolve(path).ok_or_else(|| RuleGraphError::UndefinedField {
        rule: rule.to_owned(),
        field: path.to_owned(),
    })
}

/// Resolve a node field that must have the given kind.
fn resolve_node_field(
    rule: &str,
    path: &str,
    expected: FieldKind,
) -> Result<NodeField, RuleGraphError> {
    match resolve_field(rule, path)? {
        FieldPath::Node(field) if field.kind() == expected => Ok(field),
        _ => Err(RuleGraphError::FieldKindMismatch {
            rule: rule.to_owned(),
            field: path.to_owned(),
            expected,
        }),
    }
}

fn compile_all(
    items: &[Expr],
    rule: &str,
    rule_indices: &HashMap<String, usize>,
) -> Result<Vec<CompiledExpr>, RuleGraphError> {
    items
        .iter()
        .map(|e| compile_expr(e, rule, rule_indices))
        .collect()
}

fn compile_boxed(
    expr: &Expr,
    rule: &str,
    rule_indices: &HashMap<String, usize>,
) -> Result<Box<CompiledExpr>, RuleGraphError> {
    compile_expr(expr, rule, rule_indices).map(Box::new)
}

/// Resolve field paths and rule references of `expr`, owned by `rule`.
pub(crate) fn compile_expr(
    expr: &Expr,
    rule: &str,
    rule_indices: &HashMap<String, usize>,
) -> Result<CompiledExpr, RuleGraphError> {
    let compiled = match expr {
        Expr::Text(text) => CompiledExpr::Text(text.clone()),
        Expr::Bool(b) => CompiledExpr::Bool(*b),
        Expr::Field(path) => CompiledExpr::Field(resolve_field(rule, path)?),
        Expr::RuleRef(name) => match rule_indices.get(name) {
            Some(&idx) => CompiledExpr::RuleRef(idx),
            None => {
                return Err(RuleGraphError::UndefinedRuleRef {
                    rule: rule.to_owned(),
                    reference: name.clone(),
                })
            }
        },
        Expr::Template { name, args } => CompiledExpr::Template {
            name: name.clone(),
            args: compile_all(args, rule, rule_indices)?,
        },
        Expr::Compare { left, op, right } => CompiledExpr::Compare {
            left: compile_boxed(left, rule, rule_indices)?,
            op: *op,
            right: compile_boxed(right, rule, rule_indices)?,
        },
        Expr::And(a, b) => CompiledExpr::And(
            compile_boxed(a, rule, rule_indices)?,
            compile_boxed(b, rule, rule_indices)?,
        ),
        Expr::Or(a, b) => CompiledExpr::Or(
            compile_boxed(a, rule, rule_indices)?,
            compile_boxed(b, rule, rule_indices)?,
        ),
        Expr::Not(inner) => CompiledExpr::Not(compile_boxed(inner, rule, rule_indices)?),
        Expr::If {
            condition,
            then,
            otherwise,
        } => CompiledExpr::If {
            condition: compile_boxed(condition, rule, rule_indices)?,
            then: compile_boxed(then, rule, rule_indices)?,
            otherwise: otherwise
                .as_deref()
                .map(|e| compile_boxed(e, rule, rule_indices))
                .transpose()?,
        },
        Expr::Fallback(items) => CompiledExpr::Fallback(compile_all(items, rule, rule_indices)?),
        Expr::Join { parts, separator } => CompiledExpr::Join {
            parts: compile_all(parts, rule, rule_indices)?,
            separator: separator.clone(),
        },
        Expr::ForEachChild { collection, body } => CompiledExpr::ForEachChild {
            collection: resolve_node_field(rule, collection, FieldKind::ActionList)?,
            body: compile_boxed(body, rule, rule_indices)?,
        },
        Expr::ForReference { field, body } => CompiledExpr::ForReference {
            field: resolve_node_field(rule, field, FieldKind::ActionRef)?,
            body: compile_boxed(body, rule, rule_indices)?,
        },
        Expr::Switch { key, cases } => CompiledExpr::Switch {
            key: compile_boxed(key, rule, rule_indices)?,
            cases: cases
                .iter()
                .map(|(case, body)| Ok((case.clone(), compile_expr(body, rule, rule_indices)?)))
                .collect::<Result<BTreeMap<_, _>, RuleGraphError>>()?,
        },
        Expr::ConditionalPrepend { prefix, value } => CompiledExpr::ConditionalPrepend {
            prefix: compile_boxed(prefix, rule, rule_indices)?,
            value: compile_boxed(value, rule, rule_indices)?,
        },
    };
    Ok(compiled)
}
