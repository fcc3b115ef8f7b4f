use switch_access_hints::config::{MAX_DOCUMENT_SIZE, MAX_REFERENCE_DEPTH};
use switch_access_hints::parse::parse_expression;
use switch_access_hints::{
    field, rule_ref, template, text, ActionInfo, Context, GlobalFlags, HintEngine, HintError,
    NodeSnapshot, RuleGraph, RuleGraphError, StringTable, Value,
};

const STRINGS: &str = r#"{
    "select": "Select",
    "activate": "%1$s to activate.",
    "reply_to": "%1$s to reply to %2$s."
}"#;

#[test]
fn document_parse_and_evaluate() {
    let rules = r#"{
        "named_nodes": {
            "hint": {
                "if": "$node.isEnabled && $node.isClickable",
                "then": "@string/activate(@string/select)"
            }
        }
    }"#;
    let engine = HintEngine::from_json(rules, STRINGS).unwrap();
    let globals = GlobalFlags::new();

    let node = NodeSnapshot::new().clickable(true);
    let result = engine.evaluate("hint", &Context::new(&node, &globals)).unwrap();
    assert_eq!(result, Some(Value::String("Select to activate.".into())));

    let node = NodeSnapshot::new().enabled(false).clickable(true);
    let result = engine.evaluate("hint", &Context::new(&node, &globals)).unwrap();
    assert_eq!(result, None);
}

#[test]
fn plain_strings_are_literal_text() {
    let rules = r#"{ "named_nodes": { "greeting": "Hello there" } }"#;
    let engine = HintEngine::from_json(rules, STRINGS).unwrap();
    let node = NodeSnapshot::new();
    let globals = GlobalFlags::new();
    let result = engine.evaluate("greeting", &Context::new(&node, &globals)).unwrap();
    assert_eq!(result, Some(Value::String("Hello there".into())));
}

#[test]
fn rules_may_reference_later_rules() {
    let rules = r#"{
        "named_nodes": {
            "outer": { "join": ["%first", "%second"], "separator": ", " },
            "first": "'one'",
            "second": { "for_each_child": "$node.customActions", "evaluate": "$action.label" }
        }
    }"#;
    let engine = HintEngine::from_json(rules, STRINGS).unwrap();
    let node = NodeSnapshot::new()
        .action(ActionInfo::custom(1, "two"))
        .action(ActionInfo::custom(2, "three"));
    let globals = GlobalFlags::new();
    let result = engine.evaluate("outer", &Context::new(&node, &globals)).unwrap();
    assert_eq!(result, Some(Value::String("one, two, three".into())));
}

#[test]
fn execution_order_puts_dependencies_first() {
    let rules = r#"{
        "named_nodes": {
            "top": "%middle",
            "middle": "%bottom",
            "bottom": true
        }
    }"#;
    let graph = RuleGraph::from_json(rules).unwrap();
    assert_eq!(graph.execution_order(), ["bottom", "middle", "top"]);
    assert_eq!(graph.dependencies_of("top"), Some(vec!["middle"]));
    assert_eq!(graph.dependencies_of("nope"), None);
}

#[test]
fn undefined_rule_reference_rejected() {
    let rules = r#"{ "named_nodes": { "a": "%missing" } }"#;
    match RuleGraph::from_json(rules) {
        Err(RuleGraphError::UndefinedRuleRef { rule, reference }) => {
            assert_eq!(rule, "a");
            assert_eq!(reference, "missing");
        }
        other => panic!("expected UndefinedRuleRef, got {other:?}"),
    }
}

#[test]
fn cycle_reports_path() {
    let rules = r#"{ "named_nodes": { "a": "%b", "b": "%a" } }"#;
    match RuleGraph::from_json(rules) {
        Err(RuleGraphError::CyclicDependency { path }) => {
            assert_eq!(path.first(), path.last());
            assert!(path.contains(&"a".to_owned()));
            assert!(path.contains(&"b".to_owned()));
        }
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
}

/// `{"named_nodes": {"r0": "$node.isClickable", "r1": "%r0", ...}}`
fn reference_chain_document(len: usize) -> String {
    let mut entries = vec![r#""r0": "$node.isClickable""#.to_owned()];
    entries.extend((1..len).map(|i| format!(r#""r{i}": "%r{}""#, i - 1)));
    format!(r#"{{ "named_nodes": {{ {} }} }}"#, entries.join(", "))
}

#[test]
fn long_reference_chain_rejected_at_load() {
    for len in [MAX_REFERENCE_DEPTH + 1, 500, 20_000] {
        match HintEngine::from_json(&reference_chain_document(len), "{}") {
            Err(HintError::Graph(RuleGraphError::ReferenceChainTooDeep { depth, limit, .. })) => {
                assert_eq!(depth, MAX_REFERENCE_DEPTH + 1);
                assert_eq!(limit, MAX_REFERENCE_DEPTH);
            }
            other => panic!("chain of {len}: expected ReferenceChainTooDeep, got {other:?}"),
        }
    }
}

#[test]
fn reference_chain_at_limit_evaluates() {
    let engine = HintEngine::from_json(&reference_chain_document(MAX_REFERENCE_DEPTH), "{}").unwrap();
    let node = NodeSnapshot::new().clickable(true);
    let globals = GlobalFlags::new();
    let last = format!("r{}", MAX_REFERENCE_DEPTH - 1);
    let result = engine.evaluate(&last, &Context::new(&node, &globals)).unwrap();
    assert_eq!(result, Some(Value::Bool(true)));
}

#[test]
fn long_cycle_rejected_at_load() {
    // r0 -> r39999 -> r39998 -> ... -> r1 -> r0
    let n = 40_000;
    let entries: Vec<String> = (0..n)
        .map(|i| format!(r#""r{i}": "%r{}""#, (i + n - 1) % n))
        .collect();
    let rules = format!(r#"{{ "named_nodes": {{ {} }} }}"#, entries.join(", "));
    assert!(rules.len() < MAX_DOCUMENT_SIZE);

    match RuleGraph::from_json(&rules) {
        Err(RuleGraphError::CyclicDependency { path }) => {
            assert_eq!(path.len(), n + 1);
            assert_eq!(path.first(), path.last());
        }
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
}

#[test]
fn duplicate_rule_rejected() {
    let rules = r#"{ "named_nodes": { "a": "x", "a": "y" } }"#;
    assert!(matches!(
        RuleGraph::from_json(rules),
        Err(RuleGraphError::DuplicateRule { name }) if name == "a"
    ));
}

#[test]
fn unknown_field_rejected() {
    let rules = r#"{ "named_nodes": { "a": "$node.isShiny" } }"#;
    assert!(matches!(
        RuleGraph::from_json(rules),
        Err(RuleGraphError::UndefinedField { .. })
    ));
}

#[test]
fn iteration_over_flag_rejected() {
    let rules = r#"{
        "named_nodes": {
            "a": { "for_each_child": "$node.isEnabled", "evaluate": "x" }
        }
    }"#;
    assert!(matches!(
        RuleGraph::from_json(rules),
        Err(RuleGraphError::FieldKindMismatch { .. })
    ));
}

#[test]
fn missing_template_rejected_at_load() {
    let rules = r#"{ "named_nodes": { "a": "@string/nowhere" } }"#;
    match HintEngine::from_json(rules, STRINGS) {
        Err(HintError::Graph(RuleGraphError::UndefinedTemplate { owner, template })) => {
            assert_eq!(owner, "a");
            assert_eq!(template, "nowhere");
        }
        other => panic!("expected UndefinedTemplate, got {other:?}"),
    }
}

#[test]
fn template_arity_checked_at_load() {
    let rules = r#"{ "named_nodes": { "a": "@string/reply_to('Ann')" } }"#;
    assert!(matches!(
        HintEngine::from_json(rules, STRINGS),
        Err(HintError::Graph(RuleGraphError::TemplateArity {
            expected: 2,
            actual: 1,
            ..
        }))
    ));
}

#[test]
fn event_template_checked_at_load() {
    let rules = r#"{
        "events": { "scrolled": { "ttsOutput": "@string/screen_scrolled" } },
        "named_nodes": {}
    }"#;
    assert!(matches!(
        HintEngine::from_json(rules, STRINGS),
        Err(HintError::Graph(RuleGraphError::UndefinedTemplate { .. }))
    ));
}

#[test]
fn bad_format_string_rejected() {
    assert!(matches!(
        StringTable::from_json(r#"{ "broken": "%1$q" }"#),
        Err(switch_access_hints::StringTableError::Format { .. })
    ));
}

#[test]
fn parse_expression_public_api() {
    let expr = parse_expression("$node.role == 'pager' && %other").unwrap();
    assert_eq!(expr, field("node.role").eq(text("pager")).and(rule_ref("other")));

    let expr = parse_expression("@string/activate(@string/select)").unwrap();
    assert_eq!(expr, template("activate", vec![template("select", vec![])]));

    assert!(parse_expression("$node.role ==").is_err());
}

#[test]
fn default_document_loads() {
    let engine = HintEngine::switch_access_default().unwrap();
    let graph = engine.graph();
    assert!(graph.contains("get_hint_from_node"));
    assert_eq!(graph.len(), 9);
    assert_eq!(graph.events().len(), 5);
}
