use proptest::prelude::*;
use switch_access_hints::{
    fallback, field, join, rule_ref, template, text, ActionId, ActionInfo, Expr, GlobalFlags,
    HintEngine, NodeSnapshot, RuleGraphBuilder, StringTable,
};

// --- Fixed node schema ---
// role               : one of {"pager", "list", "button"} or unset
// text / description : one of TEXTS or unset
// flags              : any bool
// actions            : 0..4 standard or custom actions

const ROLES: &[&str] = &["pager", "list", "button"];
const TEXTS: &[&str] = &["", "Inbox", "Send", "Back"];
const STANDARD: &[ActionId] = &[
    ActionId::Click,
    ActionId::LongClick,
    ActionId::ScrollForward,
    ActionId::ScrollBackward,
    ActionId::Expand,
    ActionId::Collapse,
    ActionId::Dismiss,
];

fn arb_label() -> impl Strategy<Value = Option<&'static str>> {
    prop::option::of(prop::sample::select(TEXTS))
}

pub fn arb_action() -> impl Strategy<Value = ActionInfo> {
    prop_oneof![
        (prop::sample::select(STANDARD), arb_label()).prop_map(|(id, label)| {
            let action = ActionInfo::new(id);
            match label {
                Some(label) => action.with_label(label),
                None => action,
            }
        }),
        (100_i32..110, prop::sample::select(TEXTS))
            .prop_map(|(id, label)| ActionInfo::custom(id, label)),
    ]
}

/// Generate a node snapshot that aligns with the fixed schema.
pub fn arb_node() -> impl Strategy<Value = NodeSnapshot> {
    (
        prop::collection::vec(any::<bool>(), 8),
        prop::option::of(prop::sample::select(ROLES)),
        arb_label(),
        arb_label(),
        prop::collection::vec(arb_action(), 0..4),
    )
        .prop_map(|(flags, role, text, description, actions)| {
            let mut node = NodeSnapshot::new()
                .enabled(flags[0])
                .clickable(flags[1])
                .long_clickable(flags[2])
                .checkable(flags[3])
                .checked(flags[4])
                .scrollable(flags[5])
                .supports_scroll_forward(flags[6])
                .supports_scroll_backward(flags[7]);
            if let Some(role) = role {
                node = node.role(role);
            }
            if let Some(text) = text {
                node = node.text(text);
            }
            if let Some(description) = description {
                node = node.content_description(description);
            }
            actions.into_iter().fold(node, NodeSnapshot::action)
        })
}

pub fn arb_globals() -> impl Strategy<Value = GlobalFlags> {
    any::<bool>().prop_map(|auto| GlobalFlags::new().set("useAutoSelect", auto))
}

/// The string table every generated graph is bound to.
pub fn strings() -> StringTable {
    StringTable::new()
        .with("select", "Select")
        .and_then(|t| t.with("activate", "%1$s to activate."))
        .and_then(|t| t.with("pair", "%1$s, %2$s"))
        .unwrap()
}

/// A leaf expression that may or may not produce text.
pub fn arb_text_leaf() -> impl Strategy<Value = Expr> {
    prop_oneof![
        prop::sample::select(TEXTS).prop_map(text),
        Just(field("node.text")),
        Just(field("node.contentDescription")),
        Just(field("node.role")),
        Just(template("select", vec![])),
        Just(template("activate", vec![field("node.text")])),
    ]
}

/// A boolean condition over node flags.
pub fn arb_condition() -> impl Strategy<Value = Expr> {
    let flag = prop::sample::select(&[
        "node.isEnabled",
        "node.isClickable",
        "node.isCheckable",
        "node.isChecked",
        "node.isLongClickable",
    ][..])
    .prop_map(field);
    let leaf = prop_oneof![
        flag,
        prop::sample::select(ROLES).prop_map(|role| field("node.role").eq(text(role))),
    ];
    leaf.prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.and(b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.or(b)),
            inner.prop_map(|e| !e),
        ]
    })
}

#[derive(Debug, Clone)]
pub struct GenRule {
    pub name: String,
    pub expr: Expr,
}

#[derive(Debug, Clone)]
pub struct GenGraph {
    pub rules: Vec<GenRule>,
}

impl GenGraph {
    pub fn compile(&self) -> HintEngine {
        let builder = self
            .rules
            .iter()
            .fold(RuleGraphBuilder::new(), |b, r| b.rule(&r.name, r.expr.clone()));
        HintEngine::new(builder.compile().unwrap(), strings()).unwrap()
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }
}

/// 1 to 8 independent leaf rules.
pub fn arb_flat_graph() -> impl Strategy<Value = GenGraph> {
    prop::collection::vec(arb_text_leaf(), 1..=8).prop_map(|leaves| GenGraph {
        rules: leaves
            .into_iter()
            .enumerate()
            .map(|(i, expr)| GenRule {
                name: format!("leaf_{i}"),
                expr,
            })
            .collect(),
    })
}

/// Leaf rules followed by rules that combine two earlier rules with
/// `join`, `fallback`, or a condition.
pub fn arb_chained_graph() -> impl Strategy<Value = GenGraph> {
    (arb_flat_graph(), 1_usize..=6).prop_flat_map(|(base, n_chained)| {
        let n_leaves = base.rules.len();
        prop::collection::vec(
            (0_u8..3, 0..n_leaves, 0..n_leaves, arb_condition()),
            n_chained,
        )
        .prop_map(move |configs| {
            let mut rules = base.rules.clone();
            for (i, (kind, a, b, condition)) in configs.into_iter().enumerate() {
                // Chain rules may also reference earlier chain rules.
                let a = rule_ref(&rules[a + i].name);
                let b = rule_ref(&rules[b].name);
                let expr = match kind {
                    0 => join(vec![a, b]),
                    1 => fallback(vec![a, b]),
                    _ => condition.then(a).otherwise(b),
                };
                rules.push(GenRule {
                    name: format!("chain_{i}"),
                    expr,
                });
            }
            GenGraph { rules }
        })
    })
}
