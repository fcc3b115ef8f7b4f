use std::fmt;

/// The shape of value a field produces. Iteration and reference rules only
/// accept fields of the matching kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Flag,
    Text,
    ActionList,
    ActionRef,
    Any,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldKind::Flag => "a boolean flag",
            FieldKind::Text => "a text field",
            FieldKind::ActionList => "an action list",
            FieldKind::ActionRef => "an action reference",
            FieldKind::Any => "a value",
        };
        f.write_str(s)
    }
}

/// Capabilities of the focused accessibility node, addressed as `$node.<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeField {
    IsEnabled,
    Role,
    IsClickable,
    IsLongClickable,
    IsCheckable,
    IsChecked,
    IsScrollable,
    SupportsActionScrollForward,
    SupportsActionScrollBackward,
    Text,
    ContentDescription,
    Actions,
    CustomActions,
    ActionClick,
    ActionLongClick,
}

impl NodeField {
    pub const ALL: [NodeField; 15] = [
        NodeField::IsEnabled,
        NodeField::Role,
        NodeField::IsClickable,
        NodeField::IsLongClickable,
        NodeField::IsCheckable,
        NodeField::IsChecked,
        NodeField::IsScrollable,
        NodeField::SupportsActionScrollForward,
        NodeField::SupportsActionScrollBackward,
        NodeField::Text,
        NodeField::ContentDescription,
        NodeField::Actions,
        NodeField::CustomActions,
        NodeField::ActionClick,
        NodeField::ActionLongClick,
    ];

    /// The name used in rule documents.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            NodeField::IsEnabled => "isEnabled",
            NodeField::Role => "role",
            NodeField::IsClickable => "isClickable",
            NodeField::IsLongClickable => "isLongClickable",
            NodeField::IsCheckable => "isCheckable",
            NodeField::IsChecked => "isChecked",
            NodeField::IsScrollable => "isScrollable",
            NodeField::SupportsActionScrollForward => "supportsActionScrollForward",
            NodeField::SupportsActionScrollBackward => "supportsActionScrollBackward",
            NodeField::Text => "text",
            NodeField::ContentDescription => "contentDescription",
            NodeField::Actions => "actions",
            NodeField::CustomActions => "customActions",
            NodeField::ActionClick => "actionClick",
            NodeField::ActionLongClick => "actionLongClick",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            NodeField::Role | NodeField::Text | NodeField::ContentDescription => FieldKind::Text,
            NodeField::Actions | NodeField::CustomActions => FieldKind::ActionList,
            NodeField::ActionClick | NodeField::ActionLongClick => FieldKind::ActionRef,
            _ => FieldKind::Flag,
        }
    }
}

/// Properties of the action bound by an iteration or reference rule,
/// addressed as `$action.<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionField {
    Id,
    Label,
    IsClick,
    IsLongClick,
    IsCustomAction,
}

impl ActionField {
    pub const ALL: [ActionField; 5] = [
        ActionField::Id,
        ActionField::Label,
        ActionField::IsClick,
        ActionField::IsLongClick,
        ActionField::IsCustomAction,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ActionField::Id => "id",
            ActionField::Label => "label",
            ActionField::IsClick => "isClick",
            ActionField::IsLongClick => "isLongClick",
            ActionField::IsCustomAction => "isCustomAction",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            ActionField::Id => FieldKind::Any,
            ActionField::Label => FieldKind::Text,
            ActionField::IsClick | ActionField::IsLongClick | ActionField::IsCustomAction => {
                FieldKind::Flag
            }
        }
    }
}

/// A dotted context path resolved at load time.
///
/// Paths are written `$node.isEnabled`, `$action.label` or `$global.useAutoSelect`
/// in rule documents; the leading `$` is not part of the stored path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Node(NodeField),
    Action(ActionField),
    Global(String),
}

impl FieldPath {
    /// Resolve a path such as `"node.isEnabled"`. Returns `None` for unknown
    /// scopes or fields.
    #[must_use]
    pub fn resolve(path: &str) -> Option<Self> {
        let (scope, name) = path.split_once('.')?;
        match scope {
            "node" => NodeField::from_name(name).map(FieldPath::Node),
            "action" => ActionField::from_name(name).map(FieldPath::Action),
            "global" if !name.is_empty() && !name.contains('.') => {
                Some(FieldPath::Global(name.to_owned()))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldPath::Node(f) => f.kind(),
            FieldPath::Action(f) => f.kind(),
            FieldPath::Global(_) => FieldKind::Any,
        }
    }

    /// The path without the leading `$`, as written after it in documents.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            FieldPath::Node(f) => format!("node.{}", f.name()),
            FieldPath::Action(f) => format!("action.{}", f.name()),
            FieldPath::Global(name) => format!("global.{name}"),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.path())
    }
}
