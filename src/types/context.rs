use std::collections::HashMap;
use std::fmt;

use super::error::StaleContextError;
use super::field::{ActionField, FieldPath, NodeField};
use super::Value;

/// Identifier of an accessibility action. Standard actions carry the
/// platform's numeric ids; everything else is a custom action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    Focus,
    ClearFocus,
    Select,
    ClearSelection,
    Click,
    LongClick,
    ScrollForward,
    ScrollBackward,
    Expand,
    Collapse,
    Dismiss,
    Custom(i32),
}

impl ActionId {
    const STANDARD: [(ActionId, i32, &'static str); 11] = [
        (ActionId::Focus, 0x1, "ACTION_FOCUS"),
        (ActionId::ClearFocus, 0x2, "ACTION_CLEAR_FOCUS"),
        (ActionId::Select, 0x4, "ACTION_SELECT"),
        (ActionId::ClearSelection, 0x8, "ACTION_CLEAR_SELECTION"),
        (ActionId::Click, 0x10, "ACTION_CLICK"),
        (ActionId::LongClick, 0x20, "ACTION_LONG_CLICK"),
        (ActionId::ScrollForward, 0x1000, "ACTION_SCROLL_FORWARD"),
        (ActionId::ScrollBackward, 0x2000, "ACTION_SCROLL_BACKWARD"),
        (ActionId::Expand, 0x40000, "ACTION_EXPAND"),
        (ActionId::Collapse, 0x80000, "ACTION_COLLAPSE"),
        (ActionId::Dismiss, 0x100000, "ACTION_DISMISS"),
    ];

    /// Map a raw platform id to an action id.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        Self::STANDARD
            .iter()
            .find(|(_, id, _)| *id == raw)
            .map_or(ActionId::Custom(raw), |(action, _, _)| *action)
    }

    #[must_use]
    pub fn raw(self) -> i32 {
        match self {
            ActionId::Custom(raw) => raw,
            standard => Self::STANDARD
                .iter()
                .find(|(action, _, _)| *action == standard)
                .map_or(0, |(_, id, _)| *id),
        }
    }

    /// The symbolic name of a standard action, e.g. `ACTION_CLICK`.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        Self::STANDARD
            .iter()
            .find(|(action, _, _)| *action == self)
            .map(|(_, _, name)| *name)
    }

    /// The value `$action.id` evaluates to: the symbolic name for standard
    /// actions, the raw id for custom ones.
    #[must_use]
    pub fn to_value(self) -> Value {
        match self.name() {
            Some(name) => Value::String(name.to_owned()),
            None => Value::Int(i64::from(self.raw())),
        }
    }
}

/// An action exposed by a node, with its optional user-visible label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInfo {
    id: ActionId,
    label: Option<String>,
}

impl ActionInfo {
    #[must_use]
    pub fn new(id: ActionId) -> Self {
        Self { id, label: None }
    }

    #[must_use]
    pub fn custom(raw_id: i32, label: &str) -> Self {
        Self {
            id: ActionId::Custom(raw_id),
            label: Some(label.to_owned()),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_owned());
        self
    }

    #[must_use]
    pub fn id(&self) -> ActionId {
        self.id
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn is_click(&self) -> bool {
        self.id == ActionId::Click
    }

    #[must_use]
    pub fn is_long_click(&self) -> bool {
        self.id == ActionId::LongClick
    }

    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self.id, ActionId::Custom(_))
    }

    /// Read one of this action's properties. Only an unset label is absent.
    #[must_use]
    pub fn field(&self, field: ActionField) -> Option<Value> {
        match field {
            ActionField::Id => Some(self.id.to_value()),
            ActionField::Label => self.label.clone().map(Value::String),
            ActionField::IsClick => Some(Value::Bool(self.is_click())),
            ActionField::IsLongClick => Some(Value::Bool(self.is_long_click())),
            ActionField::IsCustomAction => Some(Value::Bool(self.is_custom())),
        }
    }
}

/// Read access to an accessibility node.
///
/// Live implementations wrap a platform node that may be recycled while a
/// hint is being generated; they report that with [`StaleContextError`].
/// List-valued fields return [`Value::List`] of [`Value::Action`]; reference
/// fields return a single [`Value::Action`].
pub trait NodeProvider {
    /// Read a node field. `Ok(None)` means the node has no such value.
    ///
    /// # Errors
    ///
    /// Returns [`StaleContextError`] if the underlying node is no longer available.
    fn field(&self, field: NodeField) -> Result<Option<Value>, StaleContextError>;
}

/// An owned, immutable snapshot of a node's capabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    enabled: bool,
    role: Option<String>,
    clickable: bool,
    long_clickable: bool,
    checkable: bool,
    checked: bool,
    scrollable: bool,
    scroll_forward: bool,
    scroll_backward: bool,
    text: Option<String>,
    content_description: Option<String>,
    actions: Vec<ActionInfo>,
}

impl Default for NodeSnapshot {
    fn default() -> Self {
        Self {
            enabled: true,
            role: None,
            clickable: false,
            long_clickable: false,
            checkable: false,
            checked: false,
            scrollable: false,
            scroll_forward: false,
            scroll_backward: false,
            text: None,
            content_description: None,
            actions: Vec::new(),
        }
    }
}

impl NodeSnapshot {
    /// An enabled node with no other capabilities.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn enabled(mut self, value: bool) -> Self {
        self.enabled = value;
        self
    }

    #[must_use]
    pub fn role(mut self, role: &str) -> Self {
        self.role = Some(role.to_owned());
        self
    }

    #[must_use]
    pub fn clickable(mut self, value: bool) -> Self {
        self.clickable = value;
        self
    }

    #[must_use]
    pub fn long_clickable(mut self, value: bool) -> Self {
        self.long_clickable = value;
        self
    }

    #[must_use]
    pub fn checkable(mut self, value: bool) -> Self {
        self.checkable = value;
        self
    }

    #[must_use]
    pub fn checked(mut self, value: bool) -> Self {
        self.checked = value;
        self
    }

    #[must_use]
    pub fn scrollable(mut self, value: bool) -> Self {
        self.scrollable = value;
        self
    }

    #[must_use]
    pub fn supports_scroll_forward(mut self, value: bool) -> Self {
        self.scroll_forward = value;
        self
    }

    #[must_use]
    pub fn supports_scroll_backward(mut self, value: bool) -> Self {
        self.scroll_backward = value;
        self
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_owned());
        self
    }

    #[must_use]
    pub fn content_description(mut self, description: &str) -> Self {
        self.content_description = Some(description.to_owned());
        self
    }

    /// Append an action to the node's action list.
    #[must_use]
    pub fn action(mut self, action: ActionInfo) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn actions(&self) -> &[ActionInfo] {
        &self.actions
    }

    fn has_action(&self, id: ActionId) -> bool {
        self.actions.iter().any(|a| a.id() == id)
    }

    fn find_action(&self, id: ActionId) -> Option<Value> {
        self.actions
            .iter()
            .find(|a| a.id() == id)
            .cloned()
            .map(Value::Action)
    }

    fn action_list(&self, filter: impl Fn(&ActionInfo) -> bool) -> Value {
        Value::List(
            self.actions
                .iter()
                .filter(|a| filter(*a))
                .cloned()
                .map(Value::Action)
                .collect(),
        )
    }
}

impl NodeProvider for NodeSnapshot {
    fn field(&self, field: NodeField) -> Result<Option<Value>, StaleContextError> {
        let value = match field {
            NodeField::IsEnabled => Some(Value::Bool(self.enabled)),
            NodeField::Role => self.role.clone().map(Value::String),
            NodeField::IsClickable => Some(Value::Bool(self.clickable)),
            NodeField::IsLongClickable => Some(Value::Bool(self.long_clickable)),
            NodeField::IsCheckable => Some(Value::Bool(self.checkable)),
            NodeField::IsChecked => Some(Value::Bool(self.checked)),
            NodeField::IsScrollable => Some(Value::Bool(self.scrollable)),
            NodeField::SupportsActionScrollForward => Some(Value::Bool(
                self.scroll_forward || self.has_action(ActionId::ScrollForward),
            )),
            NodeField::SupportsActionScrollBackward => Some(Value::Bool(
                self.scroll_backward || self.has_action(ActionId::ScrollBackward),
            )),
            NodeField::Text => self.text.clone().map(Value::String),
            NodeField::ContentDescription => self.content_description.clone().map(Value::String),
            NodeField::Actions => Some(self.action_list(|_| true)),
            NodeField::CustomActions => Some(self.action_list(ActionInfo::is_custom)),
            NodeField::ActionClick => self.find_action(ActionId::Click),
            NodeField::ActionLongClick => self.find_action(ActionId::LongClick),
        };
        Ok(value)
    }
}

/// Service-wide flags visible to rules as `$global.<name>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalFlags {
    flags: HashMap<String, Value>,
}

impl GlobalFlags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.flags.insert(name.to_owned(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.flags.get(name)
    }
}

/// The immutable record a rule is evaluated against: the focused node, the
/// action bound by the innermost iteration or reference rule, and the global
/// flags.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    node: &'a dyn NodeProvider,
    action: Option<&'a ActionInfo>,
    globals: &'a GlobalFlags,
}

impl<'a> Context<'a> {
    #[must_use]
    pub fn new(node: &'a dyn NodeProvider, globals: &'a GlobalFlags) -> Self {
        Self {
            node,
            action: None,
            globals,
        }
    }

    /// A child context with `action` bound as `$action`. The node and
    /// global flags stay visible.
    #[must_use]
    pub fn with_action<'b>(&self, action: &'b ActionInfo) -> Context<'b>
    where
        'a: 'b,
    {
        Context {
            node: self.node,
            action: Some(action),
            globals: self.globals,
        }
    }

    #[must_use]
    pub fn action(&self) -> Option<&'a ActionInfo> {
        self.action
    }

    #[must_use]
    pub fn globals(&self) -> &'a GlobalFlags {
        self.globals
    }

    pub(crate) fn read(&self, path: &FieldPath) -> Result<Option<Value>, StaleContextError> {
        match path {
            FieldPath::Node(field) => self.node.field(*field),
            FieldPath::Action(field) => Ok(self.action.and_then(|a| a.field(*field))),
            FieldPath::Global(name) => Ok(self.globals.get(name).cloned()),
        }
    }

    pub(crate) fn read_actions(&self, field: NodeField) -> Result<Vec<ActionInfo>, StaleContextError> {
        let actions = match self.node.field(field)? {
            Some(Value::List(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Action(action) => Some(action),
                    _ => None,
                })
                .collect(),
            Some(Value::Action(action)) => vec![action],
            _ => Vec::new(),
        };
        Ok(actions)
    }

    pub(crate) fn read_action(&self, field: NodeField) -> Result<Option<ActionInfo>, StaleContextError> {
        Ok(match self.node.field(field)? {
            Some(Value::Action(action)) => Some(action),
            _ => None,
        })
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("action", &self.action)
            .field("globals", &self.globals)
            .finish_non_exhaustive()
    }
}
