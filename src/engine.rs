use crate::{
    Context, EvalError, EvaluationReport, Expr, FeedbackDescriptor, FeedbackError, GlobalFlags,
    HintError, NodeProvider, RuleGraph, RuleGraphError, SpeechOutput, StringTable,
    UnknownEventError, Utterance, Value,
};

/// Name of the rule [`HintEngine::generate_hint`] starts from.
pub const HINT_ENTRY_RULE: &str = "get_hint_from_node";

const DEFAULT_RULES: &str = include_str!("../rules/switch_access.json");
const DEFAULT_STRINGS: &str = include_str!("../rules/strings_en.json");

/// A rule graph bound to a string table. Immutable, `Send + Sync`, and
/// designed to live behind `Arc` for the lifetime of the service.
///
/// # Example
///
/// ```
/// use switch_access_hints::{ActionInfo, GlobalFlags, HintEngine, NodeSnapshot};
///
/// let engine = HintEngine::switch_access_default().unwrap();
/// let node = NodeSnapshot::new()
///     .clickable(true)
///     .action(ActionInfo::custom(1001, "Open"));
/// let hint = engine.generate_hint(&node, &GlobalFlags::new()).unwrap();
/// assert_eq!(hint.as_deref(), Some("Open Select to activate."));
/// ```
#[derive(Debug)]
pub struct HintEngine {
    graph: RuleGraph,
    strings: StringTable,
    step_budget: usize,
}

impl HintEngine {
    /// Bind `graph` to `strings`, checking that every template the rules and
    /// events use exists and is called with the right number of arguments.
    ///
    /// # Errors
    ///
    /// Returns [`RuleGraphError::UndefinedTemplate`] or
    /// [`RuleGraphError::TemplateArity`].
    pub fn new(graph: RuleGraph, strings: StringTable) -> Result<Self, RuleGraphError> {
        validate_templates(&graph, &strings)?;
        tracing::debug!(
            rules = graph.len(),
            events = graph.events().len(),
            templates = strings.len(),
            "hint engine ready"
        );
        Ok(Self {
            graph,
            strings,
            step_budget: crate::config::DEFAULT_STEP_BUDGET,
        })
    }

    /// Load a rule document and a string table from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`HintError`] if either document fails to load or the
    /// templates do not match.
    pub fn from_json(rules: &str, strings: &str) -> Result<Self, HintError> {
        let graph = RuleGraph::from_json(rules)?;
        let strings = StringTable::from_json(strings)?;
        Ok(Self::new(graph, strings)?)
    }

    /// Load a rule document and a string table from disk.
    ///
    /// # Errors
    ///
    /// Returns [`HintError`] on I/O or load failure.
    pub fn from_files(
        rules_path: impl AsRef<std::path::Path>,
        strings_path: impl AsRef<std::path::Path>,
    ) -> Result<Self, HintError> {
        let graph = RuleGraph::from_file(rules_path)?;
        let strings = StringTable::from_file(strings_path)?;
        Ok(Self::new(graph, strings)?)
    }

    /// The bundled SwitchAccess rules with English strings.
    ///
    /// # Errors
    ///
    /// Returns [`HintError`] only if the bundled documents are broken.
    pub fn switch_access_default() -> Result<Self, HintError> {
        Self::from_json(DEFAULT_RULES, DEFAULT_STRINGS)
    }

    /// Replace the per-request step budget.
    #[must_use]
    pub fn with_step_budget(mut self, budget: usize) -> Self {
        self.step_budget = budget;
        self
    }

    #[must_use]
    pub fn step_budget(&self) -> usize {
        self.step_budget
    }

    #[must_use]
    pub fn graph(&self) -> &RuleGraph {
        &self.graph
    }

    #[must_use]
    pub fn strings(&self) -> &StringTable {
        &self.strings
    }

    fn rule_index(&self, rule_name: &str) -> Result<usize, EvalError> {
        self.graph
            .rule_index(rule_name)
            .ok_or_else(|| EvalError::UndefinedRule {
                name: rule_name.to_owned(),
            })
    }

    /// Evaluate a named rule. `Ok(None)` means the rule produced no result.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] for an unknown rule, a stale node, a template
    /// failure, or an exhausted step budget.
    pub fn evaluate(&self, rule_name: &str, ctx: &Context<'_>) -> Result<Option<Value>, EvalError> {
        let index = self.rule_index(rule_name)?;
        crate::evaluate::evaluate(&self.graph, &self.strings, self.step_budget, index, ctx)
    }

    /// Compile `expr` against this engine's rules and evaluate it.
    ///
    /// # Errors
    ///
    /// Returns [`HintError::Graph`] if the expression does not compile and
    /// [`HintError::Eval`] if evaluation fails.
    pub fn evaluate_expr(&self, expr: &Expr, ctx: &Context<'_>) -> Result<Option<Value>, HintError> {
        let compiled = self.graph.compile_expr(expr)?;
        Ok(crate::evaluate::evaluate_expr(
            &self.graph,
            &self.strings,
            self.step_budget,
            &compiled,
            ctx,
        )?)
    }

    /// Evaluate a named rule and report the rules invoked, step count and
    /// timing alongside the output.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate()`](Self::evaluate).
    pub fn evaluate_detailed(
        &self,
        rule_name: &str,
        ctx: &Context<'_>,
    ) -> Result<EvaluationReport, EvalError> {
        let index = self.rule_index(rule_name)?;
        crate::evaluate::evaluate_detailed(&self.graph, &self.strings, self.step_budget, index, ctx)
    }

    /// Produce the spoken hint for the focused node, starting from
    /// [`HINT_ENTRY_RULE`]. `Ok(None)` means there is nothing to say.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Stale`] if the node disappears mid-evaluation,
    /// and any other [`EvalError`] the rules raise.
    pub fn generate_hint(
        &self,
        node: &dyn NodeProvider,
        globals: &GlobalFlags,
    ) -> Result<Option<String>, EvalError> {
        let ctx = Context::new(node, globals);
        match self.evaluate(HINT_ENTRY_RULE, &ctx) {
            Ok(value) => Ok(value.map(|v| v.to_text()).filter(|text| !text.is_empty())),
            Err(EvalError::Stale(err)) => {
                tracing::warn!(field = %err.field(), "node went stale while generating hint");
                Err(EvalError::Stale(err))
            }
            Err(err) => Err(err),
        }
    }

    /// Look up the announcement for a named event.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownEventError`] if the event is not in the table.
    pub fn lookup_event_feedback(&self, name: &str) -> Result<&FeedbackDescriptor, UnknownEventError> {
        self.graph.events().lookup(name)
    }

    /// Resolve an event's template into the text to speak.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError`] for an unknown event or a template failure.
    pub fn render_event(&self, name: &str) -> Result<Utterance, FeedbackError> {
        let descriptor = self.lookup_event_feedback(name)?;
        let text = self
            .strings
            .resolve(descriptor.output().name(), &[])
            .map_err(FeedbackError::Eval)?;
        Ok(Utterance {
            text,
            queue_mode: descriptor.queue_mode(),
            force_feedback: descriptor.force_feedback(),
        })
    }

    /// Render an event and hand it to `speech`.
    ///
    /// # Errors
    ///
    /// Same as [`render_event()`](Self::render_event). Nothing is spoken on error.
    pub fn announce_event(&self, name: &str, speech: &dyn SpeechOutput) -> Result<(), FeedbackError> {
        let utterance = self.render_event(name)?;
        tracing::debug!(event = name, "announcing event");
        speech.speak(&utterance);
        Ok(())
    }
}

fn validate_templates(graph: &RuleGraph, strings: &StringTable) -> Result<(), RuleGraphError> {
    let rule_uses = graph.rules.iter().flat_map(|rule| {
        rule.template_uses()
            .into_iter()
            .map(move |(template, args)| (rule.name.as_str(), template, args))
    });
    let event_uses = graph
        .events()
        .iter()
        .map(|(event, desc)| (event, desc.output().name(), 0));

    for (owner, template, actual) in rule_uses.chain(event_uses) {
        let Some(found) = strings.get(template) else {
            return Err(RuleGraphError::UndefinedTemplate {
                owner: owner.to_owned(),
                template: template.to_owned(),
            });
        };
        if found.arity() != actual {
            return Err(RuleGraphError::TemplateArity {
                owner: owner.to_owned(),
                template: template.to_owned(),
                expected: found.arity(),
                actual,
            });
        }
    }
    Ok(())
}
