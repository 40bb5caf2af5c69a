//! Rule registry: maps rule names to predicates, default arguments and
//! empty-value behaviour.
//!
//! A process-wide registry, pre-populated with the built-in rule library, is
//! reachable through the free functions in this module. Owned
//! [`RuleRegistry`] instances can be used instead wherever isolation matters.
//!
//! ## Consistency
//!
//! Registration is monotonic: names are added or overridden, never removed.
//! Parsed specs hold rule *names*, and every evaluation resolves those names
//! against the registry when it starts. A rule registered while an evaluation
//! is in flight is therefore not seen by that evaluation, but is seen by every
//! evaluation that starts afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use async_trait::async_trait;
use futures::future::{self, BoxFuture};

use crate::types::{Arg, EvaluationContext, EvaluationError, FieldValue, ParsedRule, RuleError};

/// What a predicate returns: a decision, or an error when it cannot decide.
pub type RuleResult = Result<bool, RuleError>;

/// A synchronous rule predicate.
///
/// Implemented for every `Fn(&FieldValue, &[Arg], &EvaluationContext) -> RuleResult`
/// closure registered through [`RuleRegistry::register`].
pub trait SyncRule: Send + Sync {
    fn check(&self, value: &FieldValue, args: &[Arg], ctx: &EvaluationContext<'_>) -> RuleResult;
}

/// An asynchronous rule predicate, e.g. a uniqueness check against a remote
/// service.
///
/// ```rust,ignore
/// struct Available;
///
/// #[async_trait]
/// impl AsyncRule for Available {
///     async fn check(&self, value: &FieldValue, _: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
///         Ok(!lookup_taken(value).await?)
///     }
/// }
/// ```
#[async_trait]
pub trait AsyncRule: Send + Sync {
    async fn check(
        &self,
        value: &FieldValue,
        args: &[Arg],
        ctx: &EvaluationContext<'_>,
    ) -> RuleResult;
}

struct FnRule<F>(F);

impl<F> SyncRule for FnRule<F>
where
    F: Fn(&FieldValue, &[Arg], &EvaluationContext<'_>) -> RuleResult + Send + Sync,
{
    fn check(&self, value: &FieldValue, args: &[Arg], ctx: &EvaluationContext<'_>) -> RuleResult {
        (self.0)(value, args, ctx)
    }
}

/// A registered predicate, synchronous or asynchronous.
#[derive(Clone)]
pub enum Predicate {
    Sync(Arc<dyn SyncRule>),
    Async(Arc<dyn AsyncRule>),
}

impl Predicate {
    /// Run the predicate. Synchronous predicates come back as an
    /// already-resolved future so callers await both kinds the same way.
    pub fn invoke<'a>(
        &'a self,
        value: &'a FieldValue,
        args: &'a [Arg],
        ctx: &'a EvaluationContext<'_>,
    ) -> BoxFuture<'a, RuleResult> {
        match self {
            Predicate::Sync(rule) => Box::pin(future::ready(rule.check(value, args, ctx))),
            Predicate::Async(rule) => rule.check(value, args, ctx),
        }
    }

    #[must_use]
    pub fn is_async(&self) -> bool {
        matches!(self, Predicate::Async(_))
    }
}

/// A registry entry: the predicate plus how the evaluator should call it.
#[derive(Clone)]
pub struct RuleEntry {
    name: String,
    predicate: Predicate,
    defaults: Vec<Arg>,
    runs_when_empty: bool,
    required_when: Option<fn(&[Arg]) -> bool>,
}

impl RuleEntry {
    /// Entry for a synchronous closure.
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&FieldValue, &[Arg], &EvaluationContext<'_>) -> RuleResult + Send + Sync + 'static,
    {
        Self::from_predicate(name, Predicate::Sync(Arc::new(FnRule(f))))
    }

    /// Entry for an asynchronous rule.
    pub fn new_async(name: impl Into<String>, rule: impl AsyncRule + 'static) -> Self {
        Self::from_predicate(name, Predicate::Async(Arc::new(rule)))
    }

    pub fn from_predicate(name: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            name: name.into(),
            predicate,
            defaults: Vec::new(),
            runs_when_empty: false,
            required_when: None,
        }
    }

    /// Positional default arguments, used where a spec leaves a position out.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Vec<Arg>) -> Self {
        self.defaults = defaults;
        self
    }

    /// Mark the rule as required-class: it runs even when the value is empty,
    /// and its presence in a spec makes the whole spec run on empty values.
    #[must_use]
    pub fn runs_when_empty(mut self) -> Self {
        self.runs_when_empty = true;
        self
    }

    /// Like [`runs_when_empty`](Self::runs_when_empty), but only when `when`
    /// holds for the effective arguments. `required:false` uses this to
    /// leave empty values to the optional-field skip.
    #[must_use]
    pub fn runs_when_empty_if(mut self, when: fn(&[Arg]) -> bool) -> Self {
        self.runs_when_empty = true;
        self.required_when = Some(when);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    #[must_use]
    pub fn defaults(&self) -> &[Arg] {
        &self.defaults
    }

    #[must_use]
    pub fn is_required_class(&self) -> bool {
        self.runs_when_empty
    }

    /// Whether this rule, called with the effective `args`, makes an empty
    /// value go through the rules instead of passing outright.
    #[must_use]
    pub fn requires_value(&self, args: &[Arg]) -> bool {
        self.runs_when_empty && self.required_when.map_or(true, |when| when(args))
    }

    /// Given arguments, padded with defaults for the positions left out.
    #[must_use]
    pub fn effective_args(&self, given: &[Arg]) -> Vec<Arg> {
        let mut args = given.to_vec();
        if self.defaults.len() > args.len() {
            args.extend_from_slice(&self.defaults[args.len()..]);
        }
        args
    }
}

impl fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEntry")
            .field("name", &self.name)
            .field("async", &self.predicate.is_async())
            .field("defaults", &self.defaults)
            .field("runs_when_empty", &self.runs_when_empty)
            .field("conditional", &self.required_when.is_some())
            .finish()
    }
}

/// Mapping from rule name to [`RuleEntry`].
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<RuleEntry>>,
}

impl RuleRegistry {
    /// An empty registry, without the built-in rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in rule library.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::rules::register_builtins(&mut registry);
        registry
    }

    /// Register a synchronous rule under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&FieldValue, &[Arg], &EvaluationContext<'_>) -> RuleResult + Send + Sync + 'static,
    {
        self.insert(RuleEntry::new(name, f));
    }

    /// Register an asynchronous rule under `name`, replacing any previous one.
    pub fn register_async(&mut self, name: &str, rule: impl AsyncRule + 'static) {
        self.insert(RuleEntry::new_async(name, rule));
    }

    /// Insert a fully configured entry, replacing any previous one.
    pub fn insert(&mut self, entry: RuleEntry) {
        let name = entry.name.clone();
        let overridden = self.rules.insert(name.clone(), Arc::new(entry)).is_some();
        tracing::debug!(rule = %name, overridden, "registered rule");
    }

    /// Look up a rule by name.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::UnknownRule`] if nothing is registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<Arc<RuleEntry>, EvaluationError> {
        self.rules
            .get(name)
            .cloned()
            .ok_or_else(|| EvaluationError::UnknownRule {
                name: name.to_owned(),
            })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve every rule of a spec, in order.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::UnknownRule`] for the first name that is not
    /// registered.
    pub fn resolve(&self, rules: &[ParsedRule]) -> Result<Vec<Arc<RuleEntry>>, EvaluationError> {
        rules.iter().map(|rule| self.lookup(&rule.name)).collect()
    }
}

static GLOBAL: OnceLock<RwLock<RuleRegistry>> = OnceLock::new();

fn global() -> &'static RwLock<RuleRegistry> {
    GLOBAL.get_or_init(|| RwLock::new(RuleRegistry::with_builtins()))
}

/// Register a synchronous rule in the process-wide registry.
pub fn register<F>(name: &str, f: F)
where
    F: Fn(&FieldValue, &[Arg], &EvaluationContext<'_>) -> RuleResult + Send + Sync + 'static,
{
    insert(RuleEntry::new(name, f));
}

/// Register an asynchronous rule in the process-wide registry.
pub fn register_async(name: &str, rule: impl AsyncRule + 'static) {
    insert(RuleEntry::new_async(name, rule));
}

/// Insert a fully configured entry into the process-wide registry.
pub fn insert(entry: RuleEntry) {
    global()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(entry);
}

/// Look up a rule in the process-wide registry.
///
/// # Errors
///
/// Returns [`EvaluationError::UnknownRule`] if nothing is registered under `name`.
pub fn lookup(name: &str) -> Result<Arc<RuleEntry>, EvaluationError> {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .lookup(name)
}

/// Resolve a spec's rules against the process-wide registry as it is right now.
///
/// # Errors
///
/// Returns [`EvaluationError::UnknownRule`] for the first unregistered name.
pub fn resolve(rules: &[ParsedRule]) -> Result<Vec<Arc<RuleEntry>>, EvaluationError> {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .resolve(rules)
}

/// A copy of the process-wide registry as it is right now.
#[must_use]
pub fn global_snapshot() -> RuleRegistry {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
