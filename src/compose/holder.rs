//! Operation holder
//!
//! The bag of named operations and required names that backs every trait
//! node. Holders are built once through [`HolderBuilder`] and afterwards only
//! grow: an existing name is never replaced.

use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::compose::{TraitError, TraitResult};
use crate::host::Instance;
use crate::runtime::value::{RuntimeValue, Symbol};

/// A callable implementation: receives the receiver instance and positional
/// arguments.
pub type Operation = Arc<dyn Fn(&Instance, &[RuntimeValue]) -> TraitResult<RuntimeValue> + Send + Sync>;

/// Wrap a closure as an [`Operation`]
pub fn operation<F>(f: F) -> Operation
where
    F: Fn(&Instance, &[RuntimeValue]) -> TraitResult<RuntimeValue> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Named operations plus required names
#[derive(Clone, Default)]
pub struct OperationHolder {
    /// Definition order is kept so enumeration is deterministic
    operations: IndexMap<Symbol, Operation>,
    requirements: IndexSet<Symbol>,
}

impl OperationHolder {
    /// Create an empty holder
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a definition block
    pub fn builder() -> HolderBuilder {
        HolderBuilder::default()
    }

    /// Whether the holder defines `name`
    pub fn defines(
        &self,
        name: &str,
    ) -> bool {
        self.operations.contains_key(name)
    }

    /// Get the implementation of `name`
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Operation> {
        self.operations.get(name)
    }

    /// Whether `name` is declared as a requirement
    pub fn requires(
        &self,
        name: &str,
    ) -> bool {
        self.requirements.contains(name)
    }

    pub fn operation_names(&self) -> impl Iterator<Item = &Symbol> {
        self.operations.keys()
    }

    pub fn requirements(&self) -> impl Iterator<Item = &Symbol> {
        self.requirements.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Install a new operation; an existing name is refused
    pub(crate) fn try_insert(
        &mut self,
        name: Symbol,
        implementation: Operation,
    ) -> TraitResult<()> {
        match self.operations.entry(name) {
            indexmap::map::Entry::Occupied(entry) => {
                Err(TraitError::name_conflict(entry.key().clone()))
            }
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(implementation);
                Ok(())
            }
        }
    }

    /// Install or replace; only used for override tables
    pub(crate) fn upsert(
        &mut self,
        name: Symbol,
        implementation: Operation,
    ) -> bool {
        self.operations.insert(name, implementation).is_some()
    }
}

impl fmt::Debug for OperationHolder {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("OperationHolder")
            .field("operations", &self.operations.keys().collect::<Vec<_>>())
            .field("requirements", &self.requirements)
            .finish()
    }
}

/// Definition block for an [`OperationHolder`]
///
/// ```
/// use trait_compose::compose::OperationHolder;
/// use trait_compose::RuntimeValue;
///
/// let holder = OperationHolder::builder()
///     .requires(["m01"])
///     .define("message_01", |this, _| this.call("m01", &[]))
///     .define("answer", |_, _| Ok(RuntimeValue::Int(42)))
///     .build();
///
/// assert!(holder.defines("answer"));
/// assert!(holder.requires("m01"));
/// ```
#[derive(Default)]
pub struct HolderBuilder {
    holder: OperationHolder,
}

impl HolderBuilder {
    /// Declare required operation names
    pub fn requires<I, S>(
        mut self,
        names: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.holder
            .requirements
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Define an operation. Defining the same name twice in one block keeps
    /// the later body.
    pub fn define<F>(
        mut self,
        name: impl Into<Symbol>,
        f: F,
    ) -> Self
    where
        F: Fn(&Instance, &[RuntimeValue]) -> TraitResult<RuntimeValue> + Send + Sync + 'static,
    {
        self.holder.operations.insert(name.into(), Arc::new(f));
        self
    }

    /// Define an operation from an existing [`Operation`]
    pub fn define_operation(
        mut self,
        name: impl Into<Symbol>,
        implementation: Operation,
    ) -> Self {
        self.holder.operations.insert(name.into(), implementation);
        self
    }

    /// Define an operation that always returns `value`
    pub fn constant(
        self,
        name: impl Into<Symbol>,
        value: impl Into<RuntimeValue>,
    ) -> Self {
        let value = value.into();
        self.define(name, move |_, _| Ok(value.clone()))
    }

    pub fn build(self) -> OperationHolder {
        self.holder
    }
}
