//! Entity types and instances
//!
//! The default host for the composition engine: a named entity type with an
//! ordered method table, and instances that send calls through it. Methods
//! written directly on the type always win over anything a trait installs.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::compose::{
    attach_with, has_trait, operation, AttachOptions, DispatchHost, Operation, Thunk, Trait,
    TraitError, TraitResult,
};
use crate::runtime::value::{RuntimeValue, Symbol};

/// A binding in an entity type's method table
#[derive(Clone)]
pub enum Method {
    /// Written directly on the entity type
    Native(Operation),
    /// Installed by trait attachment
    Thunk(Thunk),
}

/// Kind of binding, for inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Native,
    Dispatch,
    RequirementStub,
}

impl Method {
    pub fn kind(&self) -> MethodKind {
        match self {
            Method::Native(_) => MethodKind::Native,
            Method::Thunk(Thunk::Dispatch(_)) => MethodKind::Dispatch,
            Method::Thunk(Thunk::MissingRequirement(_)) => MethodKind::RequirementStub,
        }
    }
}

struct EntityTypeInner {
    name: Arc<str>,
    methods: RwLock<IndexMap<Symbol, Method>>,
    traits: RwLock<Option<Trait>>,
    attach_options: RwLock<AttachOptions>,
    next_instance: AtomicUsize,
}

/// Shared handle to an entity type
#[derive(Clone)]
pub struct EntityType(Arc<EntityTypeInner>);

impl EntityType {
    /// Create an entity type with no methods and no traits
    pub fn new(name: impl AsRef<str>) -> Self {
        EntityType(Arc::new(EntityTypeInner {
            name: Arc::from(name.as_ref()),
            methods: RwLock::new(IndexMap::new()),
            traits: RwLock::new(None),
            attach_options: RwLock::new(AttachOptions::default()),
            next_instance: AtomicUsize::new(0),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Diagnostics used by subsequent `uses` calls
    pub fn set_attach_options(
        &self,
        options: AttachOptions,
    ) {
        *self.0.attach_options.write() = options;
    }

    /// Write an operation directly on the type. Replaces requirement stubs
    /// and dispatch thunks for the same name.
    pub fn define_method<F>(
        &self,
        name: impl Into<Symbol>,
        f: F,
    ) where
        F: Fn(&Instance, &[RuntimeValue]) -> TraitResult<RuntimeValue> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!("`{}` defines `{}`", self.name(), name);
        self.0
            .methods
            .write()
            .insert(name, Method::Native(operation(f)));
    }

    /// Attach a trait; returns the new composed tree
    pub fn uses(
        &self,
        node: &Trait,
    ) -> Trait {
        let options = *self.0.attach_options.read();
        attach_with(node, &self.0, &options)
    }

    /// Whether `node` is a leaf of the composed tree
    pub fn has_trait(
        &self,
        node: &Trait,
    ) -> bool {
        has_trait(self.0.as_ref(), node)
    }

    /// The composed tree of every trait attached so far
    pub fn traits(&self) -> Option<Trait> {
        self.0.traits.read().clone()
    }

    /// Requirements of the composed tree this type has not written itself
    pub fn unmet_requirements(&self) -> IndexSet<Symbol> {
        self.traits()
            .map(|tree| tree.unmet_requirements(self.0.as_ref()))
            .unwrap_or_default()
    }

    /// Create a new instance
    pub fn instantiate(&self) -> Instance {
        let id = self.0.next_instance.fetch_add(1, Ordering::SeqCst);
        Instance(Arc::new(InstanceInner {
            id,
            entity: self.clone(),
            slots: RwLock::new(IndexMap::new()),
        }))
    }

    /// Whether any binding exists for `name`
    pub fn responds_to(
        &self,
        name: &str,
    ) -> bool {
        self.0.has_binding(name)
    }

    /// Kind of the binding for `name`, if any
    pub fn method_kind(
        &self,
        name: &str,
    ) -> Option<MethodKind> {
        self.0.methods.read().get(name).map(Method::kind)
    }

    /// Bound names in definition order
    pub fn method_names(&self) -> Vec<Symbol> {
        self.0.methods.read().keys().cloned().collect()
    }

    fn method(
        &self,
        name: &str,
    ) -> Option<Method> {
        self.0.methods.read().get(name).cloned()
    }
}

impl PartialEq for EntityType {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for EntityType {}

impl fmt::Debug for EntityType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "EntityType({})", self.name())
    }
}

impl DispatchHost for EntityTypeInner {
    fn host_name(&self) -> String {
        self.name.to_string()
    }

    fn defines_directly(
        &self,
        name: &str,
    ) -> bool {
        matches!(self.methods.read().get(name), Some(Method::Native(_)))
    }

    fn has_binding(
        &self,
        name: &str,
    ) -> bool {
        self.methods.read().contains_key(name)
    }

    fn install(
        &self,
        name: Symbol,
        thunk: Thunk,
    ) {
        let mut methods = self.methods.write();
        if matches!(methods.get(&name), Some(Method::Native(_))) {
            return;
        }
        methods.insert(name, Method::Thunk(thunk));
    }

    fn composed(&self) -> Option<Trait> {
        self.traits.read().clone()
    }

    fn set_composed(
        &self,
        tree: Trait,
    ) {
        *self.traits.write() = Some(tree);
    }
}

struct InstanceInner {
    id: usize,
    entity: EntityType,
    slots: RwLock<IndexMap<Symbol, RuntimeValue>>,
}

/// Receiver handle; clones refer to the same instance
#[derive(Clone)]
pub struct Instance(Arc<InstanceInner>);

impl Instance {
    /// Instance number within its entity type
    pub fn id(&self) -> usize {
        self.0.id
    }

    pub fn entity_type(&self) -> &EntityType {
        &self.0.entity
    }

    /// Send `name` with `args` to this instance
    pub fn call(
        &self,
        name: &str,
        args: &[RuntimeValue],
    ) -> TraitResult<RuntimeValue> {
        let entity = &self.0.entity;
        trace!("{}.{}({} arg(s))", self, name, args.len());
        match entity.method(name) {
            Some(Method::Native(op)) => op(self, args),
            Some(Method::Thunk(thunk)) => {
                let tree = entity.traits();
                thunk.invoke(tree.as_ref(), entity.name(), self, args)
            }
            None => Err(TraitError::NoMethod {
                name: name.into(),
                entity: entity.name().to_string(),
            }),
        }
    }

    pub fn responds_to(
        &self,
        name: &str,
    ) -> bool {
        self.0.entity.responds_to(name)
    }

    /// Read a per-instance slot
    pub fn get(
        &self,
        slot: &str,
    ) -> Option<RuntimeValue> {
        self.0.slots.read().get(slot).cloned()
    }

    /// Write a per-instance slot, returning the previous value
    pub fn set(
        &self,
        slot: impl Into<Symbol>,
        value: impl Into<RuntimeValue>,
    ) -> Option<RuntimeValue> {
        self.0.slots.write().insert(slot.into(), value.into())
    }

    /// Wrap as a value (e.g. to return `self` from an operation)
    pub fn to_value(&self) -> RuntimeValue {
        RuntimeValue::Instance(self.clone())
    }
}

impl PartialEq for Instance {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Instance {}

impl fmt::Debug for Instance {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Instance({}#{})", self.0.entity.name(), self.0.id)
    }
}

impl fmt::Display for Instance {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}#{}", self.0.entity.name(), self.0.id)
    }
}
