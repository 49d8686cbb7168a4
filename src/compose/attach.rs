//! Attachment manager
//!
//! Binds a trait to an entity type. The host collaborator only has to store
//! named bindings and answer whether it defines a name itself; the thunks it
//! stores call back into the resolver at call time.
//!
//! Attaching `node` to a host:
//! 1. the host's composed tree becomes `node + previous`
//! 2. requirement stubs are installed where the host has no binding at all,
//!    or where nothing in the composed tree can provide the name
//! 3. dispatch thunks are installed for every name any holder in `node`
//!    defines, unless the host wrote that operation itself or the name is an
//!    unreachable requirement
//! 4. the host is recorded on every node of the composed tree, so later
//!    `add_operation` / `redefine` calls on any of them reach it

use std::sync::{Arc, Weak};

use tracing::{debug, warn};

use super::node::Trait;
use super::resolver::dispatch;
use super::{TraitError, TraitResult};
use crate::host::Instance;
use crate::runtime::value::{RuntimeValue, Symbol};

/// Entity/dispatch collaborator
pub trait DispatchHost: Send + Sync {
    /// Name used in errors and logs
    fn host_name(&self) -> String;

    /// Whether the host itself (not a trait) wrote an operation under `name`
    fn defines_directly(
        &self,
        name: &str,
    ) -> bool;

    /// Whether anything, user-written or installed, is bound to `name`
    fn has_binding(
        &self,
        name: &str,
    ) -> bool;

    /// Bind `name` to a thunk, replacing any previous thunk
    fn install(
        &self,
        name: Symbol,
        thunk: Thunk,
    );

    /// Current composed tree
    fn composed(&self) -> Option<Trait>;

    fn set_composed(
        &self,
        tree: Trait,
    );
}

/// Call-time binding installed on a host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Thunk {
    /// Resolve the name in the host's composed tree and invoke it
    Dispatch(Symbol),
    /// Unsatisfied requirement; fails when called
    MissingRequirement(Symbol),
}

impl Thunk {
    pub fn name(&self) -> &Symbol {
        match self {
            Thunk::Dispatch(name) | Thunk::MissingRequirement(name) => name,
        }
    }

    /// Run the thunk for `receiver`, whose entity type is `entity` and whose
    /// composed tree is `tree`
    pub fn invoke(
        &self,
        tree: Option<&Trait>,
        entity: &str,
        receiver: &Instance,
        args: &[RuntimeValue],
    ) -> TraitResult<RuntimeValue> {
        match self {
            Thunk::Dispatch(name) => dispatch(tree, name, receiver, args),
            Thunk::MissingRequirement(name) => Err(TraitError::MissingRequirement {
                name: name.clone(),
                entity: entity.to_string(),
            }),
        }
    }
}

/// Diagnostics emitted while attaching. They never change behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachOptions {
    /// Warn about names that already resolve to several providers
    pub report_conflicts: bool,
    /// Warn about requirements the host has not defined yet
    pub report_unmet_requirements: bool,
}

/// Attach with default options, returning the host's new composed tree
pub fn attach<H>(
    node: &Trait,
    host: &Arc<H>,
) -> Trait
where
    H: DispatchHost + 'static,
{
    attach_with(node, host, &AttachOptions::default())
}

/// Attach `node` to `host`, returning the host's new composed tree
pub fn attach_with<H>(
    node: &Trait,
    host: &Arc<H>,
    options: &AttachOptions,
) -> Trait
where
    H: DispatchHost + 'static,
{
    let host_name = host.host_name();
    let previous = host.composed();
    let composed = Trait::compose(node, previous.as_ref());
    host.set_composed(composed.clone());
    debug!("attach {} to `{}`", node.describe(), host_name);

    let requirements = composed.requirements();
    let mut stubs = 0usize;
    for name in &requirements {
        if host.defines_directly(name) {
            continue;
        }
        // an earlier dispatch thunk is replaced when nothing provides the name
        if !host.has_binding(name) || !composed.resolves(name) {
            host.install(name.clone(), Thunk::MissingRequirement(name.clone()));
            stubs += 1;
        }
    }

    let mut thunks = 0usize;
    for name in node.operation_names() {
        if host.defines_directly(&name) {
            continue;
        }
        // unreachable required names keep their stub
        if requirements.contains(&name) && !composed.resolves(&name) {
            continue;
        }
        host.install(name.clone(), Thunk::Dispatch(name));
        thunks += 1;
    }

    let weak: Weak<dyn DispatchHost> = {
        let strong: Arc<dyn DispatchHost> = host.clone();
        Arc::downgrade(&strong)
    };
    composed.walk(&mut |n| {
        n.record_host(&weak);
    });

    debug!(
        "`{}`: {} dispatch thunk(s), {} requirement stub(s)",
        host_name, thunks, stubs
    );

    if options.report_conflicts {
        for (name, providers) in composed.conflicts() {
            warn!(
                "`{}`: operation `{}` has {} conflicting providers",
                host_name, name, providers
            );
        }
    }
    if options.report_unmet_requirements {
        for name in composed.unmet_requirements(host.as_ref()) {
            warn!("`{}`: requirement `{}` is not defined yet", host_name, name);
        }
    }

    composed
}

/// Make `name` callable on every live host attached to `node`
pub(crate) fn notify(
    node: &Trait,
    name: &Symbol,
) {
    for host in node.attached_hosts() {
        if host.defines_directly(name) {
            debug!("`{}` keeps its own `{}`", host.host_name(), name);
            continue;
        }
        host.install(name.clone(), Thunk::Dispatch(name.clone()));
        debug!("`{}` now dispatches `{}`", host.host_name(), name);
    }
}

/// Whether `node` is one of the leaves of the host's composed tree
pub fn has_trait(
    host: &dyn DispatchHost,
    node: &Trait,
) -> bool {
    host.composed()
        .map(|tree| tree.contains_leaf(node))
        .unwrap_or(false)
}
