//! 操作解析
//!
//! Recursive lookup of the nodes able to provide an operation name.
//!
//! Rules, applied at every node:
//! 1. Removals accumulate downward: a name removed at a node is excluded from
//!    every holder below it, never from siblings combined above it.
//! 2. An override that defines the name short-circuits the search, unless the
//!    node's own removal set contains the name.
//! 3. Otherwise the node's own holder (if it defines the name and the name is
//!    not excluded) comes first, then the left subtree, then the right one.
//!
//! Dispatch resolves on every call; nothing is cached, so later mutations are
//! observed immediately by every entity type using the tree.

use smallvec::SmallVec;
use tracing::trace;

use super::holder::Operation;
use super::node::{RemovalSet, Trait};
use super::{TraitError, TraitResult};
use crate::host::Instance;
use crate::runtime::value::{RuntimeValue, Symbol};

/// A node able to provide an operation, with the implementation it provides
#[derive(Clone)]
pub struct Provider {
    /// The node whose holder defines the operation
    pub source: Trait,
    /// The implementation, captured at resolution time
    pub operation: Operation,
}

impl Provider {
    /// Invoke the implementation on `receiver`
    pub fn invoke(
        &self,
        receiver: &Instance,
        args: &[RuntimeValue],
    ) -> TraitResult<RuntimeValue> {
        (self.operation)(receiver, args)
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "Provider({})", self.source.name())
    }
}

/// Ordered providers; conflicts rarely exceed two
pub type Providers = SmallVec<[Provider; 2]>;

/// Find every node under `node` able to provide `name`, given the names
/// already removed by enclosing scopes.
pub fn resolve(
    node: Option<&Trait>,
    name: &str,
    removed_acc: &RemovalSet,
) -> Providers {
    let mut out = Providers::new();
    if let Some(node) = node {
        collect(node, name, removed_acc.contains(name), true, &mut out);
    }
    trace!(
        "resolve `{}` -> {} provider(s)",
        name,
        out.len()
    );
    out
}

/// Providers below `node`, ignoring `node`'s own override. Used by the
/// override installed by `redefine`, which must see what it replaces.
pub(crate) fn resolve_natural(
    node: &Trait,
    name: &str,
) -> Providers {
    let mut out = Providers::new();
    collect(node, name, false, false, &mut out);
    out
}

fn collect(
    node: &Trait,
    name: &str,
    excluded: bool,
    use_override: bool,
    out: &mut Providers,
) {
    let removed_here = node.removed().contains(name);

    if use_override && !removed_here {
        if let Some(overrides) = node.override_trait() {
            let found = overrides.holder().get(name).cloned();
            if let Some(operation) = found {
                out.push(Provider {
                    source: overrides,
                    operation,
                });
                return;
            }
        }
    }

    let excluded = excluded || removed_here;
    if !excluded {
        let found = node.holder().get(name).cloned();
        if let Some(operation) = found {
            out.push(Provider {
                source: node.clone(),
                operation,
            });
        }
    }

    if let Some(left) = node.left() {
        collect(left, name, excluded, true, out);
    }
    if let Some(right) = node.right() {
        collect(right, name, excluded, true, out);
    }
}

/// Resolve and invoke `name` on `receiver`.
///
/// Exactly one provider is invoked; zero fails with `NotImplemented`, more
/// than one with `UnresolvedConflict`.
pub fn dispatch(
    tree: Option<&Trait>,
    name: &str,
    receiver: &Instance,
    args: &[RuntimeValue],
) -> TraitResult<RuntimeValue> {
    let providers = match tree {
        Some(tree) => tree.providers(name),
        None => Providers::new(),
    };
    match providers.as_slice() {
        [] => Err(TraitError::not_implemented(name)),
        [provider] => {
            trace!("dispatch `{}` to {}", name, provider.source.name());
            provider.invoke(receiver, args)
        }
        many => Err(TraitError::conflict(name, many.len())),
    }
}

impl Trait {
    /// Providers of `name` in this tree, in resolution order
    pub fn providers(
        &self,
        name: &str,
    ) -> Providers {
        resolve(Some(self), name, self.removed())
    }

    /// Whether `name` resolves to at least one provider
    pub fn resolves(
        &self,
        name: &str,
    ) -> bool {
        !self.providers(name).is_empty()
    }

    /// The unique implementation of `name`
    pub fn implementation(
        &self,
        name: &str,
    ) -> TraitResult<Operation> {
        let mut providers = self.providers(name);
        match providers.len() {
            0 => Err(TraitError::not_implemented(name)),
            1 => Ok(providers.swap_remove(0).operation),
            n => Err(TraitError::conflict(name, n)),
        }
    }

    /// Every implementation of `name`, in resolution order
    pub fn implementations(
        &self,
        name: &str,
    ) -> Vec<Operation> {
        self.providers(name)
            .into_iter()
            .map(|p| p.operation)
            .collect()
    }

    /// Every name defined by any holder in the tree, overrides included,
    /// whether or not it currently resolves.
    pub fn operation_names(&self) -> Vec<Symbol> {
        let mut names = RemovalSet::new();
        self.walk(&mut |node| {
            names.extend(node.holder().operation_names().cloned());
            if let Some(overrides) = node.override_trait() {
                names.extend(overrides.holder().operation_names().cloned());
            }
        });
        names.into_iter().collect()
    }

    /// Names that currently resolve to two or more providers
    pub fn conflicts(&self) -> Vec<(Symbol, usize)> {
        self.operation_names()
            .into_iter()
            .filter_map(|name| {
                let count = self.providers(&name).len();
                (count > 1).then_some((name, count))
            })
            .collect()
    }
}
