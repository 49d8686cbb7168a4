//! In-place trait mutation
//!
//! `add_operation` and `redefine` are the only operations that change an
//! existing node. Both validate everything before writing, run under the
//! process-wide mutation lock, and then make the name callable on every entity type
//! already attached to the node.

use std::sync::Arc;

use tracing::debug;

use super::attach::notify;
use super::holder::{operation, Operation};
use super::node::Trait;
use super::resolver::{resolve_natural, Provider};
use super::{TraitError, TraitResult};
use crate::host::Instance;
use crate::runtime::value::{RuntimeValue, Symbol};

/// A provider's implementation bound to the receiver of the current call
#[derive(Clone)]
pub struct BoundOperation {
    receiver: Instance,
    provider: Provider,
}

impl BoundOperation {
    /// Call the implementation with `args`
    pub fn call(
        &self,
        args: &[RuntimeValue],
    ) -> TraitResult<RuntimeValue> {
        self.provider.invoke(&self.receiver, args)
    }

    /// Node whose holder supplied this implementation
    pub fn source(&self) -> &Trait {
        &self.provider.source
    }

    pub fn receiver(&self) -> &Instance {
        &self.receiver
    }
}

impl std::fmt::Debug for BoundOperation {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "BoundOperation({})", self.provider.source.name())
    }
}

/// Conflict resolver: receives the bound providers (left subtree before right
/// subtree) and the original arguments, once per call
pub type Resolver =
    Arc<dyn Fn(&[BoundOperation], &[RuntimeValue]) -> TraitResult<RuntimeValue> + Send + Sync>;

impl Trait {
    /// Install `name` into this node's own holder
    pub fn add_operation<F>(
        &self,
        name: impl Into<Symbol>,
        f: F,
    ) -> TraitResult<()>
    where
        F: Fn(&Instance, &[RuntimeValue]) -> TraitResult<RuntimeValue> + Send + Sync + 'static,
    {
        self.install_operation(name, operation(f))
    }

    /// Install an existing [`Operation`] under `name`
    pub fn install_operation(
        &self,
        name: impl Into<Symbol>,
        implementation: Operation,
    ) -> TraitResult<()> {
        let name = name.into();
        let _guard = self.lock_mutation();

        // a name removed at this node would land in a holder it hides
        if self.resolves(&name) || self.removed().contains(&name) {
            return Err(TraitError::name_conflict(name));
        }
        if self.declares_requirement(&name) {
            return Err(TraitError::requirement_conflict(name));
        }
        // vacancy is rechecked under the write lock
        self.holder_mut().try_insert(name.clone(), implementation)?;

        debug!("added `{}` to {}", name, self.name());
        notify(self, &name);
        Ok(())
    }

    /// Resolve a conflict on `name` manually.
    ///
    /// Every call of `name` through this node runs `resolver` once with the
    /// providers found below the node at call time.
    pub fn redefine<F>(
        &self,
        name: impl Into<Symbol>,
        resolver: F,
    ) -> TraitResult<()>
    where
        F: Fn(&[BoundOperation], &[RuntimeValue]) -> TraitResult<RuntimeValue> + Send + Sync + 'static,
    {
        self.redefine_with(name, Arc::new(resolver))
    }

    /// [`Trait::redefine`] with a shared resolver
    pub fn redefine_with(
        &self,
        name: impl Into<Symbol>,
        resolver: Resolver,
    ) -> TraitResult<()> {
        let name = name.into();
        let _guard = self.lock_mutation();

        let found = resolve_natural(self, &name).len();
        if found == 0 {
            return Err(TraitError::not_implemented(name));
        }

        // the override lives inside this node; a strong handle would leak it
        let node = self.downgrade();
        let op_name = name.clone();
        let implementation = operation(move |receiver, args| {
            let node =
                Trait::upgrade(&node).ok_or_else(|| TraitError::not_implemented(op_name.clone()))?;
            let bound: Vec<BoundOperation> = resolve_natural(&node, &op_name)
                .into_iter()
                .map(|provider| BoundOperation {
                    receiver: receiver.clone(),
                    provider,
                })
                .collect();
            if bound.is_empty() {
                return Err(TraitError::not_implemented(op_name.clone()));
            }
            resolver(&bound, args)
        });

        let overrides = self.override_or_init();
        let replaced = overrides.holder_mut().upsert(name.clone(), implementation);
        debug!(
            "redefined `{}` on {} over {} provider(s){}",
            name,
            self.name(),
            found,
            if replaced { ", replacing previous resolution" } else { "" }
        );

        notify(self, &name);
        Ok(())
    }
}

/// Ready-made conflict resolvers
pub mod strategy {
    use super::BoundOperation;
    use crate::compose::{TraitError, TraitResult};
    use crate::runtime::value::RuntimeValue;

    /// Call every provider in order; the result is the list of their results
    pub fn call_all(
    ) -> impl Fn(&[BoundOperation], &[RuntimeValue]) -> TraitResult<RuntimeValue> + Send + Sync + 'static
    {
        |ops: &[BoundOperation], args: &[RuntimeValue]| {
            let mut results = Vec::with_capacity(ops.len());
            for op in ops {
                results.push(op.call(args)?);
            }
            Ok(RuntimeValue::list(results))
        }
    }

    /// Call only the first (leftmost) provider
    pub fn first(
    ) -> impl Fn(&[BoundOperation], &[RuntimeValue]) -> TraitResult<RuntimeValue> + Send + Sync + 'static
    {
        |ops: &[BoundOperation], args: &[RuntimeValue]| match ops.first() {
            Some(op) => op.call(args),
            None => Err(TraitError::runtime("no provider to call")),
        }
    }

    /// Call only the last (rightmost) provider
    pub fn last(
    ) -> impl Fn(&[BoundOperation], &[RuntimeValue]) -> TraitResult<RuntimeValue> + Send + Sync + 'static
    {
        |ops: &[BoundOperation], args: &[RuntimeValue]| match ops.last() {
            Some(op) => op.call(args),
            None => Err(TraitError::runtime("no provider to call")),
        }
    }

    /// Thread a value through the providers: the first receives the original
    /// arguments, each following one the previous result.
    pub fn pipeline(
    ) -> impl Fn(&[BoundOperation], &[RuntimeValue]) -> TraitResult<RuntimeValue> + Send + Sync + 'static
    {
        |ops: &[BoundOperation], args: &[RuntimeValue]| {
            let (head, rest) = ops
                .split_first()
                .ok_or_else(|| TraitError::runtime("no provider to call"))?;
            let mut acc = head.call(args)?;
            for op in rest {
                acc = op.call(std::slice::from_ref(&acc))?;
            }
            Ok(acc)
        }
    }
}
