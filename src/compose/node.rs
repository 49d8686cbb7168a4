//! Trait nodes and the composition algebra
//!
//! A trait is a binary tree. A leaf wraps an [`OperationHolder`]; a composite
//! references its children. `sum` builds a composite with two children,
//! `remove` one with a single child and a removal set. Every node owns a
//! holder of its own (empty for fresh composites) so `alias` and
//! `add_operation` have somewhere to install operations.
//!
//! Nodes are shared (`Arc`) by every composite and entity type that uses
//! them. The only in-place mutations are `add_operation` and `redefine`;
//! they are serialized by one process-wide writer lock and are visible to
//! every holder of the node.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};
use std::sync::{Arc, Weak};

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::attach::DispatchHost;
use super::holder::OperationHolder;
use super::trait_id::{next_trait_id, TraitId};
use crate::runtime::value::Symbol;

/// Names suppressed within a subtree
pub type RemovalSet = IndexSet<Symbol>;

/// Trait node storage
pub struct TraitNode {
    id: TraitId,
    label: Option<Arc<str>>,
    left: Option<Trait>,
    right: Option<Trait>,
    removed: RemovalSet,
    holder: RwLock<OperationHolder>,
    /// Manually resolved implementations, populated only by `redefine`
    overrides: RwLock<Option<Trait>>,
    /// Hosts this node (or a composite containing it) has been attached to
    attached_to: RwLock<Vec<Weak<dyn DispatchHost>>>,
}

/// Single writer for `add_operation` / `redefine` across every tree.
/// Dispatch never takes it.
static MUTATION: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Shared handle to a trait node
///
/// Cloning is cheap and yields the same node; equality is node identity.
#[derive(Clone)]
pub struct Trait(Arc<TraitNode>);

impl Trait {
    fn from_parts(
        label: Option<Arc<str>>,
        left: Option<Trait>,
        right: Option<Trait>,
        removed: RemovalSet,
        holder: OperationHolder,
    ) -> Self {
        Trait(Arc::new(TraitNode {
            id: next_trait_id(),
            label,
            left,
            right,
            removed,
            holder: RwLock::new(holder),
            overrides: RwLock::new(None),
            attached_to: RwLock::new(Vec::new()),
        }))
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Wrap a holder as a leaf trait
    pub fn leaf(holder: OperationHolder) -> Self {
        let node = Self::from_parts(None, None, None, RemovalSet::new(), holder);
        debug!("leaf trait {} created", node.id());
        node
    }

    /// Leaf trait with a display label used in logs and descriptions
    pub fn labeled(
        label: impl AsRef<str>,
        holder: OperationHolder,
    ) -> Self {
        let node = Self::from_parts(
            Some(Arc::from(label.as_ref())),
            None,
            None,
            RemovalSet::new(),
            holder,
        );
        debug!("leaf trait {} ({}) created", node.id(), label.as_ref());
        node
    }

    /// Leaf trait with no operations
    pub fn empty() -> Self {
        Self::leaf(OperationHolder::new())
    }

    /// `a + b`: composite with both operands as children
    pub fn sum(
        a: &Trait,
        b: &Trait,
    ) -> Trait {
        Self::compose(a, Some(b))
    }

    /// Composite of `a` and an optional right operand
    pub fn compose(
        a: &Trait,
        b: Option<&Trait>,
    ) -> Trait {
        let node = Self::from_parts(
            None,
            Some(a.clone()),
            b.cloned(),
            RemovalSet::new(),
            OperationHolder::new(),
        );
        debug!("composed {}", node.describe());
        node
    }

    /// `a - name`: single-child composite excluding `name` below it
    pub fn remove(
        a: &Trait,
        name: impl Into<Symbol>,
    ) -> Trait {
        Self::remove_all(a, [name])
    }

    /// Exclude several names at once
    pub fn remove_all<I, S>(
        a: &Trait,
        names: I,
    ) -> Trait
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let removed: RemovalSet = names.into_iter().map(Into::into).collect();
        let node = Self::from_parts(None, Some(a.clone()), None, removed, OperationHolder::new());
        debug!("removal {}", node.describe());
        node
    }

    /// Single-child composite carrying a fresh holder (used by alias)
    pub(crate) fn extend(
        a: &Trait,
        holder: OperationHolder,
    ) -> Trait {
        Self::from_parts(None, Some(a.clone()), None, RemovalSet::new(), holder)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn id(&self) -> TraitId {
        self.0.id
    }

    pub fn label(&self) -> Option<&str> {
        self.0.label.as_deref()
    }

    pub fn left(&self) -> Option<&Trait> {
        self.0.left.as_ref()
    }

    pub fn right(&self) -> Option<&Trait> {
        self.0.right.as_ref()
    }

    /// Children in left, right order
    pub fn children(&self) -> impl Iterator<Item = &Trait> {
        self.0.left.iter().chain(self.0.right.iter())
    }

    /// A leaf has no children
    pub fn is_leaf(&self) -> bool {
        self.0.left.is_none() && self.0.right.is_none()
    }

    /// Names removed at this node
    pub fn removed(&self) -> &RemovalSet {
        &self.0.removed
    }

    /// Read access to this node's own holder
    pub fn holder(&self) -> RwLockReadGuard<'_, OperationHolder> {
        self.0.holder.read()
    }

    pub(crate) fn holder_mut(&self) -> RwLockWriteGuard<'_, OperationHolder> {
        self.0.holder.write()
    }

    /// The override node, if `redefine` has been used on this node
    pub fn override_trait(&self) -> Option<Trait> {
        self.0.overrides.read().clone()
    }

    /// Get the override node, creating it on first use
    pub(crate) fn override_or_init(&self) -> Trait {
        let mut slot = self.0.overrides.write();
        slot.get_or_insert_with(|| {
            debug!("override table created for {}", self.0.id);
            Trait::empty()
        })
        .clone()
    }

    /// Exclusive guard held while validating and applying a mutation
    pub(crate) fn lock_mutation(&self) -> MutexGuard<'static, ()> {
        MUTATION.lock()
    }

    pub(crate) fn downgrade(&self) -> Weak<TraitNode> {
        Arc::downgrade(&self.0)
    }

    pub(crate) fn upgrade(weak: &Weak<TraitNode>) -> Option<Trait> {
        weak.upgrade().map(Trait)
    }

    /// Leaves in left-to-right order
    pub fn leaves(&self) -> Vec<Trait> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }

    /// Whether `leaf` is one of this tree's leaves
    pub fn contains_leaf(
        &self,
        leaf: &Trait,
    ) -> bool {
        if self.is_leaf() {
            return self == leaf;
        }
        self.children().any(|child| child.contains_leaf(leaf))
    }

    /// Every node of the tree, pre-order (overrides excluded)
    pub(crate) fn walk(
        &self,
        visit: &mut dyn FnMut(&Trait),
    ) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    // ------------------------------------------------------------------
    // Attached hosts
    // ------------------------------------------------------------------

    /// Record a host on this node. Returns false if it was already present.
    pub(crate) fn record_host(
        &self,
        host: &Weak<dyn DispatchHost>,
    ) -> bool {
        let mut hosts = self.0.attached_to.write();
        hosts.retain(|h| h.strong_count() > 0);
        if hosts.iter().any(|h| Weak::ptr_eq(h, host)) {
            return false;
        }
        hosts.push(host.clone());
        true
    }

    /// Live hosts attached to this node; dead references are pruned
    pub fn attached_hosts(&self) -> Vec<Arc<dyn DispatchHost>> {
        let mut hosts = self.0.attached_to.write();
        hosts.retain(|h| h.strong_count() > 0);
        hosts.iter().filter_map(Weak::upgrade).collect()
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Short name: the label if any, otherwise the id
    pub fn name(&self) -> String {
        match self.label() {
            Some(label) => label.to_string(),
            None => self.id().to_string(),
        }
    }

    /// One-line algebraic rendering, e.g. `((T1 + T2) - m2)`
    pub fn describe(&self) -> String {
        let mut text = match (self.left(), self.right()) {
            (None, None) => self.name(),
            (Some(l), Some(r)) => format!("({} + {})", l.describe(), r.describe()),
            (Some(only), None) | (None, Some(only)) => only.describe(),
        };
        if !self.0.removed.is_empty() {
            let names: Vec<&str> = self.0.removed.iter().map(Symbol::as_str).collect();
            text = format!("({} - {})", text, names.join(", "));
        }
        let own = self.holder();
        if !self.is_leaf() && !own.is_empty() {
            let names: Vec<&str> = own.operation_names().map(Symbol::as_str).collect();
            text = format!("({} << {})", text, names.join(", "));
        }
        text
    }
}

fn collect_leaves(
    node: &Trait,
    out: &mut Vec<Trait>,
) {
    if node.is_leaf() {
        out.push(node.clone());
        return;
    }
    for child in node.children() {
        collect_leaves(child, out);
    }
}

impl PartialEq for Trait {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Trait {}

impl Hash for Trait {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Trait {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Trait({} {})", self.id(), self.describe())
    }
}

impl fmt::Display for Trait {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// ============================================================================
// Operator sugar
// ============================================================================

impl Add for &Trait {
    type Output = Trait;

    fn add(
        self,
        rhs: &Trait,
    ) -> Trait {
        Trait::sum(self, rhs)
    }
}

impl Add for Trait {
    type Output = Trait;

    fn add(
        self,
        rhs: Trait,
    ) -> Trait {
        Trait::sum(&self, &rhs)
    }
}

impl Add<&Trait> for Trait {
    type Output = Trait;

    fn add(
        self,
        rhs: &Trait,
    ) -> Trait {
        Trait::sum(&self, rhs)
    }
}

impl Sub<&str> for &Trait {
    type Output = Trait;

    fn sub(
        self,
        name: &str,
    ) -> Trait {
        Trait::remove(self, name)
    }
}

impl Sub<&str> for Trait {
    type Output = Trait;

    fn sub(
        self,
        name: &str,
    ) -> Trait {
        Trait::remove(&self, name)
    }
}
