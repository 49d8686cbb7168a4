//! Requirement checking
//!
//! A requirement is an operation name a trait uses but does not implement.
//! The tree's requirements are everything its holders declare, minus what the
//! tree itself provides unambiguously.

use indexmap::IndexSet;

use super::attach::DispatchHost;
use super::node::Trait;
use crate::runtime::value::Symbol;

impl Trait {
    /// Union of every holder's declared requirements
    pub fn declared_requirements(&self) -> IndexSet<Symbol> {
        let mut names = IndexSet::new();
        self.walk(&mut |node| {
            names.extend(node.holder().requirements().cloned());
        });
        names
    }

    /// Whether any holder in the tree declares `name` as a requirement
    pub fn declares_requirement(
        &self,
        name: &str,
    ) -> bool {
        let mut found = false;
        self.walk(&mut |node| {
            found = found || node.holder().requires(name);
        });
        found
    }

    /// Requirements the host still has to satisfy: declared names that do not
    /// resolve to exactly one provider within the tree
    pub fn requirements(&self) -> IndexSet<Symbol> {
        self.declared_requirements()
            .into_iter()
            .filter(|name| self.providers(name).len() != 1)
            .collect()
    }

    /// Requirements the host does not define directly
    pub fn unmet_requirements(
        &self,
        host: &dyn DispatchHost,
    ) -> IndexSet<Symbol> {
        self.requirements()
            .into_iter()
            .filter(|name| !host.defines_directly(name))
            .collect()
    }
}
