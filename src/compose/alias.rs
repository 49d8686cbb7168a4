//! Operation aliases
//!
//! `alias` binds a new name to whatever `old` resolves to at the moment the
//! alias is created. Later changes to `old` (a redefine, for example) do not
//! reach the alias.

use tracing::debug;

use super::holder::OperationHolder;
use super::node::Trait;
use super::{TraitError, TraitResult};
use crate::runtime::value::Symbol;

impl Trait {
    /// New trait providing `new` as a frozen copy of `old`
    pub fn alias(
        &self,
        old: impl Into<Symbol>,
        new: impl Into<Symbol>,
    ) -> TraitResult<Trait> {
        self.alias_all([(old.into(), new.into())])
    }

    /// Alias several names at once. Every pair is validated before the new
    /// node is created.
    pub fn alias_all<I, A, B>(
        &self,
        pairs: I,
    ) -> TraitResult<Trait>
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<Symbol>,
        B: Into<Symbol>,
    {
        let pairs: Vec<(Symbol, Symbol)> = pairs
            .into_iter()
            .map(|(old, new)| (old.into(), new.into()))
            .collect();

        for (_, new) in &pairs {
            if self.resolves(new) {
                return Err(TraitError::name_conflict(new));
            }
        }
        for (_, new) in &pairs {
            if self.declares_requirement(new) {
                return Err(TraitError::requirement_conflict(new));
            }
        }

        let mut builder = OperationHolder::builder();
        for (old, new) in pairs.iter() {
            if pairs.iter().filter(|(_, other)| other == new).count() > 1 {
                return Err(TraitError::name_conflict(new));
            }
            let implementation = self.implementation(old)?;
            builder = builder.define_operation(new.clone(), implementation);
        }

        let node = Trait::extend(self, builder.build());
        debug!(
            "alias {} on {}",
            pairs
                .iter()
                .map(|(old, new)| format!("{} => {}", old, new))
                .collect::<Vec<_>>()
                .join(", "),
            self.name()
        );
        Ok(node)
    }
}
