//! Composition errors
//!
//! Every failure is synchronous and terminal at the offending call. Nothing in
//! the engine retries or recovers from these internally.

use thiserror::Error;

use crate::runtime::value::{RuntimeValue, Symbol, ValueType};

/// Composition result
pub type TraitResult<T> = Result<T, TraitError>;

/// Composition, dispatch and host errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TraitError {
    /// The name resolves to zero providers
    #[error("no implementation for operation `{name}`")]
    NotImplemented { name: Symbol },

    /// The name resolves to two or more providers and no override exists
    #[error("unresolved conflict for operation `{name}` ({providers} providers)")]
    UnresolvedConflict { name: Symbol, providers: usize },

    /// An `add_operation` or `alias` target already has a reachable implementation
    #[error("operation name `{name}` is already in use")]
    NameConflict { name: Symbol },

    /// An `add_operation` or `alias` target collides with a declared requirement
    #[error("operation name `{name}` matches a requirement")]
    RequirementConflict { name: Symbol },

    /// A required operation was never supplied by the entity type
    #[error("required operation `{name}` is not defined for `{entity}`")]
    MissingRequirement { name: Symbol, entity: String },

    /// The entity type has no binding at all for the name
    #[error("undefined operation `{name}` for `{entity}`")]
    NoMethod { name: Symbol, entity: String },

    #[error("operation `{name}` expects {expected} argument(s), got {found}")]
    Arity {
        name: Symbol,
        expected: usize,
        found: usize,
    },

    #[error("type error: expected {expected}, found {found}")]
    TypeError {
        expected: ValueType,
        found: ValueType,
    },

    /// Raised by user operations
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl TraitError {
    pub fn not_implemented(name: impl Into<Symbol>) -> Self {
        TraitError::NotImplemented { name: name.into() }
    }

    pub fn conflict(
        name: impl Into<Symbol>,
        providers: usize,
    ) -> Self {
        TraitError::UnresolvedConflict {
            name: name.into(),
            providers,
        }
    }

    pub fn name_conflict(name: impl Into<Symbol>) -> Self {
        TraitError::NameConflict { name: name.into() }
    }

    pub fn requirement_conflict(name: impl Into<Symbol>) -> Self {
        TraitError::RequirementConflict { name: name.into() }
    }

    /// Type mismatch against an actual value
    pub fn type_error(
        expected: ValueType,
        found: &RuntimeValue,
    ) -> Self {
        TraitError::TypeError {
            expected,
            found: found.value_type(),
        }
    }

    /// Error raised from inside an operation body
    pub fn runtime(message: impl Into<String>) -> Self {
        TraitError::Runtime(message.into())
    }

    /// The operation name the error is about, if any
    pub fn operation(&self) -> Option<&Symbol> {
        match self {
            TraitError::NotImplemented { name }
            | TraitError::UnresolvedConflict { name, .. }
            | TraitError::NameConflict { name }
            | TraitError::RequirementConflict { name }
            | TraitError::MissingRequirement { name, .. }
            | TraitError::NoMethod { name, .. }
            | TraitError::Arity { name, .. } => Some(name),
            TraitError::TypeError { .. } | TraitError::Runtime(_) => None,
        }
    }
}
