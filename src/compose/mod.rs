//! Trait composition engine
//!
//! Reusable behaviour units ("traits") combined as a binary tree and attached
//! to entity types:
//!
//! - [`OperationHolder`] - named operations plus required names
//! - [`Trait`] - leaf or composite node; `+` sums, `-` removes a name
//! - [`resolve`] / [`dispatch`] - call-time lookup of the providers of a name
//! - [`Trait::alias`] - frozen copy of an operation under a new name
//! - [`Trait::add_operation`] / [`Trait::redefine`] - in-place mutation,
//!   visible to every entity type already using the node
//! - [`attach`] - installs dispatch thunks and requirement stubs on a host
//!
//! # Example
//!
//! ```
//! use trait_compose::compose::{OperationHolder, Trait};
//! use trait_compose::host::EntityType;
//! use trait_compose::RuntimeValue;
//!
//! let t2 = Trait::leaf(OperationHolder::builder().constant("m2", "b").build());
//! let t3 = Trait::leaf(
//!     OperationHolder::builder()
//!         .constant("m2", "c")
//!         .constant("m3", "d")
//!         .build(),
//! );
//!
//! let point = EntityType::new("Point");
//! point.uses(&((&t2 - "m2") + &t3));
//!
//! let p = point.instantiate();
//! assert_eq!(p.call("m2", &[]).unwrap(), RuntimeValue::str("c"));
//! ```

pub mod alias;
pub mod attach;
pub mod errors;
pub mod holder;
pub mod mutation;
pub mod node;
pub mod requirements;
pub mod resolver;
pub mod trait_id;

pub use attach::{attach, attach_with, has_trait, AttachOptions, DispatchHost, Thunk};
pub use errors::{TraitError, TraitResult};
pub use holder::{operation, HolderBuilder, Operation, OperationHolder};
pub use mutation::{strategy, BoundOperation, Resolver};
pub use node::{RemovalSet, Trait, TraitNode};
pub use resolver::{dispatch, resolve, Provider, Providers};
pub use trait_id::{TraitId, TraitIdGenerator};

#[cfg(test)]
mod tests;
