//! trait-compose: behaviour composition for entity types
//!
//! Reusable units of behaviour ("traits") are built from named operations,
//! combined algebraically (sum, removal, alias) and attached to entity types.
//! Name resolution happens at call time, so operations added or redefined
//! after attachment reach every entity type already using the trait.
//!
//! # Example
//!
//! ```
//! use trait_compose::{EntityType, OperationHolder, RuntimeValue, Trait};
//!
//! let walk = Trait::labeled(
//!     "Walk",
//!     OperationHolder::builder()
//!         .requires(["legs"])
//!         .define("walk", |this, _| {
//!             let legs = this.call("legs", &[])?;
//!             Ok(RuntimeValue::str(format!("walking on {}", legs)))
//!         })
//!         .build(),
//! );
//!
//! let dog = EntityType::new("Dog");
//! dog.uses(&walk);
//! dog.define_method("legs", |_, _| Ok(RuntimeValue::Int(4)));
//!
//! let rex = dog.instantiate();
//! assert_eq!(rex.call("walk", &[]).unwrap(), RuntimeValue::str("walking on 4"));
//! ```

#![doc(html_root_url = "https://docs.rs/trait-compose")]
#![warn(rust_2018_idioms)]

// Public modules
pub mod compose;
pub mod demos;
pub mod host;
pub mod runtime;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use compose::{OperationHolder, Trait, TraitError, TraitResult};
pub use host::{EntityType, Instance};
pub use runtime::value::{RuntimeValue, Symbol};

use tracing::debug;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Display name
pub const NAME: &str = "trait-compose";

/// Run one built-in scenario by name
///
/// # Example
///
/// ```
/// let transcript = trait_compose::run_demo("removal").unwrap();
/// assert!(!transcript.is_empty());
/// ```
pub fn run_demo(name: &str) -> Result<demos::Transcript> {
    let scenario = demos::find(name).with_context(|| {
        let known: Vec<&str> = demos::SCENARIOS.iter().map(|s| s.name).collect();
        format!("unknown demo `{}` (known: {})", name, known.join(", "))
    })?;
    debug!("running demo `{}`", scenario.name);
    let transcript =
        (scenario.run)().with_context(|| format!("demo `{}` failed", scenario.name))?;
    Ok(transcript)
}
