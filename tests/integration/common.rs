//! Shared builders

use trait_compose::{OperationHolder, RuntimeValue, Trait};

/// Trait whose operations return constant strings
pub fn constants(pairs: &[(&str, &str)]) -> Trait {
    let mut builder = OperationHolder::builder();
    for (name, value) in pairs {
        builder = builder.constant(*name, *value);
    }
    Trait::leaf(builder.build())
}

/// Trait whose operations return the receiver
pub fn returning_self(names: &[&str]) -> Trait {
    let mut builder = OperationHolder::builder();
    for name in names {
        builder = builder.define(*name, |this, _| Ok(this.to_value()));
    }
    Trait::leaf(builder.build())
}

/// Trait whose operations return their first argument
pub fn identity(names: &[&str]) -> Trait {
    let mut builder = OperationHolder::builder();
    for name in names {
        builder = builder.define(*name, |_, args| {
            Ok(args.first().cloned().unwrap_or(RuntimeValue::Unit))
        });
    }
    Trait::leaf(builder.build())
}

pub fn s(value: &str) -> RuntimeValue {
    RuntimeValue::str(value)
}
