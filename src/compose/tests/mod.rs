//! Composition engine unit tests


use crate::compose::{OperationHolder, Trait};
use crate::host::{EntityType, Instance};
use crate::runtime::value::RuntimeValue;

/// Leaf trait whose operations return constant strings
pub(crate) fn constants(
    label: &str,
    pairs: &[(&str, &str)],
) -> Trait {
    let mut builder = OperationHolder::builder();
    for (name, value) in pairs {
        builder = builder.constant(*name, *value);
    }
    Trait::labeled(label, builder.build())
}

/// Fresh entity type using `node`, and one instance of it
pub(crate) fn instance_of(node: &Trait) -> Instance {
    let entity = EntityType::new("Subject");
    entity.uses(node);
    entity.instantiate()
}

pub(crate) fn s(value: &str) -> RuntimeValue {
    RuntimeValue::str(value)
}
