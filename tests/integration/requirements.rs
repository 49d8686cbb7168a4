//! Requirement stubs and user-written operations

use trait_compose::{EntityType, OperationHolder, RuntimeValue, Trait, TraitError};

use crate::common::s;

fn forwarding() -> Trait {
    Trait::leaf(
        OperationHolder::builder()
            .requires(["m01", "m02"])
            .define("message_01", |this, _| this.call("m01", &[]))
            .define("message_02", |this, _| this.call("m02", &[]))
            .build(),
    )
}

#[test]
fn test_missing_requirement_surfaces_at_call() {
    let entity = EntityType::new("Half");
    entity.uses(&forwarding());
    entity.define_method("m01", |_, _| Ok(s("m01")));
    let obj = entity.instantiate();

    assert_eq!(obj.call("message_01", &[]).unwrap(), s("m01"));
    assert_eq!(
        obj.call("message_02", &[]),
        Err(TraitError::MissingRequirement {
            name: "m02".into(),
            entity: "Half".to_string(),
        })
    );
}

#[test]
fn test_defining_requirement_later_fixes_calls() {
    let entity = EntityType::new("Later");
    entity.uses(&forwarding());
    let obj = entity.instantiate();
    assert!(matches!(
        obj.call("message_01", &[]),
        Err(TraitError::MissingRequirement { .. })
    ));

    entity.define_method("m01", |this, _| Ok(this.to_value()));
    assert_eq!(obj.call("message_01", &[]).unwrap(), obj.to_value());
}

#[test]
fn test_requirement_met_by_another_trait() {
    let helper = Trait::leaf(
        OperationHolder::builder()
            .constant("m01", "from helper")
            .constant("m02", "also helper")
            .build(),
    );
    let entity = EntityType::new("Helped");
    entity.uses(&(&forwarding() + &helper));
    let obj = entity.instantiate();

    assert!(entity.unmet_requirements().is_empty());
    assert_eq!(obj.call("message_01", &[]).unwrap(), s("from helper"));
    assert_eq!(obj.call("message_02", &[]).unwrap(), s("also helper"));
}

#[test]
fn test_user_written_operation_wins() {
    let t = Trait::leaf(
        OperationHolder::builder()
            .constant("shared", "trait")
            .build(),
    );
    let entity = EntityType::new("Own");
    entity.define_method("shared", |_, _| Ok(RuntimeValue::str("own")));
    entity.uses(&t);
    assert_eq!(entity.instantiate().call("shared", &[]).unwrap(), s("own"));
}
