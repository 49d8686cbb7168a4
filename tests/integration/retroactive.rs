//! Mutations reaching entity types that attached earlier

use trait_compose::{EntityType, OperationHolder, RuntimeValue, Trait, TraitError};

use crate::common::{constants, s};

#[test]
fn test_new_operation_reaches_previous_users() {
    let a_trait = Trait::leaf(
        OperationHolder::builder()
            .requires(["required_method"])
            .constant("trait_method", "trait method01")
            .build(),
    );
    let another_trait = constants(&[("new_method", "another method01")]);

    let class_01 = EntityType::new("Class01");
    class_01.uses(&a_trait);
    class_01.define_method("required_method", |this, _| Ok(this.to_value()));

    let class_02 = EntityType::new("Class02");
    class_02.uses(&a_trait);
    class_02.define_method("required_method", |this, _| Ok(this.to_value()));
    class_02.define_method("class_method", |_, _| Ok(s("class method01")));

    let class_03 = EntityType::new("Class03");
    class_03.uses(&(&a_trait + &another_trait));
    class_03.define_method("required_method", |this, _| Ok(this.to_value()));

    let instance_01 = class_01.instantiate();
    let instance_02 = class_02.instantiate();
    let instance_03 = class_03.instantiate();

    assert_eq!(
        another_trait
            .add_operation("new_method", |this, _| Ok(this.to_value()))
            .unwrap_err(),
        TraitError::NameConflict {
            name: "new_method".into()
        }
    );
    assert_eq!(
        a_trait
            .add_operation("required_method", |this, _| Ok(this.to_value()))
            .unwrap_err(),
        TraitError::RequirementConflict {
            name: "required_method".into()
        }
    );

    a_trait
        .add_operation("new_method", |this, _| Ok(this.to_value()))
        .unwrap();

    assert_eq!(
        instance_01.call("new_method", &[]).unwrap(),
        instance_01.to_value()
    );
    assert_eq!(
        instance_02.call("new_method", &[]).unwrap(),
        instance_02.to_value()
    );
    assert!(matches!(
        instance_03.call("new_method", &[]),
        Err(TraitError::UnresolvedConflict { .. })
    ));
}

#[test]
fn test_failed_add_leaves_tree_callable() {
    let t = constants(&[("m", "a")]);
    let entity = EntityType::new("Stable");
    entity.uses(&t);
    let obj = entity.instantiate();

    assert!(t.add_operation("m", |_, _| Ok(s("x"))).is_err());
    assert_eq!(obj.call("m", &[]).unwrap(), s("a"));
}

#[test]
fn test_operation_added_to_inner_node_of_composite() {
    let a = constants(&[("a", "1")]);
    let b = constants(&[("b", "2")]);
    let sum = &a + &b;
    let entity = EntityType::new("Inner");
    entity.uses(&(&sum - "a"));
    let obj = entity.instantiate();

    b.add_operation("late", |_, args| Ok(RuntimeValue::Int(args.len() as i64)))
        .unwrap();
    assert_eq!(
        obj.call("late", &[RuntimeValue::Unit, RuntimeValue::Unit]).unwrap(),
        RuntimeValue::Int(2)
    );
}

#[test]
fn test_redefine_after_attachment() {
    let a = constants(&[("m", "a")]);
    let b = constants(&[("m", "b")]);
    let sum = &a + &b;
    let entity = EntityType::new("Redefined");
    entity.uses(&sum);
    let obj = entity.instantiate();
    assert!(obj.call("m", &[]).is_err());

    sum.redefine("m", |ops, args| {
        let mut joined = String::new();
        for op in ops {
            joined.push_str(op.call(args)?.expect_str()?);
        }
        Ok(RuntimeValue::str(joined))
    })
    .unwrap();
    assert_eq!(obj.call("m", &[]).unwrap(), s("ab"));
}
