//! Sum, removal and membership

use trait_compose::{EntityType, Trait, TraitError};

use crate::common::{constants, s};

#[test]
fn test_entity_knows_its_traits() {
    let t1 = Trait::empty();
    let t2 = Trait::empty();
    let t3 = Trait::empty();

    let single = EntityType::new("Single");
    single.uses(&t1);
    assert!(single.has_trait(&t1));

    let many = EntityType::new("Many");
    many.uses(&(&(&t1 + &t2) + &t3));
    assert!(many.has_trait(&t1));
    assert!(many.has_trait(&t2));
    assert!(many.has_trait(&t3));
    assert!(!single.has_trait(&t2));
}

#[test]
fn test_operations_from_every_summed_trait() {
    let t1 = constants(&[("message_01", "trait01")]);
    let t2 = constants(&[("message_02", "trait02")]);
    let t3 = constants(&[("message_03", "trait03")]);

    let entity = EntityType::new("Summed");
    entity.uses(&(&(&t1 + &t2) + &t3));
    let obj = entity.instantiate();

    assert_eq!(obj.call("message_01", &[]).unwrap(), s("trait01"));
    assert_eq!(obj.call("message_02", &[]).unwrap(), s("trait02"));
    assert_eq!(obj.call("message_03", &[]).unwrap(), s("trait03"));
}

#[test]
fn test_remove_scoped_to_operand() {
    let t1 = constants(&[("m1", "a")]);
    let t2 = constants(&[("m2", "b")]);
    let t3 = constants(&[("m2", "c"), ("m3", "d")]);

    let entity = EntityType::new("Point");
    entity.uses(&(&(&t1 + &(&t2 - "m2")) + &t3));
    let obj = entity.instantiate();

    assert_eq!(obj.call("m1", &[]).unwrap(), s("a"));
    assert_eq!(obj.call("m2", &[]).unwrap(), s("c"));
    assert_eq!(obj.call("m3", &[]).unwrap(), s("d"));
}

#[test]
fn test_remove_across_nested_sums() {
    let t1 = constants(&[("message_01", "m01")]);
    let t2 = constants(&[("message_02", "m02_of_trait02")]);
    let t3 = constants(&[("message_02", "m02_of_trait03"), ("message_03", "m03_of_trait03")]);
    let t4 = constants(&[("message_03", "m03_of_trait04"), ("message_04", "m04")]);
    let t5 = constants(&[("message_03", "m03_of_trait05"), ("message_05", "m05")]);

    let tree = &(&(&t1 + &(&t2 - "message_02")) + &(&(&t3 + &t4) - "message_03")) + &t5;
    let entity = EntityType::new("Nested");
    entity.uses(&tree);
    let obj = entity.instantiate();

    assert_eq!(obj.call("message_01", &[]).unwrap(), s("m01"));
    assert_eq!(obj.call("message_02", &[]).unwrap(), s("m02_of_trait03"));
    assert_eq!(obj.call("message_03", &[]).unwrap(), s("m03_of_trait05"));
    assert_eq!(obj.call("message_04", &[]).unwrap(), s("m04"));
    assert_eq!(obj.call("message_05", &[]).unwrap(), s("m05"));
}

#[test]
fn test_removing_only_provider() {
    let t = constants(&[("m", "a"), ("n", "b")]);
    let entity = EntityType::new("Removed");
    entity.uses(&(&t - "m"));
    let obj = entity.instantiate();

    assert_eq!(obj.call("n", &[]).unwrap(), s("b"));
    assert_eq!(
        obj.call("m", &[]),
        Err(TraitError::NotImplemented { name: "m".into() })
    );
}

#[test]
fn test_composition_does_not_mutate_operands() {
    let a = constants(&[("m", "a")]);
    let b = constants(&[("m", "b")]);
    let _sum = &a + &b;
    let _removed = &a - "m";

    let entity = EntityType::new("Untouched");
    entity.uses(&a);
    assert_eq!(entity.instantiate().call("m", &[]).unwrap(), s("a"));
    assert!(a.removed().is_empty());
}
