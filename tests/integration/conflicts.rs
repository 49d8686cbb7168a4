//! Conflicts, alias and redefine

use trait_compose::compose::strategy;
use trait_compose::{EntityType, OperationHolder, RuntimeValue, Trait, TraitError};

use crate::common::{constants, s};

fn pusher(tag: &'static str) -> Trait {
    Trait::leaf(
        OperationHolder::builder()
            .define("message", move |_, args| {
                args[0].push(RuntimeValue::str(tag))?;
                Ok(RuntimeValue::Unit)
            })
            .build(),
    )
}

#[test]
fn test_conflict_then_removal_resolves() {
    let a = constants(&[("m", "a")]);
    let b = constants(&[("m", "b")]);

    let conflicted = EntityType::new("Conflicted");
    conflicted.uses(&(&a + &b));
    assert_eq!(
        conflicted.instantiate().call("m", &[]),
        Err(TraitError::UnresolvedConflict {
            name: "m".into(),
            providers: 2,
        })
    );

    let fixed = EntityType::new("Fixed");
    fixed.uses(&(&(&a - "m") + &b));
    assert_eq!(fixed.instantiate().call("m", &[]).unwrap(), s("b"));
}

#[test]
fn test_alias_errors() {
    let t = constants(&[("message_01", "m01"), ("message_02", "m02")]);
    assert_eq!(
        t.alias("message_01", "message_02").unwrap_err(),
        TraitError::NameConflict {
            name: "message_02".into()
        }
    );

    let needs = Trait::leaf(
        OperationHolder::builder()
            .requires(["message01"])
            .constant("message", "message")
            .build(),
    );
    assert_eq!(
        needs.alias("message", "message01").unwrap_err(),
        TraitError::RequirementConflict {
            name: "message01".into()
        }
    );
}

#[test]
fn test_alias_freezes_redefine_stays_live() {
    let a = constants(&[("m", "a")]);
    let b = constants(&[("m", "b")]);
    let sum = &a + &b;
    sum.redefine("m", strategy::first()).unwrap();
    let aliased = sum.alias("m", "m2").unwrap();

    let entity = EntityType::new("Frozen");
    entity.uses(&aliased);
    let obj = entity.instantiate();
    assert_eq!(obj.call("m2", &[]).unwrap(), s("a"));

    // the alias captured the resolver, which still looks at live providers
    sum.redefine("m", strategy::last()).unwrap();
    assert_eq!(obj.call("m", &[]).unwrap(), s("b"));
    assert_eq!(obj.call("m2", &[]).unwrap(), s("a"));
}

#[test]
fn test_redefine_resolves_conflict_in_order() {
    let entity = EntityType::new("Resolved");
    entity.uses(&(&pusher("trait01") + &pusher("trait02")));
    let obj = entity.instantiate();
    let list = RuntimeValue::empty_list();

    assert!(matches!(
        obj.call("message", &[list.clone()]),
        Err(TraitError::UnresolvedConflict { .. })
    ));

    let composed = entity.traits().unwrap();
    assert_eq!(composed.implementations("message").len(), 2);
    composed
        .redefine("message", |ops, args| {
            for op in ops {
                op.call(args)?;
            }
            Ok(RuntimeValue::Unit)
        })
        .unwrap();

    obj.call("message", &[list.clone()]).unwrap();
    assert_eq!(
        list.list_items().unwrap(),
        vec![s("trait01"), s("trait02")]
    );
}

#[test]
fn test_redefine_unknown_name() {
    let t = constants(&[("m", "a")]);
    assert_eq!(
        t.redefine("other", strategy::first()).unwrap_err(),
        TraitError::NotImplemented {
            name: "other".into()
        }
    );
}
