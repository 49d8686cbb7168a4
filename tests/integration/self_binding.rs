//! Receiver binding and call-time arguments

use trait_compose::{EntityType, RuntimeValue, Trait};

use crate::common::{identity, returning_self};

fn layered(make: fn(&[&str]) -> Trait) -> Trait {
    let t1 = make(&["message_01"]);
    let t2 = make(&["message_02"]);
    let t3 = make(&["message_02", "message_03"]);
    let t4 = make(&["message_03", "message_04"]);
    let t5 = make(&["message_03", "message_05"]);

    let renamed = &t2.alias("message_02", "new_message_02").unwrap() - "message_02";
    let tree = &(&(&t1 + &renamed) + &(&(&t3 + &t4) - "message_03")) + &t5;
    tree.alias("message_01", "new_message_01").unwrap()
}

#[test]
fn test_operations_receive_the_instance() {
    let entity = EntityType::new("Selfish");
    entity.uses(&layered(returning_self));
    let obj = entity.instantiate();
    let me = obj.to_value();

    for name in [
        "message_01",
        "new_message_02",
        "message_03",
        "message_04",
        "message_05",
        "new_message_01",
    ] {
        assert_eq!(obj.call(name, &[]).unwrap(), me, "{}", name);
    }
    // message_02 now comes from the third trait
    assert_eq!(obj.call("message_02", &[]).unwrap(), me);

    let other = entity.instantiate();
    assert_eq!(other.call("message_01", &[]).unwrap(), other.to_value());
}

#[test]
fn test_arguments_bound_at_call_time() {
    let entity = EntityType::new("Echo");
    entity.uses(&layered(identity));
    let obj = entity.instantiate();

    let calls = [
        ("message_01", 1),
        ("new_message_02", 2),
        ("message_03", 3),
        ("message_04", 4),
        ("message_05", 5),
        ("new_message_01", 6),
    ];
    for (name, value) in calls {
        assert_eq!(
            obj.call(name, &[RuntimeValue::Int(value)]).unwrap(),
            RuntimeValue::Int(value)
        );
    }
}
