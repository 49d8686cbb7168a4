//! Built-in scenarios
//!
//! Small end-to-end walkthroughs of the composition engine, run by the
//! `trait-compose demo` command. Each scenario builds its own traits and
//! entity types and returns a transcript of `(expression, outcome)` lines.

use crate::compose::{strategy, OperationHolder, Trait, TraitResult};
use crate::host::EntityType;
use crate::runtime::value::RuntimeValue;

/// `(expression, outcome)` pairs in execution order
pub type Transcript = Vec<(String, String)>;

/// A named walkthrough
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub summary: &'static str,
    pub run: fn() -> TraitResult<Transcript>,
}

/// Every built-in scenario, in presentation order
pub static SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "removal",
        summary: "exclusion applies to the removed operand only",
        run: removal,
    },
    Scenario {
        name: "requirements",
        summary: "required names fail until the entity type defines them",
        run: requirements,
    },
    Scenario {
        name: "alias",
        summary: "an alias keeps the body it had when created",
        run: alias,
    },
    Scenario {
        name: "redefine",
        summary: "manual conflict resolution calling every provider",
        run: redefine,
    },
    Scenario {
        name: "retroactive",
        summary: "operations added after attachment reach existing instances",
        run: retroactive,
    },
    Scenario {
        name: "self-binding",
        summary: "operations receive the calling instance and call-time arguments",
        run: self_binding,
    },
];

/// Look up a scenario by name
pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|scenario| scenario.name == name)
}

/// Render a call outcome, errors included
fn outcome(result: TraitResult<RuntimeValue>) -> String {
    match result {
        Ok(value) => value.to_string(),
        Err(err) => format!("error: {}", err),
    }
}

fn line(
    expression: impl Into<String>,
    result: TraitResult<RuntimeValue>,
) -> (String, String) {
    (expression.into(), outcome(result))
}

fn constants(
    label: &str,
    pairs: &[(&str, &str)],
) -> Trait {
    let mut builder = OperationHolder::builder();
    for (name, value) in pairs {
        builder = builder.constant(*name, *value);
    }
    Trait::labeled(label, builder.build())
}

fn removal() -> TraitResult<Transcript> {
    let t1 = constants("T1", &[("m1", "a")]);
    let t2 = constants("T2", &[("m2", "b")]);
    let t3 = constants("T3", &[("m2", "c"), ("m3", "d")]);

    let tree = &(&t1 + &(&t2 - "m2")) + &t3;
    let point = EntityType::new("Point");
    point.uses(&tree);
    let p = point.instantiate();

    let unscoped = EntityType::new("Unscoped");
    unscoped.uses(&(&t2 + &t3));

    Ok(vec![
        ("tree".to_string(), tree.describe()),
        line("p.m1", p.call("m1", &[])),
        line("p.m2", p.call("m2", &[])),
        line("p.m3", p.call("m3", &[])),
        line(
            "(T2 + T3).m2",
            unscoped.instantiate().call("m2", &[]),
        ),
    ])
}

fn requirements() -> TraitResult<Transcript> {
    let greeter = Trait::labeled(
        "Greeter",
        OperationHolder::builder()
            .requires(["name"])
            .define("greet", |this, _| {
                let name = this.call("name", &[])?;
                Ok(RuntimeValue::str(format!("hello, {}", name)))
            })
            .build(),
    );
    let person = EntityType::new("Person");
    person.uses(&greeter);
    let p = person.instantiate();

    let mut out = vec![line("p.greet", p.call("greet", &[]))];
    person.define_method("name", |_, _| Ok(RuntimeValue::str("ada")));
    out.push(line("p.greet after defining name", p.call("greet", &[])));
    Ok(out)
}

fn alias() -> TraitResult<Transcript> {
    let t = constants("T", &[("m", "a")]);
    let aliased = t.alias("m", "m_copy")?;
    let entity = EntityType::new("Copy");
    entity.uses(&aliased);
    let obj = entity.instantiate();

    let mut out = vec![
        ("tree".to_string(), aliased.describe()),
        line("obj.m_copy", obj.call("m_copy", &[])),
    ];
    t.redefine("m", |_, _| Ok(RuntimeValue::str("z")))?;
    out.push(line("obj.m after redefining m", obj.call("m", &[])));
    out.push(line("obj.m_copy after redefining m", obj.call("m_copy", &[])));
    Ok(out)
}

fn redefine() -> TraitResult<Transcript> {
    let push = |tag: &'static str| {
        Trait::labeled(
            tag,
            OperationHolder::builder()
                .define("message", move |_, args| {
                    args[0].push(RuntimeValue::str(tag))?;
                    Ok(RuntimeValue::Unit)
                })
                .build(),
        )
    };
    let entity = EntityType::new("Logger");
    let composed = entity.uses(&(push("trait01") + push("trait02")));
    let obj = entity.instantiate();
    let log = RuntimeValue::empty_list();

    let mut out = vec![line("obj.message", obj.call("message", &[log.clone()]))];
    composed.redefine("message", strategy::call_all())?;
    obj.call("message", &[log.clone()])?;
    out.push(("log after redefine".to_string(), log.to_string()));
    Ok(out)
}

fn retroactive() -> TraitResult<Transcript> {
    let base = constants("Base", &[("hello", "hi")]);
    let entity = EntityType::new("Existing");
    entity.uses(&base);
    let obj = entity.instantiate();

    let mut out = vec![line("obj.later", obj.call("later", &[]))];
    base.add_operation("later", |_, _| Ok(RuntimeValue::str("added afterwards")))?;
    out.push(line("obj.later after add_operation", obj.call("later", &[])));
    Ok(out)
}

fn self_binding() -> TraitResult<Transcript> {
    let t = Trait::labeled(
        "Echo",
        OperationHolder::builder()
            .define("me", |this, _| Ok(this.to_value()))
            .define("echo", |_, args| Ok(RuntimeValue::list(args.to_vec())))
            .build(),
    );
    let entity = EntityType::new("Echoer");
    entity.uses(&t);
    let first = entity.instantiate();
    let second = entity.instantiate();

    Ok(vec![
        line("first.me", first.call("me", &[])),
        line("second.me", second.call("me", &[])),
        line(
            "first.echo(1, \"two\")",
            first.call("echo", &[RuntimeValue::Int(1), RuntimeValue::str("two")]),
        ),
    ])
}
