//! Type hierarchy scenarios: supertypes, abstract types, plays and relates.

use ontic_tests::prelude::*;

mod supertypes {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("supertypes")
            .step(
                "define_chain",
                |cx| {
                    let person = cx.put_entity_type("person")?;
                    let employee = cx.put_entity_type("employee")?;
                    let manager = cx.put_entity_type("manager")?;
                    cx.set_supertype(employee, person)?;
                    cx.set_supertype(manager, employee)
                },
                |a| a.ok(),
            )
            .step(
                "ancestors_nearest_first",
                |cx| {
                    let manager = cx.type_id("manager")?;
                    let labels: Vec<String> = cx
                        .supertypes(manager)
                        .map(|id| cx.label(id).map(str::to_string))
                        .collect::<Result<_, _>>()?;
                    assert_eq!(labels, ["manager", "employee", "person", "entity", "thing"]);
                    assert_eq!(cx.depth(manager), 4);
                    Ok(())
                },
                |a| a.ok(),
            )
            .step(
                "cycle",
                |cx| {
                    let person = cx.type_id("person")?;
                    let manager = cx.type_id("manager")?;
                    cx.set_supertype(person, manager)
                },
                |a| a.error("Cycle"),
            )
            .step(
                "self_cycle",
                |cx| {
                    let person = cx.type_id("person")?;
                    cx.set_supertype(person, person)
                },
                |a| a.error("Cycle"),
            )
            .step(
                "cross_kind",
                |cx| {
                    let person = cx.type_id("person")?;
                    let name = cx.put_attribute_type("name", DataType::String)?;
                    cx.set_supertype(person, name)
                },
                |a| a.error("LabelConflict"),
            )
            .step(
                "meta_type_is_fixed",
                |cx| {
                    let entity = cx.type_id("entity")?;
                    cx.set_label(entity, "being")
                },
                |a| a.violation(ViolationKind::MetaType),
            )
            .step(
                "reserved_label",
                |cx| cx.put_entity_type("@hidden").map(|_| ()),
                |a| a.error("LabelConflict"),
            )
    }

    #[test]
    fn test_supertype_rules() {
        let session = scenario().run().unwrap();

        let read = session.read();
        let person = read.type_id("person").unwrap();
        let entity = read.type_id("entity").unwrap();
        assert_eq!(read.direct_supertype(person), Some(entity));
    }
}

mod abstract_types {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("abstract_types")
            .step(
                "define_abstract_person",
                |cx| {
                    let person = cx.put_entity_type("person")?;
                    let employee = cx.put_entity_type("employee")?;
                    cx.set_supertype(employee, person)?;
                    cx.set_abstract(person, true)
                },
                |a| a.ok(),
            )
            .step(
                "instantiate_abstract",
                |cx| {
                    let person = cx.type_id("person")?;
                    cx.create_entity(person).map(|_| ())
                },
                |a| a.violation(ViolationKind::AbstractType),
            )
            .step(
                "instantiate_concrete_subtype",
                |cx| {
                    let employee = cx.type_id("employee")?;
                    let bob = cx.create_entity(employee)?;
                    cx.bind("bob", bob);
                    Ok(())
                },
                |a| a.ok(),
            )
            .step(
                "abstract_with_instances",
                |cx| {
                    let employee = cx.type_id("employee")?;
                    cx.set_abstract(employee, true)
                },
                |a| a.violation(ViolationKind::HasInstances),
            )
            .step(
                "delete_with_subtypes",
                |cx| {
                    let person = cx.type_id("person")?;
                    cx.delete_type(person)
                },
                |a| a.violation(ViolationKind::HasSubtypes),
            )
            .step(
                "delete_with_instances",
                |cx| {
                    let employee = cx.type_id("employee")?;
                    cx.delete_type(employee)
                },
                |a| a.violation(ViolationKind::HasInstances),
            )
            .step(
                "instances_include_subtypes",
                |cx| {
                    let person = cx.type_id("person")?;
                    let bob = cx.thing("bob")?;
                    assert_eq!(cx.instances(person).collect::<Vec<_>>(), vec![bob]);
                    Ok(())
                },
                |a| a.ok(),
            )
    }

    #[test]
    fn test_abstract_types() {
        scenario().run().unwrap();
    }
}

mod roles {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("roles")
            .step(
                "define_friendship",
                |cx| {
                    let person = cx.put_entity_type("person")?;
                    let friendship = cx.put_relation_type("friendship")?;
                    let friend = cx.put_role("friend")?;
                    cx.relates(friendship, friend)?;
                    cx.plays(person, friend)
                },
                |a| a.ok(),
            )
            .step(
                "befriend",
                |cx| {
                    let person = cx.type_id("person")?;
                    let friendship = cx.type_id("friendship")?;
                    let friend = cx.type_id("friend")?;
                    let alice = cx.create_entity(person)?;
                    let bob = cx.create_entity(person)?;
                    let rel = cx.create_relation(friendship)?;
                    cx.add_role_player(rel, friend, alice)?;
                    cx.add_role_player(rel, friend, bob)?;
                    cx.bind("alice", alice);
                    cx.bind("friendship", rel);
                    Ok(())
                },
                |a| a.ok(),
            )
            .step(
                "role_not_played",
                |cx| {
                    let friend = cx.type_id("friend")?;
                    let rel = cx.thing("friendship")?;
                    let pet = cx.put_entity_type("pet")?;
                    let rex = cx.create_entity(pet)?;
                    cx.add_role_player(rel, friend, rex)
                },
                |a| a.violation(ViolationKind::RoleNotPlayable),
            )
            .step(
                "role_not_related",
                |cx| {
                    let rel = cx.thing("friendship")?;
                    let alice = cx.thing("alice")?;
                    let person = cx.type_id("person")?;
                    let boss = cx.put_role("boss")?;
                    cx.plays(person, boss)?;
                    cx.add_role_player(rel, boss, alice)
                },
                |a| a.violation(ViolationKind::RoleNotRelated),
            )
            .step(
                "unplay_in_use",
                |cx| {
                    let person = cx.type_id("person")?;
                    let friend = cx.type_id("friend")?;
                    cx.unplay(person, friend)
                },
                |a| a.violation(ViolationKind::InUseConstraint),
            )
            .step(
                "unrelate_in_use",
                |cx| {
                    let friendship = cx.type_id("friendship")?;
                    let friend = cx.type_id("friend")?;
                    cx.unrelate(friendship, friend)
                },
                |a| a.violation(ViolationKind::InUseConstraint),
            )
            .step(
                "delete_player",
                |cx| {
                    let alice = cx.thing("alice")?;
                    let rel = cx.thing("friendship")?;
                    cx.delete_thing(alice)?;
                    assert_eq!(cx.role_players(rel)?.len(), 1);
                    Ok(())
                },
                |a| a.ok(),
            )
    }

    #[test]
    fn test_plays_and_relates() {
        scenario().run().unwrap();
    }
}
