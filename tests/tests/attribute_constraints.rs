//! Attribute type scenarios: data types, interning, regexes and keys.

use ontic_tests::prelude::*;

mod data_types {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("data_types")
            .step(
                "define_age",
                |cx| cx.put_attribute_type("age", DataType::Long).map(|_| ()),
                |a| a.ok(),
            )
            .step(
                "put_same_value_twice",
                |cx| {
                    let age = cx.type_id("age")?;
                    let first = cx.put_attribute(age, 42i64)?;
                    let second = cx.put_attribute(age, 42i64)?;
                    assert_eq!(first, second);
                    assert_eq!(cx.instances(age).count(), 1);
                    Ok(())
                },
                |a| a.ok(),
            )
            .step(
                "put_string_into_long",
                |cx| {
                    let age = cx.type_id("age")?;
                    cx.put_attribute(age, "forty-two").map(|_| ())
                },
                |a| a.error("TypeMismatch").error_matching("expected long, got string"),
            )
            .step(
                "change_data_type_with_instances",
                |cx| {
                    let age = cx.type_id("age")?;
                    cx.set_data_type(age, DataType::Double)
                },
                |a| a.violation(ViolationKind::ImmutableDataType),
            )
            .step(
                "data_type_unchanged",
                |cx| {
                    let age = cx.type_id("age")?;
                    assert_eq!(cx.data_type(age)?, Some(DataType::Long));
                    Ok(())
                },
                |a| a.ok(),
            )
    }

    #[test]
    fn test_values_are_interned_and_typed() {
        scenario().run().unwrap();
    }
}

mod inherited_data_types {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("inherited_data_types")
            .step(
                "define_hierarchy",
                |cx| {
                    let name = cx.put_attribute_type("name", DataType::String)?;
                    let nickname = cx.put_attribute_type("nickname", None::<DataType>)?;
                    cx.set_supertype(nickname, name)
                },
                |a| a.ok(),
            )
            .step(
                "subtype_inherits",
                |cx| {
                    let nickname = cx.type_id("nickname")?;
                    assert_eq!(cx.data_type(nickname)?, Some(DataType::String));
                    cx.put_attribute(nickname, "Bob").map(|_| ())
                },
                |a| a.ok(),
            )
            .step(
                "subtype_cannot_diverge",
                |cx| {
                    let nickname = cx.type_id("nickname")?;
                    cx.set_data_type(nickname, DataType::Long)
                },
                |a| a.violation(ViolationKind::ImmutableDataType),
            )
    }

    #[test]
    fn test_data_type_is_inherited() {
        scenario().run().unwrap();
    }
}

mod regexes {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("regexes")
            .step(
                "define_email",
                |cx| {
                    let email = cx.put_attribute_type("email", DataType::String)?;
                    cx.set_regex(email, ".+@.+")
                },
                |a| a.ok(),
            )
            .step(
                "valid_email",
                |cx| {
                    let email = cx.type_id("email")?;
                    cx.put_attribute(email, "alice@example.com").map(|_| ())
                },
                |a| a.ok(),
            )
            .step(
                "invalid_email",
                |cx| {
                    let email = cx.type_id("email")?;
                    cx.put_attribute(email, "not-an-email").map(|_| ())
                },
                |a| a.violation(ViolationKind::RegexViolation),
            )
            .step(
                "tighten_against_existing_value",
                |cx| {
                    let email = cx.type_id("email")?;
                    cx.set_regex(email, "[a-z]+@[a-z]+")
                },
                |a| a.violation(ViolationKind::RegexViolation),
            )
            .step(
                "regex_kept",
                |cx| {
                    let email = cx.type_id("email")?;
                    assert_eq!(cx.regex(email)?, Some(".+@.+"));
                    Ok(())
                },
                |a| a.ok(),
            )
            .step(
                "malformed_regex",
                |cx| {
                    let email = cx.type_id("email")?;
                    cx.set_regex(email, "(")
                },
                |a| a.error("InvalidPattern"),
            )
            .step(
                "regex_balanced_only_when_anchored",
                |cx| {
                    let email = cx.type_id("email")?;
                    cx.set_regex(email, "a)|(b")
                },
                |a| a.error("InvalidPattern"),
            )
            .step(
                "regex_still_kept",
                |cx| {
                    let email = cx.type_id("email")?;
                    assert_eq!(cx.regex(email)?, Some(".+@.+"));
                    cx.put_attribute(email, "a-anything-goes").map(|_| ())
                },
                |a| a.violation(ViolationKind::RegexViolation),
            )
            .step(
                "regex_on_long",
                |cx| {
                    let age = cx.put_attribute_type("age", DataType::Long)?;
                    cx.set_regex(age, "[0-9]+")
                },
                |a| a.error("RegexNotApplicable"),
            )
    }

    #[test]
    fn test_regex_validation() {
        scenario().run().unwrap();
    }
}

mod keys {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("keys")
            .step(
                "define_person_keyed_by_email",
                |cx| {
                    let person = cx.put_entity_type("person")?;
                    let email = cx.put_attribute_type("email", DataType::String)?;
                    cx.key(person, email)
                },
                |a| a.ok(),
            )
            .step(
                "first_person",
                |cx| {
                    let person = cx.type_id("person")?;
                    let email = cx.type_id("email")?;
                    let alice = cx.create_entity(person)?;
                    let value = cx.put_attribute(email, "alice@example.com")?;
                    cx.set_has(alice, value)?;
                    cx.bind("alice", alice);
                    Ok(())
                },
                |a| a.ok(),
            )
            .step(
                "second_person_same_email",
                |cx| {
                    let person = cx.type_id("person")?;
                    let email = cx.type_id("email")?;
                    let bob = cx.create_entity(person)?;
                    let value = cx.put_attribute(email, "alice@example.com")?;
                    cx.set_has(bob, value).map(|_| ())
                },
                |a| a.violation(ViolationKind::KeyViolation),
            )
            .step(
                "define_work_email",
                |cx| {
                    let email = cx.type_id("email")?;
                    let work = cx.put_attribute_type("work-email", None::<DataType>)?;
                    cx.set_supertype(work, email)
                },
                |a| a.ok(),
            )
            .step(
                "second_person_same_work_email",
                |cx| {
                    let person = cx.type_id("person")?;
                    let work = cx.type_id("work-email")?;
                    let bob = cx.create_entity(person)?;
                    let value = cx.put_attribute(work, "alice@example.com")?;
                    cx.set_has(bob, value).map(|_| ())
                },
                |a| a.violation(ViolationKind::KeyViolation),
            )
            .step(
                "second_key_value",
                |cx| {
                    let email = cx.type_id("email")?;
                    let alice = cx.thing("alice")?;
                    let value = cx.put_attribute(email, "alice@work.example.com")?;
                    cx.set_has(alice, value).map(|_| ())
                },
                |a| a.violation(ViolationKind::KeyViolation),
            )
            .step(
                "person_without_key",
                |cx| {
                    let person = cx.type_id("person")?;
                    cx.create_entity(person).map(|_| ())
                },
                |a| a.violation(ViolationKind::KeyViolation),
            )
            .step(
                "unkey_keeps_has",
                |cx| {
                    let person = cx.type_id("person")?;
                    let email = cx.type_id("email")?;
                    cx.unkey(person, email)?;
                    assert!(cx.owned_attributes(person).contains_key(&email));
                    assert!(cx.keys(person).is_empty());
                    Ok(())
                },
                |a| a.ok(),
            )
            .step(
                "unhas_in_use",
                |cx| {
                    let person = cx.type_id("person")?;
                    let email = cx.type_id("email")?;
                    cx.unhas(person, email)
                },
                |a| a.violation(ViolationKind::InUseConstraint),
            )
    }

    #[test]
    fn test_key_uniqueness_and_cardinality() {
        let session = scenario().run().unwrap();

        let read = session.read();
        let person = read.type_id("person").unwrap();
        assert_eq!(read.instances(person).count(), 1);
    }
}
