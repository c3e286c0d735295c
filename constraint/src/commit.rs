//! Commit-time validation.

use crate::ConstraintEngine;
use log::debug;
use ontic_core::{ThingId, ValueKey, Violation, ViolationKind, Violations};
use ontic_schema::TypeDef;
use std::collections::HashMap;

impl<'a> ConstraintEngine<'a> {
    /// Check rules that individual mutations may leave temporarily broken.
    ///
    /// Every instance of a keyed type must hold exactly one value of each key,
    /// and no two instances of the declaring type may share one.
    pub fn validate_commit(&self) -> Violations {
        let mut violations = Violations::new();

        let mut keyed: Vec<&TypeDef> = self
            .schema
            .all()
            .filter(|def| def.owns.values().any(|o| o.is_key()))
            .collect();
        keyed.sort_by_key(|def| def.id);

        for def in keyed {
            for (&attribute, _) in def.owns.iter().filter(|(_, o)| o.is_key()) {
                let label = self.schema.label_of(attribute);
                let mut seen: HashMap<ValueKey, ThingId> = HashMap::new();
                for owner in self.instances(def.id) {
                    let held = self.held_under(owner.id, attribute);
                    if held.len() != 1 {
                        violations.push(
                            Violation::new(
                                ViolationKind::KeyViolation,
                                format!(
                                    "{} holds {} {} values, the key of {} needs exactly one",
                                    owner.id,
                                    held.len(),
                                    label,
                                    def.label
                                ),
                            )
                            .with_type(def.id)
                            .with_thing(owner.id),
                        );
                        continue;
                    }
                    let Some(value) = self.value_key(held[0]) else {
                        continue;
                    };
                    if let Some(other) = seen.insert(value, owner.id) {
                        violations.push(
                            Violation::new(
                                ViolationKind::KeyViolation,
                                format!("{} and {} share the {} key {}", other, owner.id, label, held[0]),
                            )
                            .with_type(def.id)
                            .with_thing(owner.id),
                        );
                    }
                }
            }
        }

        debug!("commit validation found {} violations", violations.len());
        violations
    }
}
