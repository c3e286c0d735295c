//! Scenario definition and runner.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use ontic_core::{ConceptError, ConceptResult, ThingId};
use ontic_session::{Session, SessionConfig, WriteTransaction};

use crate::assertion::Assertion;
use crate::error::{ScenarioError, ScenarioResult};

type StepFn = Box<dyn Fn(&mut StepContext<'_, '_>) -> ConceptResult<()>>;

/// The write transaction of a step, plus the instances bound by earlier steps.
pub struct StepContext<'t, 's> {
    txn: &'t mut WriteTransaction<'s>,
    things: &'t mut HashMap<String, ThingId>,
}

impl<'s> StepContext<'_, 's> {
    /// Name an instance for later steps.
    pub fn bind(&mut self, name: impl Into<String>, id: ThingId) {
        self.things.insert(name.into(), id);
    }

    /// The instance bound to `name`.
    pub fn thing(&self, name: &str) -> ConceptResult<ThingId> {
        self.things
            .get(name)
            .copied()
            .ok_or_else(|| ConceptError::unknown_label(name))
    }
}

impl<'s> Deref for StepContext<'_, 's> {
    type Target = WriteTransaction<'s>;

    fn deref(&self) -> &WriteTransaction<'s> {
        self.txn
    }
}

impl<'s> DerefMut for StepContext<'_, 's> {
    fn deref_mut(&mut self) -> &mut WriteTransaction<'s> {
        self.txn
    }
}

struct Step {
    name: String,
    run: StepFn,
    assertion: Assertion,
}

/// A named sequence of steps run against a fresh session.
pub struct Scenario {
    name: String,
    config: SessionConfig,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: SessionConfig::testing(),
            steps: Vec::new(),
        }
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a step; `assert` builds the expected outcome.
    pub fn step<F, A>(mut self, name: impl Into<String>, run: F, assert: A) -> Self
    where
        F: Fn(&mut StepContext<'_, '_>) -> ConceptResult<()> + 'static,
        A: FnOnce(Assertion) -> Assertion,
    {
        self.steps.push(Step {
            name: name.into(),
            run: Box::new(run),
            assertion: assert(Assertion::new()),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order, returning the session for further checks.
    pub fn run(&self) -> ScenarioResult<Session> {
        let session = Session::new(self.config.clone()).map_err(|e| ScenarioError::Session {
            scenario: self.name.clone(),
            message: e.to_string(),
        })?;
        let mut things = HashMap::new();

        for step in &self.steps {
            let mut txn = session.write();
            let mut bound = things.clone();
            let result = {
                let mut cx = StepContext {
                    txn: &mut txn,
                    things: &mut bound,
                };
                (step.run)(&mut cx)
            };

            let result = match result {
                Ok(()) => txn.commit().map(|_| ()),
                Err(e) => {
                    txn.rollback();
                    Err(e)
                }
            };
            if result.is_ok() {
                things = bound;
            }
            step.assertion.verify(&step.name, &result)?;
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontic_core::ViolationKind;

    #[test]
    fn test_failed_step_is_rolled_back() {
        let scenario = Scenario::new("rollback")
            .step("define", |cx| cx.put_entity_type("person").map(|_| ()), |a| a.ok())
            .step(
                "define then fail",
                |cx| {
                    cx.put_entity_type("animal")?;
                    let person = cx.type_id("person")?;
                    cx.set_abstract(person, true)?;
                    let created = cx.create_entity(person)?;
                    cx.bind("p", created);
                    Ok(())
                },
                |a| a.violation(ViolationKind::AbstractType),
            );

        assert_eq!(scenario.len(), 2);
        let session = scenario.run().unwrap();
        let read = session.read();
        assert!(read.type_id("person").is_ok());
        assert!(read.type_id("animal").is_err());
        assert!(!read.is_abstract(read.type_id("person").unwrap()).unwrap());
    }

    #[test]
    fn test_bindings_carry_across_steps() {
        let scenario = Scenario::new("bindings")
            .step(
                "create",
                |cx| {
                    let person = cx.put_entity_type("person")?;
                    let alice = cx.create_entity(person)?;
                    cx.bind("alice", alice);
                    Ok(())
                },
                |a| a.ok(),
            )
            .step("lookup", |cx| cx.thing("alice").map(|_| ()), |a| a.ok())
            .step("missing", |cx| cx.thing("bob").map(|_| ()), |a| a.error("UnknownLabel"));

        assert!(scenario.run().is_ok());
    }
}
