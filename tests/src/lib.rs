//! Ontic Tests
//!
//! A small scenario harness for driving a session step by step:
//! - Each step runs in its own write transaction
//! - A step that succeeds is committed; one that fails is rolled back
//! - Every step carries an assertion on its outcome

mod assertion;
mod error;
mod scenario;

pub use assertion::Assertion;
pub use error::{ScenarioError, ScenarioResult};
pub use scenario::{Scenario, StepContext};

pub mod prelude {
    pub use crate::{Assertion, Scenario, ScenarioError, ScenarioResult, StepContext};
    pub use ontic_core::{ConceptError, DataType, ThingId, TypeId, Value, ViolationKind};
    pub use ontic_session::{Session, SessionConfig};
}
