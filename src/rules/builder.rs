//! Builder for rule-table machines.

use crate::builder::error::{BuildError, DeclarationError};
use crate::builder::machine::{check_key, check_state, Check};
use crate::core::{Event, EventKey, State};
use crate::graph::{Listener, Transform};
use crate::rules::machine::{Rule, RuleMachine};
use std::collections::HashMap;
use std::sync::Arc;
use stillwater::validation::Validation;

/// Builder for a [`RuleMachine`].
///
/// # Example
///
/// ```rust
/// use switchyard::rules::RuleMachineBuilder;
/// use switchyard::{event_enum, state_enum};
///
/// state_enum! {
///     enum Job {
///         Init,
///         Running,
///         Completed,
///     }
/// }
///
/// event_enum! {
///     enum Cmd {
///         Run,
///         End,
///     }
/// }
///
/// let mut machine = RuleMachineBuilder::new(Job::Init)
///     .add_rule("Init", Cmd::Run, |_| Job::Running)
///     .add_rule("Running", Cmd::End, |_| Job::Completed)
///     .build()
///     .unwrap();
///
/// machine.apply(&Cmd::Run);
/// assert_eq!(machine.state(), &Job::Running);
/// ```
pub struct RuleMachineBuilder<S: State, E: Event> {
    initial: S,
    rules: Vec<Rule<S, E>>,
    on_enter: HashMap<String, Vec<Listener<E>>>,
    on_exit: HashMap<String, Vec<Listener<E>>>,
    checks: Vec<Check>,
}

impl<S: State + 'static, E: Event + 'static> RuleMachineBuilder<S, E> {
    pub fn new(initial: S) -> Self {
        let checks = vec![check_state(&initial)];
        Self {
            initial,
            rules: Vec::new(),
            on_enter: HashMap::new(),
            on_exit: HashMap::new(),
            checks,
        }
    }

    /// Append a rule: in a state named `from`, an event matching `on` moves
    /// the machine to `transform(state)`.
    ///
    /// Rules are tried in declaration order.
    pub fn add_rule<T>(mut self, from: impl Into<String>, on: impl Into<EventKey<E>>, transform: T) -> Self
    where
        T: Fn(&S) -> S + Send + Sync + 'static,
    {
        let from = from.into();
        let on = on.into();
        if from.is_empty() {
            self.checks.push(Validation::fail(BuildError::UnnamedRuleSource {
                rule: self.rules.len(),
            }));
        }
        self.checks.push(check_key(&from, &on));

        let transform: Transform<S> = Arc::new(transform);
        self.rules.push(Rule { from, on, transform });
        self
    }

    /// Run `listener` whenever a rule moves the machine into a state named
    /// `state`.
    pub fn on_enter<F>(mut self, state: impl Into<String>, listener: F) -> Self
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.on_enter
            .entry(state.into())
            .or_default()
            .push(Arc::new(listener));
        self
    }

    /// Run `listener` whenever a rule moves the machine out of a state named
    /// `state`.
    pub fn on_exit<F>(mut self, state: impl Into<String>, listener: F) -> Self
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.on_exit
            .entry(state.into())
            .or_default()
            .push(Arc::new(listener));
        self
    }

    pub fn build(self) -> Result<RuleMachine<S, E>, DeclarationError> {
        match Validation::all_vec(self.checks) {
            Validation::Success(_) => {
                let machine = RuleMachine::new(self.initial, self.rules, self.on_enter, self.on_exit);
                tracing::debug!(
                    machine = %machine.id(),
                    rules = machine.rule_count(),
                    entry = machine.state().name(),
                    "rule machine built"
                );
                Ok(machine)
            }
            Validation::Failure(errors) => Err(DeclarationError {
                errors: errors.iter().cloned().collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventClass;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Job {
        Init,
        Running,
    }

    impl State for Job {
        fn name(&self) -> &str {
            match self {
                Self::Init => "Init",
                Self::Running => "Running",
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Cmd {
        Run,
    }

    impl Event for Cmd {}

    #[test]
    fn build_rejects_empty_source_names_and_tags() {
        const UNTAGGED: EventClass = EventClass::root("");

        let result = RuleMachineBuilder::<Job, Cmd>::new(Job::Init)
            .add_rule("Init", Cmd::Run, |_| Job::Running)
            .add_rule("", Cmd::Run, |_| Job::Running)
            .add_rule("Running", EventKey::Class(UNTAGGED), |_| Job::Init)
            .build();

        let error = result.err().expect("declarations should be rejected");
        assert_eq!(
            error.errors,
            vec![
                BuildError::UnnamedRuleSource { rule: 1 },
                BuildError::UntaggedEventClass {
                    state: "Running".to_string()
                },
            ]
        );
    }

    #[test]
    fn build_keeps_rules_in_order() {
        let machine = RuleMachineBuilder::<Job, Cmd>::new(Job::Init)
            .add_rule("Init", Cmd::Run, |_| Job::Running)
            .add_rule("Running", Cmd::Run, |_| Job::Init)
            .build()
            .unwrap();

        assert_eq!(machine.rule_count(), 2);
    }
}
