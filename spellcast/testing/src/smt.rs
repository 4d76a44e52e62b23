// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT
//! State Machine Testing.
//!
//! A [`StateMachine`] pairs a system under test with an idealised model of
//! it. Random commands are generated from the model state, executed on both,
//! and the results compared after every step.

use arbitrary::Unstructured;

pub trait StateMachine {
    /// The system under test.
    type System;
    /// The idealised reference model.
    type State;
    /// Random actions applied to both.
    type Command;
    /// What the system returns when running a command.
    type Result;

    fn gen_state(&self, u: &mut Unstructured) -> arbitrary::Result<Self::State>;

    fn new_system(&self, state: &Self::State) -> Self::System;

    fn gen_command(
        &self,
        u: &mut Unstructured,
        state: &Self::State,
    ) -> arbitrary::Result<Self::Command>;

    fn run_command(&self, system: &mut Self::System, cmd: &Self::Command) -> Self::Result;

    /// Check the result against the state *before* the command.
    fn check_result(&self, cmd: &Self::Command, pre_state: &Self::State, result: &Self::Result);

    fn next_state(&self, cmd: &Self::Command, state: Self::State) -> Self::State;

    /// Check the system against the state *after* the command.
    fn check_system(
        &self,
        cmd: &Self::Command,
        post_state: &Self::State,
        post_system: &Self::System,
    );
}

/// Run a random number of steps, at most `max_steps`, or until the random bytes run out.
pub fn check_steps<T: StateMachine>(
    t: &T,
    u: &mut Unstructured,
    max_steps: usize,
) -> arbitrary::Result<()> {
    let mut state = t.gen_state(u)?;
    let mut system = t.new_system(&state);
    let mut steps = 0;

    while steps < max_steps && !u.is_empty() {
        let cmd = t.gen_command(u, &state)?;
        let res = t.run_command(&mut system, &cmd);
        t.check_result(&cmd, &state, &res);
        state = t.next_state(&cmd, state);
        t.check_system(&cmd, &state, &system);
        steps += 1;
    }

    Ok(())
}

/// Define a `#[test]` running a state machine for a time budget.
///
/// ```text
/// state_machine_test!(ledger, 5000 ms, 50 steps, LedgerMachine::default());
/// ```
#[macro_export]
macro_rules! state_machine_test {
    ($name:ident, $ms:literal ms, $steps:literal steps, $smt:expr) => {
        #[test]
        fn $name() {
            let machine = $smt;
            arbtest::builder()
                .budget_ms($ms)
                .run(|u| $crate::smt::check_steps(&machine, u, $steps))
        }
    };
}

#[cfg(test)]
mod tests {
    use arbitrary::{Arbitrary, Unstructured};

    use super::StateMachine;

    /// A counter which is incremented or reset, checked against itself.
    struct CounterMachine;

    #[derive(Debug)]
    enum CounterCommand {
        Inc(u8),
        Reset,
    }

    impl StateMachine for CounterMachine {
        type System = u64;
        type State = u64;
        type Command = CounterCommand;
        type Result = u64;

        fn gen_state(&self, u: &mut Unstructured) -> arbitrary::Result<Self::State> {
            Ok(u64::from(u8::arbitrary(u)?))
        }

        fn new_system(&self, state: &Self::State) -> Self::System {
            *state
        }

        fn gen_command(
            &self,
            u: &mut Unstructured,
            _state: &Self::State,
        ) -> arbitrary::Result<Self::Command> {
            if bool::arbitrary(u)? {
                Ok(CounterCommand::Inc(u8::arbitrary(u)?))
            } else {
                Ok(CounterCommand::Reset)
            }
        }

        fn run_command(&self, system: &mut Self::System, cmd: &Self::Command) -> Self::Result {
            match cmd {
                CounterCommand::Inc(n) => *system += u64::from(*n),
                CounterCommand::Reset => *system = 0,
            }
            *system
        }

        fn check_result(&self, cmd: &Self::Command, pre_state: &Self::State, result: &u64) {
            match cmd {
                CounterCommand::Inc(n) => assert_eq!(*result, pre_state + u64::from(*n)),
                CounterCommand::Reset => assert_eq!(*result, 0),
            }
        }

        fn next_state(&self, cmd: &Self::Command, state: Self::State) -> Self::State {
            match cmd {
                CounterCommand::Inc(n) => state + u64::from(*n),
                CounterCommand::Reset => 0,
            }
        }

        fn check_system(&self, _cmd: &Self::Command, post_state: &u64, post_system: &u64) {
            assert_eq!(post_state, post_system)
        }
    }

    state_machine_test!(counter, 200 ms, 20 steps, CounterMachine);
}
