// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT
//! State Machine Test for token transfers cast as spells.
//!
//! Random batches of transfers are cast by random accounts, either calling
//! the token directly or borrowing the token library, and the resulting
//! balances are compared with an idealised ledger.
//!
//! ```text
//! cargo test --release -p scenario-test --test ledger
//! ```

use arbitrary::{Arbitrary, Unstructured};
use ethers_core::types::{Address, H256, U256};
use scenario_test::{address, cast_as, mint, selector, word};
use spellcast_testing::{smt::StateMachine, state_machine_test};
use spellcast_vm_host::library::{
    Library, TOKEN_ABI, TOKEN_ADDR, TOKEN_LIB_ABI, TOKEN_LIB_ADDR,
};
use spellcast_vm_host::conv::{from_word, mapping_key};
use spellcast_vm_host::MemoryHost;
use spellcast_vm_interpreter::{Element, ExecError, Outcome};
use spellcast_vm_spell::{CallType, Command, SlotRef};

const ACCOUNTS: usize = 4;

fn account(i: usize) -> Address {
    Address::from_low_u64_be(0xA000 + i as u64)
}

/// Reference model: the balance of each account.
#[derive(Debug, Clone)]
struct LedgerState {
    balances: [u64; ACCOUNTS],
}

#[derive(Debug, Clone, Copy)]
enum Route {
    /// Call the token directly.
    Direct,
    /// Delegate to the token library.
    Library,
}

#[derive(Debug)]
struct CastTransfers {
    from: usize,
    route: Route,
    /// Recipient index and amount of each transfer, in order.
    transfers: Vec<(usize, u64)>,
}

impl CastTransfers {
    /// Spells and elements: the token address and amounts first, then recipients.
    fn compile(&self) -> (Vec<H256>, Vec<Element>) {
        let n = self.transfers.len();
        let mut elements = vec![address(TOKEN_ADDR)];
        elements.extend(self.transfers.iter().map(|(_, amount)| word(*amount)));
        elements.extend(self.transfers.iter().map(|(to, _)| address(account(*to))));

        let spells = (0..n)
            .map(|i| {
                let amount = SlotRef::Static(1 + i as u8);
                let to = SlotRef::Static(1 + (n + i) as u8);
                match self.route {
                    Route::Direct => {
                        Command::new(selector(&TOKEN_ABI, "transfer", 2), CallType::Call, TOKEN_ADDR)
                            .with_inputs(&[to, amount])
                    }
                    Route::Library => Command::new(
                        selector(&TOKEN_LIB_ABI, "transfer", 3),
                        CallType::Delegate,
                        TOKEN_LIB_ADDR,
                    )
                    .with_inputs(&[SlotRef::Static(0), to, amount]),
                }
                .encode()
            })
            .collect();

        (spells, elements)
    }

    /// Index of the first transfer the sender cannot afford, if any.
    fn first_failure(&self, state: &LedgerState) -> Option<usize> {
        let mut balances = state.balances;
        for (i, (to, amount)) in self.transfers.iter().enumerate() {
            if balances[self.from] < *amount {
                return Some(i);
            }
            balances[self.from] -= amount;
            balances[*to] += amount;
        }
        None
    }
}

struct LedgerMachine;

impl StateMachine for LedgerMachine {
    type System = MemoryHost;
    type State = LedgerState;
    type Command = CastTransfers;
    type Result = Result<Outcome, ExecError>;

    fn gen_state(&self, u: &mut Unstructured) -> arbitrary::Result<Self::State> {
        let mut balances = [0u64; ACCOUNTS];
        for b in balances.iter_mut() {
            *b = u64::from(u8::arbitrary(u)?);
        }
        Ok(LedgerState { balances })
    }

    fn new_system(&self, state: &Self::State) -> Self::System {
        let mut host = MemoryHost::new();
        Library::install(&mut host);
        for (i, b) in state.balances.iter().enumerate() {
            mint(&mut host, account(i), U256::from(*b));
        }
        host
    }

    fn gen_command(
        &self,
        u: &mut Unstructured,
        state: &Self::State,
    ) -> arbitrary::Result<Self::Command> {
        let from = u.choose_index(ACCOUNTS)?;
        let route = if bool::arbitrary(u)? {
            Route::Direct
        } else {
            Route::Library
        };
        let n = u.int_in_range(0..=5)?;
        let mut transfers = Vec::with_capacity(n);
        for _ in 0..n {
            let to = u.choose_index(ACCOUNTS)?;
            // Mostly affordable amounts, with the occasional overdraft.
            let max = state.balances[from] + 10;
            let amount = u.int_in_range(0..=max)?;
            transfers.push((to, amount));
        }
        Ok(CastTransfers {
            from,
            route,
            transfers,
        })
    }

    fn run_command(&self, system: &mut Self::System, cmd: &Self::Command) -> Self::Result {
        let (spells, elements) = cmd.compile();
        cast_as(system, account(cmd.from), &spells, elements)
    }

    fn check_result(&self, cmd: &Self::Command, pre_state: &Self::State, result: &Self::Result) {
        match (cmd.first_failure(pre_state), result) {
            (None, Ok(outcome)) => assert_eq!(outcome.steps, cmd.transfers.len()),
            (Some(i), Err(ExecError::InvocationFailure { position, .. })) => {
                assert_eq!(*position, i, "first failing transfer")
            }
            (expected, result) => {
                panic!("unexpected result {result:?}; expected failure at {expected:?}")
            }
        }
    }

    fn next_state(&self, cmd: &Self::Command, mut state: Self::State) -> Self::State {
        if cmd.first_failure(&state).is_none() {
            for (to, amount) in cmd.transfers.iter() {
                state.balances[cmd.from] -= amount;
                state.balances[*to] += amount;
            }
        }
        state
    }

    fn check_system(
        &self,
        _cmd: &Self::Command,
        post_state: &Self::State,
        post_system: &Self::System,
    ) {
        let state = post_system.state();
        for (i, b) in post_state.balances.iter().enumerate() {
            let balance = from_word(&state.load(TOKEN_ADDR, mapping_key("balance", account(i))));
            assert_eq!(
                balance,
                U256::from(*b),
                "balance of account {i}"
            );
        }
    }
}

state_machine_test!(ledger, 5000 ms, 50 steps, LedgerMachine);
