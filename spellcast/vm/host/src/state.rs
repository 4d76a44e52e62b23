// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::Arc;

use ethers_core::types::{Address, Bytes, H256, U256};
use serde::Serialize;
use spellcast_vm_interpreter::InvokeError;

use crate::Endpoint;

#[derive(Debug, Clone, Default)]
struct Account {
    balance: U256,
    nonce: u64,
    code: Option<Arc<dyn Endpoint>>,
}

/// An event emitted by an endpoint, attributed to the context it ran in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<H256>,
    pub data: Bytes,
}

/// Everything the host can change, in persistent collections.
///
/// Cloning is cheap, which is what checkpoints rely on.
#[derive(Debug, Clone, Default)]
pub struct WorldState {
    accounts: im::HashMap<Address, Account>,
    storage: im::HashMap<(Address, H256), H256>,
    logs: im::Vector<LogEntry>,
}

impl WorldState {
    pub fn balance(&self, addr: &Address) -> U256 {
        self.accounts
            .get(addr)
            .map(|a| a.balance)
            .unwrap_or_default()
    }

    pub fn nonce(&self, addr: &Address) -> u64 {
        self.accounts.get(addr).map(|a| a.nonce).unwrap_or_default()
    }

    pub fn code(&self, addr: &Address) -> Option<Arc<dyn Endpoint>> {
        self.accounts.get(addr).and_then(|a| a.code.clone())
    }

    /// An address is taken once it has code or has sent anything.
    pub fn is_occupied(&self, addr: &Address) -> bool {
        self.accounts
            .get(addr)
            .map(|a| a.code.is_some() || a.nonce > 0)
            .unwrap_or_default()
    }

    pub fn load(&self, addr: Address, key: H256) -> H256 {
        self.storage
            .get(&(addr, key))
            .copied()
            .unwrap_or_default()
    }

    /// Zero values are not kept.
    pub fn store(&mut self, addr: Address, key: H256, value: H256) {
        if value.is_zero() {
            self.storage.remove(&(addr, key));
        } else {
            self.storage.insert((addr, key), value);
        }
    }

    pub fn emit(&mut self, entry: LogEntry) {
        self.logs.push_back(entry);
    }

    pub fn logs(&self) -> impl Iterator<Item = &LogEntry> {
        self.logs.iter()
    }

    pub fn log_count(&self) -> usize {
        self.logs.len()
    }

    pub fn set_code(&mut self, addr: Address, code: Arc<dyn Endpoint>) {
        self.account_mut(addr).code = Some(code);
    }

    pub fn credit(&mut self, addr: Address, amount: U256) {
        let account = self.account_mut(addr);
        account.balance = account.balance.saturating_add(amount);
    }

    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), InvokeError> {
        let balance = self.balance(&from);
        let remaining = balance
            .checked_sub(amount)
            .ok_or_else(|| InvokeError::revert(format!("insufficient funds: {balance} < {amount}")))?;

        self.account_mut(from).balance = remaining;
        self.credit(to, amount);
        Ok(())
    }

    /// Increment the nonce and return the value it had before.
    pub fn bump_nonce(&mut self, addr: Address) -> u64 {
        let account = self.account_mut(addr);
        let nonce = account.nonce;
        account.nonce += 1;
        nonce
    }

    fn account_mut(&mut self, addr: Address) -> &mut Account {
        self.accounts.entry(addr).or_insert_with(Account::default)
    }
}

#[cfg(test)]
mod tests {
    use ethers_core::types::{Address, H256, U256};
    use spellcast_vm_interpreter::InvokeError;

    use super::WorldState;

    #[test]
    fn transfer_moves_funds() {
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        let mut state = WorldState::default();
        state.credit(a, U256::from(10));

        state.transfer(a, b, U256::from(4)).unwrap();
        assert_eq!(state.balance(&a), U256::from(6));
        assert_eq!(state.balance(&b), U256::from(4));

        assert!(matches!(
            state.transfer(a, b, U256::from(7)),
            Err(InvokeError::Revert(_))
        ));
        assert_eq!(state.balance(&a), U256::from(6));
    }

    #[test]
    fn clones_are_snapshots() {
        let a = Address::repeat_byte(1);
        let key = H256::repeat_byte(9);
        let mut state = WorldState::default();
        state.store(a, key, H256::repeat_byte(1));

        let snapshot = state.clone();
        state.store(a, key, H256::repeat_byte(2));
        state.bump_nonce(a);

        assert_eq!(snapshot.load(a, key), H256::repeat_byte(1));
        assert_eq!(snapshot.nonce(&a), 0);
        assert_eq!(state.load(a, key), H256::repeat_byte(2));
        assert!(state.is_occupied(&a));
        assert!(!snapshot.is_occupied(&a));
    }

    #[test]
    fn zero_is_not_stored() {
        let a = Address::repeat_byte(1);
        let key = H256::repeat_byte(9);
        let mut state = WorldState::default();
        state.store(a, key, H256::repeat_byte(1));
        state.store(a, key, H256::zero());
        assert!(state.storage.is_empty());
    }
}
