// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use spellcast_vm_interpreter::InvokeError;

/// Price list of the operations the host meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasCosts {
    /// Entering any frame.
    pub call: u64,
    /// Each byte of calldata passed into a frame.
    pub calldata_byte: u64,
    pub store: u64,
    pub log: u64,
    pub create: u64,
}

impl Default for GasCosts {
    fn default() -> Self {
        Self {
            call: 700,
            calldata_byte: 16,
            store: 5000,
            log: 375,
            create: 32000,
        }
    }
}

/// Tracks consumption against an optional budget.
///
/// Gas spent is never given back, not even when the state it paid for is reverted,
/// until the meter is reset for the next run.
#[derive(Debug, Clone, Default)]
pub struct GasMeter {
    limit: Option<u64>,
    used: u64,
    costs: GasCosts,
}

impl GasMeter {
    pub fn new(limit: Option<u64>) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    pub fn with_costs(mut self, costs: GasCosts) -> Self {
        self.costs = costs;
        self
    }

    pub fn costs(&self) -> &GasCosts {
        &self.costs
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn used(&self) -> u64 {
        self.used
    }

    pub fn remaining(&self) -> Option<u64> {
        self.limit.map(|l| l.saturating_sub(self.used))
    }

    /// Charge `amount`, or use up everything left and fail.
    pub fn charge(&mut self, amount: u64) -> Result<(), InvokeError> {
        let used = self.used.saturating_add(amount);
        match self.limit {
            Some(limit) if used > limit => {
                self.used = limit;
                Err(InvokeError::Exhausted)
            }
            _ => {
                self.used = used;
                Ok(())
            }
        }
    }

    pub fn charge_call(&mut self, calldata_len: usize) -> Result<(), InvokeError> {
        let bytes = u64::try_from(calldata_len).unwrap_or(u64::MAX);
        let amount = self
            .costs
            .call
            .saturating_add(bytes.saturating_mul(self.costs.calldata_byte));
        self.charge(amount)
    }

    /// Start a fresh budget, keeping the limit and the price list.
    pub fn reset(&mut self) {
        self.used = 0;
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;
    use spellcast_vm_interpreter::InvokeError;

    use super::GasMeter;

    #[test]
    fn unlimited_never_runs_out() {
        let mut gas = GasMeter::default();
        for _ in 0..1000 {
            gas.charge(u64::MAX / 2).unwrap();
        }
        assert_eq!(gas.remaining(), None);
    }

    #[test]
    fn exhausted_uses_everything() {
        let mut gas = GasMeter::new(Some(1000));
        gas.charge_call(4).unwrap();
        assert_eq!(gas.used(), 700 + 4 * 16);
        assert_eq!(gas.charge(1000), Err(InvokeError::Exhausted));
        assert_eq!(gas.remaining(), Some(0));
        assert_eq!(gas.charge(1), Err(InvokeError::Exhausted));
        assert_eq!(gas.charge(0), Ok(()));

        gas.reset();
        assert_eq!(gas.remaining(), Some(1000));
        gas.charge(1000).unwrap();
    }

    #[quickcheck]
    fn prop_never_exceeds_limit(limit: u64, charges: Vec<u64>) -> bool {
        let mut gas = GasMeter::new(Some(limit));
        for c in charges {
            let _ = gas.charge(c);
            if gas.used() > limit {
                return false;
            }
        }
        true
    }
}
