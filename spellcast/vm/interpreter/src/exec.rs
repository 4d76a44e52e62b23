// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use ethers_core::types::{Address, H256, U256};
use serde::Serialize;
use spellcast_vm_spell::{Instruction, InstructionCursor};

use crate::dispatch::{dispatch, Invocation};
use crate::{Anomaly, Element, ElementsTape, ExecError, Host, Operand};

/// What a completed execution leaves behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// The final state of the tape.
    pub tape: ElementsTape,
    /// Number of instructions executed.
    pub steps: usize,
}

/// Terminal state of an execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    Completed,
    Aborted(ExecError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    Running,
    Halted(Halt),
}

/// Executes spell sequences on behalf of one account.
///
/// The interpreter itself is stateless; everything an execution needs lives
/// in the tape created for it, and everything it changes lives in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpellInterpreter {
    acting_as: Address,
}

impl SpellInterpreter {
    pub fn new(acting_as: Address) -> Self {
        Self { acting_as }
    }

    /// Run every instruction in order.
    ///
    /// Either all effects of all instructions are kept, or the host is
    /// reverted to the state it was in before the call and the first
    /// failure is returned.
    pub fn execute<H: Host + ?Sized>(
        &self,
        host: &mut H,
        spells: &[H256],
        elements: Vec<Element>,
    ) -> Result<Outcome, ExecError> {
        let mut exec = Execution {
            acting_as: self.acting_as,
            cursor: InstructionCursor::new(spells),
            tape: ElementsTape::new(elements),
            steps: 0,
        };

        host.checkpoint();

        match exec.run(host) {
            Halt::Completed => {
                host.commit();
                tracing::info!(
                    acting_as = ?self.acting_as,
                    steps = exec.steps,
                    "spells completed"
                );
                Ok(Outcome {
                    tape: exec.tape,
                    steps: exec.steps,
                })
            }
            Halt::Aborted(e) => {
                host.revert();
                tracing::warn!(
                    acting_as = ?self.acting_as,
                    position = e.position(),
                    error = %e,
                    "spells aborted"
                );
                Err(e)
            }
        }
    }
}

/// Shorthand for a one-off execution.
pub fn execute<H: Host + ?Sized>(
    host: &mut H,
    acting_as: Address,
    spells: &[H256],
    elements: Vec<Element>,
) -> Result<Outcome, ExecError> {
    SpellInterpreter::new(acting_as).execute(host, spells, elements)
}

struct Execution<'a> {
    acting_as: Address,
    cursor: InstructionCursor<'a>,
    tape: ElementsTape,
    steps: usize,
}

impl<'a> Execution<'a> {
    fn run<H: Host + ?Sized>(&mut self, host: &mut H) -> Halt {
        let mut status = Status::Running;
        loop {
            match status {
                Status::Running => status = self.step(host),
                Status::Halted(halt) => return halt,
            }
        }
    }

    fn step<H: Host + ?Sized>(&mut self, host: &mut H) -> Status {
        match self.cursor.next() {
            None => Status::Halted(Halt::Completed),
            Some(Err(e)) => Status::Halted(Halt::Aborted(e.into())),
            Some(Ok(instr)) => match self.apply(host, &instr) {
                Ok(()) => {
                    self.steps += 1;
                    Status::Running
                }
                Err(e) => Status::Halted(Halt::Aborted(e)),
            },
        }
    }

    fn apply<H: Host + ?Sized>(&mut self, host: &mut H, instr: &Instruction) -> Result<(), ExecError> {
        let position = instr.position;
        let call_type = instr.command.call_type();
        let operands = instr.operands();
        let mut inputs = operands.inputs();

        tracing::debug!(position, instruction = %instr.command, "casting spell");

        let value = if call_type.carries_value() {
            let slot = inputs.next().ok_or(ExecError::DecodeAnomaly {
                position,
                anomaly: Anomaly::MissingValue,
            })?;
            match self.tape.get(slot) {
                Ok(Operand::Word(w)) => U256::from_big_endian(w.as_bytes()),
                Ok(Operand::Blob(_)) => {
                    return Err(ExecError::DecodeAnomaly {
                        position,
                        anomaly: Anomaly::DynamicValue(slot),
                    })
                }
                Err(e) => return Err(ExecError::from_tape(position, e)),
            }
        } else {
            U256::zero()
        };

        let args = self
            .tape
            .resolve(inputs)
            .map_err(|e| ExecError::from_tape(position, e))?;

        let invocation = Invocation {
            call_type,
            target: instr.command.target,
            selector: instr.command.selector,
            value,
            args,
        };

        let result = dispatch(host, self.acting_as, &invocation)
            .map_err(|e| ExecError::from_invoke(position, e))?;

        match operands.output() {
            Some(slot) => self
                .tape
                .capture(slot, result)
                .map_err(|e| ExecError::from_tape(position, e)),
            None => Ok(()),
        }
    }
}
