// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

//! Native endpoints installed at well-known addresses.
//!
//! Some are meant to be called directly (the token, the vault), others only
//! make sense borrowed by the caster through delegation (the token library,
//! the event emitter, the deployer).

use std::sync::Arc;

use ethers_core::abi::{Abi, Event, Function, Token};
use ethers_core::types::{Address, H160};
use spellcast_vm_interpreter::InvokeError;

use crate::endpoint::calldata;
use crate::{Artifact, Endpoint, MemoryHost};

pub mod allowlist;
pub mod deploy;
pub mod events;
pub mod math;
pub mod strings;
pub mod token;
pub mod token_lib;
pub mod vault;

pub use allowlist::{Allowlist, ALLOWLIST_ABI, ALLOWLIST_INITCODE};
pub use deploy::{Deployer, DEPLOY_ABI};
pub use events::{EventEmitter, EVENTS_ABI};
pub use math::{Math, MATH_ABI};
pub use strings::{Strings, STRINGS_ABI};
pub use token::{SimpleToken, TOKEN_ABI};
pub use token_lib::{TokenLibrary, TOKEN_LIB_ABI};
pub use vault::{Vault, VAULT_ABI};

const fn library_address(n: u8) -> Address {
    let mut bz = [0u8; 20];
    bz[18] = 0x10;
    bz[19] = n;
    H160(bz)
}

pub const TOKEN_ADDR: Address = library_address(0x01);
pub const TOKEN_LIB_ADDR: Address = library_address(0x02);
pub const VAULT_ADDR: Address = library_address(0x03);
pub const STRINGS_ADDR: Address = library_address(0x04);
pub const EVENTS_ADDR: Address = library_address(0x05);
pub const MATH_ADDR: Address = library_address(0x06);
pub const DEPLOY_ADDR: Address = library_address(0x07);

pub struct Library;

impl Library {
    pub fn endpoints() -> Vec<(Address, Arc<dyn Endpoint>)> {
        vec![
            (TOKEN_ADDR, Arc::new(SimpleToken) as Arc<dyn Endpoint>),
            (TOKEN_LIB_ADDR, Arc::new(TokenLibrary) as Arc<dyn Endpoint>),
            (VAULT_ADDR, Arc::new(Vault) as Arc<dyn Endpoint>),
            (STRINGS_ADDR, Arc::new(Strings) as Arc<dyn Endpoint>),
            (EVENTS_ADDR, Arc::new(EventEmitter) as Arc<dyn Endpoint>),
            (MATH_ADDR, Arc::new(Math) as Arc<dyn Endpoint>),
            (DEPLOY_ADDR, Arc::new(Deployer) as Arc<dyn Endpoint>),
        ]
    }

    /// Artifacts the deployer is allowed to create.
    pub fn artifacts() -> Vec<Artifact> {
        vec![Artifact::new(ALLOWLIST_INITCODE.to_vec(), Arc::new(Allowlist))]
    }

    pub fn install(host: &mut MemoryHost) {
        for (addr, code) in Self::endpoints() {
            host.install(addr, code);
        }
        for artifact in Self::artifacts() {
            host.allow(artifact);
        }
    }
}

/// Look up a function of a library ABI by name; overloads resolve to the first one.
pub fn function<'a>(abi: &'a Abi, name: &str) -> Result<&'a Function, InvokeError> {
    abi.function(name)
        .map_err(|e| InvokeError::revert(format!("no function {name}: {e}")))
}

pub fn event<'a>(abi: &'a Abi, name: &str) -> Result<&'a Event, InvokeError> {
    abi.event(name)
        .map_err(|e| InvokeError::revert(format!("no event {name}: {e}")))
}

/// Calldata for a named function of a library ABI.
pub fn encode_call(abi: &Abi, name: &str, args: &[Token]) -> Result<Vec<u8>, InvokeError> {
    calldata(function(abi, name)?, args)
}

fn unsupported(endpoint: &dyn Endpoint, function: &Function) -> InvokeError {
    InvokeError::revert(format!(
        "{} does not implement {}",
        endpoint.name(),
        function.signature()
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::Library;
    use crate::MemoryHost;

    #[test]
    fn endpoints_have_distinct_addresses() {
        let endpoints = Library::endpoints();
        let addrs = endpoints.iter().map(|(a, _)| *a).collect::<HashSet<_>>();
        assert_eq!(addrs.len(), endpoints.len());
    }

    #[test]
    fn install_puts_code_everywhere() {
        let mut host = MemoryHost::new();
        Library::install(&mut host);
        for (addr, code) in Library::endpoints() {
            let installed = host.state().code(&addr).expect("code installed");
            assert_eq!(installed.name(), code.name());
        }
        assert_eq!(host.artifacts().iter().count(), 1);
    }
}
