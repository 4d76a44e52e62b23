// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use ethers_core::abi::{self, Abi, Function, Token};
use ethers_core::types::{Address, Bytes, H256, U256};
use ethers_core::utils::keccak256;
use spellcast_vm_interpreter::InvokeError;
use spellcast_vm_spell::Selector;

use crate::Runtime;

/// Native code installed at an address.
///
/// The host looks the function up in the [`Abi`] by selector and decodes the
/// arguments before calling in, so implementations only match on the name.
pub trait Endpoint {
    fn name(&self) -> &'static str;

    fn abi(&self) -> &Abi;

    fn call(&self, rt: &mut Runtime, function: &Function, args: Args) -> Result<Bytes, InvokeError>;

    /// Runs once when the endpoint is deployed through `create` or `create2`.
    fn construct(&self, _rt: &mut Runtime) -> Result<(), InvokeError> {
        Ok(())
    }
}

impl Debug for dyn Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.name())
    }
}

/// Find the function of an ABI with the given selector.
pub fn lookup(abi: &Abi, selector: Selector) -> Option<&Function> {
    abi.functions().find(|f| f.short_signature() == selector)
}

/// Decoded arguments, consumed in order.
#[derive(Debug)]
pub struct Args(std::vec::IntoIter<Token>);

impl Args {
    pub fn decode(function: &Function, data: &[u8]) -> Result<Self, InvokeError> {
        let tokens = function.decode_input(data).map_err(|e| {
            InvokeError::revert(format!("invalid arguments for {}: {e}", function.name))
        })?;
        Ok(Self(tokens.into_iter()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.len() == 0
    }

    fn next_as<T>(&mut self, kind: &str, f: impl FnOnce(Token) -> Option<T>) -> Result<T, InvokeError> {
        self.0
            .next()
            .and_then(f)
            .ok_or_else(|| InvokeError::revert(format!("expected {kind} argument")))
    }

    pub fn address(&mut self) -> Result<Address, InvokeError> {
        self.next_as("address", Token::into_address)
    }

    pub fn uint(&mut self) -> Result<U256, InvokeError> {
        self.next_as("uint", Token::into_uint)
    }

    pub fn bytes(&mut self) -> Result<Vec<u8>, InvokeError> {
        self.next_as("bytes", Token::into_bytes)
    }

    pub fn word(&mut self) -> Result<H256, InvokeError> {
        self.next_as("bytes32", |t| {
            t.into_fixed_bytes()
                .filter(|b| b.len() == 32)
                .map(|b| H256::from_slice(&b))
        })
    }

    pub fn string(&mut self) -> Result<String, InvokeError> {
        self.next_as("string", Token::into_string)
    }
}

/// A single word result.
pub fn word_result(token: Token) -> Bytes {
    Bytes::from(abi::encode(&[token]))
}

/// Build calldata for a function of another endpoint.
pub fn calldata(function: &Function, args: &[Token]) -> Result<Vec<u8>, InvokeError> {
    function
        .encode_input(args)
        .map_err(|e| InvokeError::revert(format!("cannot encode {}: {e}", function.name)))
}

/// Code that may be deployed, identified by the hash of its initcode.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub initcode: Bytes,
    pub code: Arc<dyn Endpoint>,
}

impl Artifact {
    pub fn new(initcode: impl Into<Bytes>, code: Arc<dyn Endpoint>) -> Self {
        Self {
            initcode: initcode.into(),
            code,
        }
    }

    pub fn code_hash(&self) -> H256 {
        H256(keccak256(&self.initcode))
    }
}

/// The allow-list of deployable artifacts.
#[derive(Debug, Clone, Default)]
pub struct Artifacts(HashMap<H256, Artifact>);

impl Artifacts {
    pub fn register(&mut self, artifact: Artifact) -> H256 {
        let hash = artifact.code_hash();
        self.0.insert(hash, artifact);
        hash
    }

    pub fn find(&self, initcode: &[u8]) -> Option<&Artifact> {
        self.0.get(&H256(keccak256(initcode)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.0.values()
    }
}
