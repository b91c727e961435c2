//! Interface descriptor: the contract ABI the session is bound against.
//!
//! Accepts either a raw JSON ABI array or a compiled artifact object that
//! carries the ABI under an `abi` key. The descriptor must expose the two
//! operations the typed binding calls, with matching selectors.

use std::fs;
use std::path::Path;

use alloy::json_abi::{Function, JsonAbi, StateMutability};
use alloy::sol_types::SolCall;
use serde_json::Value;

use crate::contract::binding::HelloHedera;
use crate::error::{ClientError, ClientResult};

const BUILTIN_ABI: &str = include_str!("../../abi/HelloHedera.json");

/// Name of the read operation.
pub const GET_MESSAGE: &str = "getMessage";

/// Name of the write operation.
pub const SET_MESSAGE: &str = "setMessage";

/// Validated contract interface.
#[derive(Debug, Clone)]
pub struct InterfaceDescriptor {
    abi: JsonAbi,
}

impl InterfaceDescriptor {
    /// The interface shipped with the crate.
    pub fn builtin() -> ClientResult<Self> {
        Self::from_json(BUILTIN_ABI)
    }

    /// Load from a JSON ABI or artifact file.
    pub fn from_path(path: &Path) -> ClientResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ClientError::Schema(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON ABI or artifact document.
    pub fn from_json(json: &str) -> ClientResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ClientError::Schema(format!("invalid JSON: {}", e)))?;

        let abi_value = match value {
            Value::Object(mut artifact) => artifact
                .remove("abi")
                .ok_or_else(|| ClientError::Schema("artifact has no 'abi' field".to_string()))?,
            other => other,
        };

        let abi: JsonAbi = serde_json::from_value(abi_value)
            .map_err(|e| ClientError::Schema(format!("malformed ABI: {}", e)))?;

        let descriptor = Self { abi };
        descriptor.validate()?;
        Ok(descriptor)
    }

    fn validate(&self) -> ClientResult<()> {
        let get = self.find(GET_MESSAGE, HelloHedera::getMessageCall::SELECTOR)?;
        let returns_string = get.outputs.len() == 1 && get.outputs[0].ty == "string";
        if !returns_string {
            return Err(ClientError::Schema(format!(
                "{} must return a single string",
                GET_MESSAGE
            )));
        }
        if !matches!(get.state_mutability, StateMutability::View | StateMutability::Pure) {
            return Err(ClientError::Schema(format!(
                "{} must be view or pure",
                GET_MESSAGE
            )));
        }

        let set = self.find(SET_MESSAGE, HelloHedera::setMessageCall::SELECTOR)?;
        if matches!(set.state_mutability, StateMutability::View | StateMutability::Pure) {
            return Err(ClientError::Schema(format!(
                "{} must be state-changing",
                SET_MESSAGE
            )));
        }

        Ok(())
    }

    /// Locate the overload of `name` whose selector matches the binding.
    fn find(&self, name: &str, selector: [u8; 4]) -> ClientResult<&Function> {
        let overloads = self
            .abi
            .function(name)
            .ok_or_else(|| ClientError::Schema(format!("missing operation '{}'", name)))?;

        overloads
            .iter()
            .find(|f| f.selector().0 == selector)
            .ok_or_else(|| {
                let found: Vec<String> = overloads.iter().map(|f| f.signature()).collect();
                ClientError::Schema(format!(
                    "no compatible '{}' (found: {})",
                    name,
                    found.join(", ")
                ))
            })
    }

    /// Underlying ABI.
    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }
}
