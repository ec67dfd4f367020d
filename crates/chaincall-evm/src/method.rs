//! Method descriptors — which function a batch calls and how its arguments
//! and results are typed.

use alloy_core::dyn_abi::DynSolType;
use alloy_dyn_abi::Specifier;
use alloy_json_abi::{Function, JsonAbi, Param};
use alloy_primitives::Selector;
use chaincall_core::{CodecError, MulticallError};

/// A callable contract method: 4-byte selector plus ordered input and output
/// parameter types. Every parameter type is checked to resolve at
/// construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    function: Function,
}

impl MethodDescriptor {
    /// Parse a human-readable signature.
    ///
    /// ```ignore
    /// let m = MethodDescriptor::parse("function balanceOf(address owner) view returns (uint256)")?;
    /// ```
    pub fn parse(signature: &str) -> Result<Self, MulticallError> {
        let function = Function::parse(signature).map_err(|e| {
            MulticallError::config(format!("invalid method signature '{signature}': {e}"))
        })?;
        Self::from_function(function)
    }

    /// Pick function `name` out of a standard Ethereum ABI JSON document.
    ///
    /// For overloaded names the first declaration wins.
    pub fn from_abi_json(abi_json: &str, name: &str) -> Result<Self, MulticallError> {
        let abi: JsonAbi = serde_json::from_str(abi_json)
            .map_err(|e| MulticallError::config(format!("invalid ABI JSON: {e}")))?;
        let function = abi
            .function(name)
            .and_then(|overloads| overloads.first())
            .cloned()
            .ok_or_else(|| MulticallError::config(format!("function '{name}' not found in ABI")))?;
        Self::from_function(function)
    }

    pub fn from_function(function: Function) -> Result<Self, MulticallError> {
        for param in function.inputs.iter().chain(&function.outputs) {
            param.resolve().map_err(|e| {
                MulticallError::config(format!(
                    "{}: unresolvable parameter type '{}': {e}",
                    function.name, param.ty
                ))
            })?;
        }
        Ok(Self { function })
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Canonical signature, e.g. `balanceOf(address)`.
    pub fn signature(&self) -> String {
        self.function.signature()
    }

    pub fn selector(&self) -> Selector {
        self.function.selector()
    }

    pub fn input_types(&self) -> Result<Vec<DynSolType>, CodecError> {
        resolve_all(&self.function.inputs)
    }

    pub fn output_types(&self) -> Result<Vec<DynSolType>, CodecError> {
        resolve_all(&self.function.outputs)
    }

    pub fn function(&self) -> &Function {
        &self.function
    }
}

fn resolve_all(params: &[Param]) -> Result<Vec<DynSolType>, CodecError> {
    params
        .iter()
        .map(|p| {
            p.resolve().map_err(|e| CodecError::Encode {
                reason: format!("param '{}': {e}", p.name),
            })
        })
        .collect()
}
