//! ABI implementation of [`CallCodec`].
//!
//! A logical input is either one argument ([`CallInput::Scalar`]) or an
//! ordered argument list ([`CallInput::Tuple`]). The caller picks the shape
//! explicitly, so a method whose single parameter is itself a struct is not
//! confused with a multi-parameter method.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_dyn_abi::{FunctionExt, JsonAbiExt};
use alloy_primitives::{Address, Bytes, U256};
use chaincall_core::{CallCodec, CodecError};

use crate::method::MethodDescriptor;

/// One logical input to a batched method call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallInput {
    /// Packed as the method's sole argument.
    Scalar(DynSolValue),
    /// Each element packed as a positional argument, in order.
    Tuple(Vec<DynSolValue>),
}

impl CallInput {
    /// The positional arguments this input packs into.
    pub fn args(&self) -> &[DynSolValue] {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::Tuple(values) => values,
        }
    }

    /// Parse a textual input against `method`'s parameter types.
    ///
    /// Single-parameter methods take the bare value (`0xd8dA...`);
    /// multi-parameter methods take a tuple literal (`(0xd8dA...,0x1111...)`).
    pub fn parse(method: &MethodDescriptor, s: &str) -> Result<Self, CodecError> {
        let coerce_err = |e: alloy_core::dyn_abi::Error| CodecError::Encode {
            reason: format!("input '{s}' for {}: {e}", method.signature()),
        };

        let mut types = method.input_types()?;
        match types.len() {
            0 => Ok(Self::Tuple(Vec::new())),
            1 => types
                .remove(0)
                .coerce_str(s)
                .map(Self::Scalar)
                .map_err(coerce_err),
            _ => match DynSolType::Tuple(types).coerce_str(s).map_err(coerce_err)? {
                DynSolValue::Tuple(values) => Ok(Self::Tuple(values)),
                other => Err(CodecError::Encode {
                    reason: format!(
                        "input '{s}' for {} parsed as {other:?}, expected an argument tuple",
                        method.signature()
                    ),
                }),
            },
        }
    }
}

impl From<DynSolValue> for CallInput {
    fn from(value: DynSolValue) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<DynSolValue>> for CallInput {
    fn from(values: Vec<DynSolValue>) -> Self {
        Self::Tuple(values)
    }
}

impl From<Address> for CallInput {
    fn from(address: Address) -> Self {
        Self::Scalar(DynSolValue::Address(address))
    }
}

impl From<U256> for CallInput {
    fn from(value: U256) -> Self {
        Self::Scalar(DynSolValue::Uint(value, 256))
    }
}

impl From<(Address, Address)> for CallInput {
    fn from((a, b): (Address, Address)) -> Self {
        Self::Tuple(vec![DynSolValue::Address(a), DynSolValue::Address(b)])
    }
}

/// Encodes [`CallInput`]s for one method and decodes its return data into
/// [`DynSolValue`] fields.
#[derive(Debug, Clone)]
pub struct AbiCodec {
    method: MethodDescriptor,
}

impl AbiCodec {
    pub fn new(method: MethodDescriptor) -> Self {
        Self { method }
    }

    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }
}

impl CallCodec for AbiCodec {
    type Input = CallInput;
    type Value = DynSolValue;

    /// `selector ++ abi_encode(args)`; argument count and types are checked.
    fn encode(&self, input: &CallInput) -> Result<Bytes, CodecError> {
        self.method
            .function()
            .abi_encode_input(input.args())
            .map(Bytes::from)
            .map_err(|e| CodecError::Encode {
                reason: format!("{}: {e}", self.method.signature()),
            })
    }

    fn decode(&self, raw: &[u8]) -> Result<Vec<DynSolValue>, CodecError> {
        self.method
            .function()
            .abi_decode_output(raw, true)
            .map_err(|e| CodecError::Decode {
                reason: format!("{} ({} bytes): {e}", self.method.signature(), raw.len()),
            })
    }
}
