//! The `CallCodec` trait — encodes logical inputs and decodes raw results.

use alloy_primitives::Bytes;

use crate::error::CodecError;

/// Encodes one logical input into calldata for a fixed method, and unpacks
/// the method's raw return data into ordered fields.
///
/// The batch engine is generic over this trait; `chaincall-evm` provides the
/// ABI implementation.
pub trait CallCodec {
    /// One logical unit of work (a scalar argument or an argument tuple).
    type Input;
    /// One decoded return field.
    type Value;

    /// Produce `selector ++ packed arguments` for `input`.
    fn encode(&self, input: &Self::Input) -> Result<Bytes, CodecError>;

    /// Unpack raw return data into the method's output fields, in order.
    ///
    /// Implementations report malformed or empty buffers as
    /// [`CodecError::Decode`]; the engine substitutes an empty field list.
    fn decode(&self, raw: &[u8]) -> Result<Vec<Self::Value>, CodecError>;
}
