//! Rendering decoded values for output.

use alloy_core::dyn_abi::DynSolValue;
use serde_json::{json, Value};

/// JSON form of one decoded value. Integers are decimal strings so that
/// 256-bit values survive JS consumers.
pub fn value_to_json(value: &DynSolValue) -> Value {
    #[allow(unreachable_patterns)]
    match value {
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::Int(i, _) => Value::String(i.to_string()),
        DynSolValue::Uint(u, _) => Value::String(u.to_string()),
        DynSolValue::FixedBytes(word, size) => {
            Value::String(format!("0x{}", hex::encode(&word[..*size])))
        }
        DynSolValue::Address(a) => Value::String(a.to_checksum(None)),
        DynSolValue::Function(f) => Value::String(format!("0x{}", hex::encode(f.as_slice()))),
        DynSolValue::Bytes(b) => Value::String(format!("0x{}", hex::encode(b))),
        DynSolValue::String(s) => Value::String(s.clone()),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            Value::Array(items.iter().map(value_to_json).collect())
        }
        other => Value::String(format!("{other:?}")),
    }
}

/// JSON for a sub-result: `null` when empty, the bare value for a single
/// field, an array otherwise.
pub fn fields_to_json(fields: &[DynSolValue]) -> Value {
    match fields {
        [] => Value::Null,
        [single] => value_to_json(single),
        many => Value::Array(many.iter().map(value_to_json).collect()),
    }
}

/// Print `(input, value)` rows to stdout.
pub fn print_rows<I, V>(rows: I, as_json: bool)
where
    I: IntoIterator<Item = (String, V)>,
    V: Into<Value>,
{
    if as_json {
        let out: Vec<Value> = rows
            .into_iter()
            .map(|(input, value)| json!({ "input": input, "value": value.into() }))
            .collect();
        println!("{}", Value::Array(out));
    } else {
        for (input, value) in rows {
            match value.into() {
                Value::String(s) => println!("{input}\t{s}"),
                other => println!("{input}\t{other}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256, U256};

    #[test]
    fn uint_is_a_decimal_string() {
        let v = DynSolValue::Uint(U256::from(10).pow(U256::from(30)), 256);
        assert_eq!(value_to_json(&v), json!("1000000000000000000000000000000"));
    }

    #[test]
    fn fixed_bytes_are_truncated_to_size() {
        let v = DynSolValue::FixedBytes(B256::repeat_byte(0xab), 4);
        assert_eq!(value_to_json(&v), json!("0xabababab"));
    }

    #[test]
    fn empty_fields_are_null() {
        assert_eq!(fields_to_json(&[]), Value::Null);
    }

    #[test]
    fn multiple_fields_form_an_array() {
        let fields = [
            DynSolValue::Bool(true),
            DynSolValue::Address(Address::ZERO),
        ];
        assert_eq!(
            fields_to_json(&fields),
            json!([true, "0x0000000000000000000000000000000000000000"])
        );
    }
}
