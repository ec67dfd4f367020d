//! `chaincall call` — any view function over a list of inputs.

use anyhow::{bail, Context, Result};
use alloy_primitives::Address;
use chaincall_batch::BatchRequest;
use chaincall_core::DEFAULT_MAX_BATCH_SIZE;
use chaincall_evm::{AbiCodec, CallInput, MethodDescriptor};
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;

use crate::format::{fields_to_json, print_rows};
use crate::Session;

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Contract every input is called against
    #[arg(long)]
    pub target: Address,

    /// Human-readable signature, e.g. "function balanceOf(address) view returns (uint256)"
    #[arg(long, conflicts_with = "abi")]
    pub signature: Option<String>,

    /// ABI JSON file (use with --function)
    #[arg(long, requires = "function")]
    pub abi: Option<PathBuf>,

    /// Function name in the --abi file
    #[arg(long)]
    pub function: Option<String>,

    /// One logical input per flag; multi-argument methods take "(a,b,...)"
    #[arg(long = "input", required = true, num_args = 1..)]
    pub inputs: Vec<String>,

    /// Inputs per aggregate call
    #[arg(long, default_value_t = DEFAULT_MAX_BATCH_SIZE)]
    pub batch_size: usize,
}

impl CallArgs {
    fn method(&self) -> Result<MethodDescriptor> {
        match (&self.signature, &self.abi, &self.function) {
            (Some(sig), _, _) => Ok(MethodDescriptor::parse(sig)?),
            (None, Some(path), Some(name)) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading ABI {}", path.display()))?;
                Ok(MethodDescriptor::from_abi_json(&json, name)?)
            }
            _ => bail!("pass --signature, or --abi together with --function"),
        }
    }
}

pub async fn run(session: &Session, args: CallArgs) -> Result<()> {
    let method = args.method()?;
    let inputs = args
        .inputs
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            CallInput::parse(&method, raw).with_context(|| format!("input #{i} ({raw})"))
        })
        .collect::<Result<Vec<_>>>()?;

    let signature = method.signature();
    let codec = AbiCodec::new(method);
    let request = BatchRequest::new(args.target, &inputs)
        .max_batch_size(args.batch_size)
        .options(session.options.clone());

    let start = Instant::now();
    let values = session
        .client
        .call(request, codec, |fields| fields_to_json(&fields))
        .await
        .with_context(|| format!("calling {signature} on {}", args.target))?;
    tracing::info!(
        inputs = inputs.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "call finished"
    );

    print_rows(args.inputs.into_iter().zip(values), session.json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(signature: Option<&str>, abi: Option<&str>, function: Option<&str>) -> CallArgs {
        CallArgs {
            target: Address::repeat_byte(1),
            signature: signature.map(String::from),
            abi: abi.map(PathBuf::from),
            function: function.map(String::from),
            inputs: vec![],
            batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }

    #[test]
    fn method_from_signature() {
        let method = args(Some("function decimals() view returns (uint8)"), None, None)
            .method()
            .unwrap();
        assert_eq!(method.name(), "decimals");
    }

    #[test]
    fn method_source_is_required() {
        assert!(args(None, None, None).method().is_err());
    }

    #[test]
    fn missing_abi_file_is_reported() {
        let err = args(None, Some("/nonexistent/abi.json"), Some("balanceOf"))
            .method()
            .unwrap_err();
        assert!(err.to_string().contains("reading ABI"));
    }
}
