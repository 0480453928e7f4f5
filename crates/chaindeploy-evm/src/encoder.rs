//! Initializer calldata encoding.
//!
//! Turns a human-readable function signature plus arguments into the
//! calldata a proxy is initialized with.
//!
//! # Usage
//! ```ignore
//! let data = encode_call_str("initialize(address,string)", &[
//!     "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
//!     "My Token",
//! ])?;
//! ```

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_dyn_abi::{JsonAbiExt, Specifier};
use alloy_json_abi::Function;
use alloy_primitives::{Address, Bytes};
use chaindeploy_core::{DeployError, DeployTarget, InitializationTransaction};

fn parse_function(signature: &str) -> Result<Function, DeployError> {
    Function::parse(signature).map_err(|e| {
        DeployError::configuration(format!("invalid function signature '{signature}': {e}"))
    })
}

/// Encode a call to `signature` with already-typed arguments.
///
/// Returns `selector ++ abi_encode(args...)`.
pub fn encode_call(signature: &str, args: &[DynSolValue]) -> Result<Bytes, DeployError> {
    let func = parse_function(signature)?;
    if args.len() != func.inputs.len() {
        return Err(DeployError::configuration(format!(
            "argument count mismatch for {}: expected {}, got {}",
            func.name,
            func.inputs.len(),
            args.len()
        )));
    }
    let calldata = func
        .abi_encode_input(args)
        .map_err(|e| DeployError::configuration(format!("encode {}: {e}", func.name)))?;
    Ok(calldata.into())
}

/// Encode a call from string arguments, coercing each to its declared type.
pub fn encode_call_str(signature: &str, args: &[&str]) -> Result<Bytes, DeployError> {
    let func = parse_function(signature)?;
    if args.len() != func.inputs.len() {
        return Err(DeployError::configuration(format!(
            "argument count mismatch for {}: expected {}, got {}",
            func.name,
            func.inputs.len(),
            args.len()
        )));
    }

    let mut values = Vec::with_capacity(args.len());
    for (i, (param, arg)) in func.inputs.iter().zip(args.iter()).enumerate() {
        let ty: DynSolType = param
            .resolve()
            .map_err(|e| DeployError::configuration(format!("param {i}: {e}")))?;
        let value = ty.coerce_str(arg).map_err(|e| {
            DeployError::configuration(format!(
                "param {i} ('{arg}' as {}): {e}",
                ty.sol_type_name()
            ))
        })?;
        values.push(value);
    }

    let calldata = func
        .abi_encode_input(&values)
        .map_err(|e| DeployError::configuration(format!("encode {}: {e}", func.name)))?;
    Ok(calldata.into())
}

/// Build an initialization transaction calling `signature` on `implementation`.
pub fn init_call(
    implementation: impl Into<DeployTarget>,
    signature: &str,
    args: &[DynSolValue],
) -> Result<InitializationTransaction, DeployError> {
    let data = encode_call(signature, args)?;
    Ok(InitializationTransaction::new(implementation, data))
}

/// ABI-encode `(address, bytes)` as constructor parameters.
pub fn encode_logic_and_data(implementation: Address, data: &[u8]) -> Vec<u8> {
    DynSolValue::Tuple(vec![
        DynSolValue::Address(implementation),
        DynSolValue::Bytes(data.to_vec()),
    ])
    .abi_encode_params()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use chaindeploy_core::ErrorKind;

    #[test]
    fn encode_transfer_selector_and_length() {
        let calldata = encode_call(
            "transfer(address,uint256)",
            &[
                DynSolValue::Address(Address::repeat_byte(0xd8)),
                DynSolValue::Uint(U256::from(1_000_000u64), 256),
            ],
        )
        .unwrap();
        // transfer(address,uint256) = 0xa9059cbb
        assert_eq!(&calldata[..4], hex::decode("a9059cbb").unwrap().as_slice());
        assert_eq!(calldata.len(), 4 + 32 + 32);
    }

    #[test]
    fn string_arguments_are_coerced() {
        let from_str = encode_call_str(
            "transfer(address,uint256)",
            &["0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045", "1000000"],
        )
        .unwrap();
        let typed = encode_call(
            "transfer(address,uint256)",
            &[
                DynSolValue::Address(
                    "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".parse().unwrap(),
                ),
                DynSolValue::Uint(U256::from(1_000_000u64), 256),
            ],
        )
        .unwrap();
        assert_eq!(from_str, typed);
    }

    #[test]
    fn wrong_arg_count_is_configuration_error() {
        let err = encode_call("transfer(address,uint256)", &[DynSolValue::Bool(true)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn bad_signature_is_configuration_error() {
        let err = encode_call_str("not a signature(", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn init_call_targets_implementation() {
        let owner = DynSolValue::Address(Address::repeat_byte(0x0e));
        let init = init_call(Address::repeat_byte(0x11), "initialize(address)", &[owner.clone()])
            .unwrap();
        assert_eq!(init.encode(), encode_call("initialize(address)", &[owner]).unwrap());
        assert_eq!(init.target.resolve().await.unwrap(), Address::repeat_byte(0x11));

        let err = init_call(Address::repeat_byte(0x11), "initialize(address)", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn logic_and_data_layout() {
        let encoded = encode_logic_and_data(Address::repeat_byte(0x11), &[0xab, 0xcd]);
        // address word, offset word, length word, one padded data word
        assert_eq!(encoded.len(), 4 * 32);
        assert_eq!(&encoded[12..32], Address::repeat_byte(0x11).as_slice());
        assert_eq!(encoded[63], 0x40);
        assert_eq!(encoded[95], 2);
        assert_eq!(&encoded[96..98], &[0xab, 0xcd]);
    }
}
