//! The registry of builtin symbols (`block`, `msg`, `tx`, hashing
//! primitives, ...) and the member table of `address` values. Types are
//! built on demand; the tables themselves are just match arms.

use crate::sol::{DataLocation, Mutability, Visibility};

use super::types::SolType;

fn uint256() -> SolType {
    SolType::uint(256)
}

fn address_payable() -> SolType {
    SolType::Address { payable: true }
}

fn fixed(width: u8) -> SolType {
    SolType::FixedBytes { width }
}

fn bytes_memory() -> SolType {
    SolType::Bytes.specialize(DataLocation::Memory)
}

fn builtin_fn(params: Vec<SolType>, returns: Vec<SolType>, mutability: Mutability) -> SolType {
    SolType::Function {
        params,
        returns,
        visibility: Visibility::Internal,
        mutability,
    }
}

/// The type registered for a global builtin identifier, if there is one.
pub fn builtin_symbol(name: &str) -> Option<SolType> {
    let ty = match name {
        "block" => SolType::BuiltinStruct {
            name: "block".into(),
            members: vec![
                ("coinbase".into(), address_payable()),
                ("difficulty".into(), uint256()),
                ("gaslimit".into(), uint256()),
                ("number".into(), uint256()),
                ("timestamp".into(), uint256()),
            ],
        },
        "msg" => SolType::BuiltinStruct {
            name: "msg".into(),
            members: vec![
                ("data".into(), SolType::Bytes.specialize(DataLocation::CallData)),
                ("sender".into(), address_payable()),
                ("sig".into(), fixed(4)),
                ("value".into(), uint256()),
            ],
        },
        "tx" => SolType::BuiltinStruct {
            name: "tx".into(),
            members: vec![
                ("gasprice".into(), uint256()),
                ("origin".into(), address_payable()),
            ],
        },
        "now" => uint256(),
        "blockhash" => builtin_fn(vec![uint256()], vec![fixed(32)], Mutability::View),
        "gasleft" => builtin_fn(vec![], vec![uint256()], Mutability::View),
        "addmod" | "mulmod" => builtin_fn(
            vec![uint256(), uint256(), uint256()],
            vec![uint256()],
            Mutability::Pure,
        ),
        "keccak256" | "sha256" => {
            builtin_fn(vec![bytes_memory()], vec![fixed(32)], Mutability::Pure)
        }
        "ripemd160" => builtin_fn(vec![bytes_memory()], vec![fixed(20)], Mutability::Pure),
        "ecrecover" => builtin_fn(
            vec![fixed(32), SolType::uint(8), fixed(32), fixed(32)],
            vec![SolType::Address { payable: false }],
            Mutability::Pure,
        ),
        _ => return None,
    };

    Some(ty)
}

/// The member table of `address` and `address payable` values.
pub fn address_member(name: &str) -> Option<SolType> {
    let ty = match name {
        "balance" => uint256(),
        "transfer" => builtin_fn(vec![uint256()], vec![], Mutability::NonPayable),
        "send" => builtin_fn(vec![uint256()], vec![SolType::Bool], Mutability::NonPayable),
        "call" | "delegatecall" | "staticcall" => builtin_fn(
            vec![bytes_memory()],
            vec![SolType::Bool, bytes_memory()],
            Mutability::Payable,
        ),
        _ => return None,
    };

    Some(ty)
}
