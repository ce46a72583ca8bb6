//! Conversion of host-language type expressions into the semantic algebra.
//!
//! Host types arrive fully resolved, so failure to understand one is a bug
//! in the embedding, not a user error; those paths panic. The one user
//! facing hole is a declaration without a resolvable type at all, which
//! surfaces as `None` and becomes a `MissingSolidityType` diagnostic at the
//! use site.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::sol::{DataLocation, TypeName, VarDecl, VarKind};

use super::types::SolType;

static INT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(u?)int([0-9]*)$").unwrap());
static BYTES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^bytes([0-9]+)$").unwrap());
static INT_CONST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^int_const -?[0-9]+").unwrap());

/// Parse an elementary type token. Returns `None` for names that are no
/// elementary type, including out-of-range widths like `bytes33`, `int264`
/// or `uint255`.
pub fn elementary_type(name: &str) -> Option<SolType> {
    match name {
        "bool" => return Some(SolType::Bool),
        "address" => return Some(SolType::Address { payable: false }),
        "address payable" => return Some(SolType::Address { payable: true }),
        "byte" => return Some(SolType::FixedBytes { width: 1 }),
        "bytes" => return Some(SolType::Bytes),
        "string" => return Some(SolType::String),
        _ => {}
    }

    if INT_CONST_RE.is_match(name) {
        return Some(SolType::IntLiteral);
    }

    if let Some(captures) = INT_RE.captures(name) {
        let signed = captures[1].is_empty();
        let bits = match &captures[2] {
            "" => 256,
            digits => digits.parse::<u16>().ok()?,
        };

        if !(8..=256).contains(&bits) || bits % 8 != 0 {
            return None;
        }

        return Some(SolType::Int { bits, signed });
    }

    if let Some(captures) = BYTES_RE.captures(name) {
        let width = captures[1].parse::<u8>().ok()?;

        if !(1..=32).contains(&width) {
            return None;
        }

        return Some(SolType::FixedBytes { width });
    }

    None
}

/// The type of an elementary type name used as an expression
/// (`uint256(x)`), if `name` is one.
pub fn detect_builtin_type(name: &str) -> Option<SolType> {
    elementary_type(name).map(|ty| SolType::BuiltinTypeName(Box::new(ty)))
}

/// Convert a host type expression into a general (location-free) type.
pub fn ingest_type_name(ty: &TypeName) -> SolType {
    match ty {
        TypeName::Elementary(name) => elementary_type(name)
            .unwrap_or_else(|| panic!("unknown elementary type name '{name}'")),
        TypeName::Array { element, size } => SolType::Array {
            element: Box::new(ingest_type_name(element)),
            size: *size,
        },
        TypeName::UserDefined(def) => SolType::UserDefined(def.clone()),
        TypeName::Function {
            params,
            returns,
            visibility,
            mutability,
        } => SolType::Function {
            params: params.iter().map(|p| ingest_required(p)).collect(),
            returns: returns.iter().map(|r| ingest_required(r)).collect(),
            visibility: *visibility,
            mutability: *mutability,
        },
        TypeName::Mapping { key, value } => SolType::Mapping {
            key: Box::new(ingest_type_name(key)),
            value: Box::new(ingest_type_name(value)),
        },
    }
}

fn ingest_required(decl: &VarDecl) -> SolType {
    ingest_variable(decl, None)
        .unwrap_or_else(|| panic!("declaration '{}' inside a function type has no type", decl.name))
}

/// Ingest a variable declaration and specialize the result to the
/// variable's effective data location:
///
/// 1. a location written out in source,
/// 2. else storage for state variables,
/// 3. else calldata for parameters/returns of external functions and
///    memory for all other parameters/returns,
/// 4. else `base_loc`, the location of the struct value a field was
///    reached through.
///
/// Returns `None` when the declaration has no resolvable host type.
pub fn ingest_variable(decl: &VarDecl, base_loc: Option<DataLocation>) -> Option<SolType> {
    let ty = decl.ty.as_ref()?;
    let general = ingest_type_name(ty);

    let location = decl.location.or(match decl.kind {
        VarKind::State { .. } => Some(DataLocation::Storage),
        VarKind::Param { external } | VarKind::Return { external } => Some(if external {
            DataLocation::CallData
        } else {
            DataLocation::Memory
        }),
        VarKind::Field => base_loc,
    });

    Some(match location {
        Some(location) => general.specialize(location),
        None => general,
    })
}
