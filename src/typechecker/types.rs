//! Semantic type algebra of the annotation language.
//!
//! Types come in two flavours. A *general* type carries no data location
//! and is what [`ingest_type_name`](super::ingest_type_name) produces from
//! a host type expression. A *specialized* type is the type of an actual
//! value: every reference type (arrays, `bytes`, `string`, mappings,
//! structs, contracts) is wrapped in a location-tagged [`SolType::Pointer`].
//! [`SolType::specialize`] and [`SolType::despecialize`] convert between the
//! two and are mutual inverses on ingested types.

use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use crate::ast::NodeId;
use crate::sol::{DataLocation, FunctionDef, Mutability, UserDefRef, VarDecl, Visibility};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum SolType {
    Bool,
    Address {
        payable: bool,
    },
    Int {
        bits: u16,
        signed: bool,
    },
    /// An untyped integer literal; widens to any `Int` on demand.
    IntLiteral,
    FixedBytes {
        width: u8,
    },
    Bytes,
    String,
    /// An untyped string or hex literal.
    StringLiteral,
    Array {
        element: Box<SolType>,
        size: Option<u64>,
    },
    Mapping {
        key: Box<SolType>,
        value: Box<SolType>,
    },
    UserDefined(UserDefRef),
    /// Only ever the type of a multi-value return or a `let` right-hand
    /// side; tuples cannot be stored or pointed at.
    Tuple(Vec<SolType>),
    Pointer {
        to: Box<SolType>,
        location: DataLocation,
    },
    Function {
        params: Vec<SolType>,
        returns: Vec<SolType>,
        visibility: Visibility,
        mutability: Mutability,
    },
    /// The magic `block`/`msg`/`tx` values.
    BuiltinStruct {
        name: String,
        members: Vec<(String, SolType)>,
    },
    /// The type of an elementary type used as an expression (`uint256` in
    /// `uint256(x)`).
    BuiltinTypeName(Box<SolType>),
    /// The type of a user-defined type used as an expression.
    UserDefinedTypeName(UserDefRef),
    /// An unresolved overload set; narrowed to a single definition when a
    /// call disambiguates it.
    FunctionSet {
        defs: Vec<Callable>,
        /// Receiver inserted by `using for`; prepended to the argument
        /// list at the call site.
        default_arg: Option<NodeId>,
    },
}

/// One candidate of a [`SolType::FunctionSet`]: either a function
/// definition or a public state variable standing in for its getter.
#[derive(Debug, Clone)]
pub enum Callable {
    Function(Rc<FunctionDef>),
    Getter(Rc<VarDecl>),
}

impl Callable {
    pub fn name(&self) -> &str {
        match self {
            Callable::Function(def) => &def.name,
            Callable::Getter(decl) => &decl.name,
        }
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Function(a), Callable::Function(b)) => Rc::ptr_eq(a, b),
            (Callable::Getter(a), Callable::Getter(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Callable {}

impl serde::Serialize for Callable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Callable::Function(def) => serializer.serialize_str(&def.signature()),
            Callable::Getter(decl) => serializer.serialize_str(&decl.name),
        }
    }
}

impl SolType {
    pub fn uint(bits: u16) -> SolType {
        SolType::Int {
            bits,
            signed: false,
        }
    }

    pub fn int(bits: u16) -> SolType {
        SolType::Int { bits, signed: true }
    }

    /// `Int` or `IntLiteral`.
    pub fn is_int_like(&self) -> bool {
        matches!(self, SolType::Int { .. } | SolType::IntLiteral)
    }

    /// Reference types live in a data location and only appear behind a
    /// [`SolType::Pointer`] in expression types.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            SolType::Bytes
                | SolType::String
                | SolType::Array { .. }
                | SolType::Mapping { .. }
                | SolType::UserDefined(UserDefRef::Struct(_) | UserDefRef::Contract(_))
        )
    }

    /// Attach a data location to a general type, wrapping reference types
    /// in pointers. Contracts always live in storage, mapping keys are
    /// memory copies and mapping values storage slots, whatever `location`
    /// says.
    pub fn specialize(self, location: DataLocation) -> SolType {
        match self {
            s @ (SolType::Bytes | SolType::String) => SolType::Pointer {
                to: Box::new(s),
                location,
            },
            SolType::Array { element, size } => SolType::Pointer {
                to: Box::new(SolType::Array {
                    element: Box::new(element.specialize(location)),
                    size,
                }),
                location,
            },
            s @ SolType::UserDefined(UserDefRef::Contract(_)) => SolType::Pointer {
                to: Box::new(s),
                location: DataLocation::Storage,
            },
            s @ SolType::UserDefined(UserDefRef::Struct(_)) => SolType::Pointer {
                to: Box::new(s),
                location,
            },
            SolType::Mapping { key, value } => SolType::Pointer {
                to: Box::new(SolType::Mapping {
                    key: Box::new(key.specialize(DataLocation::Memory)),
                    value: Box::new(value.specialize(DataLocation::Storage)),
                }),
                location: DataLocation::Storage,
            },
            other => other,
        }
    }

    /// Strip every pointer, recursively. Left inverse of
    /// [`SolType::specialize`].
    pub fn despecialize(&self) -> SolType {
        match self {
            SolType::Pointer { to, .. } => to.despecialize(),
            SolType::Array { element, size } => SolType::Array {
                element: Box::new(element.despecialize()),
                size: *size,
            },
            SolType::Mapping { key, value } => SolType::Mapping {
                key: Box::new(key.despecialize()),
                value: Box::new(value.despecialize()),
            },
            SolType::Tuple(elements) => {
                SolType::Tuple(elements.iter().map(|e| e.despecialize()).collect())
            }
            other => other.clone(),
        }
    }

    /// Whether this type may be the type of an expression: reference types
    /// appear only behind pointers, value types and tuples never do.
    pub fn is_well_formed(&self) -> bool {
        match self {
            SolType::Pointer { to, .. } => match to.as_ref() {
                SolType::Bytes | SolType::String => true,
                SolType::Array { element, .. } => element.is_well_formed(),
                SolType::Mapping { key, value } => key.is_well_formed() && value.is_well_formed(),
                SolType::UserDefined(UserDefRef::Struct(_) | UserDefRef::Contract(_)) => true,
                _ => false,
            },
            SolType::Bytes
            | SolType::String
            | SolType::Array { .. }
            | SolType::Mapping { .. }
            | SolType::UserDefined(UserDefRef::Struct(_) | UserDefRef::Contract(_)) => false,
            SolType::Tuple(elements) => elements.iter().all(|e| e.is_well_formed()),
            SolType::Function {
                params, returns, ..
            } => params
                .iter()
                .chain(returns.iter())
                .all(|t| t.is_well_formed()),
            SolType::BuiltinStruct { members, .. } => {
                members.iter().all(|(_, t)| t.is_well_formed())
            }
            _ => true,
        }
    }
}

impl Display for SolType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SolType::Bool => f.write_str("bool"),
            SolType::Address { payable: true } => f.write_str("address payable"),
            SolType::Address { payable: false } => f.write_str("address"),
            SolType::Int { bits, signed: true } => write!(f, "int{bits}"),
            SolType::Int {
                bits,
                signed: false,
            } => write!(f, "uint{bits}"),
            SolType::IntLiteral => f.write_str("int_const"),
            SolType::FixedBytes { width } => write!(f, "bytes{width}"),
            SolType::Bytes => f.write_str("bytes"),
            SolType::String => f.write_str("string"),
            SolType::StringLiteral => f.write_str("literal_string"),
            SolType::Array { element, size } => match size {
                Some(size) => write!(f, "{element}[{size}]"),
                None => write!(f, "{element}[]"),
            },
            SolType::Mapping { key, value } => write!(f, "mapping({key} => {value})"),
            SolType::UserDefined(def) => f.write_str(&def.qualified_name()),
            SolType::Tuple(elements) => {
                let elements = elements
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "({elements})")
            }
            SolType::Pointer { to, location } => write!(f, "{to} {location}"),
            SolType::Function {
                params, returns, ..
            } => {
                let params = params
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                if returns.is_empty() {
                    write!(f, "function ({params})")
                } else {
                    let returns = returns
                        .iter()
                        .map(|r| r.to_string())
                        .collect::<Vec<_>>()
                        .join(",");
                    write!(f, "function ({params}) returns ({returns})")
                }
            }
            SolType::BuiltinStruct { name, .. } => f.write_str(name),
            SolType::BuiltinTypeName(inner) => write!(f, "type({inner})"),
            SolType::UserDefinedTypeName(def) => write!(f, "type({})", def.qualified_name()),
            SolType::FunctionSet { defs, .. } => {
                let defs = defs
                    .iter()
                    .map(|d| match d {
                        Callable::Function(def) => def.signature(),
                        Callable::Getter(decl) => decl.name.clone(),
                    })
                    .collect::<Vec<_>>()
                    .join(" | ");
                write!(f, "{{{defs}}}")
            }
        }
    }
}
