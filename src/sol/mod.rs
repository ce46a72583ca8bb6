//! Host-language declarations as seen by the checker.
//!
//! The contract compiler resolves its own sources long before annotations
//! are checked; what arrives here is its symbol table: every type reference
//! already points at a declaration. The checker only ever queries this
//! model, it never mutates it, so declarations are shared via [`Rc`] and
//! compared by identity.

use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum DataLocation {
    Storage,
    Memory,
    CallData,
}

impl Display for DataLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DataLocation::Storage => f.write_str("storage"),
            DataLocation::Memory => f.write_str("memory"),
            DataLocation::CallData => f.write_str("calldata"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Visibility {
    External,
    Public,
    Internal,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Mutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
    Contract,
    Library,
    Interface,
}

/// A (resolved) type expression of the host language.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeName {
    /// `bool`, `uint256`, `bytes4`, `address payable`, ...
    Elementary(String),
    /// `T[]` or `T[n]`; only literal sizes survive host resolution.
    Array {
        element: Box<TypeName>,
        size: Option<u64>,
    },
    /// A reference to a struct, enum or contract declaration.
    UserDefined(UserDefRef),
    /// A function type, e.g. `function (uint256) external returns (bool)`.
    Function {
        params: Vec<Rc<VarDecl>>,
        returns: Vec<Rc<VarDecl>>,
        visibility: Visibility,
        mutability: Mutability,
    },
    /// `mapping(K => V)`
    Mapping {
        key: Box<TypeName>,
        value: Box<TypeName>,
    },
}

impl TypeName {
    pub fn elementary(name: impl ToString) -> TypeName {
        TypeName::Elementary(name.to_string())
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeName::Elementary(name) => f.write_str(name),
            TypeName::Array { element, size } => match size {
                Some(size) => write!(f, "{element}[{size}]"),
                None => write!(f, "{element}[]"),
            },
            TypeName::UserDefined(def) => f.write_str(&def.qualified_name()),
            TypeName::Function { params, returns, .. } => {
                let params = params
                    .iter()
                    .filter_map(|p| p.ty.as_ref().map(|t| t.to_string()))
                    .collect::<Vec<_>>()
                    .join(",");
                let returns = returns
                    .iter()
                    .filter_map(|r| r.ty.as_ref().map(|t| t.to_string()))
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "function ({params}) returns ({returns})")
            }
            TypeName::Mapping { key, value } => write!(f, "mapping({key} => {value})"),
        }
    }
}

/// Where a variable is declared; this determines its effective data
/// location when no location is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    State { visibility: Visibility },
    Param { external: bool },
    Return { external: bool },
    Field,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    /// `None` models a declaration whose host type could not be resolved.
    pub ty: Option<TypeName>,
    /// The data location written out in source, if any.
    pub location: Option<DataLocation>,
    pub kind: VarKind,
}

impl VarDecl {
    pub fn state(name: impl ToString, ty: TypeName, visibility: Visibility) -> VarDecl {
        VarDecl {
            name: name.to_string(),
            ty: Some(ty),
            location: None,
            kind: VarKind::State { visibility },
        }
    }

    pub fn param(name: impl ToString, ty: TypeName, external: bool) -> VarDecl {
        VarDecl {
            name: name.to_string(),
            ty: Some(ty),
            location: None,
            kind: VarKind::Param { external },
        }
    }

    pub fn ret(name: impl ToString, ty: TypeName, external: bool) -> VarDecl {
        VarDecl {
            name: name.to_string(),
            ty: Some(ty),
            location: None,
            kind: VarKind::Return { external },
        }
    }

    pub fn field(name: impl ToString, ty: TypeName) -> VarDecl {
        VarDecl {
            name: name.to_string(),
            ty: Some(ty),
            location: None,
            kind: VarKind::Field,
        }
    }

    pub fn located(mut self, location: DataLocation) -> VarDecl {
        self.location = Some(location);
        self
    }
}

#[derive(Debug)]
pub struct StructDef {
    pub name: String,
    /// Name of the containing contract for nested declarations.
    pub container: Option<String>,
    pub fields: Vec<Rc<VarDecl>>,
}

impl StructDef {
    pub fn qualified_name(&self) -> String {
        qualify(&self.container, &self.name)
    }

    pub fn field_named(&self, name: &str) -> Option<Rc<VarDecl>> {
        self.fields.iter().find(|f| f.name == name).cloned()
    }
}

#[derive(Debug)]
pub struct EnumDef {
    pub name: String,
    pub container: Option<String>,
    pub members: Vec<String>,
}

impl EnumDef {
    pub fn qualified_name(&self) -> String {
        qualify(&self.container, &self.name)
    }
}

fn qualify(container: &Option<String>, name: &str) -> String {
    match container {
        Some(container) => format!("{container}.{name}"),
        None => name.to_string(),
    }
}

#[derive(Debug)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Rc<VarDecl>>,
    pub returns: Vec<Rc<VarDecl>>,
    pub visibility: Visibility,
    pub mutability: Mutability,
}

impl FunctionDef {
    pub fn is_external(&self) -> bool {
        self.visibility == Visibility::External
    }

    /// Canonical signature, e.g. `add(int8,uint64)`.
    pub fn signature(&self) -> String {
        let params = self
            .params
            .iter()
            .filter_map(|p| p.ty.as_ref().map(|t| t.to_string()))
            .collect::<Vec<_>>()
            .join(",");
        format!("{}({params})", self.name)
    }
}

/// A `using <library> for <type>` directive; `target` is `None` for the
/// wildcard form `using L for *`.
#[derive(Debug)]
pub struct UsingFor {
    pub library: Rc<ContractDef>,
    pub target: Option<TypeName>,
}

#[derive(Debug)]
pub struct ContractDef {
    pub name: String,
    pub kind: ContractKind,
    /// Linearized ancestor chain, most derived first, excluding `self`.
    pub bases: Vec<Rc<ContractDef>>,
    pub state_vars: Vec<Rc<VarDecl>>,
    pub functions: Vec<Rc<FunctionDef>>,
    pub structs: Vec<Rc<StructDef>>,
    pub enums: Vec<Rc<EnumDef>>,
    pub using_for: Vec<UsingFor>,
}

impl ContractDef {
    /// The contract itself followed by its linearized bases.
    pub fn linearization(self: &Rc<Self>) -> Vec<Rc<ContractDef>> {
        let mut chain = vec![Rc::clone(self)];
        chain.extend(self.bases.iter().cloned());
        chain
    }

    /// Every function with the given name, searching the whole
    /// linearization (overload sets span base contracts).
    pub fn functions_named(self: &Rc<Self>, name: &str) -> Vec<Rc<FunctionDef>> {
        self.linearization()
            .iter()
            .flat_map(|c| c.functions.iter())
            .filter(|f| f.name == name)
            .cloned()
            .collect()
    }

    pub fn state_var_named(self: &Rc<Self>, name: &str) -> Option<Rc<VarDecl>> {
        self.linearization()
            .iter()
            .flat_map(|c| c.state_vars.iter())
            .find(|v| v.name == name)
            .cloned()
    }

    pub fn struct_named(self: &Rc<Self>, name: &str) -> Option<Rc<StructDef>> {
        self.linearization()
            .iter()
            .flat_map(|c| c.structs.iter())
            .find(|s| s.name == name)
            .cloned()
    }

    pub fn enum_named(self: &Rc<Self>, name: &str) -> Option<Rc<EnumDef>> {
        self.linearization()
            .iter()
            .flat_map(|c| c.enums.iter())
            .find(|e| e.name == name)
            .cloned()
    }
}

/// Top-level declarations of one host source file.
#[derive(Debug, Default)]
pub struct SourceUnit {
    pub structs: Vec<Rc<StructDef>>,
    pub enums: Vec<Rc<EnumDef>>,
    pub contracts: Vec<Rc<ContractDef>>,
}

/// A resolved reference to a user-defined declaration. Cloning is cheap;
/// equality is declaration identity, not name equality.
#[derive(Debug, Clone)]
pub enum UserDefRef {
    Struct(Rc<StructDef>),
    Enum(Rc<EnumDef>),
    Contract(Rc<ContractDef>),
}

impl UserDefRef {
    pub fn name(&self) -> &str {
        match self {
            UserDefRef::Struct(def) => &def.name,
            UserDefRef::Enum(def) => &def.name,
            UserDefRef::Contract(def) => &def.name,
        }
    }

    pub fn qualified_name(&self) -> String {
        match self {
            UserDefRef::Struct(def) => def.qualified_name(),
            UserDefRef::Enum(def) => def.qualified_name(),
            UserDefRef::Contract(def) => def.name.clone(),
        }
    }
}

impl PartialEq for UserDefRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (UserDefRef::Struct(a), UserDefRef::Struct(b)) => Rc::ptr_eq(a, b),
            (UserDefRef::Enum(a), UserDefRef::Enum(b)) => Rc::ptr_eq(a, b),
            (UserDefRef::Contract(a), UserDefRef::Contract(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for UserDefRef {}

impl serde::Serialize for UserDefRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.qualified_name())
    }
}
