//! The lexical scope stack used for name resolution.
//!
//! The driver pushes the scopes surrounding an annotation before checking
//! it: the global source units, the contract the annotation sits in, and
//! (for function annotations) the function itself. `let` expressions push
//! and pop their own binding scopes during checking. Lookups walk the
//! stack innermost first.

use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use crate::ast::NodeId;
use crate::sol::{ContractDef, FunctionDef, SourceUnit, UserDefRef, VarDecl};

/// The names bound by one `let`; `rhs` is the right-hand side whose
/// (cached) type the bindings take their types from.
#[derive(Debug, Clone)]
pub struct LetScope {
    pub rhs: NodeId,
    pub names: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum ScopeEntry {
    Units(Vec<Rc<SourceUnit>>),
    Contract(Rc<ContractDef>),
    Function(Rc<FunctionDef>),
    Let(LetScope),
}

/// A successful variable lookup: either a host declaration or a position
/// in a `let` binding list.
#[derive(Debug, Clone)]
pub enum VarLookup {
    Decl(Rc<VarDecl>),
    LetBinding { rhs: NodeId, index: usize },
}

#[derive(Debug, Clone, Default)]
pub struct Scope {
    entries: Vec<ScopeEntry>,
}

impl Scope {
    pub fn new(units: Vec<Rc<SourceUnit>>) -> Scope {
        Scope {
            entries: vec![ScopeEntry::Units(units)],
        }
    }

    pub fn push_contract(&mut self, contract: Rc<ContractDef>) {
        self.entries.push(ScopeEntry::Contract(contract));
    }

    pub fn push_function(&mut self, function: Rc<FunctionDef>) {
        self.entries.push(ScopeEntry::Function(function));
    }

    pub fn push_let(&mut self, scope: LetScope) {
        self.entries.push(ScopeEntry::Let(scope));
    }

    pub fn pop(&mut self) {
        self.entries.pop();
    }

    /// Find a variable, innermost scope first. `let` scopes bind their
    /// names, function scopes their parameters and then their returns,
    /// contract scopes the state variables of every base in linearization
    /// order. No variables live in the global scope.
    pub fn lookup_var(&self, name: &str) -> Option<VarLookup> {
        for entry in self.entries.iter().rev() {
            match entry {
                ScopeEntry::Let(scope) => {
                    if let Some(index) = scope.names.iter().position(|n| n == name) {
                        return Some(VarLookup::LetBinding {
                            rhs: scope.rhs,
                            index,
                        });
                    }
                }
                ScopeEntry::Function(function) => {
                    if let Some(decl) = function
                        .params
                        .iter()
                        .chain(function.returns.iter())
                        .find(|v| v.name == name)
                    {
                        return Some(VarLookup::Decl(Rc::clone(decl)));
                    }
                }
                ScopeEntry::Contract(contract) => {
                    if let Some(decl) = contract.state_var_named(name) {
                        return Some(VarLookup::Decl(decl));
                    }
                }
                ScopeEntry::Units(_) => {}
            }
        }

        None
    }

    /// Find a user-defined type, innermost scope first, skipping function
    /// and `let` scopes (they declare no types).
    pub fn resolve_type_name(&self, name: &str) -> Option<UserDefRef> {
        for entry in self.entries.iter().rev() {
            match entry {
                ScopeEntry::Let(_) | ScopeEntry::Function(_) => {}
                ScopeEntry::Contract(contract) => {
                    if let Some(def) = contract.struct_named(name) {
                        return Some(UserDefRef::Struct(def));
                    }
                    if let Some(def) = contract.enum_named(name) {
                        return Some(UserDefRef::Enum(def));
                    }
                }
                ScopeEntry::Units(units) => {
                    if let Some(def) = units
                        .iter()
                        .flat_map(|u| u.structs.iter())
                        .find(|s| s.name == name)
                    {
                        return Some(UserDefRef::Struct(Rc::clone(def)));
                    }
                    if let Some(def) = units
                        .iter()
                        .flat_map(|u| u.enums.iter())
                        .find(|e| e.name == name)
                    {
                        return Some(UserDefRef::Enum(Rc::clone(def)));
                    }
                    if let Some(def) = units
                        .iter()
                        .flat_map(|u| u.contracts.iter())
                        .find(|c| c.name == name)
                    {
                        return Some(UserDefRef::Contract(Rc::clone(def)));
                    }
                }
            }
        }

        None
    }

    /// The contract the innermost contract scope belongs to.
    pub fn current_contract(&self) -> Option<Rc<ContractDef>> {
        self.entries.iter().rev().find_map(|entry| match entry {
            ScopeEntry::Contract(contract) => Some(Rc::clone(contract)),
            _ => None,
        })
    }

    /// The function whose body the checked expression sits in, if the
    /// innermost non-`let` scope is one.
    pub fn enclosing_function(&self) -> Option<Rc<FunctionDef>> {
        for entry in self.entries.iter().rev() {
            match entry {
                ScopeEntry::Let(_) => {}
                ScopeEntry::Function(function) => return Some(Rc::clone(function)),
                _ => return None,
            }
        }

        None
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let entries = self
            .entries
            .iter()
            .map(|entry| match entry {
                ScopeEntry::Units(units) => format!("{} source unit(s)", units.len()),
                ScopeEntry::Contract(contract) => format!("contract {}", contract.name),
                ScopeEntry::Function(function) => format!("function {}", function.signature()),
                ScopeEntry::Let(scope) => format!("let {}", scope.names.join(", ")),
            })
            .collect::<Vec<_>>()
            .join(" > ");

        f.write_str(&entries)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::sol::{
        ContractKind, EnumDef, Mutability, StructDef, TypeName, VarKind, Visibility,
    };

    use super::*;

    fn base_contract() -> Rc<ContractDef> {
        Rc::new(ContractDef {
            name: "Token".into(),
            kind: ContractKind::Contract,
            bases: vec![],
            state_vars: vec![Rc::new(VarDecl::state(
                "supply",
                TypeName::elementary("uint256"),
                Visibility::Internal,
            ))],
            functions: vec![],
            structs: vec![Rc::new(StructDef {
                name: "Checkpoint".into(),
                container: Some("Token".into()),
                fields: vec![],
            })],
            enums: vec![],
            using_for: vec![],
        })
    }

    fn derived_contract(base: Rc<ContractDef>) -> Rc<ContractDef> {
        Rc::new(ContractDef {
            name: "Vault".into(),
            kind: ContractKind::Contract,
            bases: vec![base],
            state_vars: vec![Rc::new(VarDecl::state(
                "locked",
                TypeName::elementary("bool"),
                Visibility::Internal,
            ))],
            functions: vec![],
            structs: vec![],
            enums: vec![Rc::new(EnumDef {
                name: "State".into(),
                container: Some("Vault".into()),
                members: vec!["Open".into(), "Shut".into()],
            })],
            using_for: vec![],
        })
    }

    fn sample_function() -> Rc<FunctionDef> {
        Rc::new(FunctionDef {
            name: "lock".into(),
            params: vec![Rc::new(VarDecl::param(
                "supply",
                TypeName::elementary("uint64"),
                false,
            ))],
            returns: vec![Rc::new(VarDecl::ret(
                "ok",
                TypeName::elementary("bool"),
                false,
            ))],
            visibility: Visibility::Public,
            mutability: Mutability::NonPayable,
        })
    }

    #[test]
    fn test_inner_scopes_shadow_outer_ones() {
        let vault = derived_contract(base_contract());
        let mut scope = Scope::new(vec![]);
        scope.push_contract(Rc::clone(&vault));

        // the state variable of the base is visible through the contract scope
        let Some(VarLookup::Decl(decl)) = scope.lookup_var("supply") else {
            panic!("state variable not found");
        };
        assert_eq!(decl.kind, VarKind::State { visibility: Visibility::Internal });

        // a parameter of the same name shadows it
        scope.push_function(sample_function());
        let Some(VarLookup::Decl(decl)) = scope.lookup_var("supply") else {
            panic!("parameter not found");
        };
        assert_eq!(decl.kind, VarKind::Param { external: false });
    }

    #[test]
    fn test_returns_are_in_scope() {
        let mut scope = Scope::new(vec![]);
        scope.push_contract(derived_contract(base_contract()));
        scope.push_function(sample_function());

        let Some(VarLookup::Decl(decl)) = scope.lookup_var("ok") else {
            panic!("return value not found");
        };
        assert_eq!(decl.kind, VarKind::Return { external: false });
    }

    #[test]
    fn test_let_bindings_resolve_positionally() {
        let mut scope = Scope::new(vec![]);
        scope.push_let(LetScope {
            rhs: NodeId(7),
            names: vec!["a".into(), "b".into()],
        });

        assert!(matches!(
            scope.lookup_var("b"),
            Some(VarLookup::LetBinding { rhs: NodeId(7), index: 1 })
        ));
        assert!(scope.lookup_var("c").is_none());

        scope.pop();
        assert!(scope.lookup_var("b").is_none());
    }

    #[test]
    fn test_type_resolution_searches_bases_and_units() {
        let vault = derived_contract(base_contract());
        let unit = Rc::new(SourceUnit {
            structs: vec![],
            enums: vec![],
            contracts: vec![Rc::clone(&vault)],
        });

        let mut scope = Scope::new(vec![unit]);
        scope.push_contract(Rc::clone(&vault));
        scope.push_function(sample_function());

        // nested enum of the contract itself
        assert!(matches!(
            scope.resolve_type_name("State"),
            Some(UserDefRef::Enum(_))
        ));
        // struct inherited from the base
        assert!(matches!(
            scope.resolve_type_name("Checkpoint"),
            Some(UserDefRef::Struct(_))
        ));
        // the contract itself, found in the global scope
        assert!(matches!(
            scope.resolve_type_name("Vault"),
            Some(UserDefRef::Contract(_))
        ));
        assert!(scope.resolve_type_name("Missing").is_none());
    }

    #[test]
    fn test_enclosing_function_skips_let_scopes() {
        let mut scope = Scope::new(vec![]);
        scope.push_contract(derived_contract(base_contract()));

        assert!(scope.enclosing_function().is_none());

        scope.push_function(sample_function());
        scope.push_let(LetScope {
            rhs: NodeId(0),
            names: vec!["x".into()],
        });

        assert_eq!(scope.enclosing_function().map(|f| f.name.clone()), Some("lock".into()));
    }

    #[test]
    fn test_display_lists_scopes_outermost_first() {
        let mut scope = Scope::new(vec![]);
        scope.push_contract(derived_contract(base_contract()));
        scope.push_function(sample_function());
        scope.push_let(LetScope {
            rhs: NodeId(0),
            names: vec!["a".into(), "b".into()],
        });

        assert_eq!(
            scope.to_string(),
            "0 source unit(s) > contract Vault > function lock(uint64) > let a, b"
        );
    }
}
