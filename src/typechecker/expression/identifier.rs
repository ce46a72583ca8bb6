use log::trace;

use crate::ast::{DefSite, Identifier};
use crate::sol::{DataLocation, UserDefRef};
use crate::typechecker::error::{MissingSolidityType, TypeCheckError, UnknownId};
use crate::typechecker::{
    builtin_symbol, detect_builtin_type, ingest_variable, Callable, Context, SolType,
    TypeCheckable, TypeResult, VarLookup,
};

impl TypeCheckable for Identifier {
    /// Resolution order: `this`, elementary type names, variables (host
    /// declarations and `let` bindings), functions of the current
    /// contract, user-defined type names, builtin symbols. The first hit
    /// wins and stamps the def-site.
    fn check(&self, ctx: &mut Context) -> TypeResult<SolType> {
        let Identifier { name, position, .. } = self;

        if name == "this" {
            if let Some(contract) = ctx.scope.current_contract() {
                self.stamp_def_site(DefSite::This);
                return Ok(SolType::UserDefined(UserDefRef::Contract(contract))
                    .specialize(DataLocation::Storage));
            }
        }

        if let Some(ty) = detect_builtin_type(name) {
            return Ok(ty);
        }

        if let Some(hit) = ctx.scope.lookup_var(name) {
            return match hit {
                VarLookup::Decl(decl) => {
                    let Some(ty) = ingest_variable(&decl, None) else {
                        return Err(TypeCheckError::MissingSolidityType(
                            MissingSolidityType { name: name.clone() },
                            position.clone(),
                        ));
                    };
                    self.stamp_def_site(DefSite::Var(decl));
                    Ok(ty)
                }
                VarLookup::LetBinding { rhs, index } => {
                    // the let checker types the right-hand side before its
                    // bindings become visible
                    let rhs_type = ctx
                        .cache
                        .get(rhs)
                        .unwrap_or_else(|| {
                            unreachable!("let right-hand side {rhs} missing from type cache")
                        })
                        .clone();

                    self.stamp_def_site(DefSite::LetBinding { scope: rhs, index });

                    Ok(match rhs_type {
                        SolType::Tuple(mut elements) => elements.swap_remove(index),
                        single => single,
                    })
                }
            };
        }

        if let Some(contract) = ctx.scope.current_contract() {
            let defs = contract.functions_named(name);
            if !defs.is_empty() {
                self.stamp_def_site(DefSite::FunctionName);
                return Ok(SolType::FunctionSet {
                    defs: defs.into_iter().map(Callable::Function).collect(),
                    default_arg: None,
                });
            }
        }

        if let Some(def) = ctx.scope.resolve_type_name(name) {
            self.stamp_def_site(DefSite::TypeName);
            return Ok(SolType::UserDefinedTypeName(def));
        }

        if let Some(ty) = builtin_symbol(name) {
            return Ok(ty);
        }

        trace!("unresolved identifier '{name}' in [{}]", ctx.scope);
        Err(TypeCheckError::UnknownId(
            UnknownId { name: name.clone() },
            position.clone(),
        ))
    }
}
