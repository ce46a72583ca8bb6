use std::rc::Rc;

use crate::ast::MemberAccess;
use crate::sol::{UserDefRef, VarKind, Visibility};
use crate::typechecker::error::{MissingSolidityType, NoField, TypeCheckError};
use crate::typechecker::{
    address_member, ingest_type_name, ingest_variable, Callable, Context, SolType, TypeCheckable,
    TypeResult,
};

impl TypeCheckable for MemberAccess {
    /// Member lookup dispatches on the base type; when nothing structural
    /// matches, `using for` directives of the current contract may attach
    /// library functions to the base's general type.
    fn check(&self, ctx: &mut Context) -> TypeResult<SolType> {
        let base_type = self.base.check(ctx)?;

        if let Some(ty) = self.resolve_direct(&base_type)? {
            return Ok(ty);
        }

        let general = base_type.despecialize();
        if let Some(contract) = ctx.scope.current_contract() {
            let mut defs = vec![];
            for part in contract.linearization() {
                for directive in &part.using_for {
                    let applies = match &directive.target {
                        None => true,
                        Some(target) => ingest_type_name(target) == general,
                    };
                    if !applies {
                        continue;
                    }

                    defs.extend(
                        directive
                            .library
                            .functions_named(&self.member)
                            .into_iter()
                            .map(Callable::Function),
                    );
                }
            }

            if !defs.is_empty() {
                // the base becomes the implicit first argument of the call
                return Ok(SolType::FunctionSet {
                    defs,
                    default_arg: Some(self.base.id()),
                });
            }
        }

        Err(TypeCheckError::NoField(
            NoField {
                member: self.member.clone(),
            },
            self.member_position.clone(),
        ))
    }
}

impl MemberAccess {
    /// Structural member resolution. `Ok(None)` means "nothing here, try
    /// `using for`"; builtin structs and addresses have closed member
    /// tables and fail immediately instead.
    fn resolve_direct(&self, base_type: &SolType) -> TypeResult<Option<SolType>> {
        match base_type {
            SolType::BuiltinStruct { members, .. } => {
                match members.iter().find(|(name, _)| name == &self.member) {
                    Some((_, ty)) => Ok(Some(ty.clone())),
                    None => Err(self.no_field()),
                }
            }
            SolType::Pointer { to, location } => match to.as_ref() {
                SolType::Array { .. } if self.member == "length" => Ok(Some(SolType::uint(256))),
                SolType::UserDefined(UserDefRef::Struct(def)) => {
                    let Some(field) = def.field_named(&self.member) else {
                        return Ok(None);
                    };

                    match ingest_variable(&field, Some(*location)) {
                        Some(ty) => Ok(Some(ty)),
                        None => Err(TypeCheckError::MissingSolidityType(
                            MissingSolidityType {
                                name: field.name.clone(),
                            },
                            self.member_position.clone(),
                        )),
                    }
                }
                SolType::UserDefined(UserDefRef::Contract(def)) => {
                    let functions = def.functions_named(&self.member);
                    if !functions.is_empty() {
                        return Ok(Some(SolType::FunctionSet {
                            defs: functions.into_iter().map(Callable::Function).collect(),
                            default_arg: None,
                        }));
                    }

                    if let Some(decl) = def.state_var_named(&self.member) {
                        let public = matches!(
                            decl.kind,
                            VarKind::State {
                                visibility: Visibility::Public
                            }
                        );
                        if public {
                            // a public state variable is reachable from the
                            // outside through its generated getter
                            return Ok(Some(SolType::FunctionSet {
                                defs: vec![Callable::Getter(decl)],
                                default_arg: None,
                            }));
                        }
                    }

                    Ok(address_member(&self.member))
                }
                _ => Ok(None),
            },
            SolType::Address { .. } => match address_member(&self.member) {
                Some(ty) => Ok(Some(ty)),
                None => Err(self.no_field()),
            },
            SolType::UserDefinedTypeName(UserDefRef::Contract(def)) => {
                if let Some(nested) = def.struct_named(&self.member) {
                    return Ok(Some(SolType::UserDefinedTypeName(UserDefRef::Struct(
                        nested,
                    ))));
                }
                if let Some(nested) = def.enum_named(&self.member) {
                    return Ok(Some(SolType::UserDefinedTypeName(UserDefRef::Enum(nested))));
                }

                let functions = def.functions_named(&self.member);
                if !functions.is_empty() {
                    return Ok(Some(SolType::FunctionSet {
                        defs: functions.into_iter().map(Callable::Function).collect(),
                        default_arg: None,
                    }));
                }

                Ok(None)
            }
            SolType::UserDefinedTypeName(UserDefRef::Enum(def)) => {
                if def.members.iter().any(|m| m == &self.member) {
                    Ok(Some(SolType::UserDefined(UserDefRef::Enum(Rc::clone(def)))))
                } else {
                    Ok(None)
                }
            }
            SolType::FunctionSet { defs, .. } if defs.len() == 1 && self.member == "selector" => {
                Ok(Some(SolType::FixedBytes { width: 4 }))
            }
            _ => Ok(None),
        }
    }

    fn no_field(&self) -> TypeCheckError {
        TypeCheckError::NoField(
            NoField {
                member: self.member.clone(),
            },
            self.member_position.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use anyhow::Result;

    use crate::ast::{ExprBuilder, Span};
    use crate::sol::{
        ContractDef, ContractKind, EnumDef, FunctionDef, Mutability, SourceUnit, StructDef,
        TypeName, UserDefRef, UsingFor, VarDecl, Visibility,
    };
    use crate::typechecker::error::{NoField, TypeCheckError};
    use crate::typechecker::{Callable, Context, SolType, TypeCheckable};

    fn exchange() -> (Context, Rc<ContractDef>) {
        let order = Rc::new(StructDef {
            name: "Order".into(),
            container: Some("Exchange".into()),
            fields: vec![
                Rc::new(VarDecl::field("amount", TypeName::elementary("uint256"))),
                Rc::new(VarDecl::field("note", TypeName::elementary("string"))),
            ],
        });
        let side = Rc::new(EnumDef {
            name: "Side".into(),
            container: Some("Exchange".into()),
            members: vec!["Buy".into(), "Sell".into()],
        });
        let contract = Rc::new(ContractDef {
            name: "Exchange".into(),
            kind: ContractKind::Contract,
            bases: vec![],
            state_vars: vec![
                Rc::new(VarDecl::state(
                    "best",
                    TypeName::UserDefined(UserDefRef::Struct(Rc::clone(&order))),
                    Visibility::Internal,
                )),
                Rc::new(VarDecl::state(
                    "orders",
                    TypeName::Array {
                        element: Box::new(TypeName::elementary("uint256")),
                        size: None,
                    },
                    Visibility::Internal,
                )),
                Rc::new(VarDecl::state(
                    "owner",
                    TypeName::elementary("address"),
                    Visibility::Internal,
                )),
            ],
            functions: vec![Rc::new(FunctionDef {
                name: "settle".into(),
                params: vec![],
                returns: vec![],
                visibility: Visibility::External,
                mutability: Mutability::NonPayable,
            })],
            structs: vec![order],
            enums: vec![side],
            using_for: vec![],
        });
        let unit = Rc::new(SourceUnit {
            structs: vec![],
            enums: vec![],
            contracts: vec![Rc::clone(&contract)],
        });

        let mut ctx = Context::new(vec![unit]);
        ctx.scope.push_contract(Rc::clone(&contract));

        (ctx, contract)
    }

    #[test]
    fn test_struct_fields_inherit_the_base_location() -> Result<()> {
        let (mut ctx, _) = exchange();
        let builder = ExprBuilder::new();

        let amount = builder.member(builder.ident("best"), "amount");
        assert_eq!(amount.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?, SolType::uint(256));

        let note = builder.member(builder.ident("best"), "note");
        assert_eq!(
            note.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?,
            SolType::String.specialize(crate::sol::DataLocation::Storage)
        );

        Ok(())
    }

    #[test]
    fn test_array_length() -> Result<()> {
        let (mut ctx, _) = exchange();
        let builder = ExprBuilder::new();

        let length = builder.member(builder.ident("orders"), "length");
        assert_eq!(length.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?, SolType::uint(256));

        Ok(())
    }

    #[test]
    fn test_builtin_struct_members() -> Result<()> {
        let (mut ctx, _) = exchange();
        let builder = ExprBuilder::new();

        let sender = builder.member(builder.ident("msg"), "sender");
        assert_eq!(sender.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?, SolType::Address { payable: true });

        let bad = builder.member(builder.ident("msg"), "nonce");
        assert_eq!(
            bad.check(&mut ctx),
            Err(TypeCheckError::NoField(
                NoField {
                    member: "nonce".into()
                },
                Span::default()
            ))
        );

        Ok(())
    }

    #[test]
    fn test_address_members() -> Result<()> {
        let (mut ctx, _) = exchange();
        let builder = ExprBuilder::new();

        let balance = builder.member(builder.ident("owner"), "balance");
        assert_eq!(balance.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?, SolType::uint(256));

        Ok(())
    }

    #[test]
    fn test_contract_members_through_this() -> Result<()> {
        let (mut ctx, _) = exchange();
        let builder = ExprBuilder::new();

        let settle = builder.member(builder.ident("this"), "settle");
        assert!(matches!(
            settle.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?,
            SolType::FunctionSet { ref defs, default_arg: None } if defs.len() == 1
        ));

        // a contract value falls back to the address member table
        let balance = builder.member(builder.ident("this"), "balance");
        assert_eq!(balance.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?, SolType::uint(256));

        Ok(())
    }

    #[test]
    fn test_enum_constants() -> Result<()> {
        let (mut ctx, contract) = exchange();
        let builder = ExprBuilder::new();

        let buy = builder.member(builder.ident("Side"), "Buy");
        let ty = buy.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        assert_eq!(
            ty,
            SolType::UserDefined(UserDefRef::Enum(Rc::clone(&contract.enums[0])))
        );

        let missing = builder.member(builder.ident("Side"), "Hold");
        assert_eq!(
            missing.check(&mut ctx),
            Err(TypeCheckError::NoField(
                NoField {
                    member: "Hold".into()
                },
                Span::default()
            ))
        );

        Ok(())
    }

    #[test]
    fn test_selector_of_a_single_function() -> Result<()> {
        let (mut ctx, _) = exchange();
        let builder = ExprBuilder::new();

        let selector = builder.member(
            builder.member(builder.ident("this"), "settle"),
            "selector",
        );
        assert_eq!(selector.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?, SolType::FixedBytes { width: 4 });

        Ok(())
    }

    #[test]
    fn test_using_for_attaches_library_functions() -> Result<()> {
        let library = Rc::new(ContractDef {
            name: "Math".into(),
            kind: ContractKind::Library,
            bases: vec![],
            state_vars: vec![],
            functions: vec![Rc::new(FunctionDef {
                name: "clamp".into(),
                params: vec![
                    Rc::new(VarDecl::param("x", TypeName::elementary("uint32"), false)),
                    Rc::new(VarDecl::param("hi", TypeName::elementary("uint32"), false)),
                ],
                returns: vec![Rc::new(VarDecl::ret(
                    "r",
                    TypeName::elementary("uint32"),
                    false,
                ))],
                visibility: Visibility::Internal,
                mutability: Mutability::Pure,
            })],
            structs: vec![],
            enums: vec![],
            using_for: vec![],
        });
        let contract = Rc::new(ContractDef {
            name: "Clamped".into(),
            kind: ContractKind::Contract,
            bases: vec![],
            state_vars: vec![
                Rc::new(VarDecl::state(
                    "level",
                    TypeName::elementary("uint32"),
                    Visibility::Internal,
                )),
                Rc::new(VarDecl::state(
                    "flag",
                    TypeName::elementary("bool"),
                    Visibility::Internal,
                )),
            ],
            functions: vec![],
            structs: vec![],
            enums: vec![],
            using_for: vec![UsingFor {
                library: Rc::clone(&library),
                target: Some(TypeName::elementary("uint32")),
            }],
        });
        let unit = Rc::new(SourceUnit {
            structs: vec![],
            enums: vec![],
            contracts: vec![Rc::clone(&library), Rc::clone(&contract)],
        });

        let mut ctx = Context::new(vec![unit]);
        ctx.scope.push_contract(contract);

        let builder = ExprBuilder::new();
        let base = builder.ident("level");
        let base_id = base.id();
        let bound = builder.member(base, "clamp");

        let ty = bound.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        let SolType::FunctionSet { defs, default_arg } = ty else {
            panic!("expected a function set, got {ty}");
        };
        assert_eq!(defs.len(), 1);
        assert!(matches!(&defs[0], Callable::Function(f) if f.name == "clamp"));
        assert_eq!(default_arg, Some(base_id));

        // the directive does not cover other types
        let unbound = builder.member(builder.ident("flag"), "clamp");
        assert!(unbound.check(&mut ctx).is_err());

        Ok(())
    }
}
