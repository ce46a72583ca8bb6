use std::rc::Rc;

use log::debug;

use crate::ast::{Expression, FunctionCall, NodeId};
use crate::sol::{DataLocation, FunctionDef, TypeName, UserDefRef, VarDecl};
use crate::typechecker::error::{
    ArgumentMismatch, ExprCountMismatch, FunNoReturn, MissingSolidityType, TypeCheckError,
    UnresolvedFun, UnsupportedFeature, WrongType,
};
use crate::typechecker::{
    implicitly_castable, ingest_variable, Callable, Context, SolType, TypeCheckable, TypeResult,
};

impl TypeCheckable for FunctionCall {
    /// A call disambiguates its callee: type casts, struct constructors,
    /// overload sets and plain function values are all told apart by the
    /// callee's type. Arguments are always checked, even for casts whose
    /// result does not depend on them.
    fn check(&self, ctx: &mut Context) -> TypeResult<SolType> {
        let callee_type = self.callee.check(ctx)?;

        match callee_type {
            SolType::BuiltinTypeName(target) => {
                self.check_args(ctx)?;
                self.expect_single_arg()?;
                // a `bytes(...)`/`string(...)` cast builds its result in
                // memory; value-typed casts are the target type unchanged
                Ok(target.specialize(DataLocation::Memory))
            }
            SolType::UserDefinedTypeName(UserDefRef::Struct(def)) => {
                self.check_args(ctx)?;
                Ok(SolType::UserDefined(UserDefRef::Struct(def))
                    .specialize(DataLocation::Memory))
            }
            SolType::UserDefinedTypeName(UserDefRef::Contract(def)) => {
                self.check_args(ctx)?;
                self.expect_single_arg()?;
                Ok(SolType::UserDefined(UserDefRef::Contract(def))
                    .specialize(DataLocation::Storage))
            }
            SolType::UserDefinedTypeName(UserDefRef::Enum(def)) => {
                self.check_args(ctx)?;
                self.expect_single_arg()?;
                // enums are value types; unlike struct and contract casts
                // the result carries no data location, whatever location
                // the argument was read from
                Ok(SolType::UserDefined(UserDefRef::Enum(def)))
            }
            SolType::FunctionSet { defs, default_arg } => {
                self.check_overloads(ctx, defs, default_arg)
            }
            SolType::Function {
                params, returns, ..
            } => self.check_function_value(ctx, params, returns),
            other => Err(TypeCheckError::WrongType(
                WrongType { actual: other },
                self.callee.position(),
            )),
        }
    }
}

impl FunctionCall {
    fn check_args(&self, ctx: &mut Context) -> TypeResult<Vec<SolType>> {
        self.args.iter().map(|arg| arg.check(ctx)).collect()
    }

    fn expect_single_arg(&self) -> TypeResult<&Expression> {
        match self.args.as_slice() {
            [arg] => Ok(arg),
            args => Err(TypeCheckError::ExprCountMismatch(
                ExprCountMismatch {
                    expected: 1,
                    actual: args.len(),
                },
                self.position.clone(),
            )),
        }
    }

    /// Narrow an overload set against the actual arguments. The receiver
    /// inserted by `using for` is prepended first; its type is already in
    /// the cache because the member access checked it.
    fn check_overloads(
        &self,
        ctx: &mut Context,
        defs: Vec<Callable>,
        default_arg: Option<NodeId>,
    ) -> TypeResult<SolType> {
        let mut arg_types = vec![];
        if let Some(receiver) = default_arg {
            let ty = ctx
                .cache
                .get(receiver)
                .unwrap_or_else(|| unreachable!("using-for receiver {receiver} not in type cache"))
                .clone();
            arg_types.push(ty);
        }
        arg_types.extend(self.check_args(ctx)?);

        let survivors = defs
            .iter()
            .filter(|candidate| match candidate {
                Callable::Function(def) => {
                    def.params.len() == arg_types.len()
                        && def.params.iter().zip(&arg_types).all(|(param, actual)| {
                            ingest_variable(param, None)
                                .is_some_and(|formal| implicitly_castable(actual, &formal))
                        })
                }
                // a generated getter takes no arguments
                Callable::Getter(_) => arg_types.is_empty(),
            })
            .cloned()
            .collect::<Vec<_>>();

        let name = defs
            .first()
            .map(|d| d.name().to_string())
            .unwrap_or_default();

        match survivors.len() {
            0 => Err(TypeCheckError::UnresolvedFun(
                UnresolvedFun { name },
                self.position.clone(),
            )),
            1 => {
                debug!("narrowed call to '{name}' to a single definition");
                let survivor = survivors[0].clone();
                ctx.cache.insert(
                    self.callee.id(),
                    SolType::FunctionSet {
                        defs: survivors,
                        default_arg,
                    },
                );

                match survivor {
                    Callable::Function(def) => self.return_type(&def),
                    Callable::Getter(decl) => self.getter_type(&decl),
                }
            }
            ambiguous => panic!("ambiguous call to '{name}': {ambiguous} overloads accept the arguments"),
        }
    }

    fn return_type(&self, def: &Rc<FunctionDef>) -> TypeResult<SolType> {
        if def.returns.is_empty() {
            return Err(TypeCheckError::FunNoReturn(
                FunNoReturn {
                    callee: def.signature(),
                },
                self.position.clone(),
            ));
        }

        let mut types = vec![];
        for ret in &def.returns {
            let Some(ty) = ingest_variable(ret, None) else {
                return Err(TypeCheckError::MissingSolidityType(
                    MissingSolidityType {
                        name: ret.name.clone(),
                    },
                    self.position.clone(),
                ));
            };
            types.push(ty);
        }

        if types.len() == 1 {
            Ok(types.remove(0))
        } else {
            Ok(SolType::Tuple(types))
        }
    }

    fn getter_type(&self, decl: &Rc<VarDecl>) -> TypeResult<SolType> {
        if matches!(decl.ty, Some(TypeName::UserDefined(_))) {
            return Err(TypeCheckError::UnsupportedFeature(
                UnsupportedFeature {
                    feature: format!(
                        "public getter for the user-defined typed variable '{}'",
                        decl.name
                    ),
                },
                self.position.clone(),
            ));
        }

        match ingest_variable(decl, None) {
            Some(ty) => Ok(ty),
            None => Err(TypeCheckError::MissingSolidityType(
                MissingSolidityType {
                    name: decl.name.clone(),
                },
                self.position.clone(),
            )),
        }
    }

    fn check_function_value(
        &self,
        ctx: &mut Context,
        params: Vec<SolType>,
        mut returns: Vec<SolType>,
    ) -> TypeResult<SolType> {
        let arg_types = self.check_args(ctx)?;

        if params.len() != arg_types.len() {
            return Err(TypeCheckError::ArgumentMismatch(
                ArgumentMismatch {
                    expected: SolType::Tuple(params),
                    actual: SolType::Tuple(arg_types),
                },
                self.position.clone(),
            ));
        }

        for (arg, (actual, formal)) in self.args.iter().zip(arg_types.iter().zip(&params)) {
            if !implicitly_castable(actual, formal) {
                return Err(TypeCheckError::ArgumentMismatch(
                    ArgumentMismatch {
                        expected: formal.clone(),
                        actual: actual.clone(),
                    },
                    arg.position(),
                ));
            }
        }

        if returns.is_empty() {
            let signature = format!(
                "function ({})",
                params
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            );
            return Err(TypeCheckError::FunNoReturn(
                FunNoReturn { callee: signature },
                self.position.clone(),
            ));
        }

        if returns.len() == 1 {
            Ok(returns.remove(0))
        } else {
            Ok(SolType::Tuple(returns))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use anyhow::Result;

    use crate::ast::{ExprBuilder, Span};
    use crate::sol::{
        ContractDef, ContractKind, DataLocation, EnumDef, FunctionDef, Mutability, SourceUnit,
        StructDef, TypeName, UserDefRef, VarDecl, Visibility,
    };
    use crate::typechecker::error::{
        ExprCountMismatch, FunNoReturn, TypeCheckError, UnresolvedFun,
    };
    use crate::typechecker::{Callable, Context, SolType, TypeCheckable};

    fn fixture() -> (Context, Rc<ContractDef>) {
        let point = Rc::new(StructDef {
            name: "Point".into(),
            container: Some("Canvas".into()),
            fields: vec![
                Rc::new(VarDecl::field("x", TypeName::elementary("uint256"))),
                Rc::new(VarDecl::field("y", TypeName::elementary("uint256"))),
            ],
        });
        let mode = Rc::new(EnumDef {
            name: "Mode".into(),
            container: Some("Canvas".into()),
            members: vec!["Draw".into(), "Erase".into()],
        });
        let contract = Rc::new(ContractDef {
            name: "Canvas".into(),
            kind: ContractKind::Contract,
            bases: vec![],
            state_vars: vec![Rc::new(VarDecl::state(
                "width",
                TypeName::elementary("uint64"),
                Visibility::Public,
            ))],
            functions: vec![
                Rc::new(FunctionDef {
                    name: "scale".into(),
                    params: vec![
                        Rc::new(VarDecl::param("a", TypeName::elementary("int8"), false)),
                        Rc::new(VarDecl::param("b", TypeName::elementary("uint64"), false)),
                    ],
                    returns: vec![Rc::new(VarDecl::ret(
                        "r",
                        TypeName::elementary("uint64"),
                        false,
                    ))],
                    visibility: Visibility::Public,
                    mutability: Mutability::Pure,
                }),
                Rc::new(FunctionDef {
                    name: "bounds".into(),
                    params: vec![],
                    returns: vec![
                        Rc::new(VarDecl::ret("w", TypeName::elementary("uint256"), false)),
                        Rc::new(VarDecl::ret("h", TypeName::elementary("uint256"), false)),
                    ],
                    visibility: Visibility::Public,
                    mutability: Mutability::View,
                }),
                Rc::new(FunctionDef {
                    name: "clear".into(),
                    params: vec![],
                    returns: vec![],
                    visibility: Visibility::Public,
                    mutability: Mutability::NonPayable,
                }),
            ],
            structs: vec![point],
            enums: vec![mode],
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
    fn test_builtin_cast() -> Result<()> {
        let (mut ctx, _) = fixture();
        let builder = ExprBuilder::new();

        let cast = builder.call(builder.ident("uint256"), vec![builder.number(1)]);
        assert_eq!(cast.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?, SolType::uint(256));

        let bad = builder.call(
            builder.ident("uint256"),
            vec![builder.number(1), builder.number(2)],
        );
        assert_eq!(
            bad.check(&mut ctx),
            Err(TypeCheckError::ExprCountMismatch(
                ExprCountMismatch {
                    expected: 1,
                    actual: 2
                },
                Span::default()
            ))
        );

        Ok(())
    }

    #[test]
    fn test_struct_constructor_builds_in_memory() -> Result<()> {
        let (mut ctx, contract) = fixture();
        let builder = ExprBuilder::new();

        let construct = builder.call(
            builder.ident("Point"),
            vec![builder.number(1), builder.number(2)],
        );
        assert_eq!(
            construct.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?,
            SolType::Pointer {
                to: Box::new(SolType::UserDefined(UserDefRef::Struct(Rc::clone(
                    &contract.structs[0]
                )))),
                location: DataLocation::Memory,
            }
        );

        Ok(())
    }

    #[test]
    fn test_enum_cast_yields_a_bare_value() -> Result<()> {
        let (mut ctx, contract) = fixture();
        let builder = ExprBuilder::new();

        let cast = builder.call(builder.ident("Mode"), vec![builder.number(0)]);
        assert_eq!(
            cast.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?,
            SolType::UserDefined(UserDefRef::Enum(Rc::clone(&contract.enums[0])))
        );

        Ok(())
    }

    #[test]
    fn test_overload_narrowing_writes_back() -> Result<()> {
        let (mut ctx, _) = fixture();
        let builder = ExprBuilder::new();

        let callee = builder.ident("scale");
        let callee_id = callee.id();
        let call = builder.call(callee, vec![builder.number(5), builder.number(9)]);

        assert_eq!(call.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?, SolType::uint(64));

        let Some(SolType::FunctionSet { defs, .. }) = ctx.cache.get(callee_id) else {
            panic!("callee not narrowed in cache");
        };
        assert_eq!(defs.len(), 1);
        assert!(matches!(&defs[0], Callable::Function(f) if f.name == "scale"));

        Ok(())
    }

    #[test]
    fn test_no_matching_overload() {
        let (mut ctx, _) = fixture();
        let builder = ExprBuilder::new();

        let call = builder.call(
            builder.ident("scale"),
            vec![builder.number(5), builder.boolean(true)],
        );
        assert_eq!(
            call.check(&mut ctx),
            Err(TypeCheckError::UnresolvedFun(
                UnresolvedFun {
                    name: "scale".into()
                },
                Span::default()
            ))
        );
    }

    #[test]
    fn test_multiple_returns_make_a_tuple() -> Result<()> {
        let (mut ctx, _) = fixture();
        let builder = ExprBuilder::new();

        let call = builder.call(builder.ident("bounds"), vec![]);
        assert_eq!(
            call.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?,
            SolType::Tuple(vec![SolType::uint(256), SolType::uint(256)])
        );

        Ok(())
    }

    #[test]
    fn test_calling_a_void_function_as_a_value() {
        let (mut ctx, _) = fixture();
        let builder = ExprBuilder::new();

        let call = builder.call(builder.ident("clear"), vec![]);
        assert_eq!(
            call.check(&mut ctx),
            Err(TypeCheckError::FunNoReturn(
                FunNoReturn {
                    callee: "clear()".into()
                },
                Span::default()
            ))
        );
    }

    #[test]
    fn test_public_getter_through_member_access() -> Result<()> {
        let (mut ctx, _) = fixture();
        let builder = ExprBuilder::new();

        let getter = builder.call(builder.member(builder.ident("this"), "width"), vec![]);
        assert_eq!(getter.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?, SolType::uint(64));

        Ok(())
    }

    #[test]
    fn test_builtin_function_call() -> Result<()> {
        let (mut ctx, _) = fixture();
        let builder = ExprBuilder::new();

        let call = builder.call(builder.ident("gasleft"), vec![]);
        assert_eq!(call.check(&mut ctx).map_err(|e| anyhow::anyhow!(e.to_string()))?, SolType::uint(256));

        let bad = builder.call(builder.ident("gasleft"), vec![builder.number(1)]);
        assert!(bad.check(&mut ctx).is_err());

        Ok(())
    }

    #[test]
    fn test_uncallable_callee() {
        let (mut ctx, _) = fixture();
        let builder = ExprBuilder::new();

        let call = builder.call(builder.boolean(true), vec![]);
        assert!(matches!(
            call.check(&mut ctx),
            Err(TypeCheckError::WrongType(_, _))
        ));
    }
}
