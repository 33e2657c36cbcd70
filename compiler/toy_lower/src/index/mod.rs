//! Symbol indexing: signatures of every function and global of a unit.
//!
//! Indexing runs to completion before any body is lowered, so bodies can
//! refer to functions and globals declared later in the unit. Each
//! registered symbol becomes a declaration in the module; bodies and
//! initializers are filled in by the compile phase.
//!
//! Calling convention: a method `func (r T) M(a A) R` is the function
//! `T.M(r T, a A) R`; several results are packed into an anonymous struct in
//! declaration order.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use toy_ir::{FuncId, Function, Global, GlobalId, Param, Type};
use toy_syntax::{Decl, DeclId, Field, FuncDecl, Name, Span, ValueSpec};
use tracing::{debug, trace};

use crate::generator::Generator;
use crate::{InternalError, LowerError, LowerProblem};

/// The blank identifier: declares nothing.
pub(crate) const BLANK: &str = "_";

/// A global symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Symbol {
    Func(FuncId),
    Global(GlobalId),
}

/// Functions and globals of one unit, by name.
///
/// Names are unique across both kinds. The declaration-keyed maps point at
/// the declaration that won registration, so a later duplicate's body or
/// initializer is never lowered.
#[derive(Debug, Default)]
pub struct SymbolTable {
    funcs: FxHashMap<Name, FuncId>,
    globals: FxHashMap<Name, GlobalId>,
    defined_at: FxHashMap<Name, Span>,
    decl_funcs: FxHashMap<DeclId, FuncId>,
    decl_globals: FxHashMap<(DeclId, usize), GlobalId>,
}

impl SymbolTable {
    pub fn func(&self, name: Name) -> Option<FuncId> {
        self.funcs.get(&name).copied()
    }

    pub fn global(&self, name: Name) -> Option<GlobalId> {
        self.globals.get(&name).copied()
    }

    /// Functions are looked up before globals.
    pub fn lookup(&self, name: Name) -> Option<Symbol> {
        self.func(name)
            .map(Symbol::Func)
            .or_else(|| self.global(name).map(Symbol::Global))
    }

    /// The function registered for a function declaration.
    pub fn func_for_decl(&self, decl: DeclId) -> Option<FuncId> {
        self.decl_funcs.get(&decl).copied()
    }

    /// The global registered for the `index`-th name of a var declaration.
    pub fn global_for_decl(&self, decl: DeclId, index: usize) -> Option<GlobalId> {
        self.decl_globals.get(&(decl, index)).copied()
    }

    pub fn funcs(&self) -> impl Iterator<Item = (Name, FuncId)> + '_ {
        self.funcs.iter().map(|(&name, &id)| (name, id))
    }

    pub fn globals(&self) -> impl Iterator<Item = (Name, GlobalId)> + '_ {
        self.globals.iter().map(|(&name, &id)| (name, id))
    }

    pub fn len(&self) -> usize {
        self.funcs.len() + self.globals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `Err` with the first definition's span if `name` is taken.
    fn check_unique(&self, name: Name) -> Result<(), Span> {
        match self.defined_at.get(&name) {
            Some(&previous) => Err(previous),
            None => Ok(()),
        }
    }

    fn insert_func(&mut self, name: Name, decl: DeclId, id: FuncId, span: Span) {
        self.funcs.insert(name, id);
        self.decl_funcs.insert(decl, id);
        self.defined_at.insert(name, span);
    }

    fn insert_global(&mut self, name: Name, decl: (DeclId, usize), id: GlobalId, span: Span) {
        self.globals.insert(name, id);
        self.decl_globals.insert(decl, id);
        self.defined_at.insert(name, span);
    }
}

/// A function signature ready for registration.
struct Signature {
    name: Name,
    params: Vec<Param>,
    ret: Type,
}

impl Generator<'_> {
    /// Register every function and global of the unit.
    pub(crate) fn index_unit(&mut self) -> Result<(), InternalError> {
        let unit = self.unit;
        for (id, decl) in unit.decls() {
            match decl {
                Decl::Func(func) => self.index_func(id, func),
                Decl::Var(spec) => self.index_var(id, spec)?,
                Decl::Type(_) | Decl::Import(_) => {}
            }
        }
        debug!(
            funcs = self.symbols.funcs.len(),
            globals = self.symbols.globals.len(),
            "indexed unit"
        );
        Ok(())
    }

    // ── Functions ──────────────────────────────────────────────

    fn index_func(&mut self, id: DeclId, decl: &FuncDecl) {
        let sig = match self.signature(decl) {
            Ok(sig) => sig,
            Err(problem) => {
                self.report(problem);
                return;
            }
        };

        if let Err(previous) = self.symbols.check_unique(sig.name) {
            self.report(LowerProblem::DuplicateSymbol {
                name: self.name(sig.name).to_owned(),
                span: decl.span,
                previous,
            });
            return;
        }

        let func = Function::new(self.name(sig.name), sig.params, sig.ret);
        trace!(name = %func.name, params = func.params.len(), "indexed function");
        let func = self.module.add_func(func);
        self.symbols.insert_func(sig.name, id, func, decl.span);
    }

    /// Build the signature of `decl`. Nothing is registered on failure.
    fn signature(&mut self, decl: &FuncDecl) -> Result<Signature, LowerProblem> {
        let name = match decl.recv.as_slice() {
            [] => decl.name,
            [recv] if recv.arity() == 1 => {
                let Some(base) = recv.ty.base_name() else {
                    return Err(LowerProblem::UnsupportedDeclaration {
                        what: format!(
                            "receiver of method `{}` is not a named type",
                            self.name(decl.name)
                        ),
                        span: decl.span,
                    });
                };
                let mangled = format!("{}.{}", self.name(base), self.name(decl.name));
                self.interner.intern(&mangled)
            }
            _ => {
                return Err(LowerProblem::UnsupportedDeclaration {
                    what: format!("method `{}` has more than one receiver", self.name(decl.name)),
                    span: decl.span,
                })
            }
        };

        let mut params = self.lower_fields(&decl.recv, decl.span)?;
        params.extend(self.lower_fields(&decl.params, decl.span)?);

        let mut results: SmallVec<[Type; 2]> = self
            .lower_fields(&decl.results, decl.span)?
            .into_iter()
            .map(|param| param.ty)
            .collect();
        let ret = match results.len() {
            0 => Type::Void,
            1 => results.swap_remove(0),
            _ => Type::Struct(results.into_vec()),
        };

        Ok(Signature { name, params, ret })
    }

    /// One parameter per field name; an unnamed field still yields one.
    fn lower_fields(&mut self, fields: &[Field], span: Span) -> Result<Vec<Param>, LowerProblem> {
        let mut params = Vec::with_capacity(fields.len());
        for field in fields {
            let ty = self.catalog.resolve(&field.ty, span)?;
            if field.names.is_empty() {
                params.push(Param {
                    name: String::new(),
                    ty,
                });
                continue;
            }
            for &name in &field.names {
                params.push(Param {
                    name: self.name(name).to_owned(),
                    ty: ty.clone(),
                });
            }
        }
        Ok(params)
    }

    // ── Globals ────────────────────────────────────────────────

    fn index_var(&mut self, id: DeclId, spec: &ValueSpec) -> Result<(), InternalError> {
        for (index, &name) in spec.names.iter().enumerate() {
            if self.name(name) == BLANK {
                continue;
            }

            let content_ty = match self.global_type(spec, index) {
                Ok(ty) => ty,
                Err(LowerError::Reported(_)) => continue,
                Err(LowerError::Internal(err)) => return Err(err),
            };

            if let Err(previous) = self.symbols.check_unique(name) {
                self.report(LowerProblem::DuplicateSymbol {
                    name: self.name(name).to_owned(),
                    span: spec.span,
                    previous,
                });
                continue;
            }

            trace!(name = self.name(name), "indexed global");
            let global = self.module.add_global(Global {
                name: self.name(name).to_owned(),
                content_ty,
                init: None,
            });
            self.symbols
                .insert_global(name, (id, index), global, spec.span);
        }
        Ok(())
    }

    /// The annotated type, or else the checker's type of the initializer.
    fn global_type(&mut self, spec: &ValueSpec, index: usize) -> Result<Type, LowerError> {
        if let Some(ty) = &spec.ty {
            return self
                .catalog
                .resolve(ty, spec.span)
                .map_err(|problem| LowerError::Reported(self.report(problem)));
        }
        match spec.values.get(index).or_else(|| spec.values.first()) {
            Some(&init) => self.type_of(init),
            None => {
                let problem = LowerProblem::UnknownType {
                    what: format!("for variable `{}`", self.name(spec.names[index])),
                    span: spec.span,
                };
                Err(LowerError::Reported(self.report(problem)))
            }
        }
    }
}
