//! Type catalog: named type definitions of one unit.
//!
//! Named types are created in two steps so that definitions may refer to
//! each other (and to themselves through pointers) regardless of source
//! order:
//!
//! 1. [`declare`](TypeCatalog::declare) every type name as a skeleton;
//! 2. [`define`](TypeCatalog::define) each body by resolving its syntax.
//!
//! Afterwards [`reject_recursive`](TypeCatalog::reject_recursive) clears the
//! bodies of types that are defined as themselves (`type A B; type B A`),
//! which have no finite layout.

use std::cmp::Ordering;

use rustc_hash::{FxHashMap, FxHashSet};
use toy_ir::{Type, TypeDefId, TypeDefs};
use toy_syntax::{Name, Span, StringInterner, TypeExpr};

use crate::basic::lower_basic;
use crate::natural::natural_cmp;
use crate::LowerProblem;

/// Depth limit when following chains of source type declarations.
const MAX_ALIAS_DEPTH: usize = 64;

/// Registry of the unit's named types.
pub struct TypeCatalog<'a> {
    interner: &'a StringInterner,
    defs: TypeDefs,
    /// Types declared in source, by name. Implicit types (`untyped_*`) are
    /// in `defs` only.
    declared: FxHashMap<Name, TypeDefId>,
    spans: FxHashMap<TypeDefId, Span>,
    /// Source syntax of each declared type's body.
    sources: FxHashMap<TypeDefId, TypeExpr>,
}

impl<'a> TypeCatalog<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        Self {
            interner,
            defs: TypeDefs::new(),
            declared: FxHashMap::default(),
            spans: FxHashMap::default(),
            sources: FxHashMap::default(),
        }
    }

    // ── Definitions ────────────────────────────────────────────

    /// Declare `name` as a skeleton, or return the existing declaration.
    pub fn declare(&mut self, name: Name, span: Span) -> TypeDefId {
        if let Some(&id) = self.declared.get(&name) {
            return id;
        }
        let id = self.defs.declare(self.interner.lookup(name));
        self.declared.insert(name, id);
        self.spans.insert(id, span);
        id
    }

    /// The declaration of `name`, if the unit declares it.
    pub fn lookup(&self, name: Name) -> Option<TypeDefId> {
        self.declared.get(&name).copied()
    }

    /// Where the declared type `id` was declared.
    pub fn declared_at(&self, id: TypeDefId) -> Span {
        self.spans.get(&id).copied().unwrap_or(Span::DUMMY)
    }

    /// Resolve `ty` and make it the body of `id`. On failure the def stays
    /// a skeleton.
    pub fn define(&mut self, id: TypeDefId, ty: &TypeExpr, span: Span) -> Result<(), LowerProblem> {
        self.sources.insert(id, ty.clone());
        let body = self.resolve(ty, span)?;
        self.defs.set_body(id, Some(body));
        Ok(())
    }

    /// Register a type the unit uses without declaring it. Idempotent:
    /// later calls return the first registration.
    pub fn register_implicit(&mut self, name: &str, body: Type) -> Type {
        if let Some(id) = self.defs.lookup(name) {
            return Type::Named(id);
        }
        let id = self.defs.declare(name);
        self.defs.set_body(id, Some(body));
        Type::Named(id)
    }

    /// Resolve type syntax to an IR type. `span` locates the syntax for
    /// diagnostics.
    pub fn resolve(&mut self, ty: &TypeExpr, span: Span) -> Result<Type, LowerProblem> {
        match ty {
            TypeExpr::Basic(kind) => lower_basic(self, *kind, span),
            TypeExpr::Named(name) => match self.lookup(*name) {
                Some(id) => Ok(Type::Named(id)),
                None => Err(LowerProblem::UnknownType {
                    what: format!("`{}`", self.interner.lookup(*name)),
                    span,
                }),
            },
            TypeExpr::Pointer(elem) => Ok(Type::pointer_to(self.resolve(elem, span)?)),
            TypeExpr::Struct(fields) => {
                let mut elems = Vec::with_capacity(fields.len());
                for field in fields {
                    let elem = self.resolve(&field.ty, span)?;
                    for _ in 1..field.arity() {
                        elems.push(elem.clone());
                    }
                    elems.push(elem);
                }
                Ok(Type::Struct(elems))
            }
        }
    }

    /// Clear the body of every declared type whose chain of named
    /// references leads back to itself, and report each one.
    pub fn reject_recursive(&mut self) -> Vec<LowerProblem> {
        let mut recursive = Vec::new();
        for (id, _) in self.defs.iter() {
            if self.spans.contains_key(&id) && self.is_self_referential(id) {
                recursive.push(id);
            }
        }

        recursive
            .into_iter()
            .map(|id| {
                self.defs.set_body(id, None);
                LowerProblem::InvalidRecursiveType {
                    name: self.defs.get(id).name.clone(),
                    span: self.declared_at(id),
                }
            })
            .collect()
    }

    fn is_self_referential(&self, start: TypeDefId) -> bool {
        let mut seen = FxHashSet::default();
        let mut ty = self.defs.get(start).body.as_ref();
        while let Some(Type::Named(next)) = ty {
            if *next == start {
                return true;
            }
            if !seen.insert(*next) {
                return false;
            }
            ty = self.defs.get(*next).body.as_ref();
        }
        false
    }

    // ── Queries ────────────────────────────────────────────────

    /// All named types, sorted by natural order of their names.
    pub fn emission_order(&self) -> Vec<TypeDefId> {
        let mut order: Vec<TypeDefId> = self.defs.iter().map(|(id, _)| id).collect();
        order.sort_by(|&a, &b| self.cmp_names(a, b));
        order
    }

    fn cmp_names(&self, a: TypeDefId, b: TypeDefId) -> Ordering {
        natural_cmp(&self.defs.get(a).name, &self.defs.get(b).name)
    }

    pub fn underlying<'t>(&'t self, ty: &'t Type) -> &'t Type {
        self.defs.underlying(ty)
    }

    /// Whether two types are the same once named types are resolved.
    pub fn same_type(&self, a: &Type, b: &Type) -> bool {
        a == b || self.underlying(a) == self.underlying(b)
    }

    /// Whether source type syntax denotes an unsigned integer kind,
    /// looking through declared names.
    pub fn is_unsigned_source(&self, ty: &TypeExpr) -> bool {
        let mut ty = ty;
        for _ in 0..MAX_ALIAS_DEPTH {
            match ty {
                TypeExpr::Basic(kind) => return kind.is_unsigned(),
                TypeExpr::Named(name) => {
                    match self.lookup(*name).and_then(|id| self.sources.get(&id)) {
                        Some(source) => ty = source,
                        None => return false,
                    }
                }
                TypeExpr::Pointer(_) | TypeExpr::Struct(_) => return false,
            }
        }
        false
    }

    /// Render a type for diagnostics.
    pub fn display(&self, ty: &Type) -> String {
        self.defs.display(ty).to_string()
    }

    pub fn defs(&self) -> &TypeDefs {
        &self.defs
    }

    pub fn into_defs(self) -> TypeDefs {
        self.defs
    }
}
