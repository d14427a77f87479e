//! Unification of types.
//!
//! Two flavours live here:
//!
//! - [`can_unify`]: a pure compatibility predicate. A substitution context is
//!   applied to both sides first; after that a placeholder only matches the
//!   identical placeholder. Callers may cache its answers.
//! - [`Unifier`]: an `ena` union-find table that treats placeholders as
//!   bindable variables, with an occurs check. Used to infer the
//!   substitution that makes a generic type match a concrete one.

use std::fmt;

use ena::unify::InPlaceUnificationTable;
use rustc_hash::FxHashMap;

use crate::subst::{substitute, Substitution};
use crate::ty::{Type, TypeParam, VarKey};

/// Whether `a` and `b` are compatible once `ctx` is applied to both.
///
/// Primitives match only themselves (no widening), slices match
/// element-wise, nominal types need the same declaration and pairwise
/// unifiable arguments. Mismatched argument counts are simply `false`.
pub fn can_unify(a: &Type, b: &Type, ctx: &Substitution) -> bool {
    let a = substitute(a, ctx);
    let b = substitute(b, ctx);
    structurally_unifiable(&a, &b)
}

fn structurally_unifiable(a: &Type, b: &Type) -> bool {
    if a == b {
        return true;
    }
    match (a, b) {
        (Type::Primitive(x), Type::Primitive(y)) => x == y,
        (Type::Slice(x), Type::Slice(y)) => structurally_unifiable(&x.element, &y.element),
        (Type::Nominal(x), Type::Nominal(y)) => {
            x.decl == y.decl
                && x.args.len() == y.args.len()
                && x
                    .args
                    .iter()
                    .zip(&y.args)
                    .all(|(l, r)| structurally_unifiable(l, r))
        }
        // Distinct placeholders, or a placeholder against anything else.
        _ => false,
    }
}

// ── Inference ───────────────────────────────────────────────────────────

/// Why two types could not be unified by a [`Unifier`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnifyError {
    /// The types have different shapes or constructors.
    Mismatch { left: Type, right: Type },
    /// Two instantiations of one declaration with different argument counts.
    ArityMismatch { left: usize, right: usize },
    /// Binding the placeholder would create an infinite type.
    Occurs { param: TypeParam, ty: Type },
}

impl fmt::Display for UnifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnifyError::Mismatch { left, right } => {
                write!(f, "type mismatch: {left:?} vs {right:?}")
            }
            UnifyError::ArityMismatch { left, right } => {
                write!(f, "expected {left} type arguments, found {right}")
            }
            UnifyError::Occurs { param, .. } => {
                write!(f, "`{}` would have to contain itself", param.name)
            }
        }
    }
}

impl std::error::Error for UnifyError {}

/// Unification table over placeholders.
///
/// Each distinct placeholder seen gets a variable in the table the first
/// time it appears. Bindings persist across calls to [`Unifier::unify`].
pub struct Unifier {
    table: InPlaceUnificationTable<VarKey>,
    keys: FxHashMap<TypeParam, VarKey>,
    /// Placeholder for each key, indexed by `VarKey.0`.
    params: Vec<TypeParam>,
}

impl Unifier {
    pub fn new() -> Self {
        Unifier {
            table: InPlaceUnificationTable::new(),
            keys: FxHashMap::default(),
            params: Vec::new(),
        }
    }

    fn key_for(&mut self, param: &TypeParam) -> VarKey {
        if let Some(&key) = self.keys.get(param) {
            return key;
        }
        let key = self.table.new_key(None);
        debug_assert_eq!(key.0 as usize, self.params.len());
        self.params.push(param.clone());
        self.keys.insert(param.clone(), key);
        key
    }

    /// Follow bindings at the top of `ty` only.
    fn shallow_resolve(&mut self, ty: &Type) -> Type {
        let mut current = ty.clone();
        while let Type::Param(p) = &current {
            let key = self.key_for(p);
            match self.table.probe_value(key) {
                Some(bound) => current = bound,
                None => {
                    let root = self.table.find(key);
                    return Type::Param(self.params[root.0 as usize].clone());
                }
            }
        }
        current
    }

    /// Fully resolve `ty` through the current bindings.
    ///
    /// Unbound placeholders in one equivalence class resolve to the same
    /// representative.
    pub fn resolve(&mut self, ty: &Type) -> Type {
        match self.shallow_resolve(ty) {
            Type::Slice(s) => Type::slice(self.resolve(&s.element)),
            Type::Nominal(n) => Type::nominal(
                n.decl,
                n.args.iter().map(|a| self.resolve(a)).collect(),
                n.params,
            ),
            other => other,
        }
    }

    fn occurs(&mut self, key: VarKey, ty: &Type) -> bool {
        match ty {
            Type::Primitive(_) => false,
            Type::Slice(s) => self.occurs(key, &s.element),
            Type::Nominal(n) => n.args.iter().any(|a| self.occurs(key, a)),
            Type::Param(p) => {
                let other = self.key_for(p);
                if self.table.find(other) == self.table.find(key) {
                    return true;
                }
                match self.table.probe_value(other) {
                    Some(bound) => self.occurs(key, &bound),
                    None => false,
                }
            }
        }
    }

    /// Unify two types, binding placeholders as needed.
    ///
    /// On failure, bindings made before the conflicting position remain.
    pub fn unify(&mut self, a: &Type, b: &Type) -> Result<(), UnifyError> {
        let a = self.shallow_resolve(a);
        let b = self.shallow_resolve(b);
        match (a, b) {
            (Type::Param(p1), Type::Param(p2)) if p1 == p2 => Ok(()),
            (Type::Param(p1), Type::Param(p2)) => {
                let (k1, k2) = (self.key_for(&p1), self.key_for(&p2));
                self.table
                    .unify_var_var(k1, k2)
                    .map_err(|_| UnifyError::Mismatch {
                        left: Type::Param(p1),
                        right: Type::Param(p2),
                    })
            }
            (Type::Param(p), ty) | (ty, Type::Param(p)) => {
                let key = self.key_for(&p);
                if self.occurs(key, &ty) {
                    return Err(UnifyError::Occurs { param: p, ty });
                }
                self.table
                    .unify_var_value(key, Some(ty.clone()))
                    .map_err(|_| UnifyError::Mismatch {
                        left: Type::Param(p),
                        right: ty,
                    })
            }
            (Type::Primitive(x), Type::Primitive(y)) if x == y => Ok(()),
            (Type::Slice(x), Type::Slice(y)) => self.unify(&x.element, &y.element),
            (Type::Nominal(x), Type::Nominal(y)) if x.decl == y.decl => {
                if x.args.len() != y.args.len() {
                    return Err(UnifyError::ArityMismatch {
                        left: x.args.len(),
                        right: y.args.len(),
                    });
                }
                for (l, r) in x.args.iter().zip(&y.args) {
                    self.unify(l, r)?;
                }
                Ok(())
            }
            (left, right) => Err(UnifyError::Mismatch { left, right }),
        }
    }

    /// The bindings found so far, fully resolved. Placeholders that are
    /// still unbound (or only bound to themselves) are left out.
    pub fn substitution(&mut self) -> Substitution {
        let params = self.params.clone();
        params
            .into_iter()
            .filter_map(|p| {
                let ty = Type::Param(p.clone());
                let resolved = self.resolve(&ty);
                (resolved != ty).then_some((p, resolved))
            })
            .collect()
    }
}

impl Default for Unifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Infer the substitution that makes `generic` and `concrete` equal.
///
/// Returns `None` when they cannot be unified.
pub fn infer_substitution(generic: &Type, concrete: &Type) -> Option<Substitution> {
    let mut unifier = Unifier::new();
    unifier.unify(generic, concrete).ok()?;
    Some(unifier.substitution())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::{DeclId, GenericSite, IntWidth, PrimitiveType};

    fn i32_() -> Type {
        Type::int(IntWidth::W32, true)
    }

    fn t() -> TypeParam {
        TypeParam::new("T", GenericSite(0))
    }

    fn test_of(arg: Type) -> Type {
        Type::nominal(DeclId::new(0), vec![arg], vec![t()])
    }

    #[test]
    fn unifier_binds_placeholder() {
        let subst = infer_substitution(&test_of(Type::Param(t())), &test_of(i32_()))
            .expect("unifiable");
        assert_eq!(subst.get(&t()), Some(&i32_()));
    }

    #[test]
    fn unifier_rejects_conflicting_bindings() {
        let u = TypeParam::new("U", GenericSite(0));
        let pair = |a, b| Type::nominal(DeclId::new(1), vec![a, b], vec![]);
        let mut unifier = Unifier::new();
        assert!(unifier
            .unify(&pair(Type::Param(u.clone()), Type::Param(u)), &pair(i32_(), Type::from(PrimitiveType::Bool)))
            .is_err());
    }

    #[test]
    fn unifier_occurs_check() {
        let mut unifier = Unifier::new();
        let err = unifier
            .unify(&Type::Param(t()), &Type::slice(Type::Param(t())))
            .unwrap_err();
        assert!(matches!(err, UnifyError::Occurs { .. }));
    }

    #[test]
    fn unifier_links_placeholders_then_binds() {
        let u = TypeParam::new("U", GenericSite(1));
        let mut unifier = Unifier::new();
        unifier
            .unify(&Type::Param(t()), &Type::Param(u.clone()))
            .expect("var-var");
        unifier.unify(&Type::Param(u), &i32_()).expect("var-value");
        assert_eq!(unifier.resolve(&Type::Param(t())), i32_());
        assert_eq!(unifier.substitution().len(), 2);
    }

    #[test]
    fn unifier_arity_mismatch() {
        let a = Type::nominal(DeclId::new(0), vec![i32_()], vec![]);
        let b = Type::nominal(DeclId::new(0), vec![i32_(), i32_()], vec![]);
        let err = Unifier::new().unify(&a, &b).unwrap_err();
        assert_eq!(err, UnifyError::ArityMismatch { left: 1, right: 2 });
    }

    #[test]
    fn can_unify_is_deterministic() {
        let a = test_of(Type::Param(t()));
        let b = test_of(i32_());
        let ctx = Substitution::new();
        let first = can_unify(&a, &b, &ctx);
        for _ in 0..10 {
            assert_eq!(can_unify(&a, &b, &ctx), first);
        }
    }
}
