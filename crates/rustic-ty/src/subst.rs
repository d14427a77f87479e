//! Substitution of generic placeholders.
//!
//! A [`Substitution`] maps placeholders to types. Applying it rebuilds the
//! type tree with every mapped placeholder replaced; unmapped placeholders
//! are left alone, so partial substitution is always legal.

use rustc_hash::FxHashMap;

use crate::ty::{NominalType, SliceType, Type, TypeParam};

/// Mapping from placeholders to types. Keys are unique.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    map: FxHashMap<TypeParam, Type>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the declaration's parameters to the arguments of an
    /// instantiation, position by position. Extra parameters or arguments
    /// are ignored.
    pub fn for_instantiation(nominal: &NominalType) -> Self {
        nominal
            .params
            .iter()
            .cloned()
            .zip(nominal.args.iter().cloned())
            .collect()
    }

    /// Insert a mapping, returning the previous target of `param`.
    pub fn insert(&mut self, param: TypeParam, ty: Type) -> Option<Type> {
        self.map.insert(param, ty)
    }

    pub fn get(&self, param: &TypeParam) -> Option<&Type> {
        self.map.get(param)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeParam, &Type)> {
        self.map.iter()
    }
}

impl FromIterator<(TypeParam, Type)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (TypeParam, Type)>>(iter: I) -> Self {
        Substitution {
            map: iter.into_iter().collect(),
        }
    }
}

/// Apply `subst` to `ty`, returning a new type.
///
/// Recursion follows the type's own nesting; a mapped placeholder is
/// replaced by its target without substituting into the target again.
pub fn substitute(ty: &Type, subst: &Substitution) -> Type {
    if subst.is_empty() {
        return ty.clone();
    }
    match ty {
        Type::Primitive(_) => ty.clone(),
        Type::Slice(s) => Type::Slice(SliceType {
            element: Box::new(substitute(&s.element, subst)),
        }),
        Type::Nominal(n) => Type::Nominal(NominalType {
            decl: n.decl,
            args: n.args.iter().map(|a| substitute(a, subst)).collect(),
            params: n.params.clone(),
        }),
        Type::Param(p) => subst.get(p).cloned().unwrap_or_else(|| ty.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::{DeclId, GenericSite, IntWidth, PrimitiveType};

    fn t() -> TypeParam {
        TypeParam::new("T", GenericSite(0))
    }

    fn i32_() -> Type {
        Type::int(IntWidth::W32, true)
    }

    #[test]
    fn primitives_are_unchanged() {
        let mut s = Substitution::new();
        s.insert(t(), i32_());
        let b = Type::from(PrimitiveType::Bool);
        assert_eq!(substitute(&b, &s), b);
    }

    #[test]
    fn replaces_nested_placeholders() {
        let mut s = Substitution::new();
        s.insert(t(), i32_());
        let ty = Type::slice(Type::nominal(
            DeclId::new(0),
            vec![Type::Param(t()), Type::slice(Type::Param(t()))],
            vec![t()],
        ));
        let expected = Type::slice(Type::nominal(
            DeclId::new(0),
            vec![i32_(), Type::slice(i32_())],
            vec![t()],
        ));
        assert_eq!(substitute(&ty, &s), expected);
        // The input is untouched.
        assert!(ty.has_params());
    }

    #[test]
    fn unmapped_placeholders_survive() {
        let mut s = Substitution::new();
        s.insert(t(), i32_());
        let u = Type::param("U", GenericSite(0));
        let other_site_t = Type::param("T", GenericSite(1));
        assert_eq!(substitute(&u, &s), u);
        assert_eq!(substitute(&other_site_t, &s), other_site_t);
    }

    #[test]
    fn targets_are_not_substituted_again() {
        let u = TypeParam::new("U", GenericSite(0));
        let s: Substitution = [(t(), Type::Param(u.clone())), (u, i32_())].into_iter().collect();
        assert_eq!(substitute(&Type::Param(t()), &s), Type::param("U", GenericSite(0)));
    }

    #[test]
    fn instantiation_binds_params_positionally() {
        let u = TypeParam::new("U", GenericSite(0));
        let nominal = NominalType {
            decl: DeclId::new(3),
            args: vec![i32_(), Type::from(PrimitiveType::Char)],
            params: vec![t(), u.clone()],
        };
        let s = Substitution::for_instantiation(&nominal);
        assert_eq!(s.len(), 2);
        assert_eq!(s.get(&u), Some(&Type::from(PrimitiveType::Char)));
    }

    #[test]
    fn deep_nesting_terminates() {
        let mut ty = Type::Param(t());
        for _ in 0..500 {
            ty = Type::slice(ty);
        }
        let mut s = Substitution::new();
        s.insert(t(), i32_());
        let out = substitute(&ty, &s);
        assert!(!out.has_params());
    }
}
