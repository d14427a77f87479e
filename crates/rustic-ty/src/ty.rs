//! Type representation for the Rust type algebra.
//!
//! Defines the closed [`Type`] sum: primitive scalars, slices, nominal
//! struct/enum instantiations and generic parameter placeholders. Types are
//! immutable values; every operation that "changes" a type builds a new one.
//!
//! Nominal types refer to their declaration through a [`DeclId`] handle into
//! an arena owned by the caller, never through an owning pointer, so a
//! struct mentioning itself through indirection cannot form a cycle.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Opaque handle of a struct or enum declaration in a declaration arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(u32);

impl DeclId {
    pub const fn new(index: u32) -> Self {
        DeclId(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of a generic parameter list (one per generic declaration,
/// `impl` block or function), so that two `T`s from different items stay
/// distinct.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenericSite(pub u32);

/// An unbound generic parameter: `T` declared at `site`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParam {
    pub name: String,
    pub site: GenericSite,
}

impl TypeParam {
    pub fn new(name: impl Into<String>, site: GenericSite) -> Self {
        TypeParam {
            name: name.into(),
            site,
        }
    }
}

/// Bit width of an integer type; `Size` is pointer-sized (`isize`/`usize`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
    W128,
    Size,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    W32,
    W64,
}

/// A primitive scalar type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Integer { width: IntWidth, signed: bool },
    Float(FloatWidth),
    Bool,
    Char,
    /// The string slice `str`.
    Str,
}

impl PrimitiveType {
    /// The Rust spelling of this type.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Integer { width, signed } => match (width, signed) {
                (IntWidth::W8, true) => "i8",
                (IntWidth::W16, true) => "i16",
                (IntWidth::W32, true) => "i32",
                (IntWidth::W64, true) => "i64",
                (IntWidth::W128, true) => "i128",
                (IntWidth::Size, true) => "isize",
                (IntWidth::W8, false) => "u8",
                (IntWidth::W16, false) => "u16",
                (IntWidth::W32, false) => "u32",
                (IntWidth::W64, false) => "u64",
                (IntWidth::W128, false) => "u128",
                (IntWidth::Size, false) => "usize",
            },
            PrimitiveType::Float(FloatWidth::W32) => "f32",
            PrimitiveType::Float(FloatWidth::W64) => "f64",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Char => "char",
            PrimitiveType::Str => "str",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a primitive type name by exact match.
///
/// Returns `None` for anything that is not one of the fixed primitive names;
/// callers then try nominal resolution.
pub fn lookup_primitive(name: &str) -> Option<PrimitiveType> {
    let int = |width, signed| Some(PrimitiveType::Integer { width, signed });
    match name {
        "i8" => int(IntWidth::W8, true),
        "i16" => int(IntWidth::W16, true),
        "i32" => int(IntWidth::W32, true),
        "i64" => int(IntWidth::W64, true),
        "i128" => int(IntWidth::W128, true),
        "isize" => int(IntWidth::Size, true),
        "u8" => int(IntWidth::W8, false),
        "u16" => int(IntWidth::W16, false),
        "u32" => int(IntWidth::W32, false),
        "u64" => int(IntWidth::W64, false),
        "u128" => int(IntWidth::W128, false),
        "usize" => int(IntWidth::Size, false),
        "f32" => Some(PrimitiveType::Float(FloatWidth::W32)),
        "f64" => Some(PrimitiveType::Float(FloatWidth::W64)),
        "bool" => Some(PrimitiveType::Bool),
        "char" => Some(PrimitiveType::Char),
        "str" => Some(PrimitiveType::Str),
        _ => None,
    }
}

/// `[T]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SliceType {
    pub element: Box<Type>,
}

/// A struct or enum instantiated with type arguments.
///
/// `params` are the declaration's own generic parameters. They are a
/// function of `decl`, so equality and hashing ignore them.
#[derive(Clone, Debug)]
pub struct NominalType {
    pub decl: DeclId,
    pub args: Vec<Type>,
    pub params: Vec<TypeParam>,
}

impl PartialEq for NominalType {
    fn eq(&self, other: &Self) -> bool {
        self.decl == other.decl && self.args == other.args
    }
}

impl Eq for NominalType {}

impl Hash for NominalType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.decl.hash(state);
        self.args.hash(state);
    }
}

/// A Rust type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveType),
    Slice(SliceType),
    Nominal(NominalType),
    /// A yet-unbound generic parameter.
    Param(TypeParam),
}

impl Type {
    pub fn slice(element: Type) -> Type {
        Type::Slice(SliceType {
            element: Box::new(element),
        })
    }

    pub fn nominal(decl: DeclId, args: Vec<Type>, params: Vec<TypeParam>) -> Type {
        Type::Nominal(NominalType { decl, args, params })
    }

    pub fn param(name: impl Into<String>, site: GenericSite) -> Type {
        Type::Param(TypeParam::new(name, site))
    }

    pub fn int(width: IntWidth, signed: bool) -> Type {
        Type::Primitive(PrimitiveType::Integer { width, signed })
    }

    /// The declaration of a nominal type.
    pub fn as_decl(&self) -> Option<DeclId> {
        match self {
            Type::Nominal(n) => Some(n.decl),
            _ => None,
        }
    }

    /// Whether any placeholder occurs in the type.
    pub fn has_params(&self) -> bool {
        match self {
            Type::Primitive(_) => false,
            Type::Slice(s) => s.element.has_params(),
            Type::Nominal(n) => n.args.iter().any(Type::has_params),
            Type::Param(_) => true,
        }
    }

    /// Render the type, naming nominal types through `names`.
    pub fn display<'a>(&'a self, names: &'a dyn DeclNames) -> TypeDisplay<'a> {
        TypeDisplay { ty: self, names }
    }
}

impl From<PrimitiveType> for Type {
    fn from(p: PrimitiveType) -> Self {
        Type::Primitive(p)
    }
}

/// Lookup of declaration names for rendering.
pub trait DeclNames {
    fn decl_name(&self, decl: DeclId) -> Option<&str>;
}

/// Display adapter returned by [`Type::display`].
pub struct TypeDisplay<'a> {
    ty: &'a Type,
    names: &'a dyn DeclNames,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::Primitive(p) => write!(f, "{p}"),
            Type::Slice(s) => write!(f, "[{}]", s.element.display(self.names)),
            Type::Nominal(n) => {
                match self.names.decl_name(n.decl) {
                    Some(name) => f.write_str(name)?,
                    None => write!(f, "<decl#{}>", n.decl.0)?,
                }
                if !n.args.is_empty() {
                    write!(f, "<")?;
                    for (i, a) in n.args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", a.display(self.names))?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            Type::Param(p) => f.write_str(&p.name),
        }
    }
}

// ── ena trait implementations ──────────────────────────────────────────

/// Unification key standing for one placeholder inside a [`crate::unify::Unifier`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VarKey(pub u32);

impl ena::unify::UnifyKey for VarKey {
    type Value = Option<Type>;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        VarKey(u)
    }

    fn tag() -> &'static str {
        "VarKey"
    }
}

impl ena::unify::EqUnifyValue for Type {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Names;

    impl DeclNames for Names {
        fn decl_name(&self, decl: DeclId) -> Option<&str> {
            match decl.index() {
                0 => Some("Test"),
                _ => None,
            }
        }
    }

    #[test]
    fn lookup_every_primitive_name() {
        for name in [
            "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128",
            "usize", "f32", "f64", "bool", "char", "str",
        ] {
            let prim = lookup_primitive(name).expect(name);
            assert_eq!(prim.name(), name);
        }
    }

    #[test]
    fn lookup_rejects_near_misses() {
        for name in ["i31", "String", "Str", "u", "", "f16", "usize "] {
            assert_eq!(lookup_primitive(name), None, "{name:?}");
        }
    }

    #[test]
    fn nominal_equality_ignores_params() {
        let site = GenericSite(0);
        let a = Type::nominal(DeclId::new(0), vec![Type::int(IntWidth::W32, true)], vec![]);
        let b = Type::nominal(
            DeclId::new(0),
            vec![Type::int(IntWidth::W32, true)],
            vec![TypeParam::new("T", site)],
        );
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn nominal_argument_order_matters() {
        let i = Type::int(IntWidth::W32, true);
        let u = Type::int(IntWidth::W8, false);
        let a = Type::nominal(DeclId::new(0), vec![i.clone(), u.clone()], vec![]);
        let b = Type::nominal(DeclId::new(0), vec![u, i], vec![]);
        assert_ne!(a, b);
    }

    #[test]
    fn placeholders_differ_by_site() {
        assert_ne!(Type::param("T", GenericSite(0)), Type::param("T", GenericSite(1)));
        assert_eq!(Type::param("T", GenericSite(0)), Type::param("T", GenericSite(0)));
    }

    #[test]
    fn display_renders_rust_syntax() {
        let t = Type::nominal(
            DeclId::new(0),
            vec![Type::slice(Type::int(IntWidth::Size, false)), Type::param("T", GenericSite(0))],
            vec![],
        );
        assert_eq!(t.display(&Names).to_string(), "Test<[usize], T>");
        let unknown = Type::nominal(DeclId::new(7), vec![], vec![]);
        assert_eq!(unknown.display(&Names).to_string(), "<decl#7>");
    }

    #[test]
    fn has_params_looks_through_composites() {
        let nested = Type::slice(Type::nominal(
            DeclId::new(0),
            vec![Type::param("T", GenericSite(0))],
            vec![],
        ));
        assert!(nested.has_params());
        assert!(!Type::slice(Type::from(PrimitiveType::Bool)).has_params());
    }
}
