//! Rustic type algebra.
//!
//! Models Rust's primitive and composite types and the two operations the
//! refactoring engine needs from them:
//!
//! - [`ty`]: the closed [`Type`] sum (primitives, slices, nominal types,
//!   placeholders) and [`lookup_primitive`]
//! - [`unify`]: the pure [`can_unify`] predicate and the `ena`-backed
//!   [`Unifier`] that infers substitutions
//! - [`subst`]: [`Substitution`] and [`substitute`]
//!
//! Everything here is pure and `Send + Sync`; values are immutable and
//! cheap to compare.

pub mod subst;
pub mod ty;
pub mod unify;

pub use subst::{substitute, Substitution};
pub use ty::{
    lookup_primitive, DeclId, DeclNames, FloatWidth, GenericSite, IntWidth, NominalType,
    PrimitiveType, SliceType, Type, TypeParam,
};
pub use unify::{can_unify, infer_substitution, Unifier, UnifyError};
