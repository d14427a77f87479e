//! Typed AST nodes for type expressions.

use crate::ast::{ast_enum, ast_node, child_node, child_nodes, child_token, AstNode, Path};
use crate::cst::SyntaxNode;
use crate::syntax_kind::SyntaxKind;

ast_enum! {
    /// Any type expression.
    Type {
        Path(PathType) = PATH_TYPE,
        Ref(RefType) = REF_TYPE,
        Ptr(PtrType) = PTR_TYPE,
        Slice(SliceType) = SLICE_TYPE,
        Array(ArrayType) = ARRAY_TYPE,
        Tuple(TupleType) = TUPLE_TYPE,
        Infer(InferType) = INFER_TYPE,
        Never(NeverType) = NEVER_TYPE,
        ImplTrait(ImplTraitType) = IMPL_TRAIT_TYPE,
        DynTrait(DynTraitType) = DYN_TRAIT_TYPE,
        FnPtr(FnPtrType) = FN_PTR_TYPE,
    }
}

ast_node!(PathType, PATH_TYPE);

impl PathType {
    pub fn path(&self) -> Option<Path> {
        child_node(&self.syntax)
    }
}

ast_node!(RefType, REF_TYPE);

impl RefType {
    /// The referenced type.
    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }

    pub fn is_mut(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::MUT_KW).is_some()
    }
}

ast_node!(PtrType, PTR_TYPE);

impl PtrType {
    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(SliceType, SLICE_TYPE);

impl SliceType {
    /// The element type.
    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(ArrayType, ARRAY_TYPE);

impl ArrayType {
    /// The element type; the length expression is not modelled.
    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(TupleType, TUPLE_TYPE);

impl TupleType {
    pub fn fields(&self) -> impl Iterator<Item = Type> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(InferType, INFER_TYPE);
ast_node!(NeverType, NEVER_TYPE);
ast_node!(ImplTraitType, IMPL_TRAIT_TYPE);
ast_node!(DynTraitType, DYN_TRAIT_TYPE);
ast_node!(FnPtrType, FN_PTR_TYPE);

impl Type {
    /// The type with any number of references (`&`, `&mut`, `*const`)
    /// peeled off.
    pub fn strip_references(self) -> Option<Type> {
        let mut current = self;
        loop {
            current = match current {
                Type::Ref(r) => r.ty()?,
                Type::Ptr(p) => p.ty()?,
                other => return Some(other),
            };
        }
    }

    /// The underlying node, consuming the wrapper.
    pub fn into_syntax(self) -> SyntaxNode {
        self.syntax().clone()
    }
}
