//! Typed AST nodes for declarations and items.
//!
//! Covers: SourceFile, FnDef, ParamList, Param, SelfParam, RetType,
//! StructDef, RecordFieldList, RecordField, TupleFieldList, TupleField,
//! EnumDef, VariantList, Variant, ImplDef, TraitDef, ModItem, UseItem,
//! ConstItem, StaticItem, TypeAlias, GenericParamList, TypeParam,
//! WhereClause.

use crate::ast::expr::{BlockExpr, Expr};
use crate::ast::pat::Pat;
use crate::ast::ty::Type;
use crate::ast::{
    ast_enum, ast_node, child_node, child_nodes, child_token, AstNode, Attr, MacroCall, Name,
    Visibility,
};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

// ── Source File ──────────────────────────────────────────────────────────

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    /// All top-level items in the source file.
    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        child_nodes(&self.syntax)
    }
}

// ── Item enum ────────────────────────────────────────────────────────────

ast_enum! {
    /// Any top-level or nested item declaration.
    Item {
        Fn(FnDef) = FN_DEF,
        Struct(StructDef) = STRUCT_DEF,
        Enum(EnumDef) = ENUM_DEF,
        Impl(ImplDef) = IMPL_DEF,
        Trait(TraitDef) = TRAIT_DEF,
        Mod(ModItem) = MOD_ITEM,
        Use(UseItem) = USE_ITEM,
        Const(ConstItem) = CONST_ITEM,
        Static(StaticItem) = STATIC_ITEM,
        TypeAlias(TypeAlias) = TYPE_ALIAS,
        MacroCall(MacroCall) = MACRO_CALL,
    }
}

// ── Function Definition ──────────────────────────────────────────────────

ast_node!(FnDef, FN_DEF);

impl FnDef {
    pub fn visibility(&self) -> Option<Visibility> {
        child_node(&self.syntax)
    }

    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn generic_param_list(&self) -> Option<GenericParamList> {
        child_node(&self.syntax)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    pub fn ret_type(&self) -> Option<RetType> {
        child_node(&self.syntax)
    }

    /// The body block; `None` for declarations ending in `;`.
    pub fn body(&self) -> Option<BlockExpr> {
        child_node(&self.syntax)
    }
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    pub fn self_param(&self) -> Option<SelfParam> {
        child_node(&self.syntax)
    }

    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(Param, PARAM);

impl Param {
    pub fn pat(&self) -> Option<Pat> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(SelfParam, SELF_PARAM);

impl SelfParam {
    /// Explicit `self: Type` annotation.
    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(RetType, RET_TYPE);

impl RetType {
    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

// ── Generics ─────────────────────────────────────────────────────────────

ast_node!(GenericParamList, GENERIC_PARAM_LIST);

impl GenericParamList {
    pub fn type_params(&self) -> impl Iterator<Item = TypeParam> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(TypeParam, TYPE_PARAM);

impl TypeParam {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }
}

ast_node!(WhereClause, WHERE_CLAUSE);

impl WhereClause {
    pub fn where_kw(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::WHERE_KW)
    }

    pub fn predicates(&self) -> impl Iterator<Item = WherePred> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(WherePred, WHERE_PRED);

// ── Struct Definition ────────────────────────────────────────────────────

/// The body shape of a struct or enum variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldList {
    Record(RecordFieldList),
    Tuple(TupleFieldList),
}

ast_node!(StructDef, STRUCT_DEF);

impl StructDef {
    pub fn attrs(&self) -> impl Iterator<Item = Attr> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn visibility(&self) -> Option<Visibility> {
        child_node(&self.syntax)
    }

    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn generic_param_list(&self) -> Option<GenericParamList> {
        child_node(&self.syntax)
    }

    pub fn where_clause(&self) -> Option<WhereClause> {
        child_node(&self.syntax)
    }

    pub fn field_list(&self) -> Option<FieldList> {
        self.syntax.children().find_map(|n| {
            RecordFieldList::cast(n.clone())
                .map(FieldList::Record)
                .or_else(|| TupleFieldList::cast(n).map(FieldList::Tuple))
        })
    }

    /// The terminating `;` of tuple and unit structs.
    pub fn semicolon_token(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::SEMICOLON)
    }

    /// Whether this is a `union` rather than a `struct`.
    pub fn is_union(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::STRUCT_KW).is_none()
    }
}

ast_node!(RecordFieldList, RECORD_FIELD_LIST);

impl RecordFieldList {
    pub fn fields(&self) -> impl Iterator<Item = RecordField> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(RecordField, RECORD_FIELD);

impl RecordField {
    pub fn attrs(&self) -> impl Iterator<Item = Attr> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn visibility(&self) -> Option<Visibility> {
        child_node(&self.syntax)
    }

    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(TupleFieldList, TUPLE_FIELD_LIST);

impl TupleFieldList {
    pub fn fields(&self) -> impl Iterator<Item = TupleField> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(TupleField, TUPLE_FIELD);

impl TupleField {
    pub fn visibility(&self) -> Option<Visibility> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

// ── Enum Definition ──────────────────────────────────────────────────────

ast_node!(EnumDef, ENUM_DEF);

impl EnumDef {
    pub fn visibility(&self) -> Option<Visibility> {
        child_node(&self.syntax)
    }

    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn generic_param_list(&self) -> Option<GenericParamList> {
        child_node(&self.syntax)
    }

    pub fn variants(&self) -> impl Iterator<Item = Variant> + '_ {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::VARIANT_LIST)
            .flat_map(|list| list.children().filter_map(Variant::cast))
    }
}

ast_node!(Variant, VARIANT);

impl Variant {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn field_list(&self) -> Option<FieldList> {
        self.syntax.children().find_map(|n| {
            RecordFieldList::cast(n.clone())
                .map(FieldList::Record)
                .or_else(|| TupleFieldList::cast(n).map(FieldList::Tuple))
        })
    }

    /// The enum this variant belongs to.
    pub fn parent_enum(&self) -> Option<EnumDef> {
        self.syntax.ancestors().find_map(EnumDef::cast)
    }

    /// Explicit discriminant (`= 3`).
    pub fn discriminant(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

// ── Impl and Trait ───────────────────────────────────────────────────────

ast_node!(ImplDef, IMPL_DEF);

impl ImplDef {
    pub fn generic_param_list(&self) -> Option<GenericParamList> {
        child_node(&self.syntax)
    }

    /// The implemented trait in `impl Trait for Type`.
    pub fn trait_(&self) -> Option<Type> {
        child_token(&self.syntax, SyntaxKind::FOR_KW)?;
        child_node(&self.syntax)
    }

    /// The type the impl block is for.
    pub fn self_ty(&self) -> Option<Type> {
        let mut types = child_nodes::<Type>(&self.syntax);
        if child_token(&self.syntax, SyntaxKind::FOR_KW).is_some() {
            types.nth(1)
        } else {
            types.next()
        }
    }

    /// Items of the impl body.
    pub fn assoc_items(&self) -> impl Iterator<Item = Item> + '_ {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::ASSOC_ITEM_LIST)
            .flat_map(|list| list.children().filter_map(Item::cast))
    }
}

ast_node!(TraitDef, TRAIT_DEF);

impl TraitDef {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn assoc_items(&self) -> impl Iterator<Item = Item> + '_ {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::ASSOC_ITEM_LIST)
            .flat_map(|list| list.children().filter_map(Item::cast))
    }
}

// ── Modules and other items ──────────────────────────────────────────────

ast_node!(ModItem, MOD_ITEM);

impl ModItem {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    /// Items of an inline module; empty for `mod foo;`.
    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::ITEM_LIST)
            .flat_map(|list| list.children().filter_map(Item::cast))
    }
}

ast_node!(UseItem, USE_ITEM);

ast_node!(ConstItem, CONST_ITEM);

impl ConstItem {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(StaticItem, STATIC_ITEM);

impl StaticItem {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(TypeAlias, TYPE_ALIAS);

impl TypeAlias {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

impl Item {
    /// The underlying node, consuming the wrapper.
    pub fn into_syntax(self) -> SyntaxNode {
        self.syntax().clone()
    }
}
