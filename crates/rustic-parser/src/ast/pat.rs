//! Typed AST nodes for patterns.

use crate::ast::{ast_enum, ast_node, child_node, child_nodes, child_token, AstNode, Name, NameRef, Path};
use crate::cst::SyntaxNode;
use crate::syntax_kind::SyntaxKind;

ast_enum! {
    /// Any pattern.
    Pat {
        Wildcard(WildcardPat) = WILDCARD_PAT,
        Ident(IdentPat) = IDENT_PAT,
        Literal(LiteralPat) = LITERAL_PAT,
        Range(RangePat) = RANGE_PAT,
        Tuple(TuplePat) = TUPLE_PAT,
        Paren(ParenPat) = PAREN_PAT,
        Slice(SlicePat) = SLICE_PAT,
        TupleStruct(TupleStructPat) = TUPLE_STRUCT_PAT,
        Record(RecordPat) = RECORD_PAT,
        Rest(RestPat) = REST_PAT,
        Ref(RefPat) = REF_PAT,
        Or(OrPat) = OR_PAT,
        Path(PathPat) = PATH_PAT,
    }
}

ast_node!(WildcardPat, WILDCARD_PAT);
ast_node!(LiteralPat, LITERAL_PAT);
ast_node!(RangePat, RANGE_PAT);
ast_node!(RestPat, REST_PAT);

ast_node!(IdentPat, IDENT_PAT);

impl IdentPat {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn is_ref(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::REF_KW).is_some()
    }

    pub fn is_mut(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::MUT_KW).is_some()
    }

    /// The `@` subpattern, if any.
    pub fn subpattern(&self) -> Option<Pat> {
        child_node(&self.syntax)
    }
}

ast_node!(TuplePat, TUPLE_PAT);

impl TuplePat {
    pub fn fields(&self) -> impl Iterator<Item = Pat> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(ParenPat, PAREN_PAT);

impl ParenPat {
    pub fn pat(&self) -> Option<Pat> {
        child_node(&self.syntax)
    }
}

ast_node!(SlicePat, SLICE_PAT);

impl SlicePat {
    pub fn pats(&self) -> impl Iterator<Item = Pat> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(TupleStructPat, TUPLE_STRUCT_PAT);

impl TupleStructPat {
    pub fn path(&self) -> Option<Path> {
        child_node(&self.syntax)
    }

    pub fn fields(&self) -> impl Iterator<Item = Pat> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(RecordPat, RECORD_PAT);

impl RecordPat {
    pub fn path(&self) -> Option<Path> {
        child_node(&self.syntax)
    }

    pub fn field_list(&self) -> Option<RecordPatFieldList> {
        child_node(&self.syntax)
    }
}

ast_node!(RecordPatFieldList, RECORD_PAT_FIELD_LIST);

impl RecordPatFieldList {
    pub fn fields(&self) -> impl Iterator<Item = RecordPatField> + '_ {
        child_nodes(&self.syntax)
    }

    /// The `..` marker, if present.
    pub fn rest_pat(&self) -> Option<RestPat> {
        child_node(&self.syntax)
    }
}

ast_node!(RecordPatField, RECORD_PAT_FIELD);

impl RecordPatField {
    /// The explicit field name in `name: pat` form.
    pub fn name_ref(&self) -> Option<NameRef> {
        child_node(&self.syntax)
    }

    /// The bound pattern. For the shorthand form (`a`, `ref mut a`) this is
    /// the identifier pattern itself.
    pub fn pat(&self) -> Option<Pat> {
        child_node(&self.syntax)
    }

    /// Whether the field uses the shorthand form.
    pub fn is_shorthand(&self) -> bool {
        self.name_ref().is_none()
    }

    /// The field this entry destructures, for either form.
    pub fn field_name(&self) -> Option<String> {
        if let Some(name_ref) = self.name_ref() {
            return name_ref.text();
        }
        match self.pat()? {
            Pat::Ident(ident) => ident.name()?.text(),
            _ => None,
        }
    }
}

ast_node!(RefPat, REF_PAT);

impl RefPat {
    pub fn pat(&self) -> Option<Pat> {
        child_node(&self.syntax)
    }
}

ast_node!(OrPat, OR_PAT);

impl OrPat {
    pub fn pats(&self) -> impl Iterator<Item = Pat> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(PathPat, PATH_PAT);

impl PathPat {
    pub fn path(&self) -> Option<Path> {
        child_node(&self.syntax)
    }
}

impl Pat {
    /// The underlying node, consuming the wrapper.
    pub fn into_syntax(self) -> SyntaxNode {
        self.syntax().clone()
    }
}
