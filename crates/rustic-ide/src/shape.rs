//! Field layout of a struct or enum variant, read off its declaration.

use rustic_parser::ast::item::{FieldList, Variant};
use rustic_parser::ast::ty::Type as TypeSyntax;
use rowan::Direction;
use rustic_parser::ast::AstNode;
use rustic_parser::{SyntaxKind, SyntaxNode};
use rustic_ty::{DeclId, Type};

use crate::decls::DeclTable;
use crate::lower::{lower_type, Scope};
use crate::workspace::FileId;

/// The declaration being converted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConvertTarget {
    Struct(DeclId),
    Variant { parent: DeclId, index: usize },
}

impl ConvertTarget {
    /// The struct or enum declaration that owns the fields.
    pub fn owner(self) -> DeclId {
        match self {
            ConvertTarget::Struct(id) | ConvertTarget::Variant { parent: id, .. } => id,
        }
    }

    /// Syntax node of the struct or the variant.
    pub fn node(self, decls: &DeclTable) -> Option<SyntaxNode> {
        match self {
            ConvertTarget::Struct(id) => Some(decls.struct_def(id)?.syntax().clone()),
            ConvertTarget::Variant { parent, index } => {
                let variant = decls.enum_def(parent)?.variants().nth(index)?;
                Some(variant.syntax().clone())
            }
        }
    }

    /// `Name` for structs, `Enum::Variant` for variants.
    pub fn display_name(self, decls: &DeclTable) -> String {
        let data = decls.data(self.owner());
        match self {
            ConvertTarget::Struct(_) => data.name.clone(),
            ConvertTarget::Variant { index, .. } => format!(
                "{}::{}",
                data.name,
                data.variants.get(index).map(String::as_str).unwrap_or("?")
            ),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldListKind {
    Record,
    Tuple,
    Unit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    /// `None` for positional fields.
    pub name: Option<String>,
    pub ty_text: String,
    pub ty: Option<Type>,
    pub visibility: Option<String>,
    pub attrs: Vec<String>,
    /// Outer doc comments (`///`, `/** */`) in source order.
    pub docs: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructShape {
    pub name: String,
    pub kind: FieldListKind,
    pub fields: Vec<Field>,
    pub is_union: bool,
}

impl StructShape {
    pub fn of_target(decls: &DeclTable, target: ConvertTarget) -> Option<StructShape> {
        let file = decls.data(target.owner()).file;
        match target {
            ConvertTarget::Struct(id) => {
                let def = decls.struct_def(id)?;
                let mut shape = Self::of_field_list(decls, file, def.field_list());
                shape.name = def.name()?.text()?;
                shape.is_union = def.is_union();
                Some(shape)
            }
            ConvertTarget::Variant { .. } => {
                let variant = Variant::cast(target.node(decls)?)?;
                let mut shape = Self::of_field_list(decls, file, variant.field_list());
                shape.name = variant.name()?.text()?;
                Some(shape)
            }
        }
    }

    fn of_field_list(
        decls: &DeclTable,
        file: FileId,
        list: Option<FieldList>,
    ) -> StructShape {
        let (kind, fields) = read_fields(list, |ty_node| {
            let scope = Scope::for_node(decls, file, ty_node.syntax());
            lower_type(decls, ty_node, &scope)
        });
        StructShape {
            name: String::new(),
            kind,
            fields,
            is_union: false,
        }
    }

    pub fn is_named(&self) -> bool {
        self.kind == FieldListKind::Record
    }

    pub fn is_positional(&self) -> bool {
        self.kind == FieldListKind::Tuple
    }

    pub fn is_unit(&self) -> bool {
        self.kind == FieldListKind::Unit
    }
}

fn read_fields(
    list: Option<FieldList>,
    lower: impl Fn(&TypeSyntax) -> Option<Type>,
) -> (FieldListKind, Vec<Field>) {
    match list {
        None => (FieldListKind::Unit, Vec::new()),
        Some(FieldList::Record(record)) => {
            let fields = record
                .fields()
                .map(|f| {
                    let ty = f.ty();
                    Field {
                        name: f.name().and_then(|n| n.text()),
                        ty_text: ty.as_ref().map(|t| t.syntax().text().to_string()).unwrap_or_default(),
                        ty: ty.as_ref().and_then(&lower),
                        visibility: f.visibility().map(|v| v.syntax().text().to_string()),
                        attrs: f.attrs().map(|a| a.syntax().text().to_string()).collect(),
                        docs: doc_comments(f.syntax()),
                    }
                })
                .collect();
            (FieldListKind::Record, fields)
        }
        Some(FieldList::Tuple(tuple)) => {
            let fields = tuple
                .fields()
                .map(|f| {
                    let ty = f.ty();
                    Field {
                        name: None,
                        ty_text: ty.as_ref().map(|t| t.syntax().text().to_string()).unwrap_or_default(),
                        ty: ty.as_ref().and_then(&lower),
                        visibility: f.visibility().map(|v| v.syntax().text().to_string()),
                        attrs: Vec::new(),
                        docs: doc_comments(f.syntax()),
                    }
                })
                .collect();
            (FieldListKind::Tuple, fields)
        }
    }
}

/// Doc comments of a field. The parser leaves comments in front of a
/// field's first token outside the field node, so both sides are read.
fn doc_comments(field: &SyntaxNode) -> Vec<String> {
    let mut docs: Vec<String> = field
        .siblings_with_tokens(Direction::Prev)
        .skip(1)
        .take_while(|e| e.kind().is_trivia())
        .filter_map(|e| e.into_token())
        .filter(|t| is_outer_doc(t.text()))
        .map(|t| t.text().trim_end().to_string())
        .collect();
    docs.reverse();
    docs.extend(
        field
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::COMMENT && is_outer_doc(t.text()))
            .map(|t| t.text().trim_end().to_string()),
    );
    docs
}

fn is_outer_doc(comment: &str) -> bool {
    (comment.starts_with("///") && !comment.starts_with("////"))
        || (comment.starts_with("/**") && !comment.starts_with("/***") && comment != "/**/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Workspace;

    #[test]
    fn reads_struct_and_variant_fields() {
        let ws = Workspace::new();
        let file = ws.set_file(
            "a.rs",
            "struct P<T> { #[serde(default)] pub x: T, y: Vec<u8> }\nenum E { A(i32), B { s: String }, C }",
        );
        let snap = ws.snapshot();
        let decls = DeclTable::build(&snap);
        let p = decls.resolve_type_name("P", file).unwrap();
        let e = decls.resolve_type_name("E", file).unwrap();

        let shape = StructShape::of_target(&decls, ConvertTarget::Struct(p)).unwrap();
        assert_eq!(shape.name, "P");
        assert!(shape.is_named());
        assert_eq!(shape.fields.len(), 2);
        assert_eq!(shape.fields[0].name.as_deref(), Some("x"));
        assert_eq!(shape.fields[0].visibility.as_deref(), Some("pub"));
        assert_eq!(shape.fields[0].attrs, ["#[serde(default)]"]);
        assert!(shape.fields[0].docs.is_empty());
        assert_eq!(shape.fields[1].ty_text, "Vec<u8>");
        assert_eq!(
            shape.fields[1].ty.as_ref().map(|t| t.display(&decls).to_string()).as_deref(),
            Some("[u8]")
        );

        let a = StructShape::of_target(&decls, ConvertTarget::Variant { parent: e, index: 0 }).unwrap();
        assert!(a.is_positional());
        assert_eq!(a.fields[0].ty_text, "i32");
        let b = StructShape::of_target(&decls, ConvertTarget::Variant { parent: e, index: 1 }).unwrap();
        assert_eq!(b.name, "B");
        assert!(b.is_named());
        let c = StructShape::of_target(&decls, ConvertTarget::Variant { parent: e, index: 2 }).unwrap();
        assert!(c.is_unit());
        assert_eq!(
            ConvertTarget::Variant { parent: e, index: 1 }.display_name(&decls),
            "E::B"
        );
    }

    #[test]
    fn reads_doc_comments_but_not_plain_ones() {
        let ws = Workspace::new();
        let file = ws.set_file(
            "a.rs",
            "struct S {\n    /// First.\n    /// More.\n    a: i32, // trailing\n    // plain\n    #[allow(dead_code)]\n    /** Block. */ b: u8,\n    //// not a doc\n    c: u8,\n}",
        );
        let snap = ws.snapshot();
        let decls = DeclTable::build(&snap);
        let s = decls.resolve_type_name("S", file).unwrap();
        let shape = StructShape::of_target(&decls, ConvertTarget::Struct(s)).unwrap();
        let docs: Vec<&[String]> = shape.fields.iter().map(|f| f.docs.as_slice()).collect();
        assert_eq!(docs[0], ["/// First.", "/// More."]);
        assert_eq!(docs[1], ["/** Block. */"]);
        assert!(docs[2].is_empty());
        assert_eq!(shape.fields[1].attrs, ["#[allow(dead_code)]"]);
    }
}
