//! Lowering of type syntax into [`Type`].
//!
//! Only what field access can observe is modelled: references and the
//! standard smart pointers are transparent (auto-deref), `Vec<T>` and
//! arrays behave like slices. `Option<T>` and `Result<T, E>` lower to `T`,
//! the type `unwrap` and `Some(x)` patterns observe. Everything else
//! lowers to `None`.

use rustic_parser::ast::item::{EnumDef, FnDef, ImplDef, StructDef};
use rustic_parser::ast::ty::Type as TypeSyntax;
use rustic_parser::ast::{AstNode, Path};
use rustic_parser::{SyntaxKind, SyntaxNode};
use rustic_ty::{lookup_primitive, Type, TypeParam};

use crate::decls::{generic_names, DeclTable};
use crate::workspace::FileId;

/// Names visible while lowering a type: generic parameters (innermost
/// first) and the meaning of `Self`.
#[derive(Clone, Debug)]
pub struct Scope {
    pub file: FileId,
    generics: Vec<TypeParam>,
    self_ty: Option<Type>,
}

impl Scope {
    pub fn new(file: FileId) -> Self {
        Scope {
            file,
            generics: Vec::new(),
            self_ty: None,
        }
    }

    /// The scope at `node`: generics of every enclosing function, `impl`,
    /// struct and enum, and `Self` of the nearest `impl` or type
    /// declaration.
    pub fn for_node(decls: &DeclTable, file: FileId, node: &SyntaxNode) -> Scope {
        let mut scope = Scope::new(file);
        let mut self_source = None;
        for anc in node.ancestors() {
            let generics = match anc.kind() {
                SyntaxKind::FN_DEF => FnDef::cast(anc.clone()).and_then(|f| f.generic_param_list()),
                SyntaxKind::IMPL_DEF => {
                    ImplDef::cast(anc.clone()).and_then(|i| i.generic_param_list())
                }
                SyntaxKind::STRUCT_DEF => {
                    StructDef::cast(anc.clone()).and_then(|s| s.generic_param_list())
                }
                SyntaxKind::ENUM_DEF => EnumDef::cast(anc.clone()).and_then(|e| e.generic_param_list()),
                _ => continue,
            };
            if let Some(site) = decls.site_of(file, &anc) {
                scope.generics.extend(
                    generic_names(generics.as_ref())
                        .into_iter()
                        .map(|n| TypeParam::new(n, site)),
                );
            }
            if self_source.is_none() && anc.kind() != SyntaxKind::FN_DEF {
                self_source = Some(anc);
            }
        }

        scope.self_ty = self_source.and_then(|item| match item.kind() {
            SyntaxKind::IMPL_DEF => {
                let self_ty = ImplDef::cast(item.clone())?.self_ty()?;
                // The impl's own generics are already in scope; `Self`
                // cannot appear in its own definition.
                lower_type(decls, &self_ty, &scope)
            }
            _ => decls.decl_at(file, &item).map(|id| decls.identity_type(id)),
        });
        scope
    }

    pub fn self_ty(&self) -> Option<&Type> {
        self.self_ty.as_ref()
    }

    fn generic(&self, name: &str) -> Option<&TypeParam> {
        self.generics.iter().find(|p| p.name == name)
    }
}

/// Lower a type expression in `scope`. Unknown types yield `None`.
pub fn lower_type(decls: &DeclTable, ty: &TypeSyntax, scope: &Scope) -> Option<Type> {
    match ty {
        TypeSyntax::Path(p) => lower_path(decls, &p.path()?, scope),
        TypeSyntax::Ref(r) => lower_type(decls, &r.ty()?, scope),
        TypeSyntax::Ptr(p) => lower_type(decls, &p.ty()?, scope),
        TypeSyntax::Slice(s) => Some(Type::slice(lower_type(decls, &s.ty()?, scope)?)),
        TypeSyntax::Array(a) => Some(Type::slice(lower_type(decls, &a.ty()?, scope)?)),
        _ => None,
    }
}

fn lower_path(decls: &DeclTable, path: &Path, scope: &Scope) -> Option<Type> {
    let segments: Vec<_> = path.segments().collect();
    let last = segments.last()?;
    if last.is_self_type() {
        return if segments.len() == 1 {
            scope.self_ty.clone()
        } else {
            None
        };
    }
    let name = last.name_ref()?.text()?;
    if segments.len() == 1 {
        if let Some(param) = scope.generic(&name) {
            return Some(Type::Param(param.clone()));
        }
        if let Some(prim) = lookup_primitive(&name) {
            return Some(prim.into());
        }
    }

    let args: Vec<Option<Type>> = last
        .generic_arg_list()
        .map(|list| {
            list.type_args()
                .map(|arg| arg.ty().and_then(|t| lower_type(decls, &t, scope)))
                .collect()
        })
        .unwrap_or_default();

    if let Some(decl) = decls.resolve_type_name(&name, scope.file) {
        let data = decls.data(decl);
        let args = data
            .params
            .iter()
            .enumerate()
            .map(|(i, param)| {
                args.get(i)
                    .cloned()
                    .flatten()
                    .unwrap_or_else(|| Type::Param(param.clone()))
            })
            .collect();
        return Some(Type::nominal(decl, args, data.params.clone()));
    }

    match name.as_str() {
        "Box" | "Rc" | "Arc" | "Cow" | "Option" | "Result" => args.into_iter().next().flatten(),
        "Vec" | "VecDeque" => Some(Type::slice(args.into_iter().next().flatten()?)),
        "String" => Some(lookup_primitive("str")?.into()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Workspace;
    use rustic_parser::ast::item::Item;
    use rustic_parser::ast::item::SourceFile;

    /// Lower the type of every field of the struct `Holder`.
    fn lowered(source: &str) -> Vec<Option<String>> {
        let ws = Workspace::new();
        let file = ws.set_file("a.rs", source);
        let snap = ws.snapshot();
        let decls = DeclTable::build(&snap);
        let root = SourceFile::cast(decls.root(file).unwrap().clone()).unwrap();
        let holder = root
            .items()
            .find_map(|item| match item {
                Item::Struct(s) if s.name().and_then(|n| n.text()).as_deref() == Some("Holder") => {
                    Some(s)
                }
                _ => None,
            })
            .unwrap();
        let fields = match holder.field_list().unwrap() {
            rustic_parser::ast::item::FieldList::Record(list) => list,
            _ => panic!("record struct expected"),
        };
        fields
            .fields()
            .map(|f| {
                let scope = Scope::for_node(&decls, file, f.syntax());
                lower_type(&decls, &f.ty().unwrap(), &scope).map(|t| t.display(&decls).to_string())
            })
            .collect()
    }

    #[test]
    fn lowers_primitives_slices_and_references() {
        let out = lowered("struct Holder { a: i32, b: &[u8], c: [bool; 4], d: &mut &str, e: (i32, i32) }");
        assert_eq!(
            out,
            [
                Some("i32".to_string()),
                Some("[u8]".to_string()),
                Some("[bool]".to_string()),
                Some("str".to_string()),
                None
            ]
        );
    }

    #[test]
    fn lowers_generics_and_nominal_types() {
        let out = lowered(
            "struct Pair<A, B> { a: A, b: B }\nstruct Holder<T> { p: Pair<T, u8>, q: Pair<i32>, r: Box<Pair<T, T>>, s: Vec<T>, t: Self, u: Option<Vec<T>>, v: Result<T, String> }",
        );
        assert_eq!(
            out,
            [
                Some("Pair<T, u8>".to_string()),
                Some("Pair<i32, B>".to_string()),
                Some("Pair<T, T>".to_string()),
                Some("[T]".to_string()),
                Some("Holder<T>".to_string()),
                Some("[T]".to_string()),
                Some("T".to_string()),
            ]
        );
    }

    #[test]
    fn impl_scope_provides_self() {
        let ws = Workspace::new();
        let file = ws.set_file("a.rs", "struct W<T> { x: T }\nimpl<U> W<U> { fn f(&self) {} }");
        let snap = ws.snapshot();
        let decls = DeclTable::build(&snap);
        let root = decls.root(file).unwrap().clone();
        let f = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::FN_DEF)
            .unwrap();
        let scope = Scope::for_node(&decls, file, &f);
        let self_ty = scope.self_ty().unwrap();
        assert_eq!(self_ty.display(&decls).to_string(), "W<U>");
        // `U` comes from the impl, not from the struct.
        let Type::Nominal(n) = self_ty else { panic!() };
        assert_ne!(n.args[0], Type::Param(n.params[0].clone()));
    }
}
