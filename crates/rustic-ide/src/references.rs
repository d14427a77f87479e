//! Reference search for a conversion target.
//!
//! Finds every path that resolves to the target, every `.field` access
//! whose receiver resolves to it, and every token inside a macro
//! invocation that names it. Macro tokens cannot be rewritten, and neither
//! can a `.field` access naming one of the target's fields whose receiver
//! type is unknown; the classifier reports both.

use rowan::TextRange;
use rustic_parser::ast::expr::FieldExpr;
use rustic_parser::ast::{AstNode, NameRef, Path};
use rustic_parser::{SyntaxKind, SyntaxNode, SyntaxToken};
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::decls::DeclTable;
use crate::error::RefactorError;
use crate::resolve::{PathResolution, Resolver};
use crate::shape::ConvertTarget;
use crate::workspace::FileId;

#[derive(Clone, Debug)]
pub enum ReferenceKind {
    /// A path naming the target: a literal, a pattern, a type.
    Path(Path),
    /// The name in `expr.field`.
    FieldAccess(NameRef),
    /// A token inside a macro invocation.
    MacroToken(SyntaxToken),
    /// `expr.field` with a field name of the target and a receiver whose
    /// type could not be inferred.
    UnresolvedField(NameRef),
}

#[derive(Clone, Debug)]
pub struct FileReference {
    pub file: FileId,
    pub range: TextRange,
    pub kind: ReferenceKind,
}

pub struct ReferenceIndex<'a> {
    decls: &'a DeclTable,
}

impl<'a> ReferenceIndex<'a> {
    pub fn new(decls: &'a DeclTable) -> Self {
        ReferenceIndex { decls }
    }

    /// All references to `target` across the workspace, in file and
    /// offset order. `field_names` are the target's named fields.
    pub fn find(
        &self,
        target: ConvertTarget,
        field_names: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<FileReference>, RefactorError> {
        let owner = self.decls.data(target.owner());
        let name = match target {
            ConvertTarget::Struct(_) => owner.name.clone(),
            ConvertTarget::Variant { index, .. } => {
                owner.variants.get(index).cloned().unwrap_or_default()
            }
        };

        let mut refs = Vec::new();
        for file in self.decls.files() {
            cancel.check()?;
            let Some(root) = self.decls.root(file) else {
                continue;
            };
            let resolver = Resolver::new(self.decls, file);
            let before = refs.len();
            self.path_refs(&resolver, file, root, target, &name, cancel, &mut refs)?;
            if let ConvertTarget::Struct(id) = target {
                self.field_refs(&resolver, file, root, id, field_names, cancel, &mut refs)?;
            }
            self.macro_refs(&resolver, file, root, target, &name, field_names, &mut refs);
            debug!(file = file.0, found = refs.len() - before, "searched file");
        }

        refs.sort_by_key(|r| (r.file, r.range.start(), r.range.end()));
        refs.dedup_by_key(|r| (r.file, r.range));
        Ok(refs)
    }

    #[allow(clippy::too_many_arguments)]
    fn path_refs(
        &self,
        resolver: &Resolver<'_>,
        file: FileId,
        root: &SyntaxNode,
        target: ConvertTarget,
        name: &str,
        cancel: &CancellationToken,
        out: &mut Vec<FileReference>,
    ) -> Result<(), RefactorError> {
        for path in root.descendants().filter_map(Path::cast) {
            let Some(last) = path.last_segment().and_then(|s| s.name_ref()?.text()) else {
                continue;
            };
            if last != name && last != "Self" {
                continue;
            }
            cancel.check()?;
            if resolver.resolve_path(&path).map(PathResolution::as_target) == Some(target) {
                out.push(FileReference {
                    file,
                    range: path.syntax().text_range(),
                    kind: ReferenceKind::Path(path),
                });
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn field_refs(
        &self,
        resolver: &Resolver<'_>,
        file: FileId,
        root: &SyntaxNode,
        target: rustic_ty::DeclId,
        field_names: &[String],
        cancel: &CancellationToken,
        out: &mut Vec<FileReference>,
    ) -> Result<(), RefactorError> {
        for access in root.descendants().filter_map(FieldExpr::cast) {
            let Some(name_ref) = access.name_ref() else {
                continue;
            };
            if name_ref.is_index() || !name_ref.text().is_some_and(|t| field_names.contains(&t)) {
                continue;
            }
            cancel.check()?;
            let Some(receiver) = access.receiver() else {
                continue;
            };
            match resolver.type_of_expr(&receiver) {
                Some(ty) if ty.as_decl() == Some(target) => out.push(FileReference {
                    file,
                    range: name_ref.syntax().text_range(),
                    kind: ReferenceKind::FieldAccess(name_ref),
                }),
                Some(_) => {}
                None => {
                    debug!(
                        file = file.0,
                        offset = u32::from(name_ref.syntax().text_range().start()),
                        "receiver type unknown"
                    );
                    out.push(FileReference {
                        file,
                        range: name_ref.syntax().text_range(),
                        kind: ReferenceKind::UnresolvedField(name_ref),
                    });
                }
            }
        }
        Ok(())
    }

    /// Tokens in macro token trees: the target's name (`Enum::Variant` or
    /// `Self::Variant` for variants), and `x.field` where `x` is a local
    /// of the target type.
    #[allow(clippy::too_many_arguments)]
    fn macro_refs(
        &self,
        resolver: &Resolver<'_>,
        file: FileId,
        root: &SyntaxNode,
        target: ConvertTarget,
        name: &str,
        field_names: &[String],
        out: &mut Vec<FileReference>,
    ) {
        for tree in root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::TOKEN_TREE)
        {
            let tokens: Vec<SyntaxToken> = tree
                .children_with_tokens()
                .filter_map(|e| e.into_token())
                .filter(|t| !t.kind().is_trivia())
                .collect();
            for (i, token) in tokens.iter().enumerate() {
                let hit = match target {
                    ConvertTarget::Struct(id) => {
                        (token.kind() == SyntaxKind::IDENT && token.text() == name)
                            || self.is_field_of_local(resolver, &tokens, i, id, field_names)
                    }
                    ConvertTarget::Variant { parent, .. } => {
                        token.text() == name && self.names_variant_parent(resolver, &tokens, i, parent)
                    }
                };
                if hit {
                    out.push(FileReference {
                        file,
                        range: token.text_range(),
                        kind: ReferenceKind::MacroToken(token.clone()),
                    });
                }
            }
        }
    }

    /// `tokens[i]` is a field name preceded by `local .`.
    fn is_field_of_local(
        &self,
        resolver: &Resolver<'_>,
        tokens: &[SyntaxToken],
        i: usize,
        target: rustic_ty::DeclId,
        field_names: &[String],
    ) -> bool {
        let token = &tokens[i];
        if token.kind() != SyntaxKind::IDENT || !field_names.iter().any(|f| f == token.text()) {
            return false;
        }
        let (Some(dot), Some(local)) = (
            i.checked_sub(1).and_then(|j| tokens.get(j)),
            i.checked_sub(2).and_then(|j| tokens.get(j)),
        ) else {
            return false;
        };
        if dot.kind() != SyntaxKind::DOT
            || !matches!(local.kind(), SyntaxKind::IDENT | SyntaxKind::SELF_KW)
        {
            return false;
        }
        // `a.b.field` is out of reach; only a bare local is resolved.
        if i >= 3 && tokens[i - 3].kind() == SyntaxKind::DOT {
            return false;
        }
        let Some(at) = token.parent() else {
            return false;
        };
        resolver
            .type_of_local(local.text(), &at)
            .is_some_and(|ty| ty.as_decl() == Some(target))
    }

    /// `tokens[i]` is preceded by `Parent ::` or `Self ::`.
    fn names_variant_parent(
        &self,
        resolver: &Resolver<'_>,
        tokens: &[SyntaxToken],
        i: usize,
        parent: rustic_ty::DeclId,
    ) -> bool {
        let (Some(sep), Some(owner)) = (
            i.checked_sub(1).and_then(|j| tokens.get(j)),
            i.checked_sub(2).and_then(|j| tokens.get(j)),
        ) else {
            return false;
        };
        if sep.kind() != SyntaxKind::COLON_COLON {
            return false;
        }
        let Some(at) = owner.parent() else {
            return false;
        };
        let segments = [owner.text().to_string(), tokens[i].text().to_string()];
        matches!(
            resolver.resolve_segments(&segments, &at),
            Some(PathResolution::Variant { parent: p, .. }) if p == parent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Workspace;

    fn find(source: &str, name: &str) -> Vec<(String, &'static str)> {
        let ws = Workspace::new();
        let file = ws.set_file("a.rs", source);
        let snap = ws.snapshot();
        let decls = DeclTable::build(&snap);
        let id = decls.resolve_type_name(name, file).unwrap();
        let fields = vec!["a".to_string(), "b".to_string()];
        let refs = ReferenceIndex::new(&decls)
            .find(ConvertTarget::Struct(id), &fields, &CancellationToken::new())
            .unwrap();
        refs.into_iter()
            .map(|r| {
                let text = source[r.range].to_string();
                let kind = match r.kind {
                    ReferenceKind::Path(_) => "path",
                    ReferenceKind::FieldAccess(_) => "field",
                    ReferenceKind::MacroToken(_) => "macro",
                    ReferenceKind::UnresolvedField(_) => "unresolved",
                };
                (text, kind)
            })
            .collect()
    }

    #[test]
    fn finds_paths_fields_and_macro_tokens() {
        let src = "struct S { a: i32, b: i32 }\nstruct T { a: i32 }\nimpl S { fn f(&self) -> i32 { self.a } }\nfn g(t: T, s: S) { let x = S { a: t.a, b: s.b }; println!(\"{}\", s.a); }";
        let found = find(src, "S");
        let summary: Vec<(&str, &str)> = found.iter().map(|(t, k)| (t.as_str(), *k)).collect();
        assert_eq!(
            summary,
            [
                ("S", "path"),
                ("a", "field"),
                ("S", "path"),
                ("S", "path"),
                ("b", "field"),
                ("a", "macro"),
            ]
        );
    }

    #[test]
    fn other_declarations_with_the_same_field_names_are_ignored() {
        let src = "struct S { a: i32, b: i32 }\nstruct T { a: i32 }\nfn g(t: T) -> i32 { t.a }";
        assert!(find(src, "S").is_empty());
    }

    #[test]
    fn accesses_with_unknown_receivers_are_kept() {
        let src = "struct S { a: i32, b: i32 }\nfn g(x: impl Tr) -> i32 { x.a + x.len }";
        assert_eq!(find(src, "S"), [("a".to_string(), "unresolved")]);
    }

    #[test]
    fn cancellation_stops_the_search() {
        let ws = Workspace::new();
        let file = ws.set_file("a.rs", "struct S { a: i32 }\nfn f() -> S { S { a: 1 } }");
        let snap = ws.snapshot();
        let decls = DeclTable::build(&snap);
        let id = decls.resolve_type_name("S", file).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = ReferenceIndex::new(&decls).find(ConvertTarget::Struct(id), &[], &cancel);
        assert!(matches!(result, Err(RefactorError::Cancelled)));
    }
}
