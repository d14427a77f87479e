//! Classification of references into rewritable sites.

use rowan::TextRange;
use rustic_parser::ast::expr::RecordExpr;
use rustic_parser::ast::pat::RecordPat;
use rustic_parser::ast::AstNode;
use rustic_parser::SyntaxKind;

use crate::error::UsageDiagnostic;
use crate::plan::ConversionPlan;
use crate::references::{FileReference, ReferenceKind};
use crate::workspace::FileId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// `name: expr`
    Expr(TextRange),
    /// `name`
    Shorthand(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInit {
    pub index: usize,
    pub value: FieldValue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatBinding {
    pub index: usize,
    /// The sub-pattern, or the `ref mut name` of a shorthand field.
    pub pat: TextRange,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReferenceSite {
    /// `Path { a: x, b }`, optionally with `..base`.
    Construction {
        path: TextRange,
        fields: Vec<FieldInit>,
        base: Option<TextRange>,
    },
    /// `Path { a, b: p, .. }` in pattern position.
    PatternDestructure {
        path: TextRange,
        bindings: Vec<PatBinding>,
        rest: bool,
    },
    /// The name in `expr.name`.
    FieldAccess { index: usize },
    /// A type position or path that stays as is.
    Mention,
}

/// A classified reference; `range` is the text the rewrite replaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Site {
    pub file: FileId,
    pub range: TextRange,
    pub kind: ReferenceSite,
}

pub fn classify(reference: &FileReference, plan: &ConversionPlan) -> Result<Site, UsageDiagnostic> {
    let file = reference.file;
    let unsupported = |range: TextRange, message: String| -> Result<Site, UsageDiagnostic> {
        Err(UsageDiagnostic::new(file, range, message))
    };
    match &reference.kind {
        ReferenceKind::MacroToken(token) => unsupported(
            token.text_range(),
            format!("`{}` is used inside a macro invocation", token.text()),
        ),
        ReferenceKind::UnresolvedField(name_ref) => unsupported(
            name_ref.syntax().text_range(),
            format!(
                "receiver of `.{}` could not be resolved",
                name_ref.text().unwrap_or_default()
            ),
        ),
        ReferenceKind::FieldAccess(name_ref) => {
            let range = name_ref.syntax().text_range();
            let name = name_ref.text().unwrap_or_default();
            match plan.index_of(&name) {
                Some(index) => Ok(Site {
                    file,
                    range,
                    kind: ReferenceSite::FieldAccess { index },
                }),
                None => unsupported(range, format!("no field `{name}` on `{}`", plan.name)),
            }
        }
        ReferenceKind::Path(path) => {
            let Some(parent) = path.syntax().parent() else {
                return Ok(mention(file, reference.range));
            };
            if let Some(record) = RecordExpr::cast(parent.clone()) {
                return construction(file, &record, plan);
            }
            if let Some(record) = RecordPat::cast(parent) {
                return destructure(file, &record, plan);
            }
            Ok(mention(file, reference.range))
        }
    }
}

fn mention(file: FileId, range: TextRange) -> Site {
    Site {
        file,
        range,
        kind: ReferenceSite::Mention,
    }
}

fn construction(file: FileId, record: &RecordExpr, plan: &ConversionPlan) -> Result<Site, UsageDiagnostic> {
    let range = record.syntax().text_range();
    let diag = |range: TextRange, message: String| UsageDiagnostic::new(file, range, message);
    let (Some(path), Some(list)) = (record.path(), record.field_list()) else {
        return Err(diag(range, "incomplete struct literal".to_string()));
    };

    let mut fields = Vec::new();
    for field in list.fields() {
        let field_range = field.syntax().text_range();
        if field.syntax().children().any(|n| n.kind() == SyntaxKind::ATTR) {
            return Err(diag(field_range, "attributes on literal fields are not supported".to_string()));
        }
        let name = field.field_name().unwrap_or_default();
        let Some(index) = plan.index_of(&name) else {
            return Err(diag(field_range, format!("no field `{name}` in `{}`", plan.name)));
        };
        let value = if field.is_shorthand() {
            FieldValue::Shorthand(name)
        } else {
            match field.expr() {
                Some(expr) => FieldValue::Expr(expr.syntax().text_range()),
                None => return Err(diag(field_range, format!("field `{name}` has no value"))),
            }
        };
        fields.push(FieldInit { index, value });
    }

    let base = match (list.dotdot_token(), list.spread()) {
        (None, _) => None,
        (Some(_), Some(spread)) => Some(spread.syntax().text_range()),
        (Some(dotdot), None) => {
            return Err(diag(dotdot.text_range(), "`..` without a base expression".to_string()))
        }
    };

    Ok(Site {
        file,
        range,
        kind: ReferenceSite::Construction {
            path: path.syntax().text_range(),
            fields,
            base,
        },
    })
}

fn destructure(file: FileId, record: &RecordPat, plan: &ConversionPlan) -> Result<Site, UsageDiagnostic> {
    let range = record.syntax().text_range();
    let diag = |range: TextRange, message: String| UsageDiagnostic::new(file, range, message);
    let (Some(path), Some(list)) = (record.path(), record.field_list()) else {
        return Err(diag(range, "incomplete struct pattern".to_string()));
    };
    if let Some(attr) = list.syntax().children().find(|n| n.kind() == SyntaxKind::ATTR) {
        return Err(diag(
            attr.text_range(),
            "attributes on pattern fields are not supported".to_string(),
        ));
    }

    let mut bindings = Vec::new();
    for field in list.fields() {
        let field_range = field.syntax().text_range();
        let name = field.field_name().unwrap_or_default();
        let Some(index) = plan.index_of(&name) else {
            return Err(diag(field_range, format!("no field `{name}` in `{}`", plan.name)));
        };
        let Some(pat) = field.pat() else {
            return Err(diag(field_range, format!("field `{name}` has no pattern")));
        };
        bindings.push(PatBinding {
            index,
            pat: pat.syntax().text_range(),
        });
    }

    Ok(Site {
        file,
        range,
        kind: ReferenceSite::PatternDestructure {
            path: path.syntax().text_range(),
            bindings,
            rest: list.rest_pat().is_some(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancellationToken;
    use crate::decls::DeclTable;
    use crate::plan::plan_conversion;
    use crate::references::ReferenceIndex;
    use crate::shape::{ConvertTarget, StructShape};
    use crate::workspace::Workspace;

    fn classify_all(source: &str) -> Vec<Result<ReferenceSite, String>> {
        let ws = Workspace::new();
        let file = ws.set_file("a.rs", source);
        let snap = ws.snapshot();
        let decls = DeclTable::build(&snap);
        let target = ConvertTarget::Struct(decls.resolve_type_name("Test", file).unwrap());
        let plan = plan_conversion(&StructShape::of_target(&decls, target).unwrap()).unwrap();
        let names: Vec<String> = plan.fields.iter().map(|f| f.name.clone()).collect();
        ReferenceIndex::new(&decls)
            .find(target, &names, &CancellationToken::new())
            .unwrap()
            .iter()
            .map(|r| classify(r, &plan).map(|s| s.kind).map_err(|d| d.message))
            .collect()
    }

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(start.into(), end.into())
    }

    #[test]
    fn literals_record_indices_and_values() {
        let sites = classify_all("struct Test { a: i32, b: i32 }\nfn f(b: i32) { Test { b, a: 1 }; }");
        assert_eq!(
            sites,
            [Ok(ReferenceSite::Construction {
                path: range(46, 50),
                fields: vec![
                    FieldInit {
                        index: 1,
                        value: FieldValue::Shorthand("b".to_string())
                    },
                    FieldInit {
                        index: 0,
                        value: FieldValue::Expr(range(59, 60))
                    },
                ],
                base: None,
            })]
        );
    }

    #[test]
    fn patterns_types_and_accesses() {
        let sites = classify_all(
            "struct Test { a: i32, b: i32 }\nfn f(t: Test) -> i32 { let Test { b: x, .. } = t; t.a }",
        );
        assert_eq!(sites.len(), 3);
        assert_eq!(sites[0], Ok(ReferenceSite::Mention));
        assert!(matches!(
            &sites[1],
            Ok(ReferenceSite::PatternDestructure { bindings, rest: true, .. })
                if bindings.len() == 1 && bindings[0].index == 1
        ));
        assert_eq!(sites[2], Ok(ReferenceSite::FieldAccess { index: 0 }));
    }

    #[test]
    fn unsupported_usages_carry_messages() {
        let sites = classify_all(
            "struct Test { a: i32 }\nfn f(o: impl Tr) { let t = Test { c: 1 }; assert_eq!(t.a, 1); o.a; }",
        );
        assert_eq!(
            sites,
            [
                Err("no field `c` in `Test`".to_string()),
                Err("`a` is used inside a macro invocation".to_string()),
                Err("receiver of `.a` could not be resolved".to_string()),
            ]
        );
    }
}
