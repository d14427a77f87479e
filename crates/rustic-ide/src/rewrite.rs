//! Text rewrites for classified sites and for the declaration itself.
//!
//! Sites of one file are rewritten innermost first. When an outer site
//! copies a sub-range of the original text (a field value, a sub-pattern)
//! the edits already computed inside that sub-range are folded into the
//! copy, so a literal nested in a literal comes out converted once.

use rowan::{TextRange, TextSize};
use rustic_parser::ast::item::FieldList;
use rustic_parser::ast::AstNode;
use rustic_parser::SyntaxNode;
use tracing::debug;

use crate::classify::{FieldValue, ReferenceSite, Site};
use crate::config::ConvertConfig;
use crate::decls::DeclTable;
use crate::edit::{apply_edits, TextEdit};
use crate::error::RefactorError;
use crate::plan::ConversionPlan;
use crate::shape::ConvertTarget;

pub struct FileRewriter<'t> {
    text: &'t str,
    done: Vec<TextEdit>,
}

impl<'t> FileRewriter<'t> {
    pub fn new(text: &'t str) -> Self {
        FileRewriter {
            text,
            done: Vec::new(),
        }
    }

    /// Rewrite every site. Returns the edits that are not nested in
    /// another site's edit.
    pub fn rewrite(
        mut self,
        sites: &[Site],
        plan: &ConversionPlan,
        config: &ConvertConfig,
    ) -> Result<Vec<TextEdit>, RefactorError> {
        let mut order: Vec<&Site> = sites.iter().collect();
        order.sort_by_key(|s| (s.range.len(), s.range.start()));
        for site in order {
            let replacement = match &site.kind {
                ReferenceSite::Mention => continue,
                ReferenceSite::FieldAccess { index } => index.to_string(),
                ReferenceSite::Construction { path, fields, base } => {
                    self.construction(*path, fields, *base, plan)?
                }
                ReferenceSite::PatternDestructure {
                    path,
                    bindings,
                    rest,
                } => {
                    let mut bound = Vec::with_capacity(bindings.len());
                    for binding in bindings {
                        bound.push((binding.index, self.render(binding.pat)?));
                    }
                    let slots = pattern_slots(plan.len(), &bound, *rest, config.collapse_rest_min);
                    format!("{}({})", self.slice(*path)?, slots.join(", "))
                }
            };
            self.done.push(TextEdit::replace(site.range, replacement));
        }
        Ok(self.done)
    }

    fn construction(
        &mut self,
        path: TextRange,
        fields: &[crate::classify::FieldInit],
        base: Option<TextRange>,
        plan: &ConversionPlan,
    ) -> Result<String, RefactorError> {
        let mut values: Vec<(usize, String)> = Vec::with_capacity(fields.len());
        for field in fields {
            let value = match &field.value {
                FieldValue::Shorthand(name) => name.clone(),
                FieldValue::Expr(range) => self.render(*range)?,
            };
            values.push((field.index, value));
        }
        let path = self.slice(path)?.to_string();

        let mut seen = vec![false; plan.len()];
        for (index, _) in &values {
            if let Some(slot) = seen.get_mut(*index) {
                *slot = true;
            }
        }
        let complete = base.is_none() && values.len() == plan.len() && seen.iter().all(|s| *s);
        if complete {
            values.sort_by_key(|(index, _)| *index);
            let args: Vec<String> = values.into_iter().map(|(_, v)| v).collect();
            return Ok(format!("{path}({})", args.join(", ")));
        }

        // Functional update or missing fields: keep braces, use indices.
        values.sort_by_key(|(index, _)| *index);
        let mut parts: Vec<String> = values
            .into_iter()
            .map(|(index, value)| format!("{index}: {value}"))
            .collect();
        if let Some(base) = base {
            parts.push(format!("..{}", self.render(base)?));
        }
        Ok(format!("{path} {{ {} }}", parts.join(", ")))
    }

    fn slice(&self, range: TextRange) -> Result<&'t str, RefactorError> {
        self.text
            .get(usize::from(range.start())..usize::from(range.end()))
            .ok_or(RefactorError::EditOutOfBounds)
    }

    /// The original text of `range` with every finished edit inside it
    /// applied. Those edits are consumed.
    fn render(&mut self, range: TextRange) -> Result<String, RefactorError> {
        let original = self.slice(range)?;
        let (inner, rest): (Vec<TextEdit>, Vec<TextEdit>) = std::mem::take(&mut self.done)
            .into_iter()
            .partition(|e| range.contains_range(e.range));
        self.done = rest;
        let shifted: Vec<TextEdit> = inner
            .into_iter()
            .map(|e| TextEdit::replace(e.range - range.start(), e.replacement))
            .collect();
        apply_edits(original, &shifted)
    }
}

/// Positional sub-patterns for a destructuring of `len` fields.
///
/// `bound` pairs field indices with their sub-pattern text. A rest marker
/// becomes `..` only when every unbound slot comes after the last bound one
/// and there are at least `collapse_min` of them. Otherwise each unbound
/// slot is spelled out as `_`.
pub fn pattern_slots(
    len: usize,
    bound: &[(usize, String)],
    rest: bool,
    collapse_min: usize,
) -> Vec<String> {
    let mut slots: Vec<Option<&str>> = vec![None; len];
    for (index, pat) in bound {
        if let Some(slot) = slots.get_mut(*index) {
            *slot = Some(pat.as_str());
        }
    }
    let head = slots.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
    let tail = len - head;
    let gaps = slots[..head].iter().any(Option::is_none);
    if rest && !gaps && tail > 0 && tail >= collapse_min {
        let mut out: Vec<String> = slots[..head].iter().flatten().map(|s| s.to_string()).collect();
        out.push("..".to_string());
        return out;
    }
    slots.iter().map(|s| s.unwrap_or("_").to_string()).collect()
}

/// The edit turning the declaration's field list into a positional one.
pub fn declaration_edit(
    decls: &DeclTable,
    target: ConvertTarget,
    plan: &ConversionPlan,
) -> Option<TextEdit> {
    let node = target.node(decls)?;
    let fields = plan.tuple_field_list(&line_indent(&node));
    match target {
        ConvertTarget::Struct(id) => {
            let def = decls.struct_def(id)?;
            let anchor = match def.generic_param_list() {
                Some(generics) => generics.syntax().text_range().end(),
                None => def.name()?.syntax().text_range().end(),
            };
            let end = def.syntax().text_range().end();
            let mut replacement = fields;
            if let Some(where_clause) = def.where_clause() {
                let where_range = where_clause.syntax().text_range();
                let text = def.syntax().text().to_string();
                let base = def.syntax().text_range().start();
                let local = |offset: TextSize| usize::from(offset - base);
                let gap = text.get(local(anchor)..local(where_range.start()))?;
                let clause = text.get(local(where_range.start())..local(where_range.end()))?;
                replacement.push_str(gap);
                replacement.push_str(clause.trim_end().trim_end_matches(',').trim_end());
            }
            replacement.push(';');
            debug!(struct_name = %plan.name, "rewriting declaration");
            Some(TextEdit::replace(TextRange::new(anchor, end), replacement))
        }
        ConvertTarget::Variant { .. } => {
            let variant = rustic_parser::ast::item::Variant::cast(node)?;
            let FieldList::Record(list) = variant.field_list()? else {
                return None;
            };
            let start = variant.name()?.syntax().text_range().end();
            let end = list.syntax().text_range().end();
            Some(TextEdit::replace(TextRange::new(start, end), fields))
        }
    }
}

/// Leading whitespace of the line `node` starts on.
fn line_indent(node: &SyntaxNode) -> String {
    let root = node.ancestors().last().unwrap_or_else(|| node.clone());
    let text = root.text().to_string();
    let start = usize::from(node.text_range().start());
    let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
    text[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(len: usize, bound: &[(usize, &str)], rest: bool) -> String {
        let bound: Vec<(usize, String)> = bound.iter().map(|(i, s)| (*i, s.to_string())).collect();
        pattern_slots(len, &bound, rest, 2).join(", ")
    }

    #[test]
    fn rest_marker_policy() {
        assert_eq!(slots(2, &[(0, "a")], true), "a, _");
        assert_eq!(slots(4, &[(0, "a")], true), "a, ..");
        assert_eq!(slots(2, &[(1, "v")], true), "_, v");
        assert_eq!(slots(5, &[(0, "a"), (2, "c")], true), "a, _, c, _, _");
        assert_eq!(slots(4, &[(1, "b")], true), "_, b, _, _");
        assert_eq!(slots(4, &[(0, "a"), (1, "b")], true), "a, b, ..");
        assert_eq!(slots(3, &[(0, "a"), (1, "b"), (2, "c")], true), "a, b, c");
        assert_eq!(slots(3, &[], true), "..");
        assert_eq!(slots(1, &[], true), "_");
        assert_eq!(slots(3, &[(2, "c"), (0, "a")], false), "a, _, c");
    }

    #[test]
    fn collapse_threshold_is_configurable() {
        let bound = vec![(0, "a".to_string())];
        assert_eq!(pattern_slots(4, &bound, true, 4).join(", "), "a, _, _, _");
        assert_eq!(pattern_slots(2, &bound, true, 1).join(", "), "a, ..");
    }
}
