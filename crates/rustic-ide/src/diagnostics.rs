//! Ariadne rendering of usage diagnostics and parse errors.
//!
//! Output is colorless so it reads the same in a terminal, a log file and a
//! test assertion.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use rowan::TextRange;
use rustic_parser::ParseError;

use crate::error::UsageDiagnostic;

const UNSUPPORTED_USAGE: &str = "R0001";
const PARSE_ERROR: &str = "R0100";

/// Clamp `range` into `source`, widening empty spans to one character.
fn clamp(range: Range<usize>, source_len: usize) -> Range<usize> {
    let start = range.start.min(source_len);
    let end = range.end.min(source_len).max(start);
    if start == end {
        start..end.saturating_add(1).min(source_len)
    } else {
        start..end
    }
}

fn text_range_to_range(range: TextRange) -> Range<usize> {
    usize::from(range.start())..usize::from(range.end())
}

fn write_report(report: Report<'_, Range<usize>>, source: &str) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = report.write(Source::from(source), &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Render a usage the conversion cannot rewrite.
pub fn render_usage_diagnostic(diag: &UsageDiagnostic, source: &str) -> String {
    let config = Config::default().with_color(false);
    let span = clamp(text_range_to_range(diag.range), source.len());
    let report = Report::build(ReportKind::Error, span.clone())
        .with_code(UNSUPPORTED_USAGE)
        .with_message("usage cannot be converted")
        .with_config(config)
        .with_label(
            Label::new(span)
                .with_message(&diag.message)
                .with_color(Color::Red),
        )
        .with_help("rewrite this usage by hand, then run the conversion again")
        .finish();
    write_report(report, source)
}

/// Render a parse error, with its related location when there is one.
pub fn render_parse_error(err: &ParseError, source: &str) -> String {
    let config = Config::default().with_color(false);
    let span = clamp(err.span.start as usize..err.span.end as usize, source.len());
    let mut builder = Report::build(ReportKind::Error, span.clone())
        .with_code(PARSE_ERROR)
        .with_message(&err.message)
        .with_config(config)
        .with_label(
            Label::new(span)
                .with_message(&err.message)
                .with_color(Color::Red),
        );
    if let Some((message, related)) = &err.related {
        let related = clamp(related.start as usize..related.end as usize, source.len());
        builder.add_label(
            Label::new(related)
                .with_message(message)
                .with_color(Color::Blue),
        );
    }
    write_report(builder.finish(), source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::FileId;
    use rowan::TextSize;

    #[test]
    fn usage_diagnostic_mentions_code_and_message() {
        let source = "fn f() { println!(\"{}\", t.a); }";
        let diag = UsageDiagnostic::new(
            FileId(0),
            TextRange::new(TextSize::from(26), TextSize::from(27)),
            "`a` is used inside a macro invocation",
        );
        let out = render_usage_diagnostic(&diag, source);
        assert!(out.contains("[R0001] Error: usage cannot be converted"), "{out}");
        assert!(out.contains("`a` is used inside a macro invocation"), "{out}");
        assert!(!out.contains('\u{1b}'), "output must be colorless");
    }

    #[test]
    fn parse_errors_render_even_at_end_of_input() {
        let source = "struct S {";
        let parse = rustic_parser::parse(source);
        let err = parse.errors().first().expect("an unterminated struct");
        let out = render_parse_error(err, source);
        assert!(out.contains("[R0100] Error"), "{out}");
    }
}
