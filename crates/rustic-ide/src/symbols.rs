//! File structure: the outline shown by editors.

use rowan::TextRange;
use rustic_parser::ast::item::{
    EnumDef, FieldList, FnDef, ImplDef, Item, ModItem, StructDef, TraitDef,
};
use rustic_parser::ast::{AstNode, Name};
use rustic_parser::{SyntaxKind, SyntaxNode};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StructureKind {
    Module,
    Struct,
    Field,
    Enum,
    Variant,
    Trait,
    Impl,
    Function,
    Const,
    Static,
    TypeAlias,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructureNode {
    pub name: String,
    pub kind: StructureKind,
    /// Field type or function signature.
    pub detail: Option<String>,
    pub range: TextRange,
    /// The name, or the header of an `impl`.
    pub selection_range: TextRange,
    pub children: Vec<StructureNode>,
}

impl StructureNode {
    fn new(name: String, kind: StructureKind, node: &SyntaxNode, selection: TextRange) -> Self {
        StructureNode {
            name,
            kind,
            detail: None,
            range: node.text_range(),
            selection_range: selection,
            children: Vec::new(),
        }
    }

    fn named(name: Option<Name>, kind: StructureKind, node: &SyntaxNode) -> Option<Self> {
        let name = name?;
        Some(Self::new(name.text()?, kind, node, name.syntax().text_range()))
    }
}

/// Outline of the items under `root`, in source order.
pub fn file_structure(root: &SyntaxNode) -> Vec<StructureNode> {
    root.children().filter_map(Item::cast).filter_map(|item| item_node(&item)).collect()
}

fn item_node(item: &Item) -> Option<StructureNode> {
    match item {
        Item::Fn(f) => fn_node(f),
        Item::Struct(s) => struct_node(s),
        Item::Enum(e) => enum_node(e),
        Item::Trait(t) => trait_node(t),
        Item::Impl(i) => impl_node(i),
        Item::Mod(m) => mod_node(m),
        Item::Const(c) => {
            let mut node = StructureNode::named(c.name(), StructureKind::Const, c.syntax())?;
            node.detail = c.ty().map(|t| t.syntax().text().to_string());
            Some(node)
        }
        Item::Static(s) => {
            let mut node = StructureNode::named(s.name(), StructureKind::Static, s.syntax())?;
            node.detail = s.ty().map(|t| t.syntax().text().to_string());
            Some(node)
        }
        Item::TypeAlias(t) => StructureNode::named(t.name(), StructureKind::TypeAlias, t.syntax()),
        Item::Use(_) | Item::MacroCall(_) => None,
    }
}

fn fn_node(f: &FnDef) -> Option<StructureNode> {
    let mut node = StructureNode::named(f.name(), StructureKind::Function, f.syntax())?;
    let params = f
        .param_list()
        .map(|p| p.syntax().text().to_string())
        .unwrap_or_else(|| "()".to_string());
    node.detail = Some(match f.ret_type().and_then(|r| r.ty()) {
        Some(ret) => format!("{params} -> {}", ret.syntax().text()),
        None => params,
    });
    Some(node)
}

fn struct_node(s: &StructDef) -> Option<StructureNode> {
    let mut node = StructureNode::named(s.name(), StructureKind::Struct, s.syntax())?;
    node.children = field_nodes(s.field_list());
    Some(node)
}

fn field_nodes(list: Option<FieldList>) -> Vec<StructureNode> {
    match list {
        Some(FieldList::Record(record)) => record
            .fields()
            .filter_map(|f| {
                let mut node = StructureNode::named(f.name(), StructureKind::Field, f.syntax())?;
                node.detail = f.ty().map(|t| t.syntax().text().to_string());
                Some(node)
            })
            .collect(),
        Some(FieldList::Tuple(tuple)) => tuple
            .fields()
            .enumerate()
            .map(|(i, f)| {
                let range = f.syntax().text_range();
                let mut node = StructureNode::new(i.to_string(), StructureKind::Field, f.syntax(), range);
                node.detail = f.ty().map(|t| t.syntax().text().to_string());
                node
            })
            .collect(),
        None => Vec::new(),
    }
}

fn enum_node(e: &EnumDef) -> Option<StructureNode> {
    let mut node = StructureNode::named(e.name(), StructureKind::Enum, e.syntax())?;
    node.children = e
        .variants()
        .filter_map(|v| {
            let mut variant = StructureNode::named(v.name(), StructureKind::Variant, v.syntax())?;
            variant.children = field_nodes(v.field_list());
            Some(variant)
        })
        .collect();
    Some(node)
}

/// `Name<G>: A + B`, with methods and constants as children.
fn trait_node(t: &TraitDef) -> Option<StructureNode> {
    let name = t.name()?;
    let mut title = name.text()?;
    if let Some(generics) = child_of_kind(t.syntax(), SyntaxKind::GENERIC_PARAM_LIST) {
        title.push_str(&generics.text().to_string());
    }
    if let Some(bounds) = child_of_kind(t.syntax(), SyntaxKind::TYPE_BOUND_LIST) {
        title.push_str(": ");
        title.push_str(&bounds.text().to_string());
    }
    let mut node = StructureNode::new(title, StructureKind::Trait, t.syntax(), name.syntax().text_range());
    node.children = assoc_nodes(t.assoc_items());
    Some(node)
}

fn impl_node(i: &ImplDef) -> Option<StructureNode> {
    let self_ty = i.self_ty()?;
    let title = match i.trait_() {
        Some(trait_) => format!("{} for {}", trait_.syntax().text(), self_ty.syntax().text()),
        None => self_ty.syntax().text().to_string(),
    };
    let mut node = StructureNode::new(title, StructureKind::Impl, i.syntax(), self_ty.syntax().text_range());
    node.children = assoc_nodes(i.assoc_items());
    Some(node)
}

fn mod_node(m: &ModItem) -> Option<StructureNode> {
    let mut node = StructureNode::named(m.name(), StructureKind::Module, m.syntax())?;
    node.children = m.items().filter_map(|item| item_node(&item)).collect();
    Some(node)
}

fn assoc_nodes(items: impl Iterator<Item = Item>) -> Vec<StructureNode> {
    let mut nodes: Vec<StructureNode> = items
        .filter(|item| matches!(item, Item::Fn(_) | Item::Const(_) | Item::TypeAlias(_)))
        .filter_map(|item| item_node(&item))
        .collect();
    nodes.sort_by_key(|n| n.range.start());
    nodes
}

fn child_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    node.children().find(|n| n.kind() == kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline(source: &str) -> String {
        fn walk(nodes: &[StructureNode], depth: usize, out: &mut String) {
            for node in nodes {
                out.push_str(&"  ".repeat(depth));
                out.push_str(&format!("{:?} {}", node.kind, node.name));
                if let Some(detail) = &node.detail {
                    out.push_str(&format!(" [{detail}]"));
                }
                out.push('\n');
                walk(&node.children, depth + 1, out);
            }
        }
        let parse = rustic_parser::parse(source);
        let mut out = String::new();
        walk(&file_structure(&parse.syntax()), 0, &mut out);
        out
    }

    #[test]
    fn outline_of_items() {
        let source = r#"
struct Point { x: i32, pub y: i32 }
struct Pair(u8, u8);
enum Shape { Circle { r: f64 }, Empty }
trait Area<T>: Clone + Send {
    const SIDES: u32;
    fn area(&self) -> f64;
}
impl Area<u8> for Point {
    fn area(&self) -> f64 { 0.0 }
}
mod inner {
    fn helper(a: u8) {}
}
"#;
        insta::assert_snapshot!(outline(source), @r"
        Struct Point
          Field x [i32]
          Field y [i32]
        Struct Pair
          Field 0 [u8]
          Field 1 [u8]
        Enum Shape
          Variant Circle
            Field r [f64]
          Variant Empty
        Trait Area<T>: Clone + Send
          Const SIDES [u32]
          Function area [(&self) -> f64]
        Impl Area<u8> for Point
          Function area [(&self) -> f64]
        Module inner
          Function helper [(a: u8)]
        ");
    }
}
