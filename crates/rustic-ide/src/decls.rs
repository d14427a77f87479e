//! Declaration table: every struct, enum, `impl` block and function of the
//! workspace, addressed by stable handles.
//!
//! Types refer to declarations through [`DeclId`] only; the table maps the
//! handle back to syntax through a [`SyntaxNodePtr`] resolved against the
//! root that was parsed when the table was built. The table is rebuilt for
//! every analysis, so it never outlives the snapshot it was built from.

use rowan::TextRange;
use rustc_hash::FxHashMap;
use rustic_parser::ast::item::{EnumDef, FnDef, GenericParamList, ImplDef, StructDef};
use rustic_parser::ast::ty::Type as TypeSyntax;
use rustic_parser::ast::AstNode;
use rustic_parser::{SyntaxKind, SyntaxNode, SyntaxNodePtr};
use rustic_ty::{DeclId, DeclNames, GenericSite, Type, TypeParam};

use crate::workspace::{FileId, Snapshot};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Struct,
    Enum,
}

/// A struct or enum declaration.
#[derive(Clone, Debug)]
pub struct DeclData {
    pub name: String,
    pub kind: DeclKind,
    pub file: FileId,
    pub ptr: SyntaxNodePtr,
    /// The declaration's own generic parameters.
    pub params: Vec<TypeParam>,
    pub site: GenericSite,
    /// Variant names, in order, for enums.
    pub variants: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ImplData {
    pub file: FileId,
    pub ptr: SyntaxNodePtr,
    /// The declaration named by the self type, when it is one of ours.
    pub self_decl: Option<DeclId>,
    pub site: GenericSite,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FnOwner {
    Free,
    Impl(usize),
}

#[derive(Clone, Debug)]
pub struct FnData {
    pub name: String,
    pub file: FileId,
    pub ptr: SyntaxNodePtr,
    pub owner: FnOwner,
    pub site: GenericSite,
}

#[derive(Debug, Default)]
pub struct DeclTable {
    roots: FxHashMap<FileId, SyntaxNode>,
    decls: Vec<DeclData>,
    by_name: FxHashMap<String, Vec<DeclId>>,
    impls: Vec<ImplData>,
    fns: Vec<FnData>,
    fns_by_name: FxHashMap<String, Vec<usize>>,
    /// Generic site of every generic-bearing item, keyed by its node.
    sites: FxHashMap<(FileId, TextRange), GenericSite>,
    next_site: u32,
}

impl DeclTable {
    /// Collect the declarations of every file in the snapshot, nested
    /// modules and function-local items included.
    pub fn build(snapshot: &Snapshot<'_>) -> DeclTable {
        let mut table = DeclTable::default();
        for (file, source) in snapshot.files() {
            table.roots.insert(file, source.syntax());
        }
        let mut files: Vec<FileId> = table.roots.keys().copied().collect();
        files.sort();

        for &file in &files {
            let root = table.roots[&file].clone();
            for node in root.descendants() {
                if let Some(def) = StructDef::cast(node.clone()) {
                    let name = def.name().and_then(|n| n.text());
                    table.add_decl(file, &node, name, DeclKind::Struct, def.generic_param_list(), Vec::new());
                } else if let Some(def) = EnumDef::cast(node.clone()) {
                    let name = def.name().and_then(|n| n.text());
                    let variants = def
                        .variants()
                        .map(|v| v.name().and_then(|n| n.text()).unwrap_or_default())
                        .collect();
                    table.add_decl(file, &node, name, DeclKind::Enum, def.generic_param_list(), variants);
                }
            }
        }

        // Impl self types resolve against the complete set of declarations.
        for &file in &files {
            let root = table.roots[&file].clone();
            for node in root.descendants() {
                if let Some(imp) = ImplDef::cast(node.clone()) {
                    let self_decl = imp
                        .self_ty()
                        .and_then(|ty| ty.strip_references())
                        .and_then(|ty| last_segment_name(&ty))
                        .and_then(|name| table.resolve_type_name(&name, file));
                    let site = table.alloc_site(file, &node);
                    table.impls.push(ImplData {
                        file,
                        ptr: SyntaxNodePtr::new(&node),
                        self_decl,
                        site,
                    });
                }
            }
            for node in root.descendants() {
                let Some(def) = FnDef::cast(node.clone()) else {
                    continue;
                };
                let Some(name) = def.name().and_then(|n| n.text()) else {
                    continue;
                };
                let owner = match owning_item(&node) {
                    Some(parent) if parent.kind() == SyntaxKind::IMPL_DEF => {
                        match table.impl_index(file, &parent) {
                            Some(index) => FnOwner::Impl(index),
                            None => continue,
                        }
                    }
                    // Trait methods have no body we can trust for inference.
                    Some(_) => continue,
                    None => FnOwner::Free,
                };
                let site = table.alloc_site(file, &node);
                let index = table.fns.len();
                table.fns.push(FnData {
                    name: name.clone(),
                    file,
                    ptr: SyntaxNodePtr::new(&node),
                    owner,
                    site,
                });
                table.fns_by_name.entry(name).or_default().push(index);
            }
        }
        table
    }

    fn alloc_site(&mut self, file: FileId, node: &SyntaxNode) -> GenericSite {
        let site = GenericSite(self.next_site);
        self.next_site += 1;
        self.sites.insert((file, node.text_range()), site);
        site
    }

    fn add_decl(
        &mut self,
        file: FileId,
        node: &SyntaxNode,
        name: Option<String>,
        kind: DeclKind,
        generics: Option<GenericParamList>,
        variants: Vec<String>,
    ) {
        let Some(name) = name else {
            return;
        };
        let site = self.alloc_site(file, node);
        let params = generic_names(generics.as_ref())
            .into_iter()
            .map(|n| TypeParam::new(n, site))
            .collect();
        let id = DeclId::new(self.decls.len() as u32);
        self.decls.push(DeclData {
            name: name.clone(),
            kind,
            file,
            ptr: SyntaxNodePtr::new(node),
            params,
            site,
            variants,
        });
        self.by_name.entry(name).or_default().push(id);
    }

    fn impl_index(&self, file: FileId, node: &SyntaxNode) -> Option<usize> {
        let range = node.text_range();
        self.impls
            .iter()
            .position(|i| i.file == file && i.ptr.text_range() == range)
    }

    pub fn root(&self, file: FileId) -> Option<&SyntaxNode> {
        self.roots.get(&file)
    }

    /// Files in id order.
    pub fn files(&self) -> Vec<FileId> {
        let mut files: Vec<FileId> = self.roots.keys().copied().collect();
        files.sort();
        files
    }

    pub fn data(&self, id: DeclId) -> &DeclData {
        &self.decls[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &DeclData)> + '_ {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, d)| (DeclId::new(i as u32), d))
    }

    pub fn node(&self, id: DeclId) -> Option<SyntaxNode> {
        let data = self.data(id);
        Some(data.ptr.to_node(self.roots.get(&data.file)?))
    }

    pub fn struct_def(&self, id: DeclId) -> Option<StructDef> {
        StructDef::cast(self.node(id)?)
    }

    pub fn enum_def(&self, id: DeclId) -> Option<EnumDef> {
        EnumDef::cast(self.node(id)?)
    }

    /// The declaration whose node is exactly `node`.
    pub fn decl_at(&self, file: FileId, node: &SyntaxNode) -> Option<DeclId> {
        let range = node.text_range();
        self.iter()
            .find(|(_, d)| d.file == file && d.ptr.text_range() == range && d.ptr.kind() == node.kind())
            .map(|(id, _)| id)
    }

    /// Generic site of a struct, enum, `impl` or `fn` node.
    pub fn site_of(&self, file: FileId, node: &SyntaxNode) -> Option<GenericSite> {
        self.sites.get(&(file, node.text_range())).copied()
    }

    /// Resolve a type name by its last path segment: a declaration in
    /// `from` wins, otherwise the name must be unique in the workspace.
    pub fn resolve_type_name(&self, name: &str, from: FileId) -> Option<DeclId> {
        let candidates = self.by_name.get(name)?;
        if let Some(&local) = candidates.iter().find(|&&id| self.data(id).file == from) {
            return Some(local);
        }
        match candidates.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// `Name<P1, P2>` instantiated with the declaration's own parameters.
    pub fn identity_type(&self, id: DeclId) -> Type {
        let data = self.data(id);
        let args = data.params.iter().cloned().map(Type::Param).collect();
        Type::nominal(id, args, data.params.clone())
    }

    pub fn variant_index(&self, id: DeclId, name: &str) -> Option<usize> {
        let data = self.data(id);
        if data.kind != DeclKind::Enum {
            return None;
        }
        data.variants.iter().position(|v| v == name)
    }

    pub fn impl_data(&self, index: usize) -> &ImplData {
        &self.impls[index]
    }

    pub fn impl_def(&self, index: usize) -> Option<ImplDef> {
        let data = &self.impls[index];
        ImplDef::cast(data.ptr.to_node(self.roots.get(&data.file)?))
    }

    /// The declaration an `impl` block is for.
    pub fn impl_self_decl(&self, file: FileId, node: &SyntaxNode) -> Option<DeclId> {
        self.impls[self.impl_index(file, node)?].self_decl
    }

    pub fn fn_data(&self, index: usize) -> &FnData {
        &self.fns[index]
    }

    pub fn fn_def(&self, index: usize) -> Option<FnDef> {
        let data = &self.fns[index];
        FnDef::cast(data.ptr.to_node(self.roots.get(&data.file)?))
    }

    /// Functions defined in inherent or trait `impl` blocks of `decl`.
    pub fn methods<'a>(&'a self, decl: DeclId, name: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.fns_by_name
            .get(name)
            .into_iter()
            .flatten()
            .copied()
            .filter(move |&i| match self.fns[i].owner {
                FnOwner::Impl(imp) => self.impls[imp].self_decl == Some(decl),
                FnOwner::Free => false,
            })
    }

    /// A free function by name, preferring one in `from`.
    pub fn free_fn(&self, name: &str, from: FileId) -> Option<usize> {
        let candidates: Vec<usize> = self
            .fns_by_name
            .get(name)?
            .iter()
            .copied()
            .filter(|&i| self.fns[i].owner == FnOwner::Free)
            .collect();
        candidates
            .iter()
            .copied()
            .find(|&i| self.fns[i].file == from)
            .or(match candidates.as_slice() {
                [only] => Some(*only),
                _ => None,
            })
    }
}

impl DeclNames for DeclTable {
    fn decl_name(&self, decl: DeclId) -> Option<&str> {
        self.decls.get(decl.index()).map(|d| d.name.as_str())
    }
}

/// Type parameter names of a generic parameter list, lifetimes and const
/// parameters excluded.
pub fn generic_names(list: Option<&GenericParamList>) -> Vec<String> {
    list.map(|l| {
        l.type_params()
            .filter_map(|p| p.name().and_then(|n| n.text()))
            .collect()
    })
    .unwrap_or_default()
}

/// The item (`impl` or `trait`) whose associated item list directly
/// contains `node`.
pub fn owning_item(node: &SyntaxNode) -> Option<SyntaxNode> {
    let list = node.parent()?;
    if list.kind() != SyntaxKind::ASSOC_ITEM_LIST {
        return None;
    }
    list.parent()
}

fn last_segment_name(ty: &TypeSyntax) -> Option<String> {
    match ty {
        TypeSyntax::Path(p) => p.path()?.last_segment()?.name_ref()?.text(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Workspace;

    #[test]
    fn collects_nested_declarations() {
        let ws = Workspace::new();
        ws.set_file(
            "a.rs",
            "struct A<T> { x: T }\nmod m { pub enum E { One, Two { y: u8 } } }\nfn f() { struct Local; }",
        );
        let snap = ws.snapshot();
        let table = DeclTable::build(&snap);
        let names: Vec<&str> = table.iter().map(|(_, d)| d.name.as_str()).collect();
        assert_eq!(names, ["A", "E", "Local"]);

        let e = table.resolve_type_name("E", FileId(0)).unwrap();
        assert_eq!(table.data(e).variants, ["One", "Two"]);
        assert_eq!(table.variant_index(e, "Two"), Some(1));
        let a = table.resolve_type_name("A", FileId(0)).unwrap();
        assert_eq!(table.data(a).params.len(), 1);
        assert_eq!(table.identity_type(a).display(&table).to_string(), "A<T>");
    }

    #[test]
    fn same_file_declaration_wins() {
        let ws = Workspace::new();
        let a = ws.set_file("a.rs", "struct S { a: i32 }");
        let b = ws.set_file("b.rs", "struct S { b: i32 }\nstruct Only;");
        let snap = ws.snapshot();
        let table = DeclTable::build(&snap);
        let in_a = table.resolve_type_name("S", a).unwrap();
        let in_b = table.resolve_type_name("S", b).unwrap();
        assert_ne!(in_a, in_b);
        assert_eq!(table.data(in_a).file, a);
        // Ambiguous outside both files, unique names resolve anywhere.
        assert_eq!(table.resolve_type_name("S", FileId(9)), None);
        assert!(table.resolve_type_name("Only", a).is_some());
    }

    #[test]
    fn methods_attach_to_impl_self_type() {
        let ws = Workspace::new();
        ws.set_file(
            "a.rs",
            "struct S;\nimpl S { fn get(&self) -> u8 { 0 } }\ntrait T { fn get(&self) -> u8; }\nfn get() {}",
        );
        let snap = ws.snapshot();
        let table = DeclTable::build(&snap);
        let s = table.resolve_type_name("S", FileId(0)).unwrap();
        assert_eq!(table.methods(s, "get").count(), 1);
        let free = table.free_fn("get", FileId(0)).unwrap();
        assert_eq!(table.fn_data(free).owner, FnOwner::Free);
    }
}
