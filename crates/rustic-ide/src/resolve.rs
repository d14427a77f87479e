//! Name and receiver resolution.
//!
//! A small local inference: enough to decide which declaration a path
//! names and what type the receiver of a field access has. It follows
//! `let` bindings, parameters, `self`, struct literals, field chains, calls
//! of functions and methods declared in the workspace, and pattern
//! bindings. Iterator and slice adapters, the `unwrap` family and closures
//! passed straight to them are understood as well. Anything else resolves
//! to `None`.

use rustic_parser::ast::expr::{
    BlockExpr, ClosureExpr, Expr, ForExpr, IfExpr, LetExpr, LetStmt, Literal, MatchArm, MatchExpr,
    MethodCallExpr, WhileExpr,
};
use rustic_parser::ast::item::{ConstItem, FnDef, ParamList, StaticItem};
use rustic_parser::ast::pat::{IdentPat, Pat};
use rustic_parser::ast::{AstNode, Path};
use rustic_parser::{SyntaxKind, SyntaxNode};
use rustic_ty::{infer_substitution, lookup_primitive, substitute, SliceType, Substitution, Type};

use crate::decls::{owning_item, DeclKind, DeclTable};
use crate::lower::{lower_type, Scope};
use crate::shape::{ConvertTarget, StructShape};
use crate::workspace::FileId;

/// Bound on nested inference steps, so pathological chains stay cheap.
const MAX_DEPTH: u32 = 48;

/// Methods returning their receiver's type. With `Option` and `Result`
/// lowered to their success type this covers `o.unwrap()` as well.
const SAME_TYPE_METHODS: &[&str] = &[
    "unwrap",
    "expect",
    "unwrap_or",
    "unwrap_or_else",
    "unwrap_or_default",
    "unwrap_unchecked",
    "as_ref",
    "as_mut",
    "as_deref",
    "as_deref_mut",
    "clone",
    "to_owned",
    "borrow",
    "borrow_mut",
];

/// Slice and iterator methods that yield the same sequence.
const SEQUENCE_METHODS: &[&str] = &[
    "iter",
    "iter_mut",
    "into_iter",
    "as_slice",
    "as_mut_slice",
    "to_vec",
    "filter",
    "rev",
    "skip",
    "take",
    "skip_while",
    "take_while",
    "step_by",
    "cloned",
    "copied",
    "peekable",
    "fuse",
    "by_ref",
    "inspect",
    "chain",
];

/// Slice and iterator methods that yield one element.
const ELEMENT_METHODS: &[&str] = &[
    "first",
    "last",
    "get",
    "get_mut",
    "first_mut",
    "last_mut",
    "next",
    "next_back",
    "nth",
    "find",
    "max",
    "min",
    "max_by",
    "min_by",
    "max_by_key",
    "min_by_key",
    "pop",
    "remove",
    "swap_remove",
];

/// Sequence methods whose closure gets one element as its first argument.
const ELEMENT_CLOSURE_METHODS: &[&str] = &[
    "map",
    "for_each",
    "try_for_each",
    "filter",
    "filter_map",
    "flat_map",
    "map_while",
    "any",
    "all",
    "find",
    "find_map",
    "position",
    "rposition",
    "inspect",
    "take_while",
    "skip_while",
    "partition",
    "max_by_key",
    "min_by_key",
    "sort_by_key",
    "sort_unstable_by_key",
    "sort_by_cached_key",
    "retain",
    "retain_mut",
];

/// Sequence methods whose closure compares two elements.
const PAIR_CLOSURE_METHODS: &[&str] = &[
    "sort_by",
    "sort_unstable_by",
    "max_by",
    "min_by",
    "dedup_by",
];

/// `Option`/`Result` methods whose closure gets the success value.
const VALUE_CLOSURE_METHODS: &[&str] = &["map", "and_then", "filter", "is_some_and", "is_ok_and", "inspect"];

/// What a path names.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PathResolution {
    Decl(rustic_ty::DeclId),
    Variant { parent: rustic_ty::DeclId, index: usize },
}

impl PathResolution {
    pub fn as_target(self) -> ConvertTarget {
        match self {
            PathResolution::Decl(id) => ConvertTarget::Struct(id),
            PathResolution::Variant { parent, index } => ConvertTarget::Variant { parent, index },
        }
    }
}

/// A field selector: `.name` or `.0`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldKey<'a> {
    Named(&'a str),
    Index(usize),
}

pub struct Resolver<'a> {
    decls: &'a DeclTable,
    file: FileId,
}

impl<'a> Resolver<'a> {
    pub fn new(decls: &'a DeclTable, file: FileId) -> Self {
        Resolver { decls, file }
    }

    // ── Paths ──────────────────────────────────────────────────────────

    /// Resolve a whole path.
    pub fn resolve_path(&self, path: &Path) -> Option<PathResolution> {
        let segments = segment_texts(path);
        self.resolve_segments(&segments, path.syntax())
    }

    /// Resolve the path made of the first `len` segments of `path`.
    pub fn resolve_path_prefix(&self, path: &Path, len: usize) -> Option<PathResolution> {
        let segments = segment_texts(path);
        self.resolve_segments(segments.get(..len)?, path.syntax())
    }

    /// `Name`, `module::Name`, `Enum::Variant`, `Self` and `Self::Variant`.
    pub fn resolve_segments(&self, segments: &[String], at: &SyntaxNode) -> Option<PathResolution> {
        let (last, prefix) = segments.split_last()?;
        if let Some(parent) = prefix.last() {
            let parent_decl = if parent == "Self" {
                self.self_decl(at)
            } else {
                self.decls.resolve_type_name(parent, self.file)
            };
            if let Some(parent_decl) = parent_decl {
                // `Enum::Variant`; `Struct::assoc` names no type.
                let index = self.decls.variant_index(parent_decl, last)?;
                return Some(PathResolution::Variant {
                    parent: parent_decl,
                    index,
                });
            }
            if parent == "Self" {
                return None;
            }
        }
        if last == "Self" {
            return prefix.is_empty().then(|| self.self_decl(at)).flatten().map(PathResolution::Decl);
        }
        self.decls
            .resolve_type_name(last, self.file)
            .map(PathResolution::Decl)
    }

    /// The declaration `Self` stands for at `at`.
    pub fn self_decl(&self, at: &SyntaxNode) -> Option<rustic_ty::DeclId> {
        for anc in at.ancestors() {
            match anc.kind() {
                SyntaxKind::IMPL_DEF => return self.decls.impl_self_decl(self.file, &anc),
                SyntaxKind::STRUCT_DEF | SyntaxKind::ENUM_DEF => {
                    return self.decls.decl_at(self.file, &anc)
                }
                SyntaxKind::TRAIT_DEF => return None,
                _ => {}
            }
        }
        None
    }

    // ── Fields ─────────────────────────────────────────────────────────

    /// Declared type of a field of `owner`, specialised to `owner`'s
    /// type arguments.
    pub fn field_type(&self, owner: &Type, field: FieldKey<'_>) -> Option<Type> {
        let Type::Nominal(nominal) = owner else {
            return None;
        };
        if self.decls.data(nominal.decl).kind != DeclKind::Struct {
            return None;
        }
        let shape = StructShape::of_target(self.decls, ConvertTarget::Struct(nominal.decl))?;
        let declared = match field {
            FieldKey::Named(name) => shape
                .fields
                .iter()
                .find(|f| f.name.as_deref() == Some(name))?
                .ty
                .clone()?,
            FieldKey::Index(i) => {
                let f = shape.fields.get(i)?;
                if f.name.is_some() {
                    return None;
                }
                f.ty.clone()?
            }
        };
        Some(substitute(&declared, &Substitution::for_instantiation(nominal)))
    }

    /// Field types of the struct or variant a pattern path names,
    /// specialised through `scrutinee` when it is an instantiation of the
    /// same declaration.
    fn pattern_fields(
        &self,
        resolution: PathResolution,
        scrutinee: Option<&Type>,
    ) -> Option<Vec<(Option<String>, Option<Type>)>> {
        let shape = StructShape::of_target(self.decls, resolution.as_target())?;
        let owner = match resolution {
            PathResolution::Decl(id) | PathResolution::Variant { parent: id, .. } => id,
        };
        let subst = match scrutinee {
            Some(Type::Nominal(n)) if n.decl == owner => Substitution::for_instantiation(n),
            _ => Substitution::new(),
        };
        Some(
            shape
                .fields
                .into_iter()
                .map(|f| (f.name, f.ty.map(|t| substitute(&t, &subst))))
                .collect(),
        )
    }

    // ── Expressions ────────────────────────────────────────────────────

    /// Type of an expression, if the local inference can see it.
    pub fn type_of_expr(&self, expr: &Expr) -> Option<Type> {
        self.expr_ty(expr, 0)
    }

    fn expr_ty(&self, expr: &Expr, depth: u32) -> Option<Type> {
        if depth > MAX_DEPTH {
            tracing::debug!("receiver inference depth limit");
            return None;
        }
        let depth = depth + 1;
        match expr {
            Expr::Path(p) => {
                let path = p.path()?;
                let segments = segment_texts(&path);
                match segments.as_slice() {
                    [name] if name != "Self" => self.local_ty(name, p.syntax(), depth),
                    _ => None,
                }
            }
            Expr::Record(r) => self.constructed_type(self.resolve_path(&r.path()?)?),
            Expr::Field(f) => {
                let receiver = self.expr_ty(&f.receiver()?, depth)?;
                let name_ref = f.name_ref()?;
                let text = name_ref.text()?;
                let key = if name_ref.is_index() {
                    FieldKey::Index(text.parse().ok()?)
                } else {
                    FieldKey::Named(&text)
                };
                self.field_type(&receiver, key)
            }
            Expr::MethodCall(m) => {
                let receiver = self.expr_ty(&m.receiver()?, depth)?;
                let name = m.name_ref()?.text()?;
                self.method_return(&receiver, &name)
            }
            Expr::Call(c) => self.call_ty(c.callee()?, depth),
            Expr::Paren(p) => self.expr_ty(&p.expr()?, depth),
            Expr::Ref(r) => self.expr_ty(&r.expr()?, depth),
            Expr::Prefix(p) if p.is_deref() => self.expr_ty(&p.expr()?, depth),
            Expr::Index(i) => match self.expr_ty(&i.base()?, depth)? {
                // `v[a..b]` is still a slice.
                slice @ Type::Slice(_) if matches!(i.index(), Some(Expr::Range(_))) => Some(slice),
                Type::Slice(s) => Some(*s.element),
                _ => None,
            },
            Expr::Block(b) => self.expr_ty(&b.tail_expr()?, depth),
            Expr::If(i) => self.expr_ty(&i.then_branch()?.tail_expr()?, depth),
            Expr::Match(m) => m.arms().find_map(|arm| self.expr_ty(&arm.body()?, depth)),
            Expr::Cast(c) => {
                let scope = Scope::for_node(self.decls, self.file, c.syntax());
                lower_type(self.decls, &c.ty()?, &scope)
            }
            Expr::Array(a) => Some(Type::slice(self.expr_ty(&a.exprs().next()?, depth)?)),
            Expr::Literal(l) => literal_ty(l),
            _ => None,
        }
    }

    /// The type a struct literal or a tuple-like constructor produces.
    fn constructed_type(&self, resolution: PathResolution) -> Option<Type> {
        match resolution {
            PathResolution::Decl(id) | PathResolution::Variant { parent: id, .. } => {
                Some(self.decls.identity_type(id))
            }
        }
    }

    fn call_ty(&self, callee: Expr, depth: u32) -> Option<Type> {
        let Expr::Path(p) = callee else {
            return self.expr_ty(&callee, depth);
        };
        let path = p.path()?;
        let segments = segment_texts(&path);
        let (last, prefix) = segments.split_last()?;
        if prefix.is_empty() {
            if let Some(resolution) = self.resolve_segments(&segments, p.syntax()) {
                // Tuple struct constructor.
                return self.constructed_type(resolution);
            }
            let index = self.decls.free_fn(last, self.file)?;
            return self.fn_return(index, &Substitution::new());
        }
        if let Some(resolution @ PathResolution::Variant { .. }) =
            self.resolve_segments(&segments, p.syntax())
        {
            return self.constructed_type(resolution);
        }
        let owner = match prefix.last().map(String::as_str) {
            Some("Self") => self.self_decl(p.syntax())?,
            Some(parent) => self.decls.resolve_type_name(parent, self.file)?,
            None => return None,
        };
        let index = self.decls.methods(owner, last).next()?;
        self.fn_return(index, &Substitution::new())
    }

    fn method_return(&self, receiver: &Type, name: &str) -> Option<Type> {
        if let Type::Slice(slice) = receiver {
            return sequence_method(slice, name);
        }
        if let Some(decl) = receiver.as_decl() {
            let mut declared = false;
            for index in self.decls.methods(decl, name) {
                declared = true;
                let Some(def) = self.decls.fn_def(index) else {
                    continue;
                };
                let data = self.decls.fn_data(index);
                let scope = Scope::for_node(self.decls, data.file, def.syntax());
                let subst = scope
                    .self_ty()
                    .and_then(|self_ty| infer_substitution(self_ty, receiver))
                    .unwrap_or_default();
                if let Some(ty) = self.fn_return(index, &subst) {
                    return Some(ty);
                }
            }
            // A workspace method shadows the standard one.
            if declared {
                return None;
            }
        }
        SAME_TYPE_METHODS.contains(&name).then(|| receiver.clone())
    }

    /// Type of parameter `index` of an unannotated closure passed straight
    /// to a method of a sequence or of an `Option`/`Result` value.
    fn closure_param_ty(&self, closure: &ClosureExpr, index: usize, depth: u32) -> Option<Type> {
        let call = MethodCallExpr::cast(closure.syntax().parent()?.parent()?)?;
        let method = call.name_ref()?.text()?;
        let method = method.as_str();
        match self.expr_ty(&call.receiver()?, depth)? {
            Type::Slice(slice) => {
                let element = *slice.element;
                match method {
                    "fold" | "try_fold" | "rfold" => (index == 1).then_some(element),
                    _ if PAIR_CLOSURE_METHODS.contains(&method) => Some(element),
                    _ if ELEMENT_CLOSURE_METHODS.contains(&method) => {
                        (index == 0).then_some(element)
                    }
                    _ => None,
                }
            }
            value => {
                if !VALUE_CLOSURE_METHODS.contains(&method) || index != 0 {
                    return None;
                }
                if let Some(decl) = value.as_decl() {
                    if self.decls.methods(decl, method).next().is_some() {
                        return None;
                    }
                }
                Some(value)
            }
        }
    }

    fn fn_return(&self, index: usize, subst: &Substitution) -> Option<Type> {
        let def = self.decls.fn_def(index)?;
        let data = self.decls.fn_data(index);
        let scope = Scope::for_node(self.decls, data.file, def.syntax());
        let ret = lower_type(self.decls, &def.ret_type()?.ty()?, &scope)?;
        Some(substitute(&ret, subst))
    }

    // ── Locals ─────────────────────────────────────────────────────────

    /// Type of the local variable `name` as visible at `at`.
    pub fn type_of_local(&self, name: &str, at: &SyntaxNode) -> Option<Type> {
        self.local_ty(name, at, 0)
    }

    fn local_ty(&self, name: &str, at: &SyntaxNode, depth: u32) -> Option<Type> {
        let mut child = at.clone();
        for anc in at.ancestors().skip(1) {
            if let Some(found) = self.binding_in(&anc, &child, name, depth) {
                return found;
            }
            if anc.kind() == SyntaxKind::FN_DEF {
                break;
            }
            child = anc;
        }
        self.item_ty(name)
    }

    /// Look for a binding of `name` introduced by `anc` and visible inside
    /// its child `child`. `Some(None)` means the name is bound there but
    /// its type is unknown, which shadows any outer binding.
    fn binding_in(
        &self,
        anc: &SyntaxNode,
        child: &SyntaxNode,
        name: &str,
        depth: u32,
    ) -> Option<Option<Type>> {
        let child_start = child.text_range().start();
        match anc.kind() {
            SyntaxKind::BLOCK_EXPR => {
                let block = BlockExpr::cast(anc.clone())?;
                let lets: Vec<_> = block
                    .syntax()
                    .children()
                    .filter(|n| n.text_range().end() <= child_start)
                    .filter_map(LetStmt::cast)
                    .collect();
                for stmt in lets.iter().rev() {
                    let Some(pat) = stmt.pat() else { continue };
                    let ty = || match stmt.ty() {
                        Some(annotation) => {
                            let scope = Scope::for_node(self.decls, self.file, stmt.syntax());
                            lower_type(self.decls, &annotation, &scope)
                        }
                        None => self.expr_ty(&stmt.initializer()?, depth),
                    };
                    if let Some(found) = self.bind_pat(&pat, name, &ty, depth) {
                        return Some(found);
                    }
                }
                None
            }
            SyntaxKind::MATCH_ARM => {
                let arm = MatchArm::cast(anc.clone())?;
                let pat = arm.pat()?;
                if pat.syntax() == child {
                    return None;
                }
                let scrutinee = || {
                    let list = anc.parent()?;
                    let m = MatchExpr::cast(list.parent()?)?;
                    self.expr_ty(&m.scrutinee()?, depth)
                };
                self.bind_pat(&pat, name, &scrutinee, depth)
            }
            SyntaxKind::IF_EXPR | SyntaxKind::WHILE_EXPR => {
                // Bindings of `if let` / `while let` are visible in the body,
                // not in the condition or the `else` branch.
                let (condition, body) = match IfExpr::cast(anc.clone()) {
                    Some(if_expr) => (if_expr.condition()?, if_expr.then_branch()?),
                    None => {
                        let while_expr = WhileExpr::cast(anc.clone())?;
                        (while_expr.condition()?, while_expr.body()?)
                    }
                };
                if body.syntax() != child {
                    return None;
                }
                let lets: Vec<_> = condition
                    .syntax()
                    .descendants()
                    .filter_map(LetExpr::cast)
                    .collect();
                lets.iter().rev().find_map(|let_expr| {
                    let pat = let_expr.pat()?;
                    let value = || self.expr_ty(&let_expr.expr()?, depth);
                    self.bind_pat(&pat, name, &value, depth)
                })
            }
            SyntaxKind::FOR_EXPR => {
                let for_expr = ForExpr::cast(anc.clone())?;
                if for_expr.body()?.syntax() != child {
                    return None;
                }
                let element = || match self.expr_ty(&for_expr.iterable()?, depth)? {
                    Type::Slice(s) => Some(*s.element),
                    _ => None,
                };
                self.bind_pat(&for_expr.pat()?, name, &element, depth)
            }
            SyntaxKind::CLOSURE_EXPR => {
                let closure = ClosureExpr::cast(anc.clone())?;
                let params = closure.param_list()?;
                let found = params.params().enumerate().find_map(|(i, param)| {
                    let pat = param.pat()?;
                    let ty = || match param.ty() {
                        Some(annotation) => {
                            let scope = Scope::for_node(self.decls, self.file, param.syntax());
                            lower_type(self.decls, &annotation, &scope)
                        }
                        None => self.closure_param_ty(&closure, i, depth),
                    };
                    self.bind_pat(&pat, name, &ty, depth)
                });
                found
            }
            SyntaxKind::FN_DEF => {
                let def = FnDef::cast(anc.clone())?;
                let params = def.param_list()?;
                if name == "self" {
                    let self_param = params.self_param()?;
                    let scope = Scope::for_node(self.decls, self.file, anc);
                    return Some(match self_param.ty() {
                        Some(ty) => lower_type(self.decls, &ty, &scope),
                        None => scope.self_ty().cloned(),
                    });
                }
                self.bind_params(&params, name, depth)
            }
            _ => None,
        }
    }

    fn bind_params(&self, params: &ParamList, name: &str, depth: u32) -> Option<Option<Type>> {
        params.params().find_map(|param| {
            let pat = param.pat()?;
            let ty = || {
                let scope = Scope::for_node(self.decls, self.file, param.syntax());
                lower_type(self.decls, &param.ty()?, &scope)
            };
            self.bind_pat(&pat, name, &ty, depth)
        })
    }

    /// If `pat` binds `name`, the type of that binding given that the
    /// whole pattern matches a value of type `ty()`.
    fn bind_pat(
        &self,
        pat: &Pat,
        name: &str,
        ty: &dyn Fn() -> Option<Type>,
        depth: u32,
    ) -> Option<Option<Type>> {
        if !binds(pat, name) {
            return None;
        }
        Some(self.binding_ty(pat, name, ty(), depth))
    }

    fn binding_ty(&self, pat: &Pat, name: &str, ty: Option<Type>, depth: u32) -> Option<Type> {
        match pat {
            Pat::Ident(ident) => {
                if ident.name()?.text()? == name {
                    return ty;
                }
                self.binding_ty(&ident.subpattern()?, name, ty, depth)
            }
            Pat::Ref(r) => self.binding_ty(&r.pat()?, name, ty, depth),
            Pat::Paren(p) => self.binding_ty(&p.pat()?, name, ty, depth),
            Pat::Or(or) => {
                let first = or.pats().find(|p| binds(p, name))?;
                self.binding_ty(&first, name, ty, depth)
            }
            Pat::Slice(slice) => {
                let element = match ty? {
                    Type::Slice(s) => *s.element,
                    _ => return None,
                };
                let sub = slice.pats().find(|p| binds(p, name))?;
                self.binding_ty(&sub, name, Some(element), depth)
            }
            Pat::Record(record) => {
                let resolution = self.resolve_path(&record.path()?)?;
                let fields = self.pattern_fields(resolution, ty.as_ref())?;
                for field in record.field_list()?.fields() {
                    let Some(sub) = field.pat() else { continue };
                    if !binds(&sub, name) {
                        continue;
                    }
                    let field_name = field.field_name()?;
                    let field_ty = fields
                        .iter()
                        .find(|(n, _)| n.as_deref() == Some(field_name.as_str()))
                        .and_then(|(_, t)| t.clone());
                    return self.binding_ty(&sub, name, field_ty, depth);
                }
                None
            }
            Pat::TupleStruct(tuple) => {
                let path = tuple.path()?;
                let Some(resolution) = self.resolve_path(&path) else {
                    // `Some(x)` and `Ok(x)` see the success type.
                    if !matches!(segment_texts(&path).as_slice(), [w] if w == "Some" || w == "Ok") {
                        return None;
                    }
                    let sub = tuple.fields().find(|p| binds(p, name))?;
                    return self.binding_ty(&sub, name, ty, depth);
                };
                let fields = self.pattern_fields(resolution, ty.as_ref())?;
                let subs: Vec<Pat> = tuple.fields().collect();
                let rest = subs.iter().position(|p| matches!(p, Pat::Rest(_)));
                for (i, sub) in subs.iter().enumerate() {
                    if !binds(sub, name) {
                        continue;
                    }
                    let index = match rest {
                        Some(r) if i > r => fields.len().checked_sub(subs.len() - i)?,
                        _ => i,
                    };
                    let field_ty = fields.get(index).and_then(|(_, t)| t.clone());
                    return self.binding_ty(sub, name, field_ty, depth);
                }
                None
            }
            Pat::Tuple(tuple) => {
                let sub = tuple.fields().find(|p| binds(p, name))?;
                self.binding_ty(&sub, name, None, depth)
            }
            _ => None,
        }
    }

    /// Module-level `const` and `static` items of the current file.
    fn item_ty(&self, name: &str) -> Option<Type> {
        let root = self.decls.root(self.file)?;
        for node in root.descendants() {
            let (item_name, ty) = if let Some(c) = ConstItem::cast(node.clone()) {
                (c.name(), c.ty())
            } else if let Some(s) = StaticItem::cast(node.clone()) {
                (s.name(), s.ty())
            } else {
                continue;
            };
            if item_name.and_then(|n| n.text()).as_deref() != Some(name) {
                continue;
            }
            if owning_item(&node).is_some_and(|item| item.kind() == SyntaxKind::TRAIT_DEF) {
                continue;
            }
            let scope = Scope::for_node(self.decls, self.file, &node);
            return lower_type(self.decls, &ty?, &scope);
        }
        None
    }
}

fn sequence_method(slice: &SliceType, name: &str) -> Option<Type> {
    if SEQUENCE_METHODS.contains(&name) || SAME_TYPE_METHODS.contains(&name) {
        Some(Type::Slice(slice.clone()))
    } else if ELEMENT_METHODS.contains(&name) {
        Some((*slice.element).clone())
    } else {
        None
    }
}

/// Whether `pat` introduces a binding called `name`.
pub fn binds(pat: &Pat, name: &str) -> bool {
    pat.syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::IDENT_PAT)
        .filter_map(|n| IdentPat::cast(n)?.name()?.text())
        .any(|n| n == name)
}

/// Segment texts of a path; qualified segments (`<T as Tr>`) read as `_`.
fn segment_texts(path: &Path) -> Vec<String> {
    path.segments()
        .map(|s| {
            s.name_ref()
                .and_then(|n| n.text())
                .unwrap_or_else(|| "_".to_string())
        })
        .collect()
}

fn literal_ty(literal: &Literal) -> Option<Type> {
    let token = literal.token()?;
    match token.kind() {
        SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW => Some(lookup_primitive("bool")?.into()),
        SyntaxKind::CHAR_LITERAL => Some(lookup_primitive("char")?.into()),
        SyntaxKind::STRING_LITERAL => Some(lookup_primitive("str")?.into()),
        SyntaxKind::INT_LITERAL | SyntaxKind::FLOAT_LITERAL => {
            let text = token.text();
            // Only suffixed literals have a fixed type.
            let suffix_start = text.find(|c: char| c == 'i' || c == 'u' || c == 'f')?;
            if text.starts_with("0x") || text.starts_with("0b") || text.starts_with("0o") {
                return None;
            }
            Some(lookup_primitive(&text[suffix_start..])?.into())
        }
        _ => None,
    }
}
