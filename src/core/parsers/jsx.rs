use swc_common::{BytePos, FileName, Globals, SourceMap, Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, CallExpr, Callee, CatchClause, Constructor, Expr,
    ExprOrSpread, ForInStmt, ForOfStmt, ForStmt, Function, Lit, Module, ObjectPatProp,
    ParamOrTsParamProp, Pat, PropName, TsParamPropParam, VarDeclarator,
};
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};
use tracing::debug;

use crate::core::parsers::tree::{NodeId, NodeKind, PatternProp, ScopeKind, SyntaxTree, TreeBuilder};
use crate::core::{FileKind, SourcePosition, SourceSpan};
use crate::error::ParseError;

fn syntax_for(kind: FileKind) -> Syntax {
    if kind.is_typescript() {
        Syntax::Typescript(TsSyntax {
            tsx: kind == FileKind::Tsx,
            decorators: true,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsSyntax {
            jsx: true,
            decorators: true,
            ..Default::default()
        })
    }
}

/// Parse JS/TS source text into a [`SyntaxTree`].
///
/// Every call owns its own swc `SourceMap`, so parsing is re-entrant and safe
/// to run on many threads at once.
pub fn parse_source(code: &str, file_path: &str, kind: FileKind) -> Result<SyntaxTree, ParseError> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_map = SourceMap::default();
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code.to_string());

        let mut parser = Parser::new(syntax_for(kind), StringInput::from(&*source_file), None);

        let mut lowering = Lowering {
            source_map: &source_map,
            start: source_file.start_pos,
            end: source_file.end_pos,
            builder: TreeBuilder::default(),
        };

        let module = parser.parse_module().map_err(|e| {
            let position = lowering.position(e.span().lo);
            ParseError::new(e.kind().msg().to_string(), position)
        })?;

        lowering.lower_module(&module);
        let tree = lowering.builder.finish();
        debug!(file = file_path, nodes = tree.len(), "parsed source");
        Ok(tree)
    })
}

/// Names bound by a parameter or declaration pattern.
fn binding_names(pat: &Pat) -> Vec<String> {
    match pat {
        Pat::Ident(ident) => vec![ident.id.sym.to_string()],
        Pat::Object(obj) => obj
            .props
            .iter()
            .flat_map(|prop| match prop {
                ObjectPatProp::KeyValue(kv) => binding_names(&kv.value),
                ObjectPatProp::Assign(assign) => vec![assign.key.id.sym.to_string()],
                ObjectPatProp::Rest(rest) => binding_names(&rest.arg),
            })
            .collect(),
        Pat::Array(arr) => arr.elems.iter().flatten().flat_map(binding_names).collect(),
        Pat::Assign(assign) => binding_names(&assign.left),
        Pat::Rest(rest) => binding_names(&rest.arg),
        _ => vec![],
    }
}

/// Identifier bound by a destructured property value (`t` or `t = x`).
fn local_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(ident) => Some(ident.id.sym.to_string()),
        Pat::Assign(assign) => match &*assign.left {
            Pat::Ident(ident) => Some(ident.id.sym.to_string()),
            _ => None,
        },
        _ => None,
    }
}

fn prop_name_text(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(str::to_string),
        _ => None,
    }
}

/// The call an initializer evaluates, looking through `await`, parens and
/// TypeScript assertions.
fn initializer_call(expr: &Expr) -> Option<&CallExpr> {
    match expr {
        Expr::Call(call) => Some(call),
        Expr::Await(await_expr) => initializer_call(&await_expr.arg),
        Expr::Paren(paren) => initializer_call(&paren.expr),
        Expr::TsAs(as_expr) => initializer_call(&as_expr.expr),
        Expr::TsNonNull(non_null) => initializer_call(&non_null.expr),
        _ => None,
    }
}

/// Literal string value of an expression: `"a"`, `'a'` or `` `a` ``.
fn literal_string(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(str::to_string),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() && tpl.quasis.len() == 1 => tpl.quasis[0]
            .cooked
            .as_ref()
            .and_then(|cooked| cooked.as_str())
            .map(str::to_string),
        _ => None,
    }
}

/// Lowers the swc AST into a [`SyntaxTree`].
///
/// Nodes the resolver does not inspect are walked through transparently: their
/// interesting descendants attach to the nearest recorded ancestor.
struct Lowering<'a> {
    source_map: &'a SourceMap,
    start: BytePos,
    end: BytePos,
    builder: TreeBuilder,
}

impl<'a> Lowering<'a> {
    /// Columns count characters, not display width.
    fn position(&self, pos: BytePos) -> SourcePosition {
        let pos = pos.clamp(self.start, self.end);
        let loc = self.source_map.lookup_char_pos(pos);
        SourcePosition::new(loc.line, loc.col.0 + 1)
    }

    fn offset(&self, pos: BytePos) -> usize {
        (pos.clamp(self.start, self.end).0 - self.start.0) as usize
    }

    fn span(&self, span: Span) -> SourceSpan {
        SourceSpan::new(
            self.position(span.lo),
            self.position(span.hi),
            self.offset(span.lo),
            self.offset(span.hi),
        )
    }

    fn lower_module(&mut self, module: &Module) {
        let span = self.span(module.span);
        self.builder.open(
            NodeKind::Scope {
                kind: ScopeKind::Module,
                params: Vec::new(),
            },
            span,
        );
        module.visit_children_with(self);
        self.builder.close();
    }

    fn with_scope<F>(&mut self, kind: ScopeKind, params: Vec<String>, span: Span, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let span = self.span(span);
        self.builder.open(NodeKind::Scope { kind, params }, span);
        f(self);
        self.builder.close();
    }

    /// Lower an expression that must occupy a slot (callee, argument).
    fn lower_expr_slot(&mut self, expr: &Expr) -> NodeId {
        let span = self.span(expr.span());
        if let Expr::Ident(ident) = expr {
            return self.builder.push(NodeKind::Ident(ident.sym.to_string()), span);
        }
        if let Some(value) = literal_string(expr) {
            return self.builder.push(NodeKind::StringLit(value), span);
        }
        let id = self.builder.open(NodeKind::Opaque, span);
        expr.visit_with(self);
        self.builder.close();
        id
    }

    fn lower_arg(&mut self, arg: &ExprOrSpread) -> NodeId {
        if arg.spread.is_some() {
            let span = self.span(arg.span());
            let id = self.builder.open(NodeKind::Opaque, span);
            arg.expr.visit_with(self);
            self.builder.close();
            return id;
        }
        self.lower_expr_slot(&arg.expr)
    }

    /// Lower a declaration target.
    fn lower_pat(&mut self, pat: &Pat) -> NodeId {
        match pat {
            Pat::Ident(ident) => {
                let span = self.span(ident.id.span);
                self.builder
                    .push(NodeKind::Ident(ident.id.sym.to_string()), span)
            }
            Pat::Object(obj) => {
                let props = obj
                    .props
                    .iter()
                    .filter_map(|prop| match prop {
                        ObjectPatProp::KeyValue(kv) => Some(PatternProp {
                            key: prop_name_text(&kv.key)?,
                            local: local_name(&kv.value),
                        }),
                        ObjectPatProp::Assign(assign) => {
                            let name = assign.key.id.sym.to_string();
                            Some(PatternProp {
                                key: name.clone(),
                                local: Some(name),
                            })
                        }
                        ObjectPatProp::Rest(_) => None,
                    })
                    .collect();
                let span = self.span(obj.span);
                self.builder.push(NodeKind::ObjectPattern(props), span)
            }
            _ => {
                let span = self.span(pat.span());
                let id = self.builder.open(NodeKind::Opaque, span);
                pat.visit_children_with(self);
                self.builder.close();
                id
            }
        }
    }
}

impl<'a> Visit for Lowering<'a> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        let span = self.span(node.span);
        let call = self.builder.open(NodeKind::Opaque, span);

        let callee = match &node.callee {
            Callee::Expr(expr) => self.lower_expr_slot(expr),
            _ => self.builder.push(NodeKind::Opaque, span),
        };
        let args = node.args.iter().map(|arg| self.lower_arg(arg)).collect();

        self.builder.close();
        self.builder.set_kind(call, NodeKind::Call { callee, args });
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        let span = self.span(node.span);
        let decl = self.builder.open(NodeKind::Opaque, span);

        let target = self.lower_pat(&node.name);
        let mut init = None;
        if let Some(expr) = &node.init {
            if let Some(call) = initializer_call(expr) {
                init = Some(self.builder.next_id());
                self.visit_call_expr(call);
            } else {
                let span = self.span(expr.span());
                let slot = self.builder.open(NodeKind::Opaque, span);
                expr.visit_with(self);
                self.builder.close();
                self.builder.discard_if_empty(slot);
            }
        }

        self.builder.close();
        self.builder
            .set_kind(decl, NodeKind::VarDecl { target, init });
    }

    fn visit_function(&mut self, node: &Function) {
        let params = node
            .params
            .iter()
            .flat_map(|param| binding_names(&param.pat))
            .collect();
        self.with_scope(ScopeKind::Function, params, node.span, |this| {
            node.decorators.visit_with(this);
            node.params.visit_with(this);
            if let Some(body) = &node.body {
                body.visit_children_with(this);
            }
        });
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        let params = node.params.iter().flat_map(binding_names).collect();
        self.with_scope(ScopeKind::Function, params, node.span, |this| {
            node.params.visit_with(this);
            match &*node.body {
                BlockStmtOrExpr::BlockStmt(block) => block.visit_children_with(this),
                BlockStmtOrExpr::Expr(expr) => expr.visit_with(this),
            }
        });
    }

    fn visit_constructor(&mut self, node: &Constructor) {
        let params = node
            .params
            .iter()
            .flat_map(|param| match param {
                ParamOrTsParamProp::Param(param) => binding_names(&param.pat),
                ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                    TsParamPropParam::Ident(ident) => vec![ident.id.sym.to_string()],
                    TsParamPropParam::Assign(assign) => binding_names(&assign.left),
                },
            })
            .collect();
        self.with_scope(ScopeKind::Function, params, node.span, |this| {
            node.params.visit_with(this);
            if let Some(body) = &node.body {
                body.visit_children_with(this);
            }
        });
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        self.with_scope(ScopeKind::Block, Vec::new(), node.span, |this| {
            node.visit_children_with(this);
        });
    }

    fn visit_for_stmt(&mut self, node: &ForStmt) {
        self.with_scope(ScopeKind::Block, Vec::new(), node.span, |this| {
            node.visit_children_with(this);
        });
    }

    fn visit_for_in_stmt(&mut self, node: &ForInStmt) {
        self.with_scope(ScopeKind::Block, Vec::new(), node.span, |this| {
            node.visit_children_with(this);
        });
    }

    fn visit_for_of_stmt(&mut self, node: &ForOfStmt) {
        self.with_scope(ScopeKind::Block, Vec::new(), node.span, |this| {
            node.visit_children_with(this);
        });
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        let params = node.param.as_ref().map(binding_names).unwrap_or_default();
        self.with_scope(ScopeKind::Block, params, node.span, |this| {
            node.param.visit_with(this);
            node.body.visit_children_with(this);
        });
    }
}
