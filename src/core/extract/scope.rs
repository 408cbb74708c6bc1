//! Attribution of accessor calls to namespace bindings.
//!
//! A call `t("x")` belongs to the binding found by walking the scopes that
//! enclose the call, innermost first. The first scope declaring `t` decides:
//! a hook binding there claims the call, while a parameter or an ordinary
//! variable named `t` shadows every outer binding. Within that scope the
//! latest declaration before the call wins; a call preceding all of them
//! goes to the first one.

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::core::extract::{NamespaceBinding, is_hook_declaration};
use crate::core::parsers::{NodeId, NodeKind, SyntaxTree};
use crate::core::{SourcePosition, SourceSpan};

/// One accessor call with a literal first argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyUse {
    pub suffix_key: String,
    /// Position right after the closing quote of the literal.
    pub position: SourcePosition,
    /// Span of the literal, quotes included.
    pub span: SourceSpan,
    /// Index into the binding list the use was attributed to.
    pub binding: usize,
}

#[derive(Debug, Clone, Copy)]
enum Declared {
    Hook(usize),
    Shadow,
}

/// Declarations per `(scope, name)`, in source order.
struct ScopeIndex<'a> {
    decls: HashMap<(NodeId, &'a str), Vec<(NodeId, Declared)>>,
}

impl<'a> ScopeIndex<'a> {
    fn build(tree: &'a SyntaxTree, bindings: &'a [NamespaceBinding], config: &EngineConfig) -> Self {
        let mut decls: HashMap<(NodeId, &'a str), Vec<(NodeId, Declared)>> = HashMap::new();

        for id in tree.ids() {
            match tree.kind(id) {
                NodeKind::Scope { params, .. } => {
                    for param in params {
                        decls
                            .entry((id, param.as_str()))
                            .or_default()
                            .push((id, Declared::Shadow));
                    }
                }
                NodeKind::VarDecl { target, .. } if !is_hook_declaration(tree, id, config) => {
                    let scope = tree.enclosing_scope(id);
                    for name in declared_names(tree, *target) {
                        decls.entry((scope, name)).or_default().push((id, Declared::Shadow));
                    }
                }
                _ => {}
            }
        }

        for (index, binding) in bindings.iter().enumerate() {
            decls
                .entry((binding.scope, binding.accessor_name.as_str()))
                .or_default()
                .push((binding.declaration, Declared::Hook(index)));
        }

        for list in decls.values_mut() {
            list.sort_by_key(|(id, _)| *id);
        }

        Self { decls }
    }

    /// The binding claiming a call of `name` at `call`, if any.
    fn attribute(&self, tree: &SyntaxTree, call: NodeId, name: &str) -> Option<usize> {
        for scope in tree.enclosing_scopes(call) {
            let Some(list) = self.decls.get(&(scope, name)) else {
                continue;
            };
            let chosen = list
                .iter()
                .rev()
                .find(|(id, _)| *id < call)
                .or_else(|| list.first())?;
            return match chosen.1 {
                Declared::Hook(index) => Some(index),
                Declared::Shadow => None,
            };
        }
        None
    }
}

fn declared_names(tree: &SyntaxTree, target: NodeId) -> Vec<&str> {
    match tree.kind(target) {
        NodeKind::Ident(name) => vec![name.as_str()],
        NodeKind::ObjectPattern(props) => props.iter().filter_map(|p| p.local.as_deref()).collect(),
        _ => vec![],
    }
}

/// Collect the key uses of every binding.
///
/// Each call is attributed to at most one binding. Uses are ordered by
/// binding, then by position.
pub fn collect_key_uses(
    tree: &SyntaxTree,
    bindings: &[NamespaceBinding],
    config: &EngineConfig,
) -> Vec<KeyUse> {
    if bindings.is_empty() {
        return Vec::new();
    }

    let index = ScopeIndex::build(tree, bindings, config);
    let mut uses = Vec::new();

    for id in tree.ids() {
        let NodeKind::Call { callee, args } = tree.kind(id) else {
            continue;
        };
        let Some(name) = tree.ident_name(*callee) else {
            continue;
        };
        if !bindings.iter().any(|b| b.accessor_name == name) {
            continue;
        }
        let Some(arg) = args.first() else {
            continue;
        };
        let Some(suffix_key) = tree.string_value(*arg) else {
            continue;
        };
        let Some(binding) = index.attribute(tree, id, name) else {
            continue;
        };

        let span = tree.node(*arg).span;
        uses.push(KeyUse {
            suffix_key: suffix_key.to_string(),
            position: span.end,
            span,
            binding,
        });
    }

    uses.sort_by_key(|u| u.binding);
    uses
}
