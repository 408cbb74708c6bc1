//! Namespace-hook binding discovery.
//!
//! A binding is a declaration like
//!
//! ```text
//! const t = useI18n("home");
//! const { t: translate } = useTranslation("auth");
//! const t = await getTranslations("settings");
//! ```
//!
//! It ties an accessor name (`t`, `translate`) to a key prefix (`home`, ...)
//! within the scope the declaration lives in.

use crate::config::EngineConfig;
use crate::core::SourcePosition;
use crate::core::parsers::{NodeId, NodeKind, SyntaxTree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceBinding {
    /// First argument of the hook call, or empty when it is absent or not a
    /// string literal.
    pub prefix_key: String,
    pub accessor_name: String,
    /// Start of the declaration.
    pub declaration_site: SourcePosition,
    /// The declaration node. Orders bindings within a scope.
    pub declaration: NodeId,
    /// Nearest block, function or module scope around the declaration.
    pub scope: NodeId,
}

/// Find every namespace-hook binding in `tree`, in source order.
pub fn find_bindings(tree: &SyntaxTree, config: &EngineConfig) -> Vec<NamespaceBinding> {
    tree.ids()
        .filter_map(|id| binding_at(tree, id, config))
        .collect()
}

fn binding_at(tree: &SyntaxTree, id: NodeId, config: &EngineConfig) -> Option<NamespaceBinding> {
    let NodeKind::VarDecl {
        target,
        init: Some(init),
    } = tree.kind(id)
    else {
        return None;
    };
    let NodeKind::Call { callee, args } = tree.kind(*init) else {
        return None;
    };

    let hook = tree.ident_name(*callee)?;
    if !config.is_hook(hook) {
        return None;
    }

    let accessor_name = match tree.kind(*target) {
        NodeKind::Ident(name) => name.clone(),
        NodeKind::ObjectPattern(props) => props
            .iter()
            .find(|prop| config.is_accessor_key(&prop.key))
            .and_then(|prop| prop.local.clone())?,
        _ => return None,
    };

    let prefix_key = args
        .first()
        .and_then(|arg| tree.string_value(*arg))
        .unwrap_or_default()
        .to_string();

    Some(NamespaceBinding {
        prefix_key,
        accessor_name,
        declaration_site: tree.node(id).span.start,
        declaration: id,
        scope: tree.enclosing_scope(id),
    })
}

/// Whether the declaration at `id` is a hook binding under `config`.
pub fn is_hook_declaration(tree: &SyntaxTree, id: NodeId, config: &EngineConfig) -> bool {
    let NodeKind::VarDecl { init: Some(init), .. } = tree.kind(id) else {
        return false;
    };
    matches!(
        tree.kind(*init),
        NodeKind::Call { callee, .. } if tree.ident_name(*callee).is_some_and(|name| config.is_hook(name))
    )
}
