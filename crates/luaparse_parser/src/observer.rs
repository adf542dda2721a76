//! Parse event callbacks.
//!
//! The parser reports each node as it completes, children before parents,
//! along with scope boundaries and local declarations. Identifiers are
//! reported when they are read, before scope resolution marks them local.

use luaparse_ast::NodeRef;

/// Receives parse events. Every method defaults to doing nothing.
pub trait ParseObserver {
    fn on_node_complete(&mut self, _node: NodeRef<'_>) {}

    fn on_scope_created(&mut self) {}

    fn on_scope_destroyed(&mut self) {}

    fn on_local_declared(&mut self, _name: &str) {}
}

/// An observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ParseObserver for NoopObserver {}

type NodeHook<'h> = Box<dyn FnMut(NodeRef<'_>) + 'h>;
type ScopeHook<'h> = Box<dyn FnMut() + 'h>;
type LocalHook<'h> = Box<dyn FnMut(&str) + 'h>;

/// A [`ParseObserver`] built from closures.
///
/// ```ignore
/// let mut count = 0;
/// let mut hooks = Hooks::new().on_node(|_| count += 1);
/// parse_with_observer("x = 1", &options, &mut hooks)?;
/// ```
#[derive(Default)]
pub struct Hooks<'h> {
    node: Option<NodeHook<'h>>,
    scope_created: Option<ScopeHook<'h>>,
    scope_destroyed: Option<ScopeHook<'h>>,
    local_declared: Option<LocalHook<'h>>,
}

impl<'h> Hooks<'h> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_node(mut self, hook: impl FnMut(NodeRef<'_>) + 'h) -> Self {
        self.node = Some(Box::new(hook));
        self
    }

    pub fn on_scope_created(mut self, hook: impl FnMut() + 'h) -> Self {
        self.scope_created = Some(Box::new(hook));
        self
    }

    pub fn on_scope_destroyed(mut self, hook: impl FnMut() + 'h) -> Self {
        self.scope_destroyed = Some(Box::new(hook));
        self
    }

    pub fn on_local(mut self, hook: impl FnMut(&str) + 'h) -> Self {
        self.local_declared = Some(Box::new(hook));
        self
    }
}

impl ParseObserver for Hooks<'_> {
    fn on_node_complete(&mut self, node: NodeRef<'_>) {
        if let Some(hook) = self.node.as_mut() {
            hook(node);
        }
    }

    fn on_scope_created(&mut self) {
        if let Some(hook) = self.scope_created.as_mut() {
            hook();
        }
    }

    fn on_scope_destroyed(&mut self) {
        if let Some(hook) = self.scope_destroyed.as_mut() {
            hook();
        }
    }

    fn on_local_declared(&mut self, name: &str) {
        if let Some(hook) = self.local_declared.as_mut() {
            hook(name);
        }
    }
}
