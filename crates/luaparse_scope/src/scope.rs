//! Scope frames and name resolution.

use indexmap::IndexMap;
use luaparse_ast::{Identifier, ScopeBinding};

/// The bindings introduced by one block, in declaration order.
#[derive(Debug, Default, Clone)]
pub struct ScopeFrame {
    pub bindings: Vec<ScopeBinding>,
}

impl ScopeFrame {
    pub fn new() -> Self {
        Self::default()
    }

    fn binds(&self, name: &str) -> bool {
        self.bindings.iter().any(|b| b.name == name)
    }
}

/// A stack of scope frames plus the set of unresolved names seen so far.
///
/// A disabled tracker accepts every call and records nothing, so the parser
/// can drive it unconditionally.
#[derive(Debug, Default)]
pub struct ScopeTracker {
    enabled: bool,
    frames: Vec<ScopeFrame>,
    /// First unresolved use of each global name.
    globals: IndexMap<String, Identifier>,
}

impl ScopeTracker {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            frames: Vec::new(),
            globals: IndexMap::new(),
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn push_frame(&mut self) {
        if !self.enabled {
            return;
        }
        self.frames.push(ScopeFrame::new());
        log::trace!("scope opened (depth {})", self.frames.len());
    }

    /// Close the innermost frame and return its bindings.
    pub fn pop_frame(&mut self) -> Option<Vec<ScopeBinding>> {
        if !self.enabled {
            return None;
        }
        let frame = self.frames.pop()?;
        log::trace!(
            "scope closed with {} bindings (depth {})",
            frame.bindings.len(),
            self.frames.len()
        );
        Some(frame.bindings)
    }

    /// Bind `ident` in the innermost frame and mark it local.
    pub fn declare(&mut self, ident: &mut Identifier) {
        if !self.enabled {
            return;
        }
        ident.is_local = true;
        if let Some(frame) = self.frames.last_mut() {
            frame.bindings.push(ScopeBinding {
                name: ident.name.clone(),
                node: Some(ident.clone()),
            });
        }
    }

    /// Bind a name that has no declaring node, such as a method's `self`.
    pub fn declare_name(&mut self, name: &str) {
        if !self.enabled {
            return;
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.bindings.push(ScopeBinding {
                name: name.to_string(),
                node: None,
            });
        }
    }

    /// Whether a declaration of `name` is visible from the innermost frame.
    pub fn is_visible(&self, name: &str) -> bool {
        self.frames.iter().rev().any(|frame| frame.binds(name))
    }

    /// Resolve a use of `ident`. Marks it local when a binding is visible,
    /// otherwise records it as a global. Returns whether it resolved.
    pub fn resolve(&mut self, ident: &mut Identifier) -> bool {
        if !self.enabled {
            return false;
        }
        if self.is_visible(&ident.name) {
            ident.is_local = true;
            return true;
        }
        if !self.globals.contains_key(&ident.name) {
            self.globals.insert(ident.name.clone(), ident.clone());
        }
        false
    }

    /// Unresolved names in order of first use.
    pub fn take_globals(&mut self) -> Option<Vec<Identifier>> {
        if !self.enabled {
            return None;
        }
        Some(std::mem::take(&mut self.globals).into_values().collect())
    }
}
