//! Control-flow validation: `break` placement, label uniqueness and goto
//! resolution.
//!
//! Each function body gets its own [`FlowContext`]; labels and loops never
//! cross a function boundary. A goto that does not resolve immediately is
//! kept pending until a matching label appears in an enclosing block or the
//! goto's block chain closes without one. Whether an unmatched goto is an
//! error is a per-context switch.

use luaparse_diagnostics::{messages, DiagnosticMessage};
use luaparse_lexer::Token;
use rustc_hash::FxHashMap;

/// A rule violation, reported against `token`.
#[derive(Debug)]
pub(crate) struct FlowViolation {
    pub message: &'static DiagnosticMessage,
    pub args: Vec<String>,
    pub token: Token,
}

impl FlowViolation {
    fn new(message: &'static DiagnosticMessage, args: Vec<String>, token: Token) -> Self {
        Self {
            message,
            args,
            token,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct LabelInfo {
    line: u32,
}

#[derive(Debug, Clone)]
struct PendingGoto {
    /// Number of enclosing blocks the goto may still resolve in.
    max_depth: usize,
    target: String,
    token: Token,
    /// Locals declared in each enclosing block when the goto was seen.
    local_counts: Vec<usize>,
}

#[derive(Debug, Default)]
struct FlowScope {
    labels: FxHashMap<String, LabelInfo>,
    locals: Vec<String>,
    /// Gotos resolved by a later label of this block but jumping over a
    /// local. Raised if another statement follows the label.
    deferred_gotos: Vec<PendingGoto>,
    is_loop: bool,
}

#[derive(Debug)]
pub(crate) struct FlowContext {
    track_labels: bool,
    /// Whether a goto with no visible label is an error.
    check_targets: bool,
    /// Whether `...` may appear in the current function.
    pub allow_vararg: bool,
    scopes: Vec<FlowScope>,
    pending_gotos: Vec<PendingGoto>,
}

type FlowResult = Result<(), FlowViolation>;

impl FlowContext {
    pub fn new(track_labels: bool, allow_vararg: bool) -> Self {
        Self {
            track_labels,
            check_targets: false,
            allow_vararg,
            scopes: Vec::new(),
            pending_gotos: Vec::new(),
        }
    }

    pub fn with_target_checks(mut self, enabled: bool) -> Self {
        self.check_targets = enabled;
        self
    }

    pub fn push_scope(&mut self, is_loop: bool) {
        self.scopes.push(FlowScope {
            is_loop,
            ..FlowScope::default()
        });
    }

    pub fn pop_scope(&mut self) -> FlowResult {
        let depth = self.scopes.len();
        for pending in &mut self.pending_gotos {
            if pending.max_depth >= depth {
                pending.max_depth -= 1;
            }
        }
        if let Some(unmatched) = self.pending_gotos.iter().find(|p| p.max_depth == 0) {
            if self.check_targets {
                return Err(FlowViolation::new(
                    &messages::LABEL_NOT_VISIBLE,
                    vec![unmatched.target.clone()],
                    unmatched.token.clone(),
                ));
            }
            self.pending_gotos.retain(|p| p.max_depth > 0);
        }
        self.scopes.pop();
        Ok(())
    }

    pub fn is_in_loop(&self) -> bool {
        self.scopes.iter().any(|scope| scope.is_loop)
    }

    /// Record `goto target`. Resolves at once when an enclosing block
    /// already defines the label.
    pub fn add_goto(&mut self, target: &str, token: &Token) {
        if !self.track_labels {
            return;
        }
        let mut local_counts = Vec::with_capacity(self.scopes.len());
        for scope in &self.scopes {
            local_counts.push(scope.locals.len());
            if scope.labels.contains_key(target) {
                return;
            }
        }
        self.pending_gotos.push(PendingGoto {
            max_depth: self.scopes.len(),
            target: target.to_string(),
            token: token.clone(),
            local_counts,
        });
    }

    pub fn add_label(&mut self, name: &str, token: &Token) -> FlowResult {
        if !self.track_labels {
            return Ok(());
        }
        let depth = self.scopes.len();
        let Some(scope) = self.scopes.last_mut() else {
            return Ok(());
        };
        if let Some(existing) = scope.labels.get(name) {
            return Err(FlowViolation::new(
                &messages::LABEL_ALREADY_DEFINED,
                vec![name.to_string(), existing.line.to_string()],
                token.clone(),
            ));
        }
        let pending = std::mem::take(&mut self.pending_gotos);
        for goto in pending {
            if goto.max_depth >= depth && goto.target == name {
                if goto.local_counts[depth - 1] < scope.locals.len() {
                    scope.deferred_gotos.push(goto);
                }
                continue;
            }
            self.pending_gotos.push(goto);
        }
        scope.labels.insert(name.to_string(), LabelInfo { line: token.line });
        Ok(())
    }

    pub fn add_local(&mut self, name: &str) {
        if !self.track_labels {
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.locals.push(name.to_string());
        }
    }

    /// Fail if a goto resolved in this block jumped into the scope of a
    /// local and a statement now follows its label.
    pub fn raise_deferred_errors(&self) -> FlowResult {
        let depth = self.scopes.len();
        let Some(scope) = self.scopes.last() else {
            return Ok(());
        };
        match scope.deferred_gotos.first() {
            Some(goto) => {
                let local = scope
                    .locals
                    .get(goto.local_counts[depth - 1])
                    .cloned()
                    .unwrap_or_default();
                Err(FlowViolation::new(
                    &messages::GOTO_JUMP_IN_LOCAL_SCOPE,
                    vec![goto.target.clone(), local],
                    goto.token.clone(),
                ))
            }
            None => Ok(()),
        }
    }
}
