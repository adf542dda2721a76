//! Side channel for comments.
//!
//! The lexer never returns comments as tokens. When collection is enabled
//! each comment becomes a [`Comment`] node queued here in source order until
//! the consumer drains it.

use luaparse_ast::{Comment, NodeMeta};
use luaparse_core::text::{Position, SourceLocation, TextRange};
use luaparse_options::ParseOptions;

/// Where a comment starts and ends in the source.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CommentSpan {
    pub start: usize,
    pub end: usize,
    pub start_line: u32,
    pub start_line_start: usize,
    pub end_line: u32,
    pub end_line_start: usize,
}

#[derive(Debug, Default)]
pub struct CommentCollector {
    enabled: bool,
    locations: bool,
    ranges: bool,
    pending: Vec<Comment>,
}

impl CommentCollector {
    pub fn new(options: &ParseOptions) -> Self {
        Self {
            enabled: options.collect_comments,
            locations: options.record_locations,
            ranges: options.record_byte_ranges,
            pending: Vec::new(),
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queue a comment whose text without markers is `source[value]`.
    pub(crate) fn record(&mut self, source: &str, span: CommentSpan, value: std::ops::Range<usize>) {
        if !self.enabled {
            return;
        }
        let loc = self.locations.then(|| {
            SourceLocation::new(
                Position::at(source, span.start_line, span.start_line_start, span.start),
                Position::at(source, span.end_line, span.end_line_start, span.end),
            )
        });
        let range = self
            .ranges
            .then(|| TextRange::new(span.start as u32, span.end as u32));
        self.pending.push(Comment {
            value: source[value].to_string(),
            raw: source[span.start..span.end].to_string(),
            meta: NodeMeta { loc, range },
        });
    }

    /// Move queued comments into `into`, oldest first.
    pub fn drain_into(&mut self, into: &mut Vec<Comment>) {
        into.append(&mut self.pending);
    }
}
