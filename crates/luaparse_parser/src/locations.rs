//! Location and byte-range annotation.
//!
//! A [`Marker`] is taken at the token where a node begins; finishing the
//! marker against the last consumed token yields the node's [`NodeMeta`].
//! When neither locations nor ranges are requested no marker is taken and
//! every node gets [`NodeMeta::NONE`].

use luaparse_ast::NodeMeta;
use luaparse_core::text::{Position, SourceLocation, TextPos, TextRange};
use luaparse_lexer::Token;
use luaparse_options::ParseOptions;

/// Where a node started.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    start: Position,
    pos: TextPos,
}

pub(crate) struct Annotator<'s> {
    source: &'s str,
    enabled: bool,
    locations: bool,
    ranges: bool,
}

impl<'s> Annotator<'s> {
    pub fn new(source: &'s str, options: &ParseOptions) -> Self {
        Self {
            source,
            enabled: options.annotates_nodes(),
            locations: options.record_locations,
            ranges: options.record_byte_ranges,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn mark(&self, token: &Token) -> Option<Marker> {
        if !self.is_enabled() {
            return None;
        }
        let start = if self.locations {
            Position::at(self.source, token.line, token.line_start, token.range.pos as usize)
        } else {
            Position::default()
        };
        Some(Marker {
            start,
            pos: token.range.pos,
        })
    }

    /// Metadata for a node running from `marker` to the end of `last`.
    pub fn finish(&self, marker: Option<Marker>, last: &Token) -> NodeMeta {
        let Some(marker) = marker else {
            return NodeMeta::NONE;
        };
        let end = last.range.end.max(marker.pos);
        let loc = self.locations.then(|| {
            let end = Position::at(self.source, last.last_line, last.last_line_start, end as usize);
            SourceLocation::new(marker.start, end)
        });
        let range = self.ranges.then(|| TextRange::new(marker.pos, end));
        NodeMeta { loc, range }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luaparse_lexer::tokenize;

    #[test]
    fn test_disabled_annotator_takes_no_marker() {
        let options = ParseOptions::new();
        let tokens = tokenize("x", &options).unwrap();
        let annotator = Annotator::new("x", &options);
        let marker = annotator.mark(&tokens[0]);
        assert!(marker.is_none());
        assert_eq!(annotator.finish(marker, &tokens[0]), NodeMeta::NONE);
    }

    #[test]
    fn test_span_over_tokens() {
        let source = "local\n  abc";
        let options = ParseOptions::new().with_locations(true).with_ranges(true);
        let tokens = tokenize(source, &options).unwrap();
        let annotator = Annotator::new(source, &options);
        let meta = annotator.finish(annotator.mark(&tokens[0]), &tokens[1]);
        let loc = meta.loc.unwrap();
        assert_eq!((loc.start.line, loc.start.column), (1, 1));
        assert_eq!((loc.end.line, loc.end.column), (2, 6));
        assert_eq!(meta.range, Some(TextRange::new(0, 11)));
    }
}
