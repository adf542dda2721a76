//! Where the parser gets its tokens.

use luaparse_ast::Comment;
use luaparse_diagnostics::ParseError;
use luaparse_lexer::{Lexer, Token};

/// A stream of tokens plus the comments seen between them.
pub trait TokenSource {
    /// The next token. Keeps returning end-of-input once exhausted.
    fn next_token(&mut self) -> Result<Token, ParseError>;

    /// Move comments read before the last returned token into `into`.
    fn drain_comments(&mut self, into: &mut Vec<Comment>);
}

impl TokenSource for Lexer<'_> {
    #[inline]
    fn next_token(&mut self) -> Result<Token, ParseError> {
        Lexer::next_token(self)
    }

    #[inline]
    fn drain_comments(&mut self, into: &mut Vec<Comment>) {
        Lexer::drain_comments(self, into);
    }
}

/// Replays tokens that were lexed earlier.
///
/// Each comment is tagged with the index of the token it precedes, and is
/// released once that token has been handed out. Past the end of `tokens`
/// the source yields `eof`.
pub struct BufferedTokens<'t> {
    tokens: &'t [Token],
    comments: &'t [(usize, Comment)],
    /// Number of tokens handed out so far, capped one past the end.
    cursor: usize,
    /// Number of comments already released.
    released: usize,
    eof: Token,
}

impl<'t> BufferedTokens<'t> {
    pub fn new(tokens: &'t [Token], comments: &'t [(usize, Comment)], eof: Token) -> Self {
        Self {
            tokens,
            comments,
            cursor: 0,
            released: 0,
            eof,
        }
    }
}

impl TokenSource for BufferedTokens<'_> {
    fn next_token(&mut self) -> Result<Token, ParseError> {
        let token = self
            .tokens
            .get(self.cursor)
            .cloned()
            .unwrap_or_else(|| self.eof.clone());
        if self.cursor <= self.tokens.len() {
            self.cursor += 1;
        }
        Ok(token)
    }

    fn drain_comments(&mut self, into: &mut Vec<Comment>) {
        while let Some((mark, comment)) = self.comments.get(self.released) {
            if *mark >= self.cursor {
                break;
            }
            into.push(comment.clone());
            self.released += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luaparse_ast::NodeMeta;
    use luaparse_lexer::tokenize;
    use luaparse_options::ParseOptions;

    fn comment(text: &str) -> Comment {
        Comment {
            value: text.to_string(),
            raw: format!("--{}", text),
            meta: NodeMeta::NONE,
        }
    }

    #[test]
    fn test_replay_then_eof() {
        let options = ParseOptions::new();
        let mut tokens = tokenize("a b", &options).unwrap();
        let eof = tokens.pop().unwrap();
        let mut source = BufferedTokens::new(&tokens, &[], eof);
        assert_eq!(source.next_token().unwrap().identifier(), Some("a"));
        assert_eq!(source.next_token().unwrap().identifier(), Some("b"));
        assert!(source.next_token().unwrap().is_eof());
        assert!(source.next_token().unwrap().is_eof());
    }

    #[test]
    fn test_comments_released_with_following_token() {
        let options = ParseOptions::new();
        let mut tokens = tokenize("a b", &options).unwrap();
        let eof = tokens.pop().unwrap();
        let comments = vec![(0, comment("first")), (1, comment("second")), (2, comment("tail"))];
        let mut source = BufferedTokens::new(&tokens, &comments, eof);
        let mut out = Vec::new();

        source.next_token().unwrap();
        source.drain_comments(&mut out);
        assert_eq!(out.len(), 1);

        source.next_token().unwrap();
        source.drain_comments(&mut out);
        assert_eq!(out.len(), 2);

        source.next_token().unwrap();
        source.drain_comments(&mut out);
        assert_eq!(out.last().unwrap().value, "tail");
    }
}
