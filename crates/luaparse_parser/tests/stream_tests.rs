//! Streaming parser integration tests.
//!
//! Verifies that incomplete input waits for more text, that invalid input
//! fails as soon as it is certain, and that the final tree matches a
//! one-shot parse.

use std::cell::Cell;
use std::rc::Rc;

use luaparse_ast::{NodeKind, NodeRef, Statement};
use luaparse_options::{LuaVersion, ParseOptions};
use luaparse_parser::{parse, ParseObserver, Progress, StreamingParser};

/// Helper: feed `source` one character at a time, checking that no write
/// fails, then finish.
fn feed_by_char(source: &str, options: &ParseOptions) -> luaparse_ast::Chunk {
    let mut parser = StreamingParser::new(options.clone());
    for ch in source.chars() {
        let mut buf = [0u8; 4];
        if let Err(err) = parser.write(ch.encode_utf8(&mut buf)) {
            panic!("write failed at {:?}: {}", parser.source(), err);
        }
    }
    parser.end("").expect("complete input should parse")
}

#[test]
fn test_statement_split_across_writes() {
    let mut parser = StreamingParser::new(ParseOptions::new());
    assert_eq!(parser.write("local x = 1").unwrap(), Progress::NeedMoreInput);
    let chunk = parser.end("\nreturn x").unwrap();
    assert_eq!(chunk.body.len(), 2);
    assert_eq!(chunk.body[0].kind(), NodeKind::LocalStatement);
    assert_eq!(chunk.body[1].kind(), NodeKind::ReturnStatement);
}

#[test]
fn test_complete_prefix_reports_complete() {
    let mut parser = StreamingParser::new(ParseOptions::new());
    assert_eq!(parser.write("x = 1\n").unwrap(), Progress::Complete);
    assert_eq!(parser.write("if x then").unwrap(), Progress::NeedMoreInput);
    assert_eq!(parser.write(" y() end ").unwrap(), Progress::Complete);
    assert_eq!(parser.end("").unwrap().body.len(), 2);
}

#[test]
fn test_character_feed_matches_one_shot_parse() {
    let source = "local t = { a = 1, [2] = 'two' } -- note\n\
                  for k, v in pairs(t) do print(k .. v) end\n\
                  return t";
    let options = ParseOptions::new().with_ranges(true);
    let streamed = feed_by_char(source, &options);
    let direct = parse(source, &options).unwrap();
    assert_eq!(streamed, direct);
}

#[test]
fn test_keyword_prefix_is_not_committed() {
    // `e` could still become `end`.
    let options = ParseOptions::new();
    let chunk = feed_by_char("while true do x() end", &options);
    let Statement::While(statement) = &chunk.body[0] else {
        panic!("expected a while statement");
    };
    assert_eq!(statement.body.len(), 1);
}

#[test]
fn test_syntax_error_fails_write() {
    let mut parser = StreamingParser::new(ParseOptions::new());
    let err = parser.write("x = = 1 ").unwrap_err();
    assert_eq!(err.message, "<expression> expected near '='");
    assert!(!err.eof);
}

#[test]
fn test_lexical_error_fails_write() {
    let mut parser = StreamingParser::new(ParseOptions::new());
    assert!(parser.write("x = 1 @ y").unwrap_err().is_lexical());
}

#[test]
fn test_unfinished_input_fails_at_end() {
    let mut parser = StreamingParser::new(ParseOptions::new());
    assert_eq!(parser.write("while true do").unwrap(), Progress::NeedMoreInput);
    let err = parser.end("").unwrap_err();
    assert_eq!(err.message, "'end' expected near '<eof>'");
    assert!(err.eof);

    let parser = StreamingParser::new(ParseOptions::new());
    assert!(parser.end("s = 'open").unwrap_err().is_lexical());
}

#[test]
fn test_pending_goto_waits_for_label() {
    let options = ParseOptions::new()
        .with_version(LuaVersion::Lua52)
        .with_goto_label_checks(true);
    let mut parser = StreamingParser::new(options);
    assert_eq!(parser.write("goto done\n").unwrap(), Progress::NeedMoreInput);
    assert_eq!(parser.write("::done::\n").unwrap(), Progress::Complete);
    assert_eq!(parser.end("").unwrap().body.len(), 2);
}

#[test]
fn test_comments_across_writes() {
    let mut parser = StreamingParser::new(ParseOptions::new());
    parser.write("-- a\nx = 1 -- b\n").unwrap();
    let chunk = parser.end("-- c").unwrap();
    let values: Vec<String> = chunk
        .comments
        .unwrap()
        .into_iter()
        .map(|c| c.value)
        .collect();
    assert_eq!(values, vec![" a", " b", " c"]);
}

struct CountingObserver {
    statements: Rc<Cell<usize>>,
}

impl ParseObserver for CountingObserver {
    fn on_node_complete(&mut self, node: NodeRef<'_>) {
        if matches!(node, NodeRef::Statement(_)) {
            self.statements.set(self.statements.get() + 1);
        }
    }
}

#[test]
fn test_observer_sees_only_the_final_parse() {
    let statements = Rc::new(Cell::new(0));
    let observer = CountingObserver {
        statements: Rc::clone(&statements),
    };
    let mut parser = StreamingParser::with_observer(ParseOptions::new(), Box::new(observer));
    parser.write("a = 1\n").unwrap();
    parser.write("b = 2\n").unwrap();
    assert_eq!(statements.get(), 0);
    parser.end("c = 3").unwrap();
    assert_eq!(statements.get(), 3);
}
