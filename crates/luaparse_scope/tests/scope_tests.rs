//! Scope tracking integration tests.
//!
//! Verifies that identifiers come out of the parser marked local or global,
//! and that each block records the bindings it introduced.

use luaparse_ast::{AstVisitor, Chunk, Identifier, ScopeBinding, Statement};
use luaparse_options::{LuaVersion, ParseOptions};
use luaparse_parser::parse;

/// Helper: parse with scope tracking enabled.
fn parse_scoped(source: &str) -> Chunk {
    let options = ParseOptions::new()
        .with_version(LuaVersion::Lua52)
        .with_scopes(true);
    match parse(source, &options) {
        Ok(chunk) => chunk,
        Err(err) => panic!("failed to parse {:?}: {}", source, err),
    }
}

/// Collects every identifier with its locality, in visiting order.
struct Locality(Vec<(String, bool)>);

impl AstVisitor for Locality {
    fn visit_identifier(&mut self, ident: &Identifier) {
        self.0.push((ident.name.clone(), ident.is_local));
    }
}

/// Helper: `(name, is_local)` for every identifier in the chunk.
fn locality(chunk: &Chunk) -> Vec<(String, bool)> {
    let mut collector = Locality(Vec::new());
    collector.visit_chunk(chunk);
    collector.0
}

/// Helper: owned form of an expected locality list.
fn expect(pairs: &[(&str, bool)]) -> Vec<(String, bool)> {
    pairs.iter().map(|(n, l)| (n.to_string(), *l)).collect()
}

/// Helper: the names of a frame's bindings.
fn names(scope: &Option<Vec<ScopeBinding>>) -> Vec<&str> {
    scope
        .as_ref()
        .expect("scope should be recorded")
        .iter()
        .map(|b| b.name.as_str())
        .collect()
}

fn global_names(chunk: &Chunk) -> Vec<&str> {
    chunk
        .globals
        .as_ref()
        .expect("globals should be recorded")
        .iter()
        .map(|g| g.name.as_str())
        .collect()
}

#[test]
fn test_local_and_global_uses() {
    let chunk = parse_scoped("local a = 1\nprint(a, b)");
    assert_eq!(
        locality(&chunk),
        expect(&[("a", true), ("print", false), ("a", true), ("b", false)])
    );
    assert_eq!(global_names(&chunk), vec!["print", "b"]);
    assert_eq!(names(&chunk.scope), vec!["a"]);
}

#[test]
fn test_local_initializer_cannot_see_its_own_name() {
    let chunk = parse_scoped("local x = x");
    assert_eq!(locality(&chunk), expect(&[("x", false), ("x", true)]));
    assert_eq!(global_names(&chunk), vec!["x"]);
}

#[test]
fn test_block_locals_go_out_of_scope() {
    let chunk = parse_scoped("do local a end\nreturn a");
    assert_eq!(locality(&chunk), expect(&[("a", true), ("a", false)]));
    let Statement::Do(block) = &chunk.body[0] else {
        panic!("expected a do statement");
    };
    assert_eq!(names(&block.scope), vec!["a"]);
    assert!(names(&chunk.scope).is_empty());
}

#[test]
fn test_shadowing_keeps_both_bindings_local() {
    let chunk = parse_scoped("local x = 1 do local x = 2 print(x) end return x");
    assert!(locality(&chunk)
        .iter()
        .filter(|(name, _)| name == "x")
        .all(|(_, local)| *local));
    assert_eq!(names(&chunk.scope), vec!["x"]);
}

#[test]
fn test_loop_variables_not_visible_in_header() {
    let chunk = parse_scoped("for i = i, 10 do print(i) end");
    assert_eq!(
        locality(&chunk),
        expect(&[("i", false), ("i", true), ("print", false), ("i", true)])
    );
    let Statement::ForNumeric(statement) = &chunk.body[0] else {
        panic!("expected a numeric for");
    };
    assert_eq!(names(&statement.scope), vec!["i"]);

    let chunk = parse_scoped("for k, v in pairs(k) do end");
    assert_eq!(
        locality(&chunk),
        expect(&[("pairs", false), ("k", false), ("k", true), ("v", true)])
    );
}

#[test]
fn test_local_function_sees_itself() {
    let chunk = parse_scoped("local function fact(n) return n * fact(n - 1) end");
    assert!(locality(&chunk).iter().all(|(_, local)| *local));
    assert!(global_names(&chunk).is_empty());
    assert_eq!(names(&chunk.scope), vec!["fact"]);
    let Statement::Function(function) = &chunk.body[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(names(&function.scope), vec!["n"]);

    // A local assigned a function expression is not yet in scope inside it.
    let chunk = parse_scoped("local fact = function(n) return fact(n) end");
    assert_eq!(global_names(&chunk), vec!["fact"]);
}

#[test]
fn test_method_binds_self() {
    let chunk = parse_scoped("function obj:get() return self.value end");
    let Statement::Function(function) = &chunk.body[0] else {
        panic!("expected a function declaration");
    };
    let scope = function.scope.as_ref().unwrap();
    assert_eq!(scope.len(), 1);
    assert_eq!(scope[0].name, "self");
    assert!(scope[0].node.is_none());
    assert!(locality(&chunk).contains(&("self".to_string(), true)));
    assert_eq!(global_names(&chunk), vec!["obj"]);

    // Plain functions have no implicit `self`.
    let chunk = parse_scoped("function obj.get() return self end");
    assert_eq!(global_names(&chunk), vec!["obj", "self"]);
}

#[test]
fn test_repeat_condition_sees_body_locals() {
    let chunk = parse_scoped("repeat local done = true until done");
    assert_eq!(locality(&chunk), expect(&[("done", true), ("done", true)]));
    assert!(global_names(&chunk).is_empty());
}

#[test]
fn test_globals_recorded_once_in_first_use_order() {
    let chunk = parse_scoped("a = b + a\nc(b)");
    assert_eq!(global_names(&chunk), vec!["a", "b", "c"]);
    assert!(chunk
        .globals
        .as_ref()
        .unwrap()
        .iter()
        .all(|g| !g.is_local));
}

#[test]
fn test_bindings_keep_declaring_nodes() {
    let chunk = parse_scoped("local a, b = 1\nlocal function f() end");
    let scope = chunk.scope.as_ref().unwrap();
    assert_eq!(names(&chunk.scope), vec!["a", "b", "f"]);
    for binding in scope {
        let node = binding.node.as_ref().expect("declared names keep their node");
        assert_eq!(node.name, binding.name);
        assert!(node.is_local);
    }
}

#[test]
fn test_labels_are_not_bindings() {
    let chunk = parse_scoped("::top:: local a goto top");
    assert_eq!(names(&chunk.scope), vec!["a"]);
}

#[test]
fn test_scope_tracking_disabled_by_default() {
    let chunk = parse("local a\nreturn a", &ParseOptions::new()).unwrap();
    assert_eq!(chunk.scope, None);
    assert_eq!(chunk.globals, None);
    assert!(locality(&chunk).iter().all(|(_, local)| !local));
}
