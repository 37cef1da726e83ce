//! End-to-end parsing scenarios: well-formed programs, error recovery and
//! session behavior.

use pretty_assertions::assert_eq;
use qore_parser::{
    parse, AstNode, AstTree, NodeKind, ParseError, ParseOptions, ParseSession, ParseStatus,
    Position, Range, SessionHolder,
};
use std::io::Write;

fn parse_default(source: &str) -> (AstTree, Vec<ParseError>) {
    let (tree, errors) = parse(source, &ParseOptions::default());
    tree.check_well_formed().unwrap();
    (tree, errors)
}

fn top_kinds(tree: &AstTree) -> Vec<NodeKind> {
    tree.root()
        .map(|root| root.children.iter().map(|c| c.kind).collect())
        .unwrap_or_default()
}

fn pos(line: u32, column: u32) -> Position {
    Position::new(line, column)
}

const PROGRAM: &str = r#"%new-style
%require-types

namespace Shop {
    hashdecl Item {
        string name;
        int qty = 1;
    }

    class Cart inherits private Base {
        private {
            list<hash<Item>> items = ();
        }

        constructor(string owner) : Base(owner) {
        }

        int add(hash<Item> item) {
            push items, item;
            return elements items;
        }

        *float total() {
            float sum = 0.0;
            foreach hash<Item> i in (items) {
                sum += i.qty * 1.5;
            }
            return sum ?: NOTHING;
        }
    }
}

sub main() {
    Cart c = new Cart("me");
    try {
        c.add({"name": "apple", "qty": 3});
    } catch (hash<ExceptionInfo> ex) {
        printf("%s\n", ex.desc);
        rethrow;
    }
    switch (c.total()) {
        case > 10: print("big"); break;
        default: print("small");
    }
}

main();
"#;

// ============================================================================
// Well-formed input
// ============================================================================

#[test]
fn test_full_program_parses_cleanly() {
    let (tree, errors) = parse_default(PROGRAM);
    assert_eq!(errors, Vec::new());
    assert_eq!(
        top_kinds(&tree),
        vec![
            NodeKind::Directive,
            NodeKind::Directive,
            NodeKind::Namespace,
            NodeKind::Function,
            NodeKind::ExprStatement,
        ]
    );
    let root = tree.root().unwrap();
    let last_line = PROGRAM.lines().count() as u32;
    assert_eq!(root.range, Range::new(pos(1, 1), pos(last_line + 1, 1)));
}

#[test]
fn test_find_node_in_program() {
    let (tree, _) = parse_default(PROGRAM);
    // `hashdecl Item` at line 5.
    let path: Vec<NodeKind> = tree
        .ancestors_at(pos(5, 5))
        .into_iter()
        .map(|n| n.kind)
        .collect();
    assert_eq!(
        path,
        vec![NodeKind::Script, NodeKind::Namespace, NodeKind::Hashdecl]
    );

    // The method name `add` on line 18.
    let method = tree.find_node(18, 13).unwrap();
    assert_eq!(method.kind, NodeKind::Method);
    assert_eq!(method.name(), Some("add"));
}

#[test]
fn test_find_node_deepest_leaf() {
    let (tree, _) = parse_default("x = foo(1, bar);");
    let node = tree.find_node(1, 12).unwrap();
    assert_eq!(node.kind, NodeKind::Name);
    assert_eq!(node.name(), Some("bar"));
    // The comma belongs to the argument list only.
    assert_eq!(tree.find_node(1, 10).unwrap().kind, NodeKind::ArgList);
    assert!(tree.find_node(2, 1).is_none());
}

// ============================================================================
// Error recovery
// ============================================================================

#[test]
fn test_missing_initializer() {
    let (tree, errors) = parse_default("int x = ;");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].range, Range::new(pos(1, 9), pos(1, 10)));
    let decl = &tree.root().unwrap().children[0];
    assert_eq!(decl.kind, NodeKind::VarDecl);
    assert_eq!(decl.name(), Some("x"));
    assert_eq!(decl.children.last().map(|c| c.kind), Some(NodeKind::Missing));
}

#[test]
fn test_two_independent_errors() {
    let source = "int a = ;\nint b = 2;\nfoo(;\nint c = 3;\n";
    let (tree, errors) = parse_default(source);
    assert_eq!(errors.len(), 2, "{errors:?}");
    assert_eq!(errors[0].line(), 1);
    assert_eq!(errors[1].line(), 3);
    let decls: Vec<&str> = tree
        .root()
        .unwrap()
        .children_of(NodeKind::VarDecl)
        .filter_map(AstNode::name)
        .collect();
    assert_eq!(decls, vec!["a", "b", "c"]);
}

#[test]
fn test_unterminated_string_recovers_on_next_line() {
    let (tree, errors) = parse_default("s = \"abc\nint y = 2;\n");
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors[0].range.start, pos(1, 5));
    assert!(errors[0].message.contains("Unterminated string"));
    assert_eq!(
        top_kinds(&tree),
        vec![NodeKind::ExprStatement, NodeKind::VarDecl]
    );
}

#[test]
fn test_errors_are_in_source_order() {
    let source = "x = ;\n@\ny = (1;\nclass {\n}\n}\n";
    let (_, errors) = parse_default(source);
    assert!(errors.len() >= 3, "{errors:?}");
    assert!(errors
        .windows(2)
        .all(|w| w[0].range.start <= w[1].range.start));
}

#[test]
fn test_error_inside_function_keeps_later_functions() {
    let source = "sub a() {\n    x = ;\n}\nsub b() {\n    return 1;\n}\n";
    let (tree, errors) = parse_default(source);
    assert_eq!(errors.len(), 1);
    let names: Vec<&str> = tree
        .root()
        .unwrap()
        .children_of(NodeKind::Function)
        .filter_map(AstNode::name)
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_unsupported_context_statement() {
    let (_, errors) = parse_default("context (rows) {\n}\n");
    assert!(!errors.is_empty());
    assert_eq!(
        errors[0].message,
        "Expected expression, found keyword 'context'"
    );
}

#[test]
fn test_deep_nesting_is_an_error_not_a_crash() {
    // Debug builds use large frames; give the parser room for the full cap.
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let source = format!("x = {}1{};", "(".repeat(2000), ")".repeat(2000));
            let (tree, errors) = parse(&source, &ParseOptions::default());
            (tree.check_well_formed(), errors)
        })
        .unwrap();
    let (well_formed, errors) = handle.join().unwrap();
    assert_eq!(well_formed, Ok(()));
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors[0].message, "Nesting is too deep (maximum 128 levels)");
}

// ============================================================================
// Sessions
// ============================================================================

#[test]
fn test_parse_is_idempotent() {
    let mut session = ParseSession::new();
    session.parse_string(PROGRAM);
    let first = session.release_tree();
    session.parse_string(PROGRAM);
    assert_eq!(session.tree(), first.as_ref());
}

#[test]
fn test_file_and_string_agree() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PROGRAM.as_bytes()).unwrap();

    let mut from_file = SessionHolder::new();
    assert_eq!(
        from_file.parse_file(file.path()).unwrap(),
        ParseStatus::Success
    );
    let mut from_string = SessionHolder::new();
    from_string.parse_string(PROGRAM);
    assert_eq!(from_file.tree(), from_string.tree());
}

#[test]
fn test_start_line_shifts_everything() {
    let opts = ParseOptions::default().with_start_line(100);
    let (tree, errors) = parse("a;\nb = ;\n", &opts);
    assert_eq!(errors[0].line(), 101);
    let root = tree.root().unwrap();
    assert_eq!(root.range.start, pos(100, 1));
    assert_eq!(tree.find_node(100, 1).map(|n| n.kind), Some(NodeKind::Name));
}
