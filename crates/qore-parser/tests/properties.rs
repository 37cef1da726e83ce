//! Property-based tests for the Qore parser.
//!
//! 1. **Never panics**: arbitrary input always yields a tree and errors.
//! 2. **Well-formed ranges**: parents enclose children, siblings are ordered.
//! 3. **Idempotence**: parsing the same text twice gives equal results.
//! 4. **Ordered errors**: errors are reported in source order.
//! 5. **Lookup consistency**: `find_node` at a node's start finds a node
//!    enclosed by the root.

use proptest::prelude::*;
use qore_parser::{parse, ParseOptions};

// ============================================================================
// Near-valid Qore generators
// ============================================================================

const FRAGMENTS: &[&str] = &[
    "int x = 1;",
    "my string s = \"hello\";",
    "our (int a, b) = (1, 2);",
    "x = a + b * c;",
    "if (x > 0) { print(x); } else { x++; }",
    "while (i < 10) i += 2;",
    "for (int i = 0; i < n; ++i) { sum += i; }",
    "foreach my hash<string, int> h in (values) { delete h.key; }",
    "switch (v) { case 1: break; case > 3: x = 2; default: return; }",
    "try { throw \"ERR\", \"desc\"; } catch (hash<ExceptionInfo> ex) { rethrow; }",
    "sub f(int a, *string b = NOTHING) returns int { return a; }",
    "class A inherits B { private { int n = 0; } constructor() : B() {} int get() { return n; } }",
    "namespace N { const C = 10; }",
    "hashdecl H { string name; int qty = 1; }",
    "code c = sub (int v) { return v * 2; };",
    "l = map $1 + 1, l, $1 > 0;",
    "h = {\"a\": 1, \"b\": (2, 3)};",
    "r = s =~ /a+b/i ? 1 : 0;",
    "o = new Qore::Thread::Mutex();",
    "v = cast<hash<string, int>>(x);",
    "%new-style\n",
    "on_exit { cleanup(); }",
    "push l, 1;",
    "# comment\n",
    "/* block */",
];

fn valid_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(FRAGMENTS).prop_map(str::to_string)
}

/// A short program built from several fragments on separate lines.
fn program() -> impl Strategy<Value = String> {
    prop::collection::vec(valid_fragment(), 1..6).prop_map(|parts| parts.join("\n"))
}

/// A program cut at a random char boundary.
fn truncated_program() -> impl Strategy<Value = String> {
    program().prop_flat_map(|s| {
        let len = s.chars().count();
        (0..=len).prop_map(move |cut| s.chars().take(cut).collect::<String>())
    })
}

const STRAY: &[char] = &['{', '}', '(', ')', ';', '@', '"', '<', '>', ':'];

/// A program with one character replaced by a delimiter or stray symbol.
fn corrupted_program() -> impl Strategy<Value = String> {
    (program(), any::<prop::sample::Index>(), prop::sample::select(STRAY))
        .prop_map(|(s, idx, ch)| {
            let mut chars: Vec<char> = s.chars().collect();
            if !chars.is_empty() {
                let i = idx.index(chars.len());
                chars[i] = ch;
            }
            chars.into_iter().collect()
        })
}

fn near_valid_qore() -> impl Strategy<Value = String> {
    prop_oneof![program(), truncated_program(), corrupted_program()]
}

/// Default is 512 cases; `PROPTEST_CASES` may raise it.
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn parser_never_panics(input in "\\PC{0,300}") {
        let _ = parse(&input, &ParseOptions::default());
    }

    #[test]
    fn valid_programs_have_no_errors(input in program()) {
        let (tree, errors) = parse(&input, &ParseOptions::default());
        prop_assert!(errors.is_empty(), "{:?}", errors);
        prop_assert_eq!(tree.check_well_formed(), Ok(()));
    }

    #[test]
    fn ranges_are_well_formed(input in near_valid_qore()) {
        let (tree, _) = parse(&input, &ParseOptions::default());
        prop_assert_eq!(tree.check_well_formed(), Ok(()));
    }

    #[test]
    fn arbitrary_ranges_are_well_formed(input in "\\PC{0,200}") {
        let (tree, _) = parse(&input, &ParseOptions::default());
        prop_assert_eq!(tree.check_well_formed(), Ok(()));
    }

    #[test]
    fn parsing_is_idempotent(input in near_valid_qore()) {
        let options = ParseOptions::default();
        let first = parse(&input, &options);
        let second = parse(&input, &options);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn errors_are_in_source_order(input in near_valid_qore()) {
        let (_, errors) = parse(&input, &ParseOptions::default());
        for pair in errors.windows(2) {
            prop_assert!(pair[0].range.start <= pair[1].range.start, "{:?}", errors);
        }
    }

    #[test]
    fn find_node_agrees_with_ranges(input in near_valid_qore()) {
        let (tree, _) = parse(&input, &ParseOptions::default());
        if let Some(root) = tree.root() {
            for node in tree.walk().filter(|n| !n.range.is_empty()) {
                let found = tree.find_at(node.range.start);
                prop_assert!(found.is_some());
                let found = found.unwrap();
                prop_assert!(found.range.contains(node.range.start));
                prop_assert!(root.range.encloses(&found.range));
            }
            prop_assert!(tree.find_at(root.range.end).is_none());
        }
    }
}
