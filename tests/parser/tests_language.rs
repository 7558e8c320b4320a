//! Language handles and grammar assembly

#![allow(clippy::unwrap_used)]

use basic_syntax::parser::grammar::{GrammarBuilder, basic_grammar, field};
use basic_syntax::parser::{ABI_VERSION, MIN_COMPATIBLE_ABI_VERSION};
use basic_syntax::{ConfigError, Language, ParseOptions, Parser, SyntaxKind};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn goto_only() -> GrammarBuilder {
    use SyntaxKind::*;

    let mut g = GrammarBuilder::new("goto_only");
    let lines = g.hidden("_lines");
    g.start(SOURCE_FILE).sync(&[NEWLINE]);
    g.rule(SOURCE_FILE, [lines.into()]);
    g.rule(lines, [GOTO_STATEMENT.into()]);
    g.rule(lines, [lines.into(), NEWLINE.into(), GOTO_STATEMENT.into()]);
    g.rule(GOTO_STATEMENT, [GOTO_KW.into(), field("target", NUMBER)]);
    g
}

// ============================================================================
// Symbols and fields
// ============================================================================

#[rstest]
#[case("print_statement", SyntaxKind::PRINT_STATEMENT)]
#[case("identifier", SyntaxKind::IDENT)]
#[case("comment_text", SyntaxKind::REM_TEXT)]
#[case("source_file", SyntaxKind::SOURCE_FILE)]
#[case("ERROR", SyntaxKind::ERROR)]
fn test_symbol_names_round_trip(#[case] name: &str, #[case] kind: SyntaxKind) {
    let language = Language::basic();
    let id = language.symbol_id(name).unwrap();
    assert_eq!(id, kind as u16);
    assert_eq!(language.symbol_name(id), Some(name));
}

#[test]
fn test_unknown_symbols() {
    let language = Language::basic();
    assert_eq!(language.symbol_id("no_such_node"), None);
    assert_eq!(language.symbol_name(u16::MAX), None);
    assert!(language.symbol_count() > SyntaxKind::ARRAY_ACCESS as usize);
}

#[test]
fn test_field_lookup() {
    let language = Language::basic();
    for name in ["label", "condition", "consequence", "alternative", "target"] {
        let id = language.field_id(name).unwrap();
        assert_eq!(language.field_name(id), Some(name));
    }
    assert_eq!(language.field_id("nonsense"), None);
    assert!(language.field_count() >= 5);
}

// ============================================================================
// ABI versions
// ============================================================================

#[test]
fn test_current_abi_is_accepted() {
    let language = Language::basic();
    assert_eq!(language.abi_version(), ABI_VERSION);
    assert_eq!(language.check_abi_version(ABI_VERSION), Ok(()));
}

#[test]
fn test_host_older_than_language_is_rejected() {
    let language = Language::basic();
    assert_eq!(
        language.check_abi_version(MIN_COMPATIBLE_ABI_VERSION),
        Err(ConfigError::IncompatibleVersion {
            found: ABI_VERSION,
            min: MIN_COMPATIBLE_ABI_VERSION,
            max: MIN_COMPATIBLE_ABI_VERSION,
        })
    );
}

#[test]
fn test_unsupported_host_version_is_rejected() {
    let language = Language::basic();
    assert!(matches!(
        language.check_abi_version(MIN_COMPATIBLE_ABI_VERSION - 1),
        Err(ConfigError::IncompatibleVersion { .. })
    ));
}

#[test]
fn test_language_tagged_with_older_abi() {
    let grammar = basic_grammar().unwrap();
    let language = Language::with_abi_version(grammar, MIN_COMPATIBLE_ABI_VERSION).unwrap();
    assert_eq!(language.check_abi_version(MIN_COMPATIBLE_ABI_VERSION), Ok(()));
    assert_eq!(language.check_abi_version(ABI_VERSION), Ok(()));

    let grammar = basic_grammar().unwrap();
    assert_eq!(
        Language::with_abi_version(grammar, ABI_VERSION + 1).unwrap_err(),
        ConfigError::IncompatibleVersion {
            found: ABI_VERSION + 1,
            min: MIN_COMPATIBLE_ABI_VERSION,
            max: ABI_VERSION,
        }
    );
}

// ============================================================================
// Custom grammars
// ============================================================================

#[test]
fn test_parse_with_custom_language() {
    let language = Language::new(goto_only().build().unwrap()).unwrap();
    assert_eq!(language.name(), "goto_only");
    assert!(!language.ptr_eq(&Language::basic()));

    let parser = Parser::for_language(language, ParseOptions::default());
    let tree = parser.parse("GOTO 10\nGOTO 20");
    assert!(!tree.has_error());
    assert_eq!(
        tree.to_sexp(),
        "(source_file (goto_statement target: (number)) (goto_statement target: (number)))"
    );

    // A statement the custom grammar does not know is an error there
    assert!(parser.parse("GOTO 10\nEND").has_error());
}

#[test]
fn test_builder_errors_surface_as_config_errors() {
    let mut g = goto_only();
    g.rule(SyntaxKind::LINE_STATEMENT, [SyntaxKind::PRINT_STATEMENT.into()]);
    assert_eq!(
        g.build().unwrap_err(),
        ConfigError::UndeclaredNodeKind(SyntaxKind::PRINT_STATEMENT)
    );

    let mut g = goto_only();
    let missing = g.hidden("_never_defined");
    g.rule(SyntaxKind::END_STATEMENT, [missing.into()]);
    assert_eq!(
        g.build().unwrap_err(),
        ConfigError::UndefinedNonterminal("_never_defined".into())
    );

    let mut g = GrammarBuilder::new("empty");
    g.rule(SyntaxKind::SOURCE_FILE, []);
    assert_eq!(
        g.build().unwrap_err(),
        ConfigError::MissingStartSymbol("empty".into())
    );
}
