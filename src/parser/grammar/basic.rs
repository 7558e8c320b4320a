//! Rules for line-numbered BASIC
//!
//! ```text
//! source_file    := line (NEWLINE line)*
//! line           := ε | line_statement
//! line_statement := label:NUMBER statements? | statements
//! statements     := statement (':' statement?)*
//! ```
//!
//! Operator precedence, lowest first: `OR`, `AND`, comparisons, `+ -`,
//! `* / MOD`, `^` (right associative), then unary `- + NOT`.

use super::{Assoc, Grammar, GrammarBuilder, field};
use crate::parser::errors::ConfigError;
use crate::parser::syntax_kind::SyntaxKind::{self, *};

const BINARY_OPERATORS: &[(SyntaxKind, i32, Assoc)] = &[
    (OR_KW, 1, Assoc::Left),
    (AND_KW, 2, Assoc::Left),
    (EQ, 3, Assoc::Left),
    (NEQ, 3, Assoc::Left),
    (LT, 3, Assoc::Left),
    (GT, 3, Assoc::Left),
    (LT_EQ, 3, Assoc::Left),
    (GT_EQ, 3, Assoc::Left),
    (PLUS, 4, Assoc::Left),
    (MINUS, 4, Assoc::Left),
    (STAR, 5, Assoc::Left),
    (SLASH, 5, Assoc::Left),
    (MOD_KW, 5, Assoc::Left),
    (CARET, 6, Assoc::Right),
];

const UNARY_PRECEDENCE: i32 = 7;

const STATEMENTS: &[SyntaxKind] = &[
    PRINT_STATEMENT,
    LET_STATEMENT,
    IF_STATEMENT,
    GOTO_STATEMENT,
    GOSUB_STATEMENT,
    ON_STATEMENT,
    RETURN_STATEMENT,
    FOR_STATEMENT,
    NEXT_STATEMENT,
    INPUT_STATEMENT,
    END_STATEMENT,
    STOP_STATEMENT,
    REM_STATEMENT,
    DATA_STATEMENT,
    READ_STATEMENT,
    RESTORE_STATEMENT,
    DIM_STATEMENT,
];

/// The BASIC grammar.
pub fn basic_grammar() -> Result<Grammar, ConfigError> {
    let mut g = GrammarBuilder::new("basic");

    let lines = g.hidden("_lines");
    let line = g.hidden("_line");
    let statements = g.hidden("_statements");
    let statement = g.hidden("_statement");
    let expression = g.hidden("_expression");
    let arguments = g.hidden("_arguments");
    let lvalue = g.hidden("_lvalue");
    let lvalues = g.hidden("_lvalues");

    g.start(SOURCE_FILE).sync(&[NEWLINE]);

    // =========================================================================
    // LINES
    // =========================================================================
    g.rule(SOURCE_FILE, [lines.into()]);
    g.rule(lines, [line.into()]);
    g.rule(lines, [lines.into(), NEWLINE.into(), line.into()]);
    g.rule(line, []);
    g.rule(line, [LINE_STATEMENT.into()]);

    g.rule(LINE_STATEMENT, [field("label", NUMBER)]);
    g.rule(LINE_STATEMENT, [field("label", NUMBER), statements.into()]);
    g.rule(LINE_STATEMENT, [statements.into()]);

    g.rule(statements, [statement.into()]);
    g.rule(statements, [statements.into(), COLON.into()]);
    g.rule(statements, [statements.into(), COLON.into(), statement.into()]);

    for &kind in STATEMENTS {
        g.rule(statement, [kind.into()]);
    }

    // =========================================================================
    // STATEMENTS
    // =========================================================================
    let print_items = g.hidden("_print_items");
    let print_item = g.hidden("_print_item");
    g.rule(PRINT_STATEMENT, [PRINT_KW.into()]);
    g.rule(PRINT_STATEMENT, [PRINT_KW.into(), print_items.into()]);
    g.rule(print_items, [print_item.into()]);
    g.rule(print_items, [print_items.into(), print_item.into()]);
    g.rule(print_item, [expression.into()]);
    g.rule(print_item, [COMMA.into()]);
    g.rule(print_item, [SEMICOLON.into()]);

    g.rule(lvalue, [IDENT.into()]);
    g.rule(lvalue, [ARRAY_ACCESS.into()]);
    g.rule(lvalues, [field("variable", lvalue)]);
    g.rule(lvalues, [lvalues.into(), COMMA.into(), field("variable", lvalue)]);

    g.rule(
        LET_STATEMENT,
        [
            LET_KW.into(),
            field("variable", lvalue),
            EQ.into(),
            field("value", expression),
        ],
    );
    g.rule(
        LET_STATEMENT,
        [field("variable", lvalue), EQ.into(), field("value", expression)],
    );

    let branch = g.hidden("_branch");
    g.rule(branch, [NUMBER.into()]);
    g.rule(branch, [statement.into()]);
    g.rule(
        IF_STATEMENT,
        [
            IF_KW.into(),
            field("condition", expression),
            THEN_KW.into(),
            field("consequence", branch),
        ],
    );
    // Higher precedence than the ELSE-less form, so a dangling ELSE binds to
    // the innermost IF.
    g.rule(
        IF_STATEMENT,
        [
            IF_KW.into(),
            field("condition", expression),
            THEN_KW.into(),
            field("consequence", branch),
            ELSE_KW.into(),
            field("alternative", branch),
        ],
    )
    .prec(1);
    g.rule(
        IF_STATEMENT,
        [
            IF_KW.into(),
            field("condition", expression),
            GOTO_KW.into(),
            field("consequence", NUMBER),
        ],
    );

    g.rule(GOTO_STATEMENT, [GOTO_KW.into(), field("target", NUMBER)]);
    g.rule(GOSUB_STATEMENT, [GOSUB_KW.into(), field("target", NUMBER)]);

    let targets = g.hidden("_targets");
    g.rule(targets, [field("target", NUMBER)]);
    g.rule(targets, [targets.into(), COMMA.into(), field("target", NUMBER)]);
    for jump in [GOTO_KW, GOSUB_KW] {
        g.rule(
            ON_STATEMENT,
            [
                ON_KW.into(),
                field("selector", expression),
                jump.into(),
                targets.into(),
            ],
        );
    }

    g.rule(RETURN_STATEMENT, [RETURN_KW.into()]);
    g.rule(END_STATEMENT, [END_KW.into()]);
    g.rule(STOP_STATEMENT, [STOP_KW.into()]);

    g.rule(
        FOR_STATEMENT,
        [
            FOR_KW.into(),
            field("variable", IDENT),
            EQ.into(),
            field("start", expression),
            TO_KW.into(),
            field("end", expression),
        ],
    );
    g.rule(
        FOR_STATEMENT,
        [
            FOR_KW.into(),
            field("variable", IDENT),
            EQ.into(),
            field("start", expression),
            TO_KW.into(),
            field("end", expression),
            STEP_KW.into(),
            field("step", expression),
        ],
    );

    let next_variables = g.hidden("_next_variables");
    g.rule(next_variables, [field("variable", IDENT)]);
    g.rule(
        next_variables,
        [next_variables.into(), COMMA.into(), field("variable", IDENT)],
    );
    g.rule(NEXT_STATEMENT, [NEXT_KW.into()]);
    g.rule(NEXT_STATEMENT, [NEXT_KW.into(), next_variables.into()]);

    g.rule(INPUT_STATEMENT, [INPUT_KW.into(), lvalues.into()]);
    for separator in [SEMICOLON, COMMA] {
        g.rule(
            INPUT_STATEMENT,
            [
                INPUT_KW.into(),
                field("prompt", STRING),
                separator.into(),
                lvalues.into(),
            ],
        );
    }

    g.rule(REM_STATEMENT, [REM_KW.into()]);
    g.rule(REM_STATEMENT, [REM_KW.into(), field("text", REM_TEXT)]);

    let data_items = g.hidden("_data_items");
    let datum = g.hidden("_datum");
    for kind in [NUMBER, STRING, DATA_ITEM] {
        g.rule(datum, [kind.into()]);
    }
    g.rule(data_items, [datum.into()]);
    g.rule(data_items, [data_items.into(), COMMA.into(), datum.into()]);
    g.rule(DATA_STATEMENT, [DATA_KW.into(), data_items.into()]);

    g.rule(READ_STATEMENT, [READ_KW.into(), lvalues.into()]);

    g.rule(RESTORE_STATEMENT, [RESTORE_KW.into()]);
    g.rule(RESTORE_STATEMENT, [RESTORE_KW.into(), field("target", NUMBER)]);

    let declarations = g.hidden("_array_declarations");
    let dimensions = g.hidden("_dimensions");
    g.rule(declarations, [ARRAY_DECLARATION.into()]);
    g.rule(
        declarations,
        [declarations.into(), COMMA.into(), ARRAY_DECLARATION.into()],
    );
    g.rule(DIM_STATEMENT, [DIM_KW.into(), declarations.into()]);
    g.rule(
        ARRAY_DECLARATION,
        [
            field("name", IDENT),
            L_PAREN.into(),
            dimensions.into(),
            R_PAREN.into(),
        ],
    );
    g.rule(dimensions, [field("dimension", expression)]);
    g.rule(
        dimensions,
        [dimensions.into(), COMMA.into(), field("dimension", expression)],
    );

    // =========================================================================
    // EXPRESSIONS
    // =========================================================================
    for kind in [
        NUMBER,
        STRING,
        IDENT,
        BINARY_EXPRESSION,
        UNARY_EXPRESSION,
        PARENTHESIZED_EXPRESSION,
        FUNCTION_CALL,
        ARRAY_ACCESS,
    ] {
        g.rule(expression, [kind.into()]);
    }

    for &(operator, precedence, assoc) in BINARY_OPERATORS {
        g.rule(
            BINARY_EXPRESSION,
            [
                field("left", expression),
                field("operator", operator),
                field("right", expression),
            ],
        )
        .assoc(assoc, precedence);
    }

    for operator in [MINUS, PLUS, NOT_KW] {
        g.rule(
            UNARY_EXPRESSION,
            [field("operator", operator), field("argument", expression)],
        )
        .prec(UNARY_PRECEDENCE);
    }

    g.rule(
        PARENTHESIZED_EXPRESSION,
        [L_PAREN.into(), expression.into(), R_PAREN.into()],
    );

    g.rule(
        FUNCTION_CALL,
        [field("function", BUILTIN_FN), L_PAREN.into(), R_PAREN.into()],
    );
    g.rule(
        FUNCTION_CALL,
        [
            field("function", BUILTIN_FN),
            L_PAREN.into(),
            arguments.into(),
            R_PAREN.into(),
        ],
    );

    // `PRINT A (1)` also reads as two print items; prefer the array access.
    g.rule(
        ARRAY_ACCESS,
        [
            field("name", IDENT),
            L_PAREN.into(),
            arguments.into(),
            R_PAREN.into(),
        ],
    )
    .dynamic(1);

    g.rule(arguments, [field("argument", expression)]);
    g.rule(
        arguments,
        [arguments.into(), COMMA.into(), field("argument", expression)],
    );

    g.build()
}
