//! An incremental reparse always equals a fresh parse of the new text

use basic_syntax::{InputEdit, Parser, SyntaxTree};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::helpers::assert_same_tree;
use crate::helpers::source_fixtures::{GUESSING_GAME, SHORT_PROGRAM, WITH_ERRORS};

const INSERTIONS: &[&str] = &[" ", "1", "X", "(", ")", "\"", "\n", ":", "=", "E", "'", "@"];

/// Replace `old_text[start..end]` with `insert` both ways and compare.
fn check_edit(
    parser: &Parser,
    old: &SyntaxTree,
    old_text: &str,
    start: usize,
    end: usize,
    insert: &str,
) {
    let new_text = format!("{}{}{}", &old_text[..start], insert, &old_text[end..]);
    let edit = InputEdit::replace(old_text, start as u32, end as u32, insert);
    let incremental = parser.parse_incremental(old, &new_text, &[edit]);
    let context = format!("{old_text:?}: {start}..{end} -> {insert:?}");
    assert_eq!(incremental.text(), new_text, "{context}");
    assert_same_tree(&incremental, &parser.parse(&new_text), &context);
}

#[rstest]
#[case(SHORT_PROGRAM)]
#[case(WITH_ERRORS)]
#[case("10 IF A THEN IF B THEN 20 ELSE 30\n20 PRINT A (1); B\n")]
#[case("10 REM X = 1\n20 DATA 1, TWO : PRINT 3\n")]
fn test_every_single_character_edit(#[case] source: &str) {
    let parser = Parser::new();
    let old = parser.parse(source);
    for at in 0..=source.len() {
        for insert in INSERTIONS {
            check_edit(&parser, &old, source, at, at, insert);
        }
        if at < source.len() {
            check_edit(&parser, &old, source, at, at + 1, "");
            check_edit(&parser, &old, source, at, at + 1, "Z");
        }
    }
}

#[rstest]
#[case("RESTORE ELSE ^1(X\"\"=(A)DATA", 11, 15, "30")]
#[case("10 IF X 100\n20 END", 6, 7, "Y")]
#[case("10 PRINT (A\n20 END", 11, 11, " + B")]
#[case("10 PRINT 1E+X", 12, 13, "5")]
#[case("10 PRINT 1.E", 12, 12, "7")]
fn test_edit_near_recovered_or_lookahead_tokens(
    #[case] source: &str,
    #[case] start: usize,
    #[case] end: usize,
    #[case] insert: &str,
) {
    let parser = Parser::new();
    let old = parser.parse(source);
    check_edit(&parser, &old, source, start, end, insert);
}

/// Sources where most lines recover from something
const BROKEN_LINES: &[&str] = &[
    "10 PRINT (1 + 2\n",
    "20 LET = 5\n",
    "30 GOTO\n",
    "40 PRINT @\n",
    "50 IF X 100\n",
    "60 FOR I = 1 10\n",
    "70 RESTORE ELSE ^1(X\"\"=(A)DATA\n",
    "80 PRINT A (1)); B\n",
    "90 DATA 1, \"TWO\n",
    "100 ON X GOTO 10,\n",
    "110 END\n",
];

const FRAGMENTS: &[&str] = &[
    " ", "\n", "(", ")", ":", "=", "\"", "'", "1", "1E", "+", "X", "THEN", "ELSE", "GOTO 10",
    "PRINT", "DATA", "REM", "IF", "@", ",",
];

struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() as usize) % bound
    }
}

#[rstest]
#[case(3)]
#[case(11)]
#[case(42)]
#[case(1234)]
fn test_random_edits_on_broken_programs(#[case] seed: u64) {
    let parser = Parser::new();
    let mut rng = Lcg(seed);
    let mut text: String = (0..12)
        .map(|_| BROKEN_LINES[rng.below(BROKEN_LINES.len())])
        .collect();
    let mut tree = parser.parse(&text);

    for _ in 0..60 {
        let start = rng.below(text.len() + 1);
        let end = (start + rng.below(4)).min(text.len());
        let insert = if rng.below(3) == 0 {
            ""
        } else {
            FRAGMENTS[rng.below(FRAGMENTS.len())]
        };
        let edit = InputEdit::replace(&text, start as u32, end as u32, insert);
        let context = format!("{text:?}: {start}..{end} -> {insert:?}");
        text.replace_range(start..end, insert);

        // Chained, so nodes reused once are offered again on the next edit
        tree = parser.parse_incremental(&tree, &text, &[edit]);
        assert_eq!(tree.text(), text, "{context}");
        assert_same_tree(&tree, &parser.parse(&text), &context);
    }
}

#[test]
fn test_edits_across_larger_program() {
    let parser = Parser::new();
    let old = parser.parse(GUESSING_GAME);
    for at in (0..GUESSING_GAME.len()).step_by(3) {
        check_edit(&parser, &old, GUESSING_GAME, at, at + 1, "");
        check_edit(&parser, &old, GUESSING_GAME, at, at, "\n");
        check_edit(&parser, &old, GUESSING_GAME, at, at, "(");
    }
}

#[test]
fn test_whole_line_edits() {
    let parser = Parser::new();
    let old = parser.parse(GUESSING_GAME);
    let mut start = 0;
    for line in GUESSING_GAME.split_inclusive('\n') {
        let end = start + line.len();
        check_edit(&parser, &old, GUESSING_GAME, start, end, "");
        check_edit(&parser, &old, GUESSING_GAME, start, start, "5 PRINT \"NEW\"\n");
        check_edit(&parser, &old, GUESSING_GAME, start, end, "15 GOSUB\n");
        start = end;
    }
}

#[test]
fn test_chained_reparses() {
    let parser = Parser::new();
    let steps: &[(usize, usize, &str)] = &[
        (0, 0, "10 PRINT"),
        (8, 8, " A"),
        (10, 10, "(1"),
        (12, 12, ")\n20 END"),
        (3, 8, "LET X ="),
        (0, 2, "5"),
        (9, 9, " + 2"),
        (0, 0, "1 REM "),
    ];
    let mut text = String::new();
    let mut tree = parser.parse(&text);
    for &(start, end, insert) in steps {
        let edit = InputEdit::replace(&text, start as u32, end as u32, insert);
        text.replace_range(start..end, insert);
        tree = parser.parse_incremental(&tree, &text, &[edit]);
        assert_eq!(tree.text(), text);
        assert_same_tree(&tree, &parser.parse(&text), &text);
    }
}

#[test]
fn test_several_edits_in_one_call() {
    let parser = Parser::new();
    let old = parser.parse(SHORT_PROGRAM);

    // Each edit is in the coordinates left by the one before it
    let first = InputEdit::replace(SHORT_PROGRAM, 11, 12, "2");
    let mut text = SHORT_PROGRAM.to_string();
    text.replace_range(11..12, "2");
    let second = InputEdit::insert(&text, 0, "5 END\n");
    text.insert_str(0, "5 END\n");
    let third_at = text.len() - 3;
    let third = InputEdit::replace(&text, third_at as u32, third_at as u32 + 2, "20");
    text.replace_range(third_at..third_at + 2, "20");

    let tree = parser.parse_incremental(&old, &text, &[first, second, third]);
    assert_eq!(tree.text(), text);
    assert_same_tree(&tree, &parser.parse(&text), "three edits");
}
