//! Snapshot tests for token dumps
//!
//! These tests run whole documents through the reference host and compare the rendered token
//! stream against inline snapshots, so layout changes show up as reviewable diffs.
//!
//! Run with: `cargo test --test host_snapshot_tests`
//! Review changes: `cargo insta review`

use udon::config::DumpConfig;
use udon::dump::render_tokens;
use udon::host;

fn dump(source: &str, config: &DumpConfig) -> String {
    render_tokens(source, &host::tokenize(source), config)
}

#[test]
fn test_nested_document_with_freeform() {
    let source = "|html\n  |head\n    |title Hello ; greeting\n  |body\n    ```\n    <p>raw</p>\n    ```\n";
    insta::assert_snapshot!(dump(source, &DumpConfig::default()), @r#"
    TEXT "|html"
    NEWLINE "\n"
    INDENT ""
    TEXT "|head"
    NEWLINE "\n"
    INDENT ""
    TEXT "|title Hello"
    COMMENT "; greeting"
    NEWLINE "\n"
    DEDENT ""
    TEXT "|body"
    NEWLINE "\n"
    FENCE "```"
    NEWLINE "\n"
    FREEFORM_CONTENT "    <p>raw</p>\n    "
    FENCE "```"
    NEWLINE "\n"
    DEDENT ""
    END_OF_FILE ""
    "#);
}

#[test]
fn test_raw_block_with_spans() {
    let source = "|q\n  !raw:sql\n    select *\n    from t\n  |r :k v\n";
    let config = DumpConfig::new().with_spans(true);
    insta::assert_snapshot!(dump(source, &config), @r#"
    TEXT 0..2 "|q"
    NEWLINE 2..3 "\n"
    INDENT 5..5 ""
    RAW_DIRECTIVE 5..13 "!raw:sql"
    RAW_BLOCK_CONTENT 14..38 "    select *\n    from t\n"
    TEXT 40..47 "|r :k v"
    NEWLINE 47..48 "\n"
    DEDENT 48..48 ""
    END_OF_FILE 48..48 ""
    "#);
}

#[test]
fn test_blank_lines_and_comments_external_only() {
    let source = "|a\n\n  ; note\n\n  |b\n|c\n";
    let config = DumpConfig::new().with_text(false).with_external_only(true);
    insta::assert_snapshot!(dump(source, &config), @r"
    NEWLINE
    NEWLINE
    INDENT
    NEWLINE
    NEWLINE
    NEWLINE
    DEDENT
    NEWLINE
    END_OF_FILE
    ");
}
