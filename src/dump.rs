//! Token and scanner-state dumps for the CLI.
//!
//! Text output is one token per line: kind, then optionally the byte span and the quoted text.
//! JSON output is an array of objects with the same fields.

use serde_json::{Map, Value, json};
use udon_syntax::host::{Host, Token};

use crate::config::{DumpConfig, OutputFormat};

/// One output row: a token and, for state dumps, the scanner state after it.
struct Row<'a> {
    token: Token,
    state: Option<&'a [u8]>,
}

/// Render `tokens` lexed from `source`.
pub fn render_tokens(source: &str, tokens: &[Token], config: &DumpConfig) -> String {
    let rows: Vec<Row<'_>> = tokens
        .iter()
        .filter(|t| !config.external_only || t.kind.is_external())
        .map(|&token| Row { token, state: None })
        .collect();
    render_rows(source, &rows, config)
}

/// Lex `source` and render every token with the hex-encoded scanner state it leaves behind.
pub fn render_states(source: &str, config: &DumpConfig) -> String {
    let mut host = Host::new(source);
    let mut states = Vec::new();
    while let Some(token) = host.next_token() {
        if !config.external_only || token.kind.is_external() {
            states.push((token, host.scanner().serialize()));
        }
    }
    let rows: Vec<Row<'_>> = states
        .iter()
        .map(|(token, state)| Row {
            token: *token,
            state: Some(state.as_slice()),
        })
        .collect();
    render_rows(source, &rows, config)
}

/// Lowercase hex, two digits per byte.
pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn render_rows(source: &str, rows: &[Row<'_>], config: &DumpConfig) -> String {
    match config.format {
        OutputFormat::Text => rows
            .iter()
            .map(|row| text_line(source, row, config))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => {
            let values = rows.iter().map(|row| json_row(source, row, config)).collect();
            format!("{:#}", Value::Array(values))
        }
    }
}

fn text_line(source: &str, row: &Row<'_>, config: &DumpConfig) -> String {
    let mut parts = vec![row.token.kind.to_string()];
    if config.show_spans {
        parts.push(format!("{}..{}", row.token.span.start, row.token.span.end));
    }
    if config.show_text {
        parts.push(format!("{:?}", row.token.text(source)));
    }
    if let Some(state) = row.state {
        parts.push(hex(state));
    }
    parts.join(" ")
}

fn json_row(source: &str, row: &Row<'_>, config: &DumpConfig) -> Value {
    let mut object = Map::new();
    object.insert("kind".into(), json!(row.token.kind.name()));
    if config.show_spans {
        object.insert("start".into(), json!(row.token.span.start));
        object.insert("end".into(), json!(row.token.span.end));
    }
    if config.show_text {
        object.insert("text".into(), json!(row.token.text(source)));
    }
    if let Some(state) = row.state {
        object.insert("state".into(), json!(hex(state)));
    }
    Value::Object(object)
}
