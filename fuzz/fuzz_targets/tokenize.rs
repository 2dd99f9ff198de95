#![no_main]

use libfuzzer_sys::fuzz_target;
use udon_syntax::host::{self, TokenKind};
use udon_syntax::Scanner;
use udon_core::ExternalToken;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    let (tokens, checkpoints) = host::tokenize_with_checkpoints(source);
    assert_eq!(
        tokens.last().map(|t| t.kind),
        Some(TokenKind::External(ExternalToken::EndOfFile))
    );

    let count = |kind| tokens.iter().filter(|t| t.kind == TokenKind::External(kind)).count();
    let indents = count(ExternalToken::Indent);
    let dedents = count(ExternalToken::Dedent);
    assert!(dedents <= indents);

    for checkpoint in &checkpoints {
        let restored = Scanner::decode(&checkpoint.state).map(|s| s.serialize());
        assert_eq!(restored.as_deref(), Ok(checkpoint.state.as_slice()));
    }
});
