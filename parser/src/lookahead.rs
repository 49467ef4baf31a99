//! Bounded lookahead predicates used by the statement dispatcher.
//!
//! All functions take the remaining token stream with the first token of the statement at index 0.
//! Reading past the end of the slice yields [`TokenKind::Eof`].

use crate::lexer::{Token, TokenKind};

/// Last 1-based token position inspected when looking for a comparison operator.
/// `IDENT [ index ] op` needs five, the rest is slack for a malformed subscript.
pub const COMPARISON_LOOKAHEAD: usize = 8;

static EOF: TokenKind = TokenKind::Eof;

fn kind_at(tokens: &[Token], pos: usize) -> &TokenKind {
    tokens.get(pos).map_or(&EOF, |tok| &tok.kind)
}

/// Skips an optional `[ index ]` starting at `pos`. A missing `]` is tolerated, the grammar
/// reports it once the statement is actually parsed.
pub fn skip_subscript(tokens: &[Token], pos: usize) -> usize {
    if *kind_at(tokens, pos) != TokenKind::OpenBracket {
        return pos;
    }

    let pos = pos + 2;
    if *kind_at(tokens, pos) == TokenKind::CloseBracket {
        pos + 1
    } else {
        pos
    }
}

fn ends_comparison_scan(kind: &TokenKind) -> bool {
    kind.is_binary_operator()
        || kind.is_statement_keyword()
        || matches!(
            kind,
            TokenKind::OpenBrace | TokenKind::CloseBrace | TokenKind::Assign | TokenKind::Eof
        )
}

/// True if the first operator after the leading operand is a comparison operator.
pub fn is_comparison_ahead(tokens: &[Token]) -> bool {
    if !kind_at(tokens, 0).starts_value() {
        return false;
    }

    for pos in 1..COMPARISON_LOOKAHEAD {
        let kind = kind_at(tokens, pos);
        if kind.is_comparison_operator() {
            return true;
        }
        if ends_comparison_scan(kind) {
            return false;
        }
    }

    false
}

/// Matches `lvalue = operand BIN_OP` without consuming anything.
pub fn is_binary_operation_ahead(tokens: &[Token]) -> bool {
    let mut pos = match kind_at(tokens, 0) {
        TokenKind::Identifier(_) => skip_subscript(tokens, 1),
        kind if kind.is_register() => 1,
        _ => return false,
    };

    if *kind_at(tokens, pos) != TokenKind::Assign {
        return false;
    }
    pos += 1;

    pos = match kind_at(tokens, pos) {
        TokenKind::Identifier(_) => skip_subscript(tokens, pos + 1),
        kind if kind.is_literal() || kind.is_register() => pos + 1,
        _ => return false,
    };

    kind_at(tokens, pos).is_binary_operator()
}
