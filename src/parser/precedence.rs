use crate::token::TokenKind;

/// Precedence levels for the Pratt parser, lowest first. Ordering matters:
/// `Precedence` derives `PartialOrd` so `prec < token_precedence(...)` reads
/// the same way the binding-power comparison does in the parser driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // < >
    Sum,         // + -
    Product,     // * /
    Prefix,      // -x or !x
    Call,        // fn(x)
}

/// Maps an infix-position token to its precedence. Tokens with no infix
/// meaning (and thus no entry here) bind at `Lowest`, which is what stops
/// the Pratt loop from treating them as an infix operator.
pub fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Slash | TokenKind::Asterisk => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        _ => Precedence::Lowest,
    }
}
