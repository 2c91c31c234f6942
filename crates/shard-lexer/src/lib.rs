//! Shard Lexer - Tokenizer over an immutable source buffer
//!
//! The lexer is stateless: every call takes an explicit [`Cursor`] and
//! advances it by exactly one token. Peeking clones the cursor, so a
//! speculative scan never disturbs the caller's position.

mod cursor;
mod lexer;
mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{Token, TokenKind};
