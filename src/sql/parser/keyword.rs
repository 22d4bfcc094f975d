use strum::{Display, EnumString};

/// SQL keywords recognized by the lexer.
///
/// Keywords are matched case-insensitively against identifiers. `ORDER`
/// through `OFFSET` are reserved by the lexer even though the parser does
/// not accept those clauses yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum Keyword {
    Select,
    From,
    Where,

    Join,
    Inner,
    Left,
    Right,
    On,

    And,
    Or,
    As,

    Order,
    By,
    Group,
    Having,
    Limit,
    Offset,
}
