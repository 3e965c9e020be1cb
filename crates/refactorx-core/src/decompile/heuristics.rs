//! Quality checks on decompiled output.

/// Fewer identifiers than this never trigger the obfuscation warning
pub const MIN_IDENTIFIERS: usize = 20;

/// Identifiers of at most this many characters count as short
pub const SHORT_IDENTIFIER_LEN: usize = 2;

const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "get", "goto", "if", "implicit", "in", "int", "interface", "internal", "is",
    "lock", "long", "namespace", "new", "null", "object", "operator", "out", "override",
    "params", "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed",
    "set", "short", "sizeof", "stackalloc", "static", "string", "struct", "switch", "this",
    "throw", "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using",
    "var", "virtual", "void", "volatile", "while",
];

/// Identifier tokens of a source text, keywords excluded
fn identifiers(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| {
            token
                .chars()
                .next()
                .map(|c| c.is_alphabetic() || c == '_')
                .unwrap_or(false)
        })
        .filter(|token| !KEYWORDS.contains(token))
}

/// More than half of at least [`MIN_IDENTIFIERS`] identifiers are short
pub fn looks_obfuscated(text: &str) -> bool {
    let (total, short) = identifiers(text).fold((0usize, 0usize), |(total, short), ident| {
        let is_short = ident.chars().count() <= SHORT_IDENTIFIER_LEN;
        (total + 1, short + usize::from(is_short))
    });
    total >= MIN_IDENTIFIERS && short * 2 > total
}
