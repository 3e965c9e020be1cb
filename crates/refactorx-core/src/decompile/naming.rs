//! Type-name normalization between source and metadata forms.

/// The name with generic argument lists removed
///
/// `Ns.Dictionary<TKey, TValue>` → `Ns.Dictionary`
pub fn strip_generic_arguments(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    for c in name.trim().chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Last dotted segment of a name, generics removed
pub fn simple_name(name: &str) -> String {
    let stripped = strip_generic_arguments(name);
    match stripped.rsplit_once('.') {
        Some((_, simple)) => simple.to_string(),
        None => stripped,
    }
}

/// Metadata form of a generic name: each argument list becomes a backtick
/// arity counted at its own level.
///
/// `Ns.Dictionary<TKey, TValue>` → ``Ns.Dictionary`2``,
/// `Ns.Outer<List<int>>` → ``Ns.Outer`1``
pub fn to_metadata_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    let mut arity = 0usize;
    for c in name.trim().chars() {
        match c {
            '<' => {
                if depth == 0 {
                    arity = 1;
                }
                depth += 1;
            }
            '>' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    out.push('`');
                    out.push_str(&arity.to_string());
                }
            }
            ',' if depth == 1 => arity += 1,
            _ if depth == 0 && !c.is_whitespace() => out.push(c),
            _ => {}
        }
    }
    out
}

/// Whether a requested symbol name designates the given qualified type
pub fn names_match(requested: &str, qualified: &str) -> bool {
    let requested = strip_generic_arguments(requested);
    let qualified = strip_generic_arguments(qualified);
    if requested.contains('.') {
        requested == qualified
    } else {
        simple_name(&qualified) == requested
    }
}
