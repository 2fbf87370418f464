//! Quote detection, unescaping and `$VAR` substitution for captured values.

use std::ops::Range;

use super::scan::{is_space, is_word};
use super::types::Quote;
use crate::env::SubstitutionContext;

/// Detect the quoting style of a raw value and strip its quotes.
///
/// Only space, tab and form feed are trimmed first, so a value whose quote
/// opens on a later line keeps its leading line break. The closing quote is
/// found with the same rules the scanner uses: `\'` and `\"` are escaped
/// quotes and never close a value, so `'a\'` is unquoted. When a closing
/// quote is found, one quote character is stripped from each end where
/// present.
pub fn quote_style(raw: &str) -> (Quote, &str) {
    let value = raw.trim_matches([' ', '\t', '\x0c']);
    let quote = match closing_quote(value.as_bytes()) {
        Some(b'\'') => Quote::Single,
        Some(b'"') => Quote::Double,
        _ => Quote::None,
    };
    let Some(q) = quote.as_char() else {
        return (quote, value);
    };
    let inner = value.strip_suffix(q).unwrap_or(value);
    (quote, inner.strip_prefix(q).unwrap_or(inner))
}

/// The quote that closes `value`, if any.
///
/// Tried at each line start in turn: a quoted run, or else an unquoted run,
/// or else nothing, followed by an optional quote and the end of a line.
/// Within a run, longer matches are preferred and `\<quote>` is consumed as
/// a pair before a lone backslash is.
fn closing_quote(value: &[u8]) -> Option<u8> {
    let mut start = 0;
    loop {
        if let Some(found) = quote_from(value, start) {
            return found;
        }
        let offset = value[start..].iter().position(|&b| b == b'\n')?;
        start += offset + 1;
    }
}

/// `Some(quote)` when a match starts at `start`, `None` when none does.
fn quote_from(value: &[u8], start: usize) -> Option<Option<u8>> {
    let closes = |end: usize| -> Option<Option<u8>> {
        let eol = |i: usize| i == value.len() || value[i] == b'\n';
        match value.get(end) {
            Some(&(q @ (b'\'' | b'"'))) if eol(end + 1) => Some(Some(q)),
            _ if eol(end) => Some(None),
            _ => None,
        }
    };

    if let Some(&(q @ (b'\'' | b'"'))) = value.get(start)
        && let Some(found) =
            longest_run(value, start + 1, true, |i| quoted_steps(value, i, q), closes)
    {
        return Some(found);
    }
    longest_run(value, start, false, |i| unquoted_steps(value, i), closes)
        .or_else(|| closes(start))
}

/// Next positions reachable from `i` inside a quoted run, preferred first.
fn quoted_steps(value: &[u8], i: usize, quote: u8) -> Vec<usize> {
    let mut steps = Vec::with_capacity(2);
    if value.get(i) == Some(&b'\\') && value.get(i + 1) == Some(&quote) {
        steps.push(i + 2);
    }
    if value.get(i).is_some_and(|&b| b != quote) {
        steps.push(i + 1);
    }
    steps
}

/// Next positions reachable from `i` inside an unquoted run, preferred
/// first: one non-whitespace byte, or a run of blanks plus a word character.
fn unquoted_steps(value: &[u8], i: usize) -> Vec<usize> {
    let mut steps = Vec::new();
    if value.get(i).is_some_and(|&b| !is_space(b)) {
        steps.push(i + 1);
    }
    let blanks = value[i.min(value.len())..]
        .iter()
        .take_while(|&&b| b == b' ' || b == b'\t')
        .count();
    for len in (1..=blanks).rev() {
        if value.get(i + len).is_some_and(|&b| is_word(b)) {
            steps.push(i + len + 1);
        }
    }
    steps
}

/// Walk a repeated run depth-first, preferred steps first, and hand each end
/// position to `accept` in backtracking order. Positions already tried are
/// skipped. `allow_empty` permits the run to end where it started.
fn longest_run<T>(
    value: &[u8],
    from: usize,
    allow_empty: bool,
    steps: impl Fn(usize) -> Vec<usize>,
    accept: impl Fn(usize) -> Option<T>,
) -> Option<T> {
    let mut visited = vec![false; value.len() + 1];
    visited[from] = true;
    let mut stack = vec![(from, steps(from), 0)];
    while let Some((pos, next, tried)) = stack.last_mut() {
        if let Some(&step) = next.get(*tried) {
            *tried += 1;
            if !visited[step] {
                visited[step] = true;
                stack.push((step, steps(step), 0));
            }
            continue;
        }
        let end = *pos;
        stack.pop();
        if (allow_empty || end != from)
            && let Some(found) = accept(end)
        {
            return Some(found);
        }
    }
    None
}

/// Turn a raw captured value into its final string.
pub fn resolve(raw: &str, ctx: &SubstitutionContext<'_>) -> String {
    let (quote, inner) = quote_style(raw);
    match quote {
        Quote::Single => inner.to_string(),
        Quote::Double => {
            let translated = inner.replace("\\n", "\n").replace("\\r", "\r");
            substitute(&unescape(&translated), ctx)
        }
        Quote::None => substitute(&unescape(inner), ctx),
    }
}

/// Drop a backslash in front of any character except `$`.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && next != '$'
        {
            out.push(next);
            chars.next();
            continue;
        }
        out.push(c);
    }
    out
}

/// Expand `$NAME` and `${NAME}`.
///
/// `\$...` keeps the reference text with the backslash removed. A `$` with no
/// name after it is left as is. Unknown names expand to nothing.
fn substitute(value: &str, ctx: &SubstitutionContext<'_>) -> String {
    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        let escaped = bytes[i] == b'\\' && bytes.get(i + 1) == Some(&b'$');
        let dollar = if escaped {
            i + 1
        } else if bytes[i] == b'$' {
            i
        } else {
            i += 1;
            continue;
        };

        let (name, end) = reference(bytes, dollar);
        out.push_str(&value[copied..i]);
        if escaped {
            out.push_str(&value[dollar..end]);
        } else if let Some(name) = name {
            out.push_str(ctx.lookup(&value[name]).unwrap_or_default());
        } else {
            out.push_str(&value[i..end]);
        }
        i = end;
        copied = end;
    }
    out.push_str(&value[copied..]);
    out
}

/// `$`, optional `{`, optional name, optional `}`. Each part is independent,
/// so `$FOO}` and `${FOO` are both references to `FOO`.
fn reference(bytes: &[u8], dollar: usize) -> (Option<Range<usize>>, usize) {
    let mut i = dollar + 1;
    if bytes.get(i) == Some(&b'{') {
        i += 1;
    }
    let start = i;
    while i < bytes.len() && is_word(bytes[i]) {
        i += 1;
    }
    let name = (i > start).then_some(start..i);
    if bytes.get(i) == Some(&b'}') {
        i += 1;
    }
    (name, i)
}
