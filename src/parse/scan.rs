use super::types::Assignment;

/// Whitespace as the grammar sees it: space, tab, newline, carriage return
/// and form feed. Vertical tab is not whitespace.
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

pub(crate) fn is_space_char(c: char) -> bool {
    c.is_ascii() && is_space(c as u8)
}

pub(crate) fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

pub(crate) fn is_key(b: u8) -> bool {
    is_word(b) || b == b'.'
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

pub(crate) fn skip_spaces(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && is_space(bytes[i]) {
        i += 1;
    }
    i
}

/// Find every `KEY=value` assignment in `content`, in order.
///
/// Matching is attempted at each line start. A successful match may swallow
/// blank lines before the key and always ends at the end of its line (after
/// any trailing comment). Text that does not match is skipped silently.
pub fn assignments(content: &str) -> Vec<Assignment<'_>> {
    let bytes = content.as_bytes();
    let mut found = Vec::new();
    let mut pos = 0;
    loop {
        let resume = match match_at(content, pos) {
            Some(assignment) => {
                let end = assignment.span.end;
                found.push(assignment);
                end
            }
            None => pos,
        };
        match bytes[resume..].iter().position(|&b| b == b'\n') {
            Some(offset) => pos = resume + offset + 1,
            None => break,
        }
    }
    found
}

/// Cut every matched span out of `content`, leaving the text no assignment
/// claimed.
pub fn leftover(content: &str, assignments: &[Assignment<'_>]) -> String {
    let mut rest = String::with_capacity(content.len());
    let mut last = 0;
    for assignment in assignments {
        rest.push_str(&content[last..assignment.span.start]);
        last = assignment.span.end;
    }
    rest.push_str(&content[last..]);
    rest
}

fn match_at(content: &str, start: usize) -> Option<Assignment<'_>> {
    let bytes = content.as_bytes();
    let i = skip_spaces(bytes, start);

    // `export KEY=...` first; `export` itself can still be a key.
    if let Some(key_start) = after_export(bytes, i)
        && let Some(found) = match_key(content, start, key_start)
    {
        return Some(found);
    }
    match_key(content, start, i)
}

fn after_export(bytes: &[u8], i: usize) -> Option<usize> {
    let rest = bytes.get(i..)?.strip_prefix(b"export")?;
    if !rest.first().is_some_and(|&b| is_space(b)) {
        return None;
    }
    Some(skip_spaces(bytes, i + "export".len()))
}

fn match_key(content: &str, start: usize, key_start: usize) -> Option<Assignment<'_>> {
    let bytes = content.as_bytes();
    let key_end = key_start + bytes[key_start..].iter().take_while(|&&b| is_key(b)).count();
    if key_end == key_start {
        return None;
    }

    // Whitespace after the separator is consumed lazily: the value is tried
    // right after the separator first, then one whitespace character later,
    // and so on.
    let mut p = separator(bytes, key_end)?;
    loop {
        if let Some((value, end)) = match_value(bytes, p) {
            return Some(Assignment {
                key: &content[key_start..key_end],
                value: &content[value],
                span: start..end,
            });
        }
        if p < bytes.len() && is_space(bytes[p]) {
            p += 1;
        } else {
            return None;
        }
    }
}

/// `=` padded by optional whitespace, or `:` followed by at least one
/// whitespace character. Returns the position right after the minimal
/// separator.
fn separator(bytes: &[u8], key_end: usize) -> Option<usize> {
    let eq = skip_spaces(bytes, key_end);
    if bytes.get(eq) == Some(&b'=') {
        return Some(eq + 1);
    }
    if bytes.get(key_end) == Some(&b':') && bytes.get(key_end + 1).is_some_and(|&b| is_space(b)) {
        return Some(key_end + 2);
    }
    None
}

/// Try the value alternatives in priority order: single-quoted,
/// double-quoted, unquoted, none. Returns the raw value range and the end of
/// the whole match.
fn match_value(bytes: &[u8], p: usize) -> Option<(std::ops::Range<usize>, usize)> {
    quoted(bytes, p, b'\'')
        .or_else(|| quoted(bytes, p, b'"'))
        .or_else(|| unquoted(bytes, p))
        .or_else(|| line_end(bytes, p).map(|end| (p..p, end)))
}

/// A quoted run. The loop may step over `\<quote>`, so every quote preceded
/// by a backslash is a possible close as well as the first unescaped one.
/// The furthest close whose line ends cleanly wins.
fn quoted(bytes: &[u8], p: usize, quote: u8) -> Option<(std::ops::Range<usize>, usize)> {
    let open = skip_spaces(bytes, p);
    if bytes.get(open) != Some(&quote) {
        return None;
    }

    let mut closes = Vec::new();
    for j in open + 1..bytes.len() {
        if bytes[j] != quote {
            continue;
        }
        closes.push(j);
        if bytes[j - 1] != b'\\' {
            break;
        }
    }

    closes
        .into_iter()
        .rev()
        .find_map(|close| line_end(bytes, close + 1).map(|end| (p..close + 1, end)))
}

/// An unquoted run: non-whitespace characters, plus runs of spaces/tabs that
/// are directly followed by a word character. Longest accepted prefix wins.
fn unquoted(bytes: &[u8], p: usize) -> Option<(std::ops::Range<usize>, usize)> {
    let mut stops = Vec::new();
    let mut i = p;
    while i < bytes.len() {
        let b = bytes[i];
        if !is_space(b) {
            i += 1;
        } else if is_blank(b) {
            let run = i + bytes[i..].iter().take_while(|&&b| is_blank(b)).count();
            if run < bytes.len() && is_word(bytes[run]) {
                i = run + 1;
            } else {
                break;
            }
        } else {
            break;
        }
        stops.push(i);
    }

    stops
        .into_iter()
        .rev()
        .find_map(|stop| line_end(bytes, stop).map(|end| (p..stop, end)))
}

/// Optional whitespace, an optional `#` comment, then end of line or text.
fn line_end(bytes: &[u8], mut i: usize) -> Option<usize> {
    loop {
        match bytes.get(i) {
            None | Some(b'\n') => return Some(i),
            Some(b'#') => {
                return Some(i + bytes[i..].iter().take_while(|&&b| b != b'\n').count());
            }
            Some(&b) if is_space(b) => i += 1,
            Some(_) => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(content: &str) -> Vec<(&str, &str)> {
        assignments(content)
            .into_iter()
            .map(|a| (a.key, a.value))
            .collect()
    }

    #[test]
    fn simple_assignment() {
        assert_eq!(pairs("FOO=bar"), vec![("FOO", "bar")]);
    }

    #[test]
    fn value_may_start_with_padding() {
        assert_eq!(pairs("FOO= bar"), vec![("FOO", " bar")]);
    }

    #[test]
    fn export_prefix_is_dropped() {
        assert_eq!(pairs("export OPTION_A=2"), vec![("OPTION_A", "2")]);
    }

    #[test]
    fn export_can_be_a_key() {
        assert_eq!(pairs("export=1"), vec![("export", "1")]);
    }

    #[test]
    fn yaml_separator_needs_space() {
        assert_eq!(pairs("OPTION_A: 1"), vec![("OPTION_A", "1")]);
        assert!(pairs("OPTION_A:1").is_empty());
    }

    #[test]
    fn empty_value() {
        assert_eq!(
            pairs("A=\nB=root"),
            vec![("A", ""), ("B", "root")]
        );
    }

    #[test]
    fn internal_spaces_before_word() {
        assert_eq!(pairs("FOO=fizz buzz  "), vec![("FOO", "fizz buzz")]);
    }

    #[test]
    fn hash_glued_to_value_is_kept() {
        assert_eq!(pairs("foo=bar#baz # comment"), vec![("foo", "bar#baz")]);
    }

    #[test]
    fn unquoted_backs_off_to_comment() {
        // the full run is rejected by ` -x`, the shorter `a` ends at a comment
        assert_eq!(pairs("FOO=a#b -x"), vec![("FOO", "a")]);
    }

    #[test]
    fn quoted_value_keeps_hash() {
        assert_eq!(
            pairs("foo=\"bar#baz\" # comment"),
            vec![("foo", "\"bar#baz\"")]
        );
    }

    #[test]
    fn multiline_single_quoted() {
        let content = "A='line 1\nline 2'\nB=x";
        assert_eq!(pairs(content), vec![("A", "'line 1\nline 2'"), ("B", "x")]);
    }

    #[test]
    fn escaped_quote_does_not_close() {
        assert_eq!(
            pairs(r#"FOO="escaped\"bar""#),
            vec![("FOO", r#""escaped\"bar""#)]
        );
    }

    #[test]
    fn escaped_quote_closes_when_rest_of_line_is_clean() {
        let content = "FOO='a\\'\nBAR='b'";
        assert_eq!(pairs(content), vec![("FOO", "'a\\'"), ("BAR", "'b'")]);
    }

    #[test]
    fn text_after_quote_falls_back_to_unquoted() {
        assert_eq!(pairs("FOO='abc' x"), vec![("FOO", "'abc' x")]);
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(
            pairs("FOO=bar\r\nbaz=fbb"),
            vec![("FOO", "bar"), ("baz", "fbb")]
        );
    }

    #[test]
    fn noise_is_skipped() {
        assert!(pairs("lol$wut").is_empty());
        assert!(pairs("# HELLO=world\n").is_empty());
        assert!(pairs("export ONLY_DECLARED").is_empty());
    }

    #[test]
    fn unterminated_quote_is_unquoted() {
        assert_eq!(
            pairs("FOO='open\nBAR=1"),
            vec![("FOO", "'open"), ("BAR", "1")]
        );
    }

    #[test]
    fn leftover_drops_matched_spans() {
        let content = "A=1\nexport A\n# note\nB=2";
        let found = assignments(content);
        assert_eq!(leftover(content, &found), "\nexport A\n# note\n");
    }

    #[test]
    fn span_includes_leading_blank_lines() {
        let content = "\n \t  \nfoo=bar";
        let found = assignments(content);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, 0..content.len());
    }
}
