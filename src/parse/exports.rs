use super::scan::{is_key, is_space_char, skip_spaces};
use super::types::BareExport;

/// Find `export NAME` declarations (no separator, no value) in text left
/// over after assignments were cut out.
///
/// A declaration starts at a line start. Whitespace around `export` and the
/// name may span line breaks, so `export\nNAME` declares `NAME`. Matches
/// never overlap.
pub fn bare_exports(leftover: &str) -> Vec<BareExport<'_>> {
    let bytes = leftover.as_bytes();
    let mut found = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let line_start = pos == 0 || bytes[pos - 1] == b'\n';
        match line_start.then(|| bare_export(leftover, pos)).flatten() {
            Some((export, end)) => {
                found.push(export);
                pos = end;
            }
            None => pos += 1,
        }
    }
    found
}

fn bare_export(text: &str, start: usize) -> Option<(BareExport<'_>, usize)> {
    let bytes = text.as_bytes();
    let keyword = skip_spaces(bytes, start);
    if !bytes[keyword..].starts_with(b"export") {
        return None;
    }
    let after = keyword + "export".len();
    let name_start = skip_spaces(bytes, after);
    if name_start == after {
        return None;
    }
    let name_end = name_start + bytes[name_start..].iter().take_while(|&&b| is_key(b)).count();
    if name_end == name_start {
        return None;
    }
    let end = declaration_end(bytes, name_end)?;

    Some((
        BareExport {
            line: text[start..end].trim_matches(is_space_char),
            name: &text[name_start..name_end],
        },
        end,
    ))
}

/// After the name: whitespace (line breaks included), an optional `#`
/// comment, then a line end. When the whitespace runs into more text, the
/// declaration ends at the last line break inside that whitespace.
fn declaration_end(bytes: &[u8], name_end: usize) -> Option<usize> {
    let run_end = skip_spaces(bytes, name_end);
    match bytes.get(run_end) {
        None => Some(run_end),
        Some(b'#') => Some(
            bytes[run_end..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(bytes.len(), |offset| run_end + offset),
        ),
        Some(_) => (name_end..run_end).rev().find(|&i| bytes[i] == b'\n'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<&str> {
        bare_exports(text).into_iter().map(|e| e.name).collect()
    }

    #[test]
    fn finds_declaration() {
        assert_eq!(names("\nexport OPTION_A"), vec!["OPTION_A"]);
    }

    #[test]
    fn allows_trailing_comment() {
        let found = bare_exports("  export FOO.BAR   # later\r\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "FOO.BAR");
        assert_eq!(found[0].line, "export FOO.BAR   # later");
    }

    #[test]
    fn ignores_other_text() {
        assert!(names("exportFOO").is_empty());
        assert!(names("export FOO bar").is_empty());
        assert!(names("# export FOO").is_empty());
        assert!(names("export ").is_empty());
    }

    #[test]
    fn declaration_may_span_lines() {
        let found = bare_exports("export \nFOO\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "FOO");
        assert_eq!(found[0].line, "export \nFOO");
        assert_eq!(names("\n\nexport\n  BAR # note"), vec!["BAR"]);
    }

    #[test]
    fn consecutive_declarations() {
        assert_eq!(names("export A\n\nexport B\nexport C"), vec!["A", "B", "C"]);
    }

    #[test]
    fn trailing_text_on_next_line_ends_declaration() {
        assert_eq!(names("export A  \nleftover text"), vec!["A"]);
    }
}
