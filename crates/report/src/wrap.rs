/// Column at which continuation lines start.
pub const DEFAULT_INDENT: usize = 4;
/// Widest line the formatter produces unless a single token is longer.
pub const DEFAULT_MAX_WIDTH: usize = 79;

/// Greedy word-wrap of `tokens` into lines joined by `", "`.
///
/// Every line starts with `indent` spaces. Every token but the last is
/// followed by `", "`, so a wrapped line ends in the separator and removing
/// the line breaks with their indent gives back the `", "`-joined list.
///
/// A token starts a new line when the running width plus its length would
/// pass `max_width`. The running width charges each placed token its length
/// plus one, and each separator two. A token wider than
/// `max_width - indent` still gets a line of its own and is never split. No
/// tokens, no lines.
pub fn word_wrap<S: AsRef<str>>(tokens: &[S], indent: usize, max_width: usize) -> Vec<String> {
    let pad = " ".repeat(indent);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = indent;

    for (i, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        if line.is_empty() {
            line.push_str(&pad);
        } else if width + token.len() > max_width {
            lines.push(std::mem::replace(&mut line, pad.clone()));
            width = indent;
        }
        line.push_str(token);
        width += token.len() + 1;
        if i + 1 < tokens.len() {
            line.push_str(", ");
            width += 2;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Undo the wrap: drop each line break with its indent, then turn the
    /// separators back into single spaces.
    fn unwrap_to_string(lines: &[String], indent: usize) -> String {
        let pad = " ".repeat(indent);
        let joined = lines.join("\n");
        joined
            .strip_prefix(pad.as_str())
            .unwrap_or(&joined)
            .replace(&format!("\n{pad}"), "")
            .replace(", ", " ")
    }

    #[test]
    fn two_short_tokens_share_one_line() {
        let lines = word_wrap(&["GL_EXT_foo", "GL_EXT_bar"], 4, 79);
        assert_eq!(lines, vec!["    GL_EXT_foo, GL_EXT_bar".to_string()]);
    }

    #[test]
    fn no_tokens_no_lines() {
        let empty: [&str; 0] = [];
        assert!(word_wrap(&empty, 4, 79).is_empty());
    }

    #[test]
    fn wrapped_lines_end_with_separator() {
        let tokens: Vec<String> = (0..12).map(|i| format!("GL_EXT_token_number_{i:02}")).collect();
        let lines = word_wrap(&tokens, 4, 79);
        let row = |first: usize| format!("    {}", tokens[first..first + 3].join(", "));
        assert_eq!(
            lines,
            vec![
                format!("{}, ", row(0)),
                format!("{}, ", row(3)),
                format!("{}, ", row(6)),
                row(9),
            ]
        );
    }

    #[test]
    fn tokens_stay_within_width() {
        let tokens: Vec<String> = (0..60).map(|i| format!("GL_EXT_token_{i}")).collect();
        let lines = word_wrap(&tokens, 4, 79);
        assert!(lines.len() > 1);
        let (last, wrapped) = lines.split_last().unwrap();
        for line in wrapped {
            assert!(line.ends_with(", "), "missing separator: {line:?}");
        }
        assert!(!last.ends_with(','));
        for line in &lines {
            let content = line.strip_suffix(", ").unwrap_or(line);
            assert!(content.len() <= 79, "line too long: {line:?}");
            assert!(line.starts_with("    "));
        }
    }

    #[test]
    fn width_budget_charges_one_extra_column_per_token() {
        // 4 + (10 + 1) + 2 + 10 = 27
        let lines = word_wrap(&["aaaaaaaaaa", "bbbbbbbbbb"], 4, 27);
        assert_eq!(lines, vec!["    aaaaaaaaaa, bbbbbbbbbb"]);
        let lines = word_wrap(&["aaaaaaaaaa", "bbbbbbbbbb"], 4, 26);
        assert_eq!(lines, vec!["    aaaaaaaaaa, ", "    bbbbbbbbbb"]);
    }

    #[test]
    fn oversized_token_gets_its_own_line() {
        let long = "GL_VENDOR_an_extension_name_that_is_much_longer_than_the_configured_width";
        let lines = word_wrap(&["GL_A", long, "GL_B"], 4, 40);
        assert_eq!(
            lines,
            vec![
                "    GL_A, ".to_string(),
                format!("    {long}, "),
                "    GL_B".to_string(),
            ]
        );
    }

    #[test]
    fn oversized_first_token_does_not_emit_blank_line() {
        let long = "x".repeat(100);
        let lines = word_wrap(&[long.as_str()], 4, 79);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].trim_start(), long);
    }

    #[test]
    fn unwrapping_restores_the_token_list() {
        let tokens: Vec<String> = (0..40)
            .map(|i| format!("GL_{}_{}", "X".repeat(i % 13), i))
            .collect();
        for width in [20, 40, 79, 200] {
            let lines = word_wrap(&tokens, 4, width);
            assert_eq!(unwrap_to_string(&lines, 4), tokens.join(" "), "width {width}");
        }
    }

    #[test]
    fn duplicates_are_preserved() {
        let lines = word_wrap(&["GL_A", "GL_A", "GL_B"], 2, 79);
        assert_eq!(lines, vec!["  GL_A, GL_A, GL_B".to_string()]);
    }
}
