//! Command-line tokenizer.
//!
//! Splits a raw command line into an argument vector. Double quotes group
//! words containing spaces, and `\"` stands for a literal quote anywhere in
//! the line.

/// Split a command line into arguments.
///
/// # Rules
/// - A space outside quotes ends the current argument (runs of spaces never
///   produce empty arguments)
/// - An opening `"` starts a quoted region and is dropped
/// - A closing `"` always emits the current argument, even when empty, so
///   `""` yields one empty argument
/// - `\"` appends a literal `"`, inside or outside quotes
/// - Everything else, including spaces inside quotes, is kept verbatim
///
/// An unterminated quote simply runs to the end of the line.
///
/// # Examples
/// ```
/// use compare_host::args::tokenize;
///
/// assert_eq!(tokenize(r#"/t "left file.db" right.db"#), vec!["/t", "left file.db", "right.db"]);
/// assert_eq!(tokenize(r#"a\"b"#), vec!["a\"b"]);
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(command_line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = command_line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes && c == '"' {
            args.push(std::mem::take(&mut current));
            in_quotes = false;
        } else if !in_quotes && c == ' ' {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == '\\' && chars.peek() == Some(&'"') {
            chars.next();
            current.push('"');
        } else {
            current.push(c);
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("    ").is_empty());
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(tokenize("a b c"), vec!["a", "b", "c"]);
        assert_eq!(tokenize("  a   b  "), vec!["a", "b"]);
    }

    #[test]
    fn test_quoted_argument() {
        assert_eq!(tokenize("\"a b\" c"), vec!["a b", "c"]);
        assert_eq!(tokenize("c \"a  b\""), vec!["c", "a  b"]);
    }

    #[test]
    fn test_escaped_quote() {
        assert_eq!(tokenize("a\\\"b"), vec!["a\"b"]);
        // Inside a quoted region the escape does not close it
        assert_eq!(tokenize("\"say \\\"hi\\\"\""), vec!["say \"hi\""]);
    }

    #[test]
    fn test_empty_quoted_argument() {
        assert_eq!(tokenize("\"\""), vec![""]);
        assert_eq!(tokenize("a \"\" b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_closing_quote_splits_adjacent_text() {
        // Closing quote emits immediately; trailing text starts a new argument
        assert_eq!(tokenize("\"ab\"cd"), vec!["ab", "cd"]);
        // Opening quote mid-word keeps accumulating into the same argument
        assert_eq!(tokenize("ab\"cd\""), vec!["abcd"]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(tokenize("a \"b c"), vec!["a", "b c"]);
        assert!(tokenize("\"").is_empty());
    }

    #[test]
    fn test_lone_backslashes_are_literal() {
        assert_eq!(tokenize(r"C:\dir\file.db"), vec![r"C:\dir\file.db"]);
        assert_eq!(tokenize(r"trailing\"), vec![r"trailing\"]);
        assert_eq!(tokenize(r"a\\b"), vec![r"a\\b"]);
    }

    #[test]
    fn test_only_space_separates() {
        assert_eq!(tokenize("a\tb"), vec!["a\tb"]);
        assert_eq!(tokenize("a\nb c"), vec!["a\nb", "c"]);
    }

    #[test]
    fn test_non_ascii() {
        assert_eq!(tokenize("\"données été\" ü"), vec!["données été", "ü"]);
    }

    #[test]
    fn test_repeated_calls_agree() {
        let line = r#"/x "one two" \"three "" four"#;
        let first = tokenize(line);
        for _ in 0..5 {
            assert_eq!(tokenize(line), first);
        }
        assert_eq!(first, vec!["/x", "one two", "\"three", "", "four"]);
    }
}
