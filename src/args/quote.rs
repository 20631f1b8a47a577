//! Building command lines that `tokenize` splits back into the same arguments.

use std::borrow::Cow;

/// Quote a single argument so that `tokenize` reproduces it.
///
/// Embedded quotes become `\"`. Arguments that are empty or contain a space
/// are wrapped in quotes. Anything else is returned as-is.
///
/// The tokenizer has no escape for a backslash, so a wrapped argument that
/// ends in `\` does not survive the trip back: its final `\"` reads as an
/// escaped quote.
pub fn quote_arg(arg: &str) -> Cow<'_, str> {
    let needs_wrap = arg.is_empty() || arg.contains(' ');
    if !needs_wrap && !arg.contains('"') {
        return Cow::Borrowed(arg);
    }

    let mut out = String::with_capacity(arg.len() + 2);
    if needs_wrap {
        out.push('"');
    }
    for c in arg.chars() {
        if c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    if needs_wrap {
        out.push('"');
    }
    Cow::Owned(out)
}

/// Join arguments into one command line, quoting each as needed.
pub fn join_args<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| quote_arg(arg.as_ref()).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::tokenize;

    #[test]
    fn test_plain_argument_is_borrowed() {
        assert!(matches!(quote_arg("file.db"), Cow::Borrowed("file.db")));
    }

    #[test]
    fn test_quote_arg_cases() {
        assert_eq!(quote_arg(""), "\"\"");
        assert_eq!(quote_arg("a b"), "\"a b\"");
        assert_eq!(quote_arg("a\"b"), "a\\\"b");
        assert_eq!(quote_arg("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_join_args() {
        assert_eq!(join_args(["/t", "left file.db", ""]), "/t \"left file.db\" \"\"");
        assert_eq!(join_args(Vec::<String>::new()), "");
    }

    #[test]
    fn test_round_trip() {
        let cases: Vec<Vec<&str>> = vec![
            vec![],
            vec!["a", "b", "c"],
            vec!["a b", "c"],
            vec!["a\"b"],
            vec![""],
            vec!["", "x", ""],
            vec!["  leading and trailing  "],
            vec!["quote \" inside spaces", "\"", "\"\""],
            vec![r"C:\Program Files\db.sqlite", r"plain\path\"],
            vec!["tab\tkept", "ünïcödé wörds"],
        ];

        for args in cases {
            let line = join_args(&args);
            assert_eq!(tokenize(&line), args, "round trip failed for line: {}", line);
        }
    }

    #[test]
    fn test_wrapped_trailing_backslash_does_not_round_trip() {
        let line = join_args(["dir name\\"]);
        assert_ne!(tokenize(&line), vec!["dir name\\"]);
    }
}
