//! POSIX shell quoting for the `command` form of entries

use super::OutputError;

fn needs_quoting(word: &str) -> bool {
    word.is_empty()
        || word.chars().any(|c| {
            !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '=' | '+' | ',' | ':' | '@' | '%'))
        })
}

fn quote(word: &str) -> String {
    if needs_quoting(word) {
        format!("'{}'", word.replace('\'', r"'\''"))
    } else {
        word.to_string()
    }
}

/// Joins arguments into a single command line the shell splits back the same way
pub fn join<S: AsRef<str>>(arguments: &[S]) -> String {
    arguments
        .iter()
        .map(|a| quote(a.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone, Copy, PartialEq)]
enum State {
    Blank,
    Word,
    Single,
    Double,
}

/// Splits a command line into arguments following POSIX shell quoting rules
pub fn split(command: &str) -> Result<Vec<String>, OutputError> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut state = State::Blank;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match state {
            State::Blank | State::Word => match c {
                ' ' | '\t' | '\n' => {
                    if state == State::Word {
                        words.push(std::mem::take(&mut word));
                        state = State::Blank;
                    }
                }
                '\'' => state = State::Single,
                '"' => state = State::Double,
                '\\' => {
                    match chars.next() {
                        Some('\n') => {}
                        Some(escaped) => word.push(escaped),
                        None => return Err(OutputError::Shell("trailing backslash".to_string())),
                    }
                    state = State::Word;
                }
                _ => {
                    word.push(c);
                    state = State::Word;
                }
            },
            State::Single => match c {
                '\'' => state = State::Word,
                _ => word.push(c),
            },
            State::Double => match c {
                '"' => state = State::Word,
                '\\' => match chars.next() {
                    Some(escaped @ ('"' | '\\' | '$' | '`')) => word.push(escaped),
                    Some('\n') => {}
                    Some(other) => {
                        word.push('\\');
                        word.push(other);
                    }
                    None => return Err(OutputError::Shell("unterminated double quote".to_string())),
                },
                _ => word.push(c),
            },
        }
    }

    match state {
        State::Blank => {}
        State::Word => words.push(word),
        State::Single => return Err(OutputError::Shell("unterminated single quote".to_string())),
        State::Double => return Err(OutputError::Shell("unterminated double quote".to_string())),
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_plain_words() {
        assert_eq!(join(&["gcc", "-c", "-o", "a.o", "a.c"]), "gcc -c -o a.o a.c");
    }

    #[test]
    fn test_join_quotes_special_words() {
        assert_eq!(
            join(&["gcc", "-DNAME=\"x y\"", "", "it's.c"]),
            r#"gcc '-DNAME="x y"' '' 'it'\''s.c'"#
        );
    }

    #[test]
    fn test_split_quotes_and_escapes() {
        assert_eq!(
            split(r#"gcc -DA="1 2" 'b c' d\ e -c"#).unwrap(),
            vec!["gcc", "-DA=1 2", "b c", "d e", "-c"]
        );
        assert_eq!(split(r#""a\"b" "\x""#).unwrap(), vec!["a\"b", "\\x"]);
        assert_eq!(split("  spaced   out  ").unwrap(), vec!["spaced", "out"]);
        assert!(split("").unwrap().is_empty());
    }

    #[test]
    fn test_split_reverses_join() {
        let arguments = vec!["cc", "-DMSG='hi there'", "", "x\\y", "a b.c"];
        assert_eq!(split(&join(&arguments)).unwrap(), arguments);
    }

    #[test]
    fn test_split_rejects_unterminated_quotes() {
        assert!(split("gcc 'oops").is_err());
        assert!(split("gcc \"oops").is_err());
        assert!(split("gcc oops\\").is_err());
    }
}
