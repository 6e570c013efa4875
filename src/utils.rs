pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Removes ANSI escape sequences and control characters. Line breaks and tabs
/// become spaces. Model output goes through this before it is echoed to the
/// terminal.
pub fn strip_controls_and_escapes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            // ANSI escape sequence (ESC … letter)
            '\x1b' => {
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next.is_ascii_alphabetic() {
                        break;
                    }
                }
            }

            c if c.is_whitespace() => out.push(' '),

            c if c.is_control() => {}

            c => out.push(c),
        }
    }

    out.trim().to_string()
}
