//! Bracket-balancing repair for model JSON that was cut short or mis-closed.
//! Only enabled when the coercer is built with repair on.

/// Closes brackets the model left open, drops trailing commas before a closer,
/// and terminates an unterminated string. Returns `None` when nothing changed
/// or when a closer appears that matches no open bracket.
pub fn balance_brackets(input: &str) -> Option<String> {
    let mut out = String::with_capacity(input.len() + 8);
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in input.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' => {
                stack.push('}');
                out.push(c);
            }
            '[' => {
                stack.push(']');
                out.push(c);
            }
            '}' | ']' => {
                if !stack.contains(&c) {
                    return None;
                }
                while let Some(open) = stack.pop() {
                    strip_trailing_comma(&mut out);
                    out.push(open);
                    if open == c {
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }

    if in_string {
        out.push('"');
    }
    while let Some(open) = stack.pop() {
        strip_trailing_comma(&mut out);
        out.push(open);
    }

    (out != input).then_some(out)
}

fn strip_trailing_comma(out: &mut String) {
    let trimmed_len = out.trim_end().len();
    if out[..trimmed_len].ends_with(',') {
        out.truncate(trimmed_len - 1);
    }
}
