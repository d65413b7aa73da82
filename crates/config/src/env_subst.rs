/// Replace `${ENV_VAR}` placeholders in raw config text.
///
/// Unresolvable variables are left untouched so that downstream code
/// can detect an unset token (e.g. `${TELEGRAM_TOKEN}`) and skip the
/// feature instead of reading a garbage value.
#[must_use]
pub fn substitute_env(input: &str) -> String {
    substitute(input, |name| std::env::var(name).ok())
}

fn substitute(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    },
                }
                rest = &after[end + 1..];
            },
            // No closing brace or empty name: emit literally and move on.
            _ => {
                out.push_str("${");
                rest = after;
            },
        }
    }

    out.push_str(rest);
    out
}
