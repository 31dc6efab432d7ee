use regex::{Captures, Regex};

/// `{{ env.VAR }}` or `{{ env.VAR | default("fallback") }}`
const PLACEHOLDER: &str = r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#;

/// Substitute environment placeholders in raw config text
///
/// Comment lines are copied untouched, so commented-out entries may
/// reference variables that are not set.
pub(crate) fn expand_env(input: &str) -> anyhow::Result<String> {
    let placeholder = Regex::new(PLACEHOLDER)?;

    let mut lines = Vec::new();
    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_owned());
        } else {
            lines.push(expand_line(&placeholder, line)?);
        }
    }

    let mut output = lines.join("\n");
    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn expand_line(placeholder: &Regex, line: &str) -> anyhow::Result<String> {
    let mut expanded = String::with_capacity(line.len());
    let mut cursor = 0;

    for captures in placeholder.captures_iter(line) {
        let Some(whole) = captures.get(0) else {
            continue;
        };

        expanded.push_str(&line[cursor..whole.start()]);
        expanded.push_str(&resolve(&captures)?);
        cursor = whole.end();
    }

    expanded.push_str(&line[cursor..]);
    Ok(expanded)
}

fn resolve(captures: &Captures<'_>) -> anyhow::Result<String> {
    let key = captures.get(1).map_or("", |m| m.as_str());
    let fallback = captures.get(2).map(|m| m.as_str());

    let Some(var) = key.strip_prefix("env.").filter(|var| !var.contains('.')) else {
        anyhow::bail!("unsupported placeholder `{key}`, only `env.` variables can be expanded");
    };

    match (std::env::var(var), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_owned()),
        (Err(_), None) => anyhow::bail!("environment variable `{var}` is not set"),
    }
}
