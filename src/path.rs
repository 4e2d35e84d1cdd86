use std::path::Path;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

use crate::error::Error;
use crate::error::Result;

// `$$`, `${NAME}` or `$NAME`
static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:(\$)|\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
        .expect("variable pattern is valid")
});

/// Expand environment variables and a leading `~`, then make the path absolute.
///
/// Relative paths are taken relative to the process working directory. The
/// path does not need to exist.
pub fn resolve(raw: &str) -> Result<PathBuf> {
    let expanded = expand_vars(raw, |name| std::env::var(name).ok())?;
    let path = expand_home(&expanded);
    std::path::absolute(&path).map_err(|e| Error::io(path, e))
}

/// Substitute `$NAME` and `${NAME}` using `lookup`. `$$` is a literal `$`.
pub fn expand_vars(raw: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let mut undefined = None;
    let expanded = VARIABLE_RE.replace_all(raw, |caps: &Captures| {
        if caps.get(1).is_some() {
            return "$".to_string();
        }
        let name = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
            .unwrap_or_default();
        match lookup(name) {
            Some(value) => value,
            None => {
                undefined.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match undefined {
        Some(name) => Err(Error::UndefinedVariable(name)),
        None => Ok(expanded.into_owned()),
    }
}

fn expand_home(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(raw),
    };
    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => Path::new(raw).to_path_buf(),
    }
}
