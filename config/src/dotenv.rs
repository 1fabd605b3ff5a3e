//! Parse `.env` files into a key-value map. Nothing is applied to the environment here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// `.env` in `override_dir`, else in the current directory, if it exists.
fn dotenv_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = override_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())?;
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return value[1..value.len() - 1].replace("\\\"", "\"");
    }
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        return value[1..value.len() - 1].to_string();
    }
    value.to_string()
}

/// Line-based parser: `KEY=VALUE`, optional `export ` prefix, `#` comment lines.
///
/// Double-quoted values support `\"`; single-quoted values are taken literally. A `#` inside a
/// value is kept. No multiline values.
pub(crate) fn parse_dotenv(content: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((k, v)) = line.split_once('=') else {
            continue;
        };
        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        out.insert(key.to_string(), unquote(v.trim()));
    }
    out
}

/// Reads a specific env file. A missing file is an error.
pub fn load_file(path: &Path) -> std::io::Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_dotenv(&content))
}

/// Reads `.env` from `override_dir` or the current directory; missing file gives an empty map.
pub fn load_env_map(override_dir: Option<&Path>) -> std::io::Result<HashMap<String, String>> {
    match dotenv_path(override_dir) {
        Some(p) => load_file(&p),
        None => Ok(HashMap::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_export_and_quoted_values() {
        let m = parse_dotenv(
            "OPENAI_API_KEY=sk-test\nexport CONCIERGE_MODEL=gpt-4o-mini\nA=\"say \\\"hi\\\"\"\nB='x # y'\n",
        );
        assert_eq!(m["OPENAI_API_KEY"], "sk-test");
        assert_eq!(m["CONCIERGE_MODEL"], "gpt-4o-mini");
        assert_eq!(m["A"], "say \"hi\"");
        assert_eq!(m["B"], "x # y");
    }

    #[test]
    fn skips_comments_blank_lines_and_malformed_lines() {
        let m = parse_dotenv("\n# comment\nNOT_A_PAIR\n=no_key\nKEY=\n");
        assert_eq!(m.len(), 1);
        assert_eq!(m["KEY"], "");
    }

    #[test]
    fn missing_dotenv_is_empty_but_missing_explicit_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_map(Some(dir.path())).unwrap().is_empty());
        assert!(load_file(&dir.path().join("absent.env")).is_err());
    }

    #[test]
    fn load_env_map_reads_dotenv_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "A=1\nB=2\n").unwrap();
        let m = load_env_map(Some(dir.path())).unwrap();
        assert_eq!(m["A"], "1");
        assert_eq!(m["B"], "2");
    }
}
