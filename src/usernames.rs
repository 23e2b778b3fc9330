use anyhow::Context;
use std::path::Path;

/// Reads newline-delimited usernames, ignoring surrounding whitespace and blank lines.
pub fn load_usernames(path: impl AsRef<Path>) -> anyhow::Result<Vec<String>> {
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read usernames from {}", path.display()))?;
    Ok(parse_usernames(&content))
}

fn parse_usernames(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_usernames_test() {
        let usernames = parse_usernames("octocat\r\n\n  torvalds  \n\t\ngaearon");
        assert_eq!(usernames, vec!["octocat", "torvalds", "gaearon"]);
    }

    #[test]
    fn load_usernames_test() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "octocat")?;
        writeln!(file)?;
        writeln!(file, "torvalds")?;
        assert_eq!(load_usernames(file.path())?, vec!["octocat", "torvalds"]);
        Ok(())
    }

    #[test]
    fn missing_file_test() {
        let err = load_usernames("/nonexistent/usernames.txt").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/usernames.txt"));
    }
}
