//! Built-in filename completion, exported for embedding inside user
//! completion callbacks.

use std::fs;
use std::io;
use std::path::Path;

use crate::core::complete::CompletionRequest;

/// Split a path token at the last `/` into a directory part (trailing slash
/// retained, `.` when absent), the file-name prefix, and the offset where
/// that prefix starts.
fn split_path(token: &str) -> (String, String, usize) {
    match token.rfind('/') {
        None => (".".to_string(), token.to_string(), 0),
        Some(index) => (
            token[..=index].to_string(),
            token[index + 1..].to_string(),
            index + 1,
        ),
    }
}

/// Complete the current token against directory contents.
///
/// Every entry matching the typed prefix becomes a candidate. A single match
/// is promoted to a unique match with `/` appended for directories and a
/// space otherwise, so accepting it keeps the path (or argument list)
/// flowing. An unreadable directory yields no candidates.
pub fn complete_filenames(request: &mut CompletionRequest) -> io::Result<()> {
    let token = request.current_token().to_string();
    let (directory, prefix, prefix_start) = split_path(&token);
    request.set_anchor(prefix_start);

    let entries = match fs::read_dir(&directory) {
        Ok(entries) => entries,
        Err(_) => return Ok(()),
    };

    let mut names = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if prefix.is_empty() || name.starts_with(&prefix) {
            names.push(name.to_string());
        }
    }

    if names.len() == 1 {
        let name = &names[0];
        let full_path = Path::new(&directory).join(name);
        let append = if full_path.is_dir() { '/' } else { ' ' };
        request.set_unique_match(format!("{name}{append}"));
    }
    for name in names {
        request.add_candidate(name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{complete_filenames, split_path};
    use crate::core::complete::CompletionRequest;
    use crate::core::tokens::tokenise_at;
    use std::fs;

    #[test]
    fn split_path_keeps_the_trailing_slash() {
        assert_eq!(split_path("/abc/de"), ("/abc/".to_string(), "de".to_string(), 5));
        assert_eq!(split_path("/abc/"), ("/abc/".to_string(), String::new(), 5));
        assert_eq!(split_path("name"), (".".to_string(), "name".to_string(), 0));
        assert_eq!(split_path(""), (".".to_string(), String::new(), 0));
    }

    fn request_for(line: &str) -> CompletionRequest {
        CompletionRequest::new(tokenise_at(line.as_bytes(), line.len(), b""))
    }

    #[test]
    fn unique_file_match_appends_a_space() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        fs::write(dir.path().join("notes.txt"), b"x").expect("write failed");
        fs::write(dir.path().join("other.log"), b"x").expect("write failed");

        let line = format!("{}/no", dir.path().display());
        let mut request = request_for(&line);
        complete_filenames(&mut request).expect("completion failed");
        assert_eq!(request.unique_match(), Some("notes.txt "));
    }

    #[test]
    fn unique_directory_match_appends_a_slash() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        fs::create_dir(dir.path().join("subdir")).expect("mkdir failed");

        let line = format!("{}/su", dir.path().display());
        let mut request = request_for(&line);
        complete_filenames(&mut request).expect("completion failed");
        assert_eq!(request.unique_match(), Some("subdir/"));
    }

    #[test]
    fn multiple_matches_become_candidates() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        fs::write(dir.path().join("alpha"), b"x").expect("write failed");
        fs::write(dir.path().join("alps"), b"x").expect("write failed");
        fs::write(dir.path().join("beta"), b"x").expect("write failed");

        let line = format!("{}/al", dir.path().display());
        let mut request = request_for(&line);
        complete_filenames(&mut request).expect("completion failed");
        assert_eq!(request.unique_match(), None);
        let mut candidates = request.candidates().to_vec();
        candidates.sort();
        assert_eq!(candidates, ["alpha", "alps"]);
    }

    #[test]
    fn anchor_lands_on_the_file_prefix() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        fs::write(dir.path().join("alpha"), b"x").expect("write failed");

        let line = format!("{}/al", dir.path().display());
        let mut request = request_for(&line);
        complete_filenames(&mut request).expect("completion failed");
        assert_eq!(request.anchor(), line.len() - 2);
    }

    #[test]
    fn missing_directory_yields_no_candidates() {
        let mut request = request_for("/definitely/not/a/real/path/x");
        complete_filenames(&mut request).expect("completion failed");
        assert!(request.candidates().is_empty());
        assert_eq!(request.unique_match(), None);
    }
}
