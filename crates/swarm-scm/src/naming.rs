//! Pure helpers for deriving names from SCM facts (spec §4.5 step 2:
//! "derive `project` as the basename of the remote URL with any `.git`
//! suffix stripped").

/// Extract the repo name from a remote URL, handling both
/// `https://host/owner/repo.git` and `git@host:owner/repo.git` forms.
pub fn project_name_from_remote(remote_url: &str) -> String {
    let url = remote_url.trim_end_matches(".git").trim_end_matches('/');

    if let Some(last_slash) = url.rfind('/') {
        return url[last_slash + 1..].to_string();
    }
    if let Some(colon) = url.rfind(':') {
        return url[colon + 1..].to_string();
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_git_suffix_from_https_url() {
        assert_eq!(
            project_name_from_remote("https://github.com/example/repo.git"),
            "repo"
        );
    }

    #[test]
    fn handles_ssh_style_remote() {
        assert_eq!(
            project_name_from_remote("git@github.com:example/repo.git"),
            "repo"
        );
    }

    #[test]
    fn handles_remote_with_no_git_suffix() {
        assert_eq!(project_name_from_remote("https://example.com/x/y"), "y");
    }
}
