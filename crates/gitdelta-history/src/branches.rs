/// Branch names from `git branch -a` output, in listed order.
///
/// Symbolic refs (`remotes/origin/HEAD -> origin/main`), blank lines, and
/// detached-HEAD entries are skipped; the current-branch marker is removed.
///
/// # Examples
///
/// ```
/// use gitdelta_history::branches::parse_branch_list;
///
/// let out = "* main\n  feature/x\n  remotes/origin/HEAD -> origin/main\n  remotes/origin/main\n";
/// assert_eq!(
///     parse_branch_list(out),
///     vec!["main", "feature/x", "remotes/origin/main"]
/// );
/// ```
pub fn parse_branch_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.contains("->"))
        .map(|name| name.strip_prefix("* ").unwrap_or(name))
        .filter(|name| !name.to_lowercase().starts_with("(no "))
        .map(str::to_string)
        .collect()
}

/// `true` if `name` is one of `branches`, either as listed or as a remote
/// branch listed under `remotes/`.
///
/// # Examples
///
/// ```
/// use gitdelta_history::branches::{branch_exists, parse_branch_list};
///
/// let branches = parse_branch_list("* main\n  remotes/origin/main\n");
/// assert!(branch_exists(&branches, "origin/main"));
/// assert!(branch_exists(&branches, "remotes/origin/main"));
/// ```
pub fn branch_exists(branches: &[String], name: &str) -> bool {
    branches.iter().any(|branch| {
        branch == name || branch.strip_prefix("remotes/") == Some(name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_head_is_skipped() {
        let out = "* (no branch)\n  main\n  (No branch, rebasing main)\n";
        assert_eq!(parse_branch_list(out), vec!["main"]);
    }

    #[test]
    fn empty_output_gives_no_branches() {
        assert!(parse_branch_list("").is_empty());
        assert!(parse_branch_list("\n\n").is_empty());
    }

    #[test]
    fn remote_branches_match_without_prefix() {
        let out = "* main\n  topic\n  remotes/origin/HEAD -> origin/main\n  remotes/origin/main\n";
        let branches = parse_branch_list(out);
        assert!(branch_exists(&branches, "origin/main"));
        assert!(branch_exists(&branches, "remotes/origin/main"));
        assert!(!branch_exists(&branches, "origin/topic"));
        assert!(!branch_exists(&branches, "origin/HEAD"));
    }

    #[test]
    fn existence_is_exact() {
        let branches = parse_branch_list("  main\n  maintenance\n");
        assert!(branch_exists(&branches, "main"));
        assert!(!branch_exists(&branches, "mai"));
    }
}
