use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("invalid configuration:\n  - {}", .0.join("\n  - "))]
    Config(Vec<String>),

    #[error("failed to read config file {}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to build GitHub client")]
    Client(#[source] octocrab::Error),

    #[error("failed to list open pull requests for {owner}/{repo}")]
    ListPullRequests {
        owner: String,
        repo: String,
        #[source]
        source: octocrab::Error,
    },

    #[error("failed to list issue events for {owner}/{repo}#{number}")]
    ListIssueEvents {
        owner: String,
        repo: String,
        number: u64,
        #[source]
        source: octocrab::Error,
    },

    #[error("failed to render digest")]
    Render(#[from] serde_json::Error),
}

pub type Result<T, E = DigestError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_lists_every_problem() {
        let err = DigestError::Config(vec![
            "missing owner".to_string(),
            "missing repo".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid configuration:\n  - missing owner\n  - missing repo"
        );
    }
}
