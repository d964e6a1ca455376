use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to compile regexp `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unmatch action: `{0}`")]
    UnknownAction(String),

    #[error("unmatch direction: `{0}`")]
    UnknownDirection(String),

    #[error("unknown filter expression token: `{0}`")]
    UnknownFilterExpr(String),

    #[error("statement deleted outside of any subgraph")]
    DeletionOutsideContainer,

    #[error("{0}")]
    Parse(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
