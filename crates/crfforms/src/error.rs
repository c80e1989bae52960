use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Cannot load layout config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Cannot write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}
