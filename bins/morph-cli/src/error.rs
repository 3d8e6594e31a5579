#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Convert(#[from] morph_api::ConvertError),

    #[error("output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("separator must not be empty")]
    EmptySeparator,
}
