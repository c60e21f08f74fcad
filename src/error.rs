use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("malformed dataset{}: {reason}", record_suffix(.index))]
    MalformedDataset { index: Option<usize>, reason: String },

    #[error("dataset fetch failed: {0}")]
    FetchFailure(String),
}

fn record_suffix(index: &Option<usize>) -> String {
    index.map(|i| format!(" at record {i}")).unwrap_or_default()
}

impl ChartError {
    pub(crate) fn malformed(index: impl Into<Option<usize>>, reason: impl Into<String>) -> Self {
        Self::MalformedDataset {
            index: index.into(),
            reason: reason.into(),
        }
    }
}
