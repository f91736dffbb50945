use welfare_core::error::CoreError;
use welfare_db::gateway::GatewayError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Rejected locally before anything was sent.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("{0}")]
    NotFound(String),

    /// A secondary load failed; `message` is what the page shows.
    #[error("{message}: {source}")]
    Load {
        message: &'static str,
        #[source]
        source: GatewayError,
    },

    /// The campaign row exists but its batch was not populated. Retry with
    /// the same id.
    #[error("Campaign {campaign_id} was created but not populated: {source}")]
    Incomplete {
        campaign_id: String,
        #[source]
        source: GatewayError,
    },

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
