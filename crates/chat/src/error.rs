use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The exchange could not even be opened against the channel.
    #[error("chat channel error: {0}")]
    Channel(#[from] docmill_channel::ChannelError),

    /// The agent run failed or produced nothing usable. There is no
    /// reasonable fallback for a conversational turn, so this surfaces.
    #[error("chat failed: {0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
