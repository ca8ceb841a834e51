use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("graph is empty")]
    EmptyGraph,
    #[error("vertex {0} not found")]
    VertexNotFound(usize),
    #[error("incomplete graph: no edge from {from} to {to}")]
    IncompleteGraph { from: usize, to: usize },
    #[error("graph is disconnected: vertex {0} cannot be reached from the start vertex")]
    Unreachable(usize),
    #[error("graph has no hamiltonian circuit")]
    NoCircuit,
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
