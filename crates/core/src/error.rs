use thiserror::Error;

/// Errors that can occur while searching a game graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum McGraphError {
    #[error("Game rule must declare at least one player")]
    NoPlayers,

    #[error("Win rate requested for a node that has never been visited")]
    UnvisitedNode,

    #[error("Player index {player} out of range for {num_players} players")]
    PlayerOutOfRange { player: usize, num_players: usize },

    #[error("Non-terminal state has no children")]
    NoChildren,
}

/// Convenience Result type for mcgraph operations
pub type Result<T> = std::result::Result<T, McGraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = McGraphError::PlayerOutOfRange {
            player: 3,
            num_players: 2,
        };
        assert_eq!(err.to_string(), "Player index 3 out of range for 2 players");
        assert_eq!(
            McGraphError::UnvisitedNode.to_string(),
            "Win rate requested for a node that has never been visited"
        );
    }
}
