//! Search configuration parameters.

/// How freshly expanded children take part in transposition sharing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transpositions {
    /// Reuse nodes already registered under a child's key, but do not register
    /// freshly built children. Only the root is registered up front, so a
    /// position reached twice below the root gets two separate records.
    #[default]
    Lookup,

    /// Register every freshly built child under its key, so all paths to the
    /// same position share one record.
    Register,
}

/// Search configuration parameters.
#[derive(Clone, Debug)]
pub struct MctsConfig {
    /// Number of iterations run by `Mcts::run`.
    pub num_iterations: usize,

    /// Transposition sharing mode for expanded children.
    pub transpositions: Transpositions,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_iterations: 1000,
            transpositions: Transpositions::Lookup,
        }
    }
}

impl MctsConfig {
    /// Create a new config with the specified number of iterations.
    pub fn with_iterations(num_iterations: usize) -> Self {
        Self {
            num_iterations,
            ..Default::default()
        }
    }

    /// Create a config that merges every transposition into one node.
    pub fn with_registered_transpositions(num_iterations: usize) -> Self {
        Self {
            num_iterations,
            transpositions: Transpositions::Register,
        }
    }

    /// Whether freshly built children are registered by key.
    pub fn registers_children(&self) -> bool {
        self.transpositions == Transpositions::Register
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.num_iterations, 1000);
        assert_eq!(config.transpositions, Transpositions::Lookup);
        assert!(!config.registers_children());
    }

    #[test]
    fn test_with_iterations() {
        let config = MctsConfig::with_iterations(100);
        assert_eq!(config.num_iterations, 100);
        assert_eq!(config.transpositions, Transpositions::Lookup);
    }

    #[test]
    fn test_with_registered_transpositions() {
        let config = MctsConfig::with_registered_transpositions(50);
        assert_eq!(config.num_iterations, 50);
        assert!(config.registers_children());
    }
}
