#[derive(Debug, thiserror::Error)]
pub enum FsmError {
    #[error("no state registered for key {key}")]
    StateNotFound { key: String },

    #[error("state key {key} registered twice")]
    DuplicateStateKey { key: String },

    #[error("transition chain did not settle (last key {key})")]
    TransitionLoop { key: String },

    #[error("state machine has halted")]
    Halted,
}

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("no player entity to target")]
    TargetUnresolved,

    #[error("state machine error: {0}")]
    Fsm(#[from] FsmError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to write TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
