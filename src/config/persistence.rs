//! File persistence configuration

/// Configuration for Application State Persistence
pub struct AppPersistenceConfig {
    /// Path for saving/loading UI preferences (never annotations)
    pub state_path: &'static str,
}

/// The Master Persistence Configuration
pub struct PersistenceConfig {
    pub app: AppPersistenceConfig,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    app: AppPersistenceConfig {
        state_path: ".annotator_states.json",
    },
};
