//! Debugging feature flags.

pub struct LogFlags {
    /// Trade/region mutations on the annotation store.
    pub log_store: bool,

    /// Anything about SelectionState (selected trade, region being edited, view filter)
    pub log_selection: bool,

    /// Overlay counts each time the projection is recomputed (noisy: once per frame).
    pub log_projection: bool,

    /// CSV loading and series construction.
    pub log_data: bool,
}

pub const DF: LogFlags = LogFlags {
    log_store: true,
    log_selection: true,
    log_data: true,

    log_projection: false,
};
