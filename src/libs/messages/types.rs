#[derive(Debug, Clone)]
pub enum Message {
    // === SESSION MESSAGES ===
    SessionStarted(String), // start time
    SessionStopped(String), // duration
    SessionAlreadyInProgress,
    NoSessionInProgress,
    SessionVanished,

    // === RATING MESSAGES ===
    PromptSleepQuality,
    NightRated(i64, String), // id, label
    NightNotFound(i64),
    InvalidQuality(i32),
    RatingSkipped(i64),

    // === HISTORY MESSAGES ===
    HistoryTitle,
    HistoryEmpty,
    HistoryTotal(usize, usize, String), // nights, average duration
    HistoryCleared,
    ConfirmClearHistory(usize),
    ClearCancelled,

    // === STATUS MESSAGES ===
    StatusTracking(String), // since
    StatusIdle,
    StatusFlags {
        start_visible: bool,
        stop_visible: bool,
        clear_visible: bool,
    },

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigModuleStorage,
    ConfigModuleTracker,
    PromptSelectModules,
    PromptDbFile,
    PromptRatingAfterStop,
    PromptHistoryLimit,

    // === DATABASE MESSAGES ===
    SchemaReady(&'static str),

    // === STORE / CONTROLLER MESSAGES ===
    StorageFault(String),
    ControllerCancelled,
}
