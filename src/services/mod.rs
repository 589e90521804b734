pub mod history_service;
pub mod library_service;
pub mod settings_service;
pub mod status_cycler;

pub use history_service::{HistoryService, HistoryStats};
pub use library_service::LibraryService;
pub use settings_service::SettingsService;
pub use status_cycler::{LoadingPhase, StatusCycler, LOADING_PHASES};
