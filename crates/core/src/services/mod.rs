pub mod chart_service;
pub mod format;
pub mod history_service;
pub mod insight;
