pub mod budget;
pub mod chart;
pub mod prediction;
pub mod settings;
