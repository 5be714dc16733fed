pub mod currencies;
pub mod quote;
pub mod setup;
pub mod shell;
pub mod ui;
