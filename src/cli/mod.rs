pub mod convert;
pub mod lookup;
pub mod price;
pub mod prompt;
pub mod setup;
pub mod ui;
pub mod update;
