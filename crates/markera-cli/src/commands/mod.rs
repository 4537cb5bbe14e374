pub mod info;
pub mod open;
