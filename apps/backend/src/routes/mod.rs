pub mod generate;
pub mod sessions;
pub mod sets;
