pub mod ai;
pub mod library;
pub mod sessions;
