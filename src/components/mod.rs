pub mod gender_split;
pub mod timeline;
