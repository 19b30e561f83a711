pub mod data;
pub mod geometry;
