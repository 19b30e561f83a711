pub mod enemy;
pub mod runtime;
