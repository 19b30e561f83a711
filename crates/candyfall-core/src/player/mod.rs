pub mod buoyancy;
pub mod controller;
pub mod form;
