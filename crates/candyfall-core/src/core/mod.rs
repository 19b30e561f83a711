pub mod body;
pub mod collide;
pub mod time;
