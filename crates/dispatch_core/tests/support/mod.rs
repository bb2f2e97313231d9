pub mod entities;
pub mod world;
