pub mod config;
pub mod gameloop;
pub mod world;

pub use config::Config;
pub use world::Generation;
