pub mod environment;
pub mod window;
