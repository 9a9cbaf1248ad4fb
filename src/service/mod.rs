pub mod background;
pub mod backend;
pub mod debounce;
pub mod session;
pub mod tmdb;
pub mod trending;
