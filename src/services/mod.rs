pub mod debounce;
pub mod discovery;
pub mod geo;
pub mod session;
pub mod sink;
pub mod tracker;
pub mod transport;
