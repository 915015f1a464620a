mod session_rng;

pub mod candy;

pub use session_rng::SessionRng;
