pub mod classify;
pub mod session;

pub use classify::*;
pub use session::*;
