pub mod constellation;
pub mod record;
pub mod session;

pub use constellation::*;
pub use record::*;
pub use session::*;
