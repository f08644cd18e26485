pub mod announcement;
pub mod family;
pub mod raw;
pub mod record;

pub use announcement::*;
pub use family::*;
pub use raw::*;
pub use record::*;
