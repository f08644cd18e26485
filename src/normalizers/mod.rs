pub mod act;
pub mod address;
pub mod amount;
pub mod date;
pub mod establishment;
pub mod person;
pub mod text;

pub use act::*;
pub use address::*;
pub use amount::*;
pub use date::*;
pub use establishment::*;
pub use person::*;
pub use text::*;
