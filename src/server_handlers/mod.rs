pub mod lines;
pub mod sessions;
pub mod generate;
pub mod docs;

pub use lines::*;
pub use sessions::*;
pub use generate::*;
pub use docs::*;
