pub mod audio;
mod backend;
mod outcome;
mod protocol;

pub use backend::*;
pub use outcome::*;
pub use protocol::*;
