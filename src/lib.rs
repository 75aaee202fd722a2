mod dispatch;
mod recognition;
mod report;
mod settings;
mod synthesis;
mod terminal;


pub use dispatch::*;
pub use report::*;
pub use settings::*;
pub use synthesis::{Destination, SENTINEL, TextSource, ends_input};
pub use terminal::*;
