pub mod block;
pub mod crop;
pub mod demand;
pub mod forecast;
pub mod history;
pub mod schedule;

pub use block::*;
pub use crop::*;
pub use demand::*;
pub use forecast::*;
pub use history::*;
pub use schedule::*;
