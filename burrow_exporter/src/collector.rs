mod descriptor;
mod handler;
mod sample;

pub use descriptor::*;
pub use handler::*;
pub use sample::*;
