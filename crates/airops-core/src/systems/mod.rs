//! Systems - rules that read and rewrite components

mod assignment;
mod reservations;
mod schedule;

pub use assignment::*;
pub use reservations::*;
pub use schedule::*;
