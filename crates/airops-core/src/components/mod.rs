//! Component definitions stored in the airline arena.
//!
//! Components are plain data attached to entities. Rules that span
//! several entities live in the systems and in [`crate::airline`].

mod crew;
mod flight;
mod ids;
mod passenger;

pub use crew::*;
pub use flight::*;
pub use ids::*;
pub use passenger::*;
