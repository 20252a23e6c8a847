//! Value objects - validated by construction

mod email;
mod names;

pub use email::Email;
pub use names::{CharacterName, ItemName};
