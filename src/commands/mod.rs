mod inspect;

pub use inspect::{InspectOptions, inspect};
