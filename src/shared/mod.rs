pub mod date;
pub mod geo;
pub mod time;

pub use date::*;
pub use geo::*;
pub use time::*;

/// Display language for stop names and derived labels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    Local,
    English,
}
