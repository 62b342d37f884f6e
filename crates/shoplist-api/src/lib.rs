pub mod entries;
pub mod error;
pub mod extract;
pub mod gate;
pub mod router;

pub use gate::{AppState, AppStateInner};
pub use router::build_router;
