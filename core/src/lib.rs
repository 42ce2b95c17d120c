pub mod apiary;
pub mod deletion;
pub mod error;
pub mod hive;
pub mod input;
mod messaging;
pub mod report;
pub mod sensor;
pub mod user;

pub use apiary::*;
pub use deletion::*;
pub use hive::*;
pub use messaging::*;
pub use report::*;
pub use sensor::*;
pub use user::*;

pub static CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
