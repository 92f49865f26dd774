pub mod contract;
pub mod generation;
pub mod payment;
pub mod redesign;
pub mod social;
pub mod user;
pub mod visit;

pub use contract::*;
pub use generation::*;
pub use payment::*;
pub use redesign::*;
pub use social::*;
pub use user::*;
pub use visit::*;
