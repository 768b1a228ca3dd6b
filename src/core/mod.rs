pub mod default_set;
pub mod run;
pub mod session;

pub use crate::domain::model::{Address, PaymentMethod, UserProfile};
pub use crate::domain::ports::{Bootstrap, Defaultable};
pub use crate::utils::error::Result;
