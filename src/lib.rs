pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::StorefrontConfig;

pub use crate::core::default_set::DefaultSet;
pub use crate::core::run::{Run, RunComponents, RunError};
pub use crate::core::session::{AddressBook, CustomerSession, ProfileBootstrap, Wallet};
pub use crate::domain::model::{Address, PaymentMethod, UserProfile};
pub use crate::domain::ports::{Bootstrap, Defaultable};
pub use crate::utils::error::{Result, StorefrontError};
