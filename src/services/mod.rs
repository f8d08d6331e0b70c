//! Services layer - Business logic
//!
//! This module contains the business logic for the Stocklist service.
//! Services are responsible for:
//! - Implementing business rules
//! - Coordinating with the product store
//! - Handling validation and error cases

pub mod product;
pub mod session;

pub use product::{ProductService, ProductServiceError};
pub use session::{derive_user_id, SessionError, SessionService, SESSION_COOKIE};
