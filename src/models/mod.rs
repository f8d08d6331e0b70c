//! Data models
//!
//! This module contains the data structures used throughout the Stocklist
//! service. Models represent:
//! - Stored entities (Product)
//! - The cookie-borne session identity (SessionUser)
//! - Input types for create/update operations

mod product;
mod session;

pub use product::{CreateProductInput, Product, UpdateProductInput};
pub use session::SessionUser;
