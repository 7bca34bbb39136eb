//! Row types, public representations, and request payloads
//!
//! Each entity kind has a `*Row` struct matching its table, a `*Dto`
//! returned to clients, and explicit hand-written copy functions between
//! them. No reflection-style mapping: a field that should appear in a
//! response is copied by name, visibly.

pub mod category;
pub mod product;
pub mod user;

pub use category::{CategoryDto, CategoryRow, CreateCategory, UpdateCategory};
pub use product::{CreateProduct, ProductDto, ProductRow, UpdateProduct};
pub use user::{CreateUser, UpdateUser, UserDto, UserRow};
