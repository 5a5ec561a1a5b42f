//! Community module: grouping of residents and parking spots

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
