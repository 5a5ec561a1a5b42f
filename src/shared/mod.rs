pub mod clock;
pub mod shutdown;
pub mod types;

pub use clock::*;
pub use shutdown::*;
pub use types::*;
