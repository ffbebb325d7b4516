mod content;
mod error;
mod session;

pub use content::*;
pub use error::*;
pub use session::*;
