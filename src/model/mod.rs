pub mod edge;
pub mod node;
pub mod platform;
pub mod result;

pub use edge::*;
pub use node::*;
pub use platform::*;
pub use result::*;
