mod editor;
mod location;
mod node;
mod normalize;
mod ops;
mod value;

pub use crate::editor::*;
pub use crate::location::*;
pub use crate::node::*;
pub use crate::normalize::*;
pub use crate::ops::*;
pub use crate::value::*;
