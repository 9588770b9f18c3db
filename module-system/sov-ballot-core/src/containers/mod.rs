//! Typed state containers.

pub mod map;
pub mod value;
pub mod vec;

pub use map::StateMap;
pub use value::StateValue;
pub use vec::StateVec;
