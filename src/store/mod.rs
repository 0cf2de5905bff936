//! Point and edge storage.

pub mod points;
pub mod edges;

pub use points::PointStore;
pub use edges::EdgeStore;
