//! Planar geometry utilities for map-derived fault traces.

pub mod geom;

pub use geom::bounds::*;
pub use geom::point::*;
pub use geom::shape::*;
pub use geom::stats;
