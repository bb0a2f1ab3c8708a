//! Static level data: the linked map (sectors, lines, segs, BSP nodes and
//! subsectors), the walk over its BSP tree, and the pictures surfaces are
//! textured with.

pub mod flags;
pub mod map_data;
pub mod map_defs;
pub mod node;
pub mod pic;
pub mod raw;
pub mod samples;

#[cfg(test)]
mod tests;

pub use flags::LineDefFlags;
pub use log;
pub use map_data::{MapData, MapError, MapExtents};
pub use map_defs::{
    IS_OLD_SSECTOR_MASK, IS_SSECTOR_MASK, LineDef, Node, NodeChild, Sector, Segment, SideDef,
    SubSector, Thing,
};
pub use node::BspVisitor;
pub use pic::{FlatPic, PicData, Picture, SpritePic, WallPic};
pub use raw::MapRecords;
