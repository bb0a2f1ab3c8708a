//! Map records as an external loader hands them over: plain indices and
//! texture names, nothing resolved or checked yet. `MapData::new` turns a
//! `MapRecords` in to a linked and validated map.

use glam::Vec2;
use math::BBox;

#[derive(Debug, Clone)]
pub struct RawSector {
    pub floor_height: f32,
    pub ceil_height: f32,
    pub floor_tex: String,
    pub ceil_tex: String,
    pub light_level: u8,
    pub kind: i16,
    pub tag: i16,
}

#[derive(Debug, Clone)]
pub struct RawSideDef {
    pub x_offset: f32,
    pub y_offset: f32,
    /// "-" for no texture
    pub upper_tex: String,
    pub lower_tex: String,
    pub middle_tex: String,
    pub sector: usize,
}

#[derive(Debug, Clone)]
pub struct RawLineDef {
    pub start_vertex: usize,
    pub end_vertex: usize,
    pub flags: u32,
    pub special: i16,
    pub sector_tag: i16,
    pub front_sidedef: usize,
    pub back_sidedef: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct RawSegment {
    pub start_vertex: usize,
    pub end_vertex: usize,
    pub linedef: usize,
    /// 0 = front of the linedef, 1 = back
    pub side: usize,
    pub offset: f32,
}

#[derive(Debug, Clone)]
pub struct RawSubSector {
    pub seg_count: u32,
    pub start_seg: u32,
}

#[derive(Debug, Clone)]
pub struct RawNode {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    /// Right box first, then left
    pub bboxes: [BBox; 2],
    /// Extended child encoding, subsectors marked with `IS_SSECTOR_MASK`
    pub children: [u32; 2],
}

#[derive(Debug, Clone)]
pub struct RawThing {
    pub x: f32,
    pub y: f32,
    /// Binary angle
    pub angle: u16,
    pub kind: u16,
    pub flags: u16,
}

/// Everything needed to build a `MapData`
#[derive(Debug, Clone, Default)]
pub struct MapRecords {
    pub name: String,
    pub vertexes: Vec<Vec2>,
    pub sectors: Vec<RawSector>,
    pub sidedefs: Vec<RawSideDef>,
    pub linedefs: Vec<RawLineDef>,
    pub segments: Vec<RawSegment>,
    pub subsectors: Vec<RawSubSector>,
    /// The last node is the root of the tree
    pub nodes: Vec<RawNode>,
    pub things: Vec<RawThing>,
}
