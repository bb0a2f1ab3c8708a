use glam::Vec2;
use math::{Angle, BBox, Line2};

use crate::flags::LineDefFlags;

/// High bit marking a BSP child as a subsector in the 16 bit node format
pub const IS_OLD_SSECTOR_MASK: u32 = 0x8000;
/// High bit marking a BSP child as a subsector in the extended node format
pub const IS_SSECTOR_MASK: u32 = 0x8000_0000;

/// The SECTORS record, at runtime
#[derive(Debug, Default, Clone)]
pub struct Sector {
    /// An incremented "ID" of sorts.
    pub num: u32,
    pub floorheight: f32,
    pub ceilingheight: f32,
    /// Index in to `PicData` flats, `None` if the flat was not found
    pub floorpic: Option<usize>,
    /// Index in to `PicData` flats, `None` if the flat was not found
    pub ceilingpic: Option<usize>,
    /// 0-255
    pub lightlevel: usize,
    pub special: i16,
    pub tag: i16,
}

#[derive(Debug, Default, Clone)]
pub struct SideDef {
    // add this to the calculated texture column
    pub textureoffset: f32,
    // add this to the calculated texture top
    pub rowoffset: f32,
    pub toptexture: Option<usize>,
    pub bottomtexture: Option<usize>,
    pub midtexture: Option<usize>,
    /// Sector the SideDef is facing
    pub sector: usize,
}

#[derive(Debug, Clone)]
pub struct LineDef {
    // Vertices, from v1 to v2.
    pub v1: Vec2,
    pub v2: Vec2,
    // Precalculated v2 - v1 for side checking.
    pub delta: Vec2,
    pub flags: u32,
    pub special: i16,
    pub tag: i16,
    pub bbox: BBox,
    pub front_sidedef: usize,
    /// Only set when the line is flagged `TwoSided`
    pub back_sidedef: Option<usize>,
    pub frontsector: usize,
    pub backsector: Option<usize>,
}

impl LineDef {
    #[inline]
    pub fn line(&self) -> Line2 {
        Line2::new(self.v1, self.delta)
    }

    #[inline]
    pub const fn is_two_sided(&self) -> bool {
        LineDefFlags::TwoSided.is_set(self.flags)
    }

    /// 0 for the front (right) side, 1 for the back
    pub fn point_on_side(&self, v: Vec2) -> usize {
        self.line().point_on_side(v)
    }
}

/// A directed piece of a linedef bounding one subsector
#[derive(Debug, Clone)]
pub struct Segment {
    // Vertices, from v1 to v2.
    pub v1: Vec2,
    pub v2: Vec2,
    /// Offset distance along the linedef (from `start_vertex`) to the start
    /// of this `Segment`
    pub offset: f32,
    pub angle: Angle,
    pub sidedef: usize,
    /// The Linedef this segment travels along. During drawing it is used for
    /// finding flags.
    pub linedef: usize,
    /// 0 if running along the front of the linedef, 1 for the back
    pub side: usize,
    pub frontsector: usize,
    /// `Some` only when the linedef is two sided
    pub backsector: Option<usize>,
}

impl Segment {
    /// Helper to recalculate the offset of a seg along the linedef line it
    /// is derived from
    pub fn recalc_offset(v1: Vec2, v2: Vec2) -> f32 {
        v1.distance(v2)
    }

    #[inline]
    pub fn line(&self) -> Line2 {
        Line2::from_points(self.v1, self.v2)
    }

    /// True if the right side of the segment faces the point
    #[inline]
    pub fn is_facing_point(&self, point: Vec2) -> bool {
        self.line().side_of_point(point) < 0.0
    }

    #[inline]
    pub fn point_on_side(&self, v: Vec2) -> usize {
        self.line().point_on_side(v)
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.v1.distance(self.v2)
    }
}

#[derive(Debug, Clone)]
pub struct SubSector {
    pub sector: usize,
    /// How many `Segment`s line this `SubSector`
    pub seg_count: u32,
    /// The `Segment` to start with
    pub start_seg: u32,
}

impl SubSector {
    #[inline]
    pub fn seg_range(&self) -> std::ops::Range<usize> {
        self.start_seg as usize..(self.start_seg + self.seg_count) as usize
    }
}

/// One side of a BSP split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeChild {
    Node(usize),
    SubSector(usize),
}

impl NodeChild {
    /// Decode the extended (32 bit) child format
    pub const fn from_raw(raw: u32) -> Self {
        // Some node builders mark a lone subsector with all bits set
        if raw == u32::MAX {
            return NodeChild::SubSector(0);
        }
        if raw & IS_SSECTOR_MASK != 0 {
            NodeChild::SubSector((raw & !IS_SSECTOR_MASK) as usize)
        } else {
            NodeChild::Node(raw as usize)
        }
    }

    /// Decode the vanilla (16 bit) child format
    pub const fn from_raw_u16(raw: u16) -> Self {
        if raw == u16::MAX {
            return NodeChild::SubSector(0);
        }
        let raw = raw as u32;
        if raw & IS_OLD_SSECTOR_MASK != 0 {
            NodeChild::SubSector((raw & !IS_OLD_SSECTOR_MASK) as usize)
        } else {
            NodeChild::Node(raw as usize)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The line used for splitting the level
    pub partition: Line2,
    /// Bounding boxes of the right (0) and left (1) children
    pub bboxes: [BBox; 2],
    /// Right (front) child first, then left (back)
    pub children: [NodeChild; 2],
}

/// Spawn point of something in the map. The renderer never reads these
/// directly, callers turn them in to sprite sources.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thing {
    pub xy: Vec2,
    pub angle: Angle,
    pub kind: u16,
    pub flags: u16,
}
