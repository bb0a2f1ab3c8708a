//! A small built in map and matching pictures, enough to exercise every
//! surface type without a WAD: an open sky courtyard with a lower roofed
//! room in the middle. The room's walls are two sided with only an upper
//! texture, so the inside is visible from the courtyard.
//!
//! ```text
//!  OA(-512,512)  v8          v9        OB(512,512)
//!      +---------+-----------+---------+
//!      |         |    S2     |         |
//!      |         IA---------IB         |
//!      |   S0    |  S4 room  |   S1    |
//!      |         ID---------IC         |
//!      |         |    S3     |         |
//!      +---------+-----------+---------+
//!  OD(-512,-512) v11         v10       OC(512,-512)
//! ```

use glam::Vec2;
use math::BBox;

use crate::map_data::{MapData, MapError};
use crate::map_defs::IS_SSECTOR_MASK;
use crate::pic::{FlatPic, PicData, Picture, SpritePic, WallPic, argb};
use crate::raw::{
    MapRecords, RawLineDef, RawNode, RawSector, RawSegment, RawSideDef, RawSubSector, RawThing,
};

pub const PLAYER_START: u16 = 1;
pub const IMP: u16 = 3001;
pub const BARREL: u16 = 2035;

pub const COURTYARD_FLOOR: f32 = 0.0;
pub const COURTYARD_CEILING: f32 = 192.0;
pub const ROOM_CEILING: f32 = 128.0;

/// Rendered height of the imp sprite in map units
pub const IMP_HEIGHT: f32 = 56.0;
pub const BARREL_HEIGHT: f32 = 32.0;

/// Sprite name and render height for the thing kinds this map uses. Frame
/// and rotation selection is fixed to the first front facing frame.
pub fn sprite_for_kind(kind: u16) -> Option<(&'static str, f32)> {
    match kind {
        IMP => Some(("TROOA1", IMP_HEIGHT)),
        BARREL => Some(("BAR1A0", BARREL_HEIGHT)),
        _ => None,
    }
}

fn bbox(left: f32, bottom: f32, right: f32, top: f32) -> BBox {
    BBox::new(Vec2::new(left, bottom), Vec2::new(right, top))
}

fn sector(floor: f32, ceil: f32, floor_tex: &str, ceil_tex: &str, light: u8) -> RawSector {
    RawSector {
        floor_height: floor,
        ceil_height: ceil,
        floor_tex: floor_tex.to_string(),
        ceil_tex: ceil_tex.to_string(),
        light_level: light,
        kind: 0,
        tag: 0,
    }
}

fn side(upper: &str, lower: &str, middle: &str, sector: usize) -> RawSideDef {
    RawSideDef {
        x_offset: 0.0,
        y_offset: 0.0,
        upper_tex: upper.to_string(),
        lower_tex: lower.to_string(),
        middle_tex: middle.to_string(),
        sector,
    }
}

fn line(start: usize, end: usize, flags: u32, front: usize, back: Option<usize>) -> RawLineDef {
    RawLineDef {
        start_vertex: start,
        end_vertex: end,
        flags,
        special: 0,
        sector_tag: 0,
        front_sidedef: front,
        back_sidedef: back,
    }
}

fn seg(start: usize, end: usize, linedef: usize, side: usize) -> RawSegment {
    RawSegment {
        start_vertex: start,
        end_vertex: end,
        linedef,
        side,
        offset: 0.0,
    }
}

fn node(origin: Vec2, delta: Vec2, bboxes: [BBox; 2], children: [u32; 2]) -> RawNode {
    RawNode {
        x: origin.x,
        y: origin.y,
        dx: delta.x,
        dy: delta.y,
        bboxes,
        children,
    }
}

/// Unlinked records for the courtyard map
pub fn courtyard_records() -> MapRecords {
    // Outer ring, then the room, then where the partitions meet the outer
    // walls
    let vertexes = vec![
        Vec2::new(-512.0, 512.0),  // 0 OA
        Vec2::new(512.0, 512.0),   // 1 OB
        Vec2::new(512.0, -512.0),  // 2 OC
        Vec2::new(-512.0, -512.0), // 3 OD
        Vec2::new(-128.0, 128.0),  // 4 IA
        Vec2::new(128.0, 128.0),   // 5 IB
        Vec2::new(128.0, -128.0),  // 6 IC
        Vec2::new(-128.0, -128.0), // 7 ID
        Vec2::new(-128.0, 512.0),  // 8
        Vec2::new(128.0, 512.0),   // 9
        Vec2::new(128.0, -512.0),  // 10
        Vec2::new(-128.0, -512.0), // 11
    ];

    let sectors = vec![
        sector(COURTYARD_FLOOR, COURTYARD_CEILING, "FLOOR4_8", "F_SKY1", 160),
        sector(COURTYARD_FLOOR, ROOM_CEILING, "FLOOR4_8", "CEIL3_5", 208),
    ];

    let sidedefs = vec![
        side("-", "-", "STARTAN3", 0),
        // room walls seen from the courtyard
        side("STARTAN3", "-", "-", 0),
        // and from inside
        side("-", "-", "-", 1),
    ];

    const BLOCKING: u32 = 1;
    const TWO_SIDED: u32 = 1 << 2;
    let linedefs = vec![
        line(0, 8, BLOCKING, 0, None),   // 0 north, west part
        line(8, 9, BLOCKING, 0, None),   // 1 north, middle
        line(9, 1, BLOCKING, 0, None),   // 2 north, east part
        line(1, 2, BLOCKING, 0, None),   // 3 east
        line(2, 10, BLOCKING, 0, None),  // 4 south, east part
        line(10, 11, BLOCKING, 0, None), // 5 south, middle
        line(11, 3, BLOCKING, 0, None),  // 6 south, west part
        line(3, 0, BLOCKING, 0, None),   // 7 west
        line(4, 7, TWO_SIDED, 1, Some(2)), // 8 room west
        line(7, 6, TWO_SIDED, 1, Some(2)), // 9 room south
        line(6, 5, TWO_SIDED, 1, Some(2)), // 10 room east
        line(5, 4, TWO_SIDED, 1, Some(2)), // 11 room north
    ];

    let segments = vec![
        // S0, west strip
        seg(3, 0, 7, 0),
        seg(0, 8, 0, 0),
        seg(4, 7, 8, 0),
        seg(11, 3, 6, 0),
        // S1, east strip
        seg(9, 1, 2, 0),
        seg(1, 2, 3, 0),
        seg(2, 10, 4, 0),
        seg(6, 5, 10, 0),
        // S2, north strip
        seg(8, 9, 1, 0),
        seg(5, 4, 11, 0),
        // S3, south strip
        seg(10, 11, 5, 0),
        seg(7, 6, 9, 0),
        // S4, the room, all backs of the room lines
        seg(7, 4, 8, 1),
        seg(6, 7, 9, 1),
        seg(5, 6, 10, 1),
        seg(4, 5, 11, 1),
    ];

    let subsectors = vec![
        RawSubSector {
            start_seg: 0,
            seg_count: 4,
        },
        RawSubSector {
            start_seg: 4,
            seg_count: 4,
        },
        RawSubSector {
            start_seg: 8,
            seg_count: 2,
        },
        RawSubSector {
            start_seg: 10,
            seg_count: 2,
        },
        RawSubSector {
            start_seg: 12,
            seg_count: 4,
        },
    ];

    let ss = |n: u32| n | IS_SSECTOR_MASK;
    let nodes = vec![
        // 0: splits the room (left) from the south strip (right)
        node(
            Vec2::new(-128.0, -128.0),
            Vec2::new(256.0, 0.0),
            [
                bbox(-128.0, -512.0, 128.0, -128.0),
                bbox(-128.0, -128.0, 128.0, 128.0),
            ],
            [ss(3), ss(4)],
        ),
        // 1: north strip on the right
        node(
            Vec2::new(128.0, 128.0),
            Vec2::new(-256.0, 0.0),
            [
                bbox(-128.0, 128.0, 128.0, 512.0),
                bbox(-128.0, -512.0, 128.0, 128.0),
            ],
            [ss(2), 0],
        ),
        // 2: east strip on the right
        node(
            Vec2::new(128.0, -128.0),
            Vec2::new(0.0, 256.0),
            [
                bbox(128.0, -512.0, 512.0, 512.0),
                bbox(-128.0, -512.0, 128.0, 512.0),
            ],
            [ss(1), 1],
        ),
        // 3, root: west strip on the right
        node(
            Vec2::new(-128.0, 128.0),
            Vec2::new(0.0, -256.0),
            [
                bbox(-512.0, -512.0, -128.0, 512.0),
                bbox(-128.0, -512.0, 512.0, 512.0),
            ],
            [ss(0), 2],
        ),
    ];

    let things = vec![
        RawThing {
            x: -400.0,
            y: 0.0,
            angle: 0,
            kind: PLAYER_START,
            flags: 7,
        },
        RawThing {
            x: 0.0,
            y: 0.0,
            angle: 0x8000,
            kind: IMP,
            flags: 7,
        },
        RawThing {
            x: -300.0,
            y: 300.0,
            angle: 0,
            kind: BARREL,
            flags: 7,
        },
    ];

    MapRecords {
        name: "COURTYARD".to_string(),
        vertexes,
        sectors,
        sidedefs,
        linedefs,
        segments,
        subsectors,
        nodes,
        things,
    }
}

/// Pictures referenced by the courtyard map, generated rather than decoded
pub fn sample_pics() -> PicData {
    let mut pics = PicData::default();
    pics.add_wall(brick_wall());
    pics.add_wall(sky());
    pics.add_flat(floor_tiles());
    pics.add_flat(ceiling_panels());
    pics.add_flat(FlatPic::from_fn("F_SKY1", 64, 64, |_, _| {
        argb(255, 0, 0, 255)
    }));
    pics.add_sprite(imp());
    pics.add_sprite(barrel());
    pics
}

/// The courtyard linked against `pics`
pub fn courtyard(pics: &PicData) -> Result<MapData, MapError> {
    MapData::new(courtyard_records(), pics)
}

fn brick_wall() -> WallPic {
    Picture::from_fn("STARTAN3", 64, 128, |x, y| {
        let row = y / 16;
        let offset = if row % 2 == 0 { 0 } else { 16 };
        let mortar = y % 16 == 15 || (x + offset) % 32 == 31;
        if mortar {
            argb(255, 90, 90, 90)
        } else {
            let shade = (row * 7 % 24) as u8;
            argb(255, 150 + shade, 140 + shade, 120)
        }
    })
}

fn sky() -> WallPic {
    Picture::from_fn("SKY1", 256, 128, |x, y| {
        // A low hill line so horizontal scrolling is visible
        let hill = 96 + ((x as f32 / 256.0 * std::f32::consts::TAU * 3.0).sin() * 12.0) as usize;
        if y >= hill {
            argb(255, 40, 70, 40)
        } else {
            let b = 255 - (y as u32 * 80 / 128) as u8;
            argb(255, 100, 140, b)
        }
    })
}

fn floor_tiles() -> FlatPic {
    Picture::from_fn("FLOOR4_8", 64, 64, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            argb(255, 110, 100, 90)
        } else {
            argb(255, 70, 64, 58)
        }
    })
}

fn ceiling_panels() -> FlatPic {
    Picture::from_fn("CEIL3_5", 64, 64, |x, y| {
        if x % 32 == 0 || y % 32 == 0 {
            argb(255, 40, 40, 40)
        } else {
            argb(255, 120, 120, 130)
        }
    })
}

fn imp() -> SpritePic {
    // Two pixels of transparent border all round
    Picture::from_fn("TROOA1", 32, 56, |x, y| {
        if !(2..30).contains(&x) || !(2..54).contains(&y) {
            0
        } else if y < 14 {
            argb(255, 200, 60, 40)
        } else {
            argb(255, 140, 90, 50)
        }
    })
    .with_left_offset(16)
}

fn barrel() -> SpritePic {
    Picture::from_fn("BAR1A0", 24, 32, |x, _| {
        if !(1..23).contains(&x) {
            0
        } else {
            argb(255, 60, 160, 60)
        }
    })
    .with_left_offset(12)
}
