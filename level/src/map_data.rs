use std::collections::HashSet;

use glam::Vec2;
use log::{info, warn};
use math::{Angle, BBox, Line2};
use thiserror::Error;

use crate::flags::LineDefFlags;
use crate::map_defs::{LineDef, Node, NodeChild, Sector, Segment, SideDef, SubSector, Thing};
use crate::pic::PicData;
use crate::raw::{MapRecords, RawLineDef, RawNode, RawSector, RawSegment, RawSideDef, RawSubSector};

/// Fatal problems found while linking map records. Maps that fail with one
/// of these can not be traversed.
#[derive(Debug, Error, PartialEq)]
pub enum MapError {
    #[error("Map {map} has no {what}")]
    Empty { map: String, what: &'static str },
    #[error("Node {node} has a zero length partition line")]
    ZeroPartition { node: usize },
    #[error("Node {node} references missing {kind} {index}")]
    DanglingChild {
        node: usize,
        kind: &'static str,
        index: usize,
    },
    #[error("Node {node} is referenced more than once, the tree has a loop")]
    RepeatedNode { node: usize },
    #[error("Subsector {subsector} seg range {start}..{end} exceeds {len} segs")]
    SegRange {
        subsector: usize,
        start: usize,
        end: usize,
        len: usize,
    },
}

/// The smallest vector and the largest vertex, combined make up a
/// rectangle enclosing the level area
#[derive(Debug, Default, Clone)]
pub struct MapExtents {
    pub min_vertex: Vec2,
    pub max_vertex: Vec2,
    pub width: f32,
    pub height: f32,
    pub min_floor: f32,
    pub max_ceiling: f32,
}

/// A linked and validated map. Everything the renderer walks is here:
/// `nodes`, `subsectors` and `segments` for the BSP, `sectors` and
/// `sidedefs` for heights and textures.
///
/// Read only once built. Cross references are plain indices which
/// `MapData::new` has checked.
#[derive(Debug, Default, Clone)]
pub struct MapData {
    name: String,
    things: Vec<Thing>,
    vertexes: Vec<Vec2>,
    linedefs: Vec<LineDef>,
    sectors: Vec<Sector>,
    sidedefs: Vec<SideDef>,
    subsectors: Vec<SubSector>,
    segments: Vec<Segment>,
    nodes: Vec<Node>,
    root: Option<NodeChild>,
    extents: MapExtents,
}

/// Clamp a bad reference to 0, logging it
fn checked_index(index: usize, len: usize, what: &str, owner: &str, num: usize) -> usize {
    if index < len {
        return index;
    }
    warn!("{owner} {num}: {what} {index} out of range ({len}), using 0");
    0
}

/// Resolves texture names against `PicData`, warning once per missing name
struct TexResolver<'a> {
    pic_data: &'a PicData,
    missing: HashSet<String>,
}

impl<'a> TexResolver<'a> {
    fn new(pic_data: &'a PicData) -> Self {
        Self {
            pic_data,
            missing: HashSet::new(),
        }
    }

    fn wall(&mut self, name: &str) -> Option<usize> {
        if name.is_empty() || name == "-" {
            return None;
        }
        let num = self.pic_data.wallpic_num_for_name(name);
        if num.is_none() && self.missing.insert(name.to_ascii_uppercase()) {
            warn!("Did not find wall texture {name}, surfaces using it are skipped");
        }
        num
    }

    fn flat(&mut self, name: &str) -> Option<usize> {
        let num = self.pic_data.flat_num_for_name(name);
        if num.is_none() && self.missing.insert(name.to_ascii_uppercase()) {
            warn!("Did not find flat {name}, planes using it are skipped");
        }
        num
    }
}

impl MapData {
    /// Link and validate the records. Out of range sector, sidedef and vertex
    /// references are replaced with index 0 (or dropped for optional
    /// references) and logged. A broken BSP tree or a map with nothing in it
    /// is an error.
    pub fn new(records: MapRecords, pic_data: &PicData) -> Result<Self, MapError> {
        let map = records.name.clone();
        let empty = |what| MapError::Empty {
            map: map.clone(),
            what,
        };
        if records.vertexes.is_empty() {
            return Err(empty("vertexes"));
        }
        if records.sectors.is_empty() {
            return Err(empty("sectors"));
        }
        if records.sidedefs.is_empty() {
            return Err(empty("sidedefs"));
        }
        if records.linedefs.is_empty() {
            return Err(empty("linedefs"));
        }
        if records.segments.is_empty() {
            return Err(empty("segments"));
        }
        if records.subsectors.is_empty() {
            return Err(empty("subsectors"));
        }

        let mut textures = TexResolver::new(pic_data);
        let mut data = MapData {
            name: records.name,
            ..MapData::default()
        };
        data.vertexes = records.vertexes;
        data.load_sectors(&records.sectors, &mut textures);
        data.load_sidedefs(&records.sidedefs, &mut textures);
        data.load_linedefs(&records.linedefs);
        data.load_segments(&records.segments);
        data.load_subsectors(&records.subsectors)?;
        // Should always be last to ensure subsectors are known
        data.load_nodes(&records.nodes)?;
        data.things = records
            .things
            .iter()
            .map(|t| Thing {
                xy: Vec2::new(t.x, t.y),
                angle: Angle::from_bams(t.angle),
                kind: t.kind,
                flags: t.flags,
            })
            .collect();
        data.set_extents();

        info!(
            "{}: Loaded {} sectors, {} linedefs, {} segs, {} subsectors, {} nodes, {} things",
            data.name,
            data.sectors.len(),
            data.linedefs.len(),
            data.segments.len(),
            data.subsectors.len(),
            data.nodes.len(),
            data.things.len()
        );
        Ok(data)
    }

    fn load_sectors(&mut self, sectors: &[RawSector], textures: &mut TexResolver) {
        self.sectors = sectors
            .iter()
            .enumerate()
            .map(|(i, s)| Sector {
                num: i as u32,
                floorheight: s.floor_height,
                ceilingheight: s.ceil_height,
                floorpic: textures.flat(&s.floor_tex),
                ceilingpic: textures.flat(&s.ceil_tex),
                lightlevel: s.light_level as usize,
                special: s.kind,
                tag: s.tag,
            })
            .collect();
    }

    fn load_sidedefs(&mut self, sidedefs: &[RawSideDef], textures: &mut TexResolver) {
        let num_sectors = self.sectors.len();
        self.sidedefs = sidedefs
            .iter()
            .enumerate()
            .map(|(i, s)| SideDef {
                textureoffset: s.x_offset,
                rowoffset: s.y_offset,
                toptexture: textures.wall(&s.upper_tex),
                bottomtexture: textures.wall(&s.lower_tex),
                midtexture: textures.wall(&s.middle_tex),
                sector: checked_index(s.sector, num_sectors, "sector", "Sidedef", i),
            })
            .collect();
    }

    fn load_linedefs(&mut self, linedefs: &[RawLineDef]) {
        let num_vertexes = self.vertexes.len();
        let num_sides = self.sidedefs.len();
        self.linedefs = linedefs
            .iter()
            .enumerate()
            .map(|(num, l)| {
                let v1 = self.vertexes
                    [checked_index(l.start_vertex, num_vertexes, "vertex", "Linedef", num)];
                let v2 = self.vertexes
                    [checked_index(l.end_vertex, num_vertexes, "vertex", "Linedef", num)];
                let front = checked_index(l.front_sidedef, num_sides, "sidedef", "Linedef", num);

                let mut flags = l.flags;
                let back = match l.back_sidedef {
                    Some(back) if back >= num_sides => {
                        warn!("Linedef {num}: back sidedef {back} out of range, dropped");
                        None
                    }
                    back => back,
                };
                let back = if LineDefFlags::TwoSided.is_set(flags) {
                    if back.is_none() {
                        warn!("Linedef {num}: two sided without a back side, made one sided");
                        flags &= !(LineDefFlags::TwoSided as u32);
                    }
                    back
                } else {
                    None
                };

                LineDef {
                    v1,
                    v2,
                    delta: v2 - v1,
                    flags,
                    special: l.special,
                    tag: l.sector_tag,
                    bbox: BBox::new(v1, v2),
                    front_sidedef: front,
                    back_sidedef: back,
                    frontsector: self.sidedefs[front].sector,
                    backsector: back.map(|b| self.sidedefs[b].sector),
                }
            })
            .collect();
    }

    fn load_segments(&mut self, segments: &[RawSegment]) {
        let num_vertexes = self.vertexes.len();
        let num_lines = self.linedefs.len();
        self.segments = segments
            .iter()
            .enumerate()
            .map(|(num, s)| {
                let v1 =
                    self.vertexes[checked_index(s.start_vertex, num_vertexes, "vertex", "Seg", num)];
                let v2 =
                    self.vertexes[checked_index(s.end_vertex, num_vertexes, "vertex", "Seg", num)];
                let line_num = checked_index(s.linedef, num_lines, "linedef", "Seg", num);
                let linedef = &self.linedefs[line_num];

                let mut side = s.side.min(1);
                if side == 1 && linedef.back_sidedef.is_none() {
                    warn!("Seg {num}: runs along the back of one sided linedef {line_num}");
                    side = 0;
                }
                let sides = [Some(linedef.front_sidedef), linedef.back_sidedef];
                let sidedef = sides[side].unwrap_or(linedef.front_sidedef);
                let backsector = sides[side ^ 1].map(|b| self.sidedefs[b].sector);

                Segment {
                    v1,
                    v2,
                    offset: s.offset,
                    angle: Angle::from_vector(v2 - v1),
                    sidedef,
                    linedef: line_num,
                    side,
                    frontsector: self.sidedefs[sidedef].sector,
                    backsector,
                }
            })
            .collect();
    }

    fn load_subsectors(&mut self, subsectors: &[RawSubSector]) -> Result<(), MapError> {
        let len = self.segments.len();
        let mut out = Vec::with_capacity(subsectors.len());
        for (i, s) in subsectors.iter().enumerate() {
            let start = s.start_seg as usize;
            let end = start + s.seg_count as usize;
            if s.seg_count == 0 || end > len {
                return Err(MapError::SegRange {
                    subsector: i,
                    start,
                    end,
                    len,
                });
            }
            out.push(SubSector {
                sector: self.segments[start].frontsector,
                seg_count: s.seg_count,
                start_seg: s.start_seg,
            });
        }
        self.subsectors = out;
        Ok(())
    }

    fn load_nodes(&mut self, nodes: &[RawNode]) -> Result<(), MapError> {
        let num_nodes = nodes.len();
        let num_subs = self.subsectors.len();
        // Each node may only be the child of one other node, and the root of
        // none. With that a walk from the root always terminates.
        let mut referenced = vec![false; num_nodes];
        let mut out = Vec::with_capacity(num_nodes);

        for (i, n) in nodes.iter().enumerate() {
            let partition = Line2::new(Vec2::new(n.x, n.y), Vec2::new(n.dx, n.dy));
            if partition.is_degenerate() {
                return Err(MapError::ZeroPartition { node: i });
            }
            let children = [
                NodeChild::from_raw(n.children[0]),
                NodeChild::from_raw(n.children[1]),
            ];
            for child in children {
                match child {
                    NodeChild::Node(index) => {
                        if index >= num_nodes {
                            return Err(MapError::DanglingChild {
                                node: i,
                                kind: "node",
                                index,
                            });
                        }
                        if referenced[index] || index == num_nodes - 1 {
                            return Err(MapError::RepeatedNode { node: index });
                        }
                        referenced[index] = true;
                    }
                    NodeChild::SubSector(index) => {
                        if index >= num_subs {
                            return Err(MapError::DanglingChild {
                                node: i,
                                kind: "subsector",
                                index,
                            });
                        }
                    }
                }
            }
            out.push(Node {
                partition,
                bboxes: n.bboxes,
                children,
            });
        }

        self.nodes = out;
        // A single subsector map has no nodes at all
        self.root = Some(if num_nodes == 0 {
            NodeChild::SubSector(0)
        } else {
            NodeChild::Node(num_nodes - 1)
        });
        Ok(())
    }

    fn set_extents(&mut self) {
        let bbox = BBox::from_points(self.vertexes.iter().copied());
        self.extents.min_vertex = Vec2::new(bbox.left, bbox.bottom);
        self.extents.max_vertex = Vec2::new(bbox.right, bbox.top);
        self.extents.width = bbox.width();
        self.extents.height = bbox.height();

        self.extents.min_floor = self
            .sectors
            .iter()
            .map(|s| s.floorheight)
            .fold(f32::INFINITY, f32::min);
        self.extents.max_ceiling = self
            .sectors
            .iter()
            .map(|s| s.ceilingheight)
            .fold(f32::NEG_INFINITY, f32::max);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn things(&self) -> &[Thing] {
        &self.things
    }

    pub fn vertexes(&self) -> &[Vec2] {
        &self.vertexes
    }

    pub fn linedefs(&self) -> &[LineDef] {
        &self.linedefs
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn sidedefs(&self) -> &[SideDef] {
        &self.sidedefs
    }

    pub fn subsectors(&self) -> &[SubSector] {
        &self.subsectors
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get_nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Where every BSP walk starts
    pub fn start_node(&self) -> NodeChild {
        self.root.unwrap_or(NodeChild::SubSector(0))
    }

    pub fn get_map_extents(&self) -> &MapExtents {
        &self.extents
    }

    /// Segs bounding the subsector
    pub fn subsector_segs(&self, subsector: usize) -> &[Segment] {
        self.subsectors
            .get(subsector)
            .map(|s| &self.segments[s.seg_range()])
            .unwrap_or(&[])
    }

    /// R_PointInSubsector
    pub fn point_in_subsector(&self, point: Vec2) -> usize {
        let mut child = self.start_node();
        loop {
            match child {
                NodeChild::SubSector(index) => return index,
                NodeChild::Node(index) => {
                    let node = &self.nodes[index];
                    child = node.children[node.point_on_side(point)];
                }
            }
        }
    }

    /// The sector a point is in, used to find floor height under the viewer
    pub fn point_in_sector(&self, point: Vec2) -> &Sector {
        let ss = &self.subsectors[self.point_in_subsector(point)];
        &self.sectors[ss.sector]
    }
}
