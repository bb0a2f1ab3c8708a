use glam::Vec2;
use math::BBox;

use crate::map_data::MapData;
use crate::map_defs::{Node, NodeChild};

impl Node {
    /// R_PointOnSide
    ///
    /// Determine with cross-product which side of a splitting line the point
    /// is on. 0 is the right (front) child.
    #[inline]
    pub fn point_on_side(&self, v: Vec2) -> usize {
        self.partition.point_on_side(v)
    }

    pub fn point_in_bounds(&self, v: Vec2, side: usize) -> bool {
        self.bboxes[side].contains(v)
    }
}

/// Receives subsectors from `MapData::traverse_bsp` nearest first
pub trait BspVisitor {
    /// Asked before descending in to the far side of a split. Returning
    /// false skips everything under it.
    fn bbox_visible(&mut self, _bbox: &BBox) -> bool {
        true
    }

    fn visit_subsector(&mut self, map: &MapData, subsector: usize);
}

impl MapData {
    /// Walk the BSP tree front to back as seen from `point`. Subsectors come
    /// out in near to far order without any sorting.
    pub fn traverse_bsp(&self, point: Vec2, visitor: &mut impl BspVisitor) {
        self.traverse_child(self.start_node(), point, visitor);
    }

    fn traverse_child(&self, child: NodeChild, point: Vec2, visitor: &mut impl BspVisitor) {
        match child {
            NodeChild::SubSector(index) => visitor.visit_subsector(self, index),
            NodeChild::Node(index) => {
                let node = &self.get_nodes()[index];
                let side = node.point_on_side(point);
                self.traverse_child(node.children[side], point, visitor);
                // Doom's trick: the far side is the other index
                if visitor.bbox_visible(&node.bboxes[side ^ 1]) {
                    self.traverse_child(node.children[side ^ 1], point, visitor);
                }
            }
        }
    }
}
