use crate::map_data::MapData;
use crate::node::BspVisitor;
use crate::samples::{courtyard, sample_pics};
use glam::Vec2;
use math::BBox;

/// Centre of each subsector's region in the courtyard map
const REGION_CENTRES: [Vec2; 5] = [
    Vec2::new(-320.0, 0.0),
    Vec2::new(320.0, 0.0),
    Vec2::new(0.0, 320.0),
    Vec2::new(0.0, -320.0),
    Vec2::new(0.0, 0.0),
];

#[derive(Default)]
struct Collect {
    order: Vec<usize>,
    prune: bool,
}

impl BspVisitor for Collect {
    fn bbox_visible(&mut self, _bbox: &BBox) -> bool {
        !self.prune
    }

    fn visit_subsector(&mut self, _map: &MapData, subsector: usize) {
        self.order.push(subsector);
    }
}

fn walk(map: &MapData, from: Vec2) -> Vec<usize> {
    let mut visitor = Collect::default();
    map.traverse_bsp(from, &mut visitor);
    visitor.order
}

#[test]
fn near_to_far_from_the_west() {
    let map = courtyard(&sample_pics()).unwrap();
    let from = Vec2::new(-400.0, 0.0);
    let order = walk(&map, from);
    assert_eq!(order, vec![0, 4, 3, 2, 1]);

    let dist: Vec<f32> = order
        .iter()
        .map(|&ss| REGION_CENTRES[ss].distance(from))
        .collect();
    for pair in dist.windows(2) {
        assert!(pair[1] + 1e-3 >= pair[0], "{dist:?}");
    }
}

#[test]
fn near_to_far_from_the_north_east() {
    let map = courtyard(&sample_pics()).unwrap();
    let from = Vec2::new(300.0, 300.0);
    let order = walk(&map, from);
    assert_eq!(order, vec![1, 2, 4, 3, 0]);

    let dist: Vec<f32> = order
        .iter()
        .map(|&ss| REGION_CENTRES[ss].distance(from))
        .collect();
    for pair in dist.windows(2) {
        assert!(pair[1] + 1e-3 >= pair[0], "{dist:?}");
    }
}

#[test]
fn every_subsector_once_starting_where_the_viewer_is() {
    let map = courtyard(&sample_pics()).unwrap();
    let mut y = -500.0;
    while y < 500.0 {
        let mut x = -500.0;
        while x < 500.0 {
            let from = Vec2::new(x, y);
            let mut order = walk(&map, from);
            assert_eq!(order[0], map.point_in_subsector(from));
            order.sort_unstable();
            assert_eq!(order, vec![0, 1, 2, 3, 4]);
            x += 77.0;
        }
        y += 91.0;
    }
}

#[test]
fn pruned_far_sides_are_skipped() {
    let map = courtyard(&sample_pics()).unwrap();
    let mut visitor = Collect {
        prune: true,
        ..Collect::default()
    };
    map.traverse_bsp(Vec2::new(-400.0, 0.0), &mut visitor);
    assert_eq!(visitor.order, vec![0]);

    let mut visitor = Collect {
        prune: true,
        ..Collect::default()
    };
    map.traverse_bsp(Vec2::ZERO, &mut visitor);
    assert_eq!(visitor.order, vec![4]);
}
