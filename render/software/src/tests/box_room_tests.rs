use glam::Vec2;
use level::raw::{MapRecords, RawLineDef, RawSector, RawSegment, RawSideDef, RawSubSector};
use level::{MapData, PicData};
use render_trait::{PixelBuffer, SpriteSource};

use super::{TestSprite, box_pics, frame, renderer, view_from};

/// 512 unit square room centred on the origin, floor 0 and ceiling 128,
/// as a single subsector with no nodes
fn box_room(pics: &PicData) -> MapData {
    let vertexes = vec![
        Vec2::new(-256.0, 256.0),
        Vec2::new(256.0, 256.0),
        Vec2::new(256.0, -256.0),
        Vec2::new(-256.0, -256.0),
    ];
    let line = |start: usize, end: usize| RawLineDef {
        start_vertex: start,
        end_vertex: end,
        flags: 1,
        special: 0,
        sector_tag: 0,
        front_sidedef: 0,
        back_sidedef: None,
    };
    let seg = |start: usize, end: usize, linedef: usize| RawSegment {
        start_vertex: start,
        end_vertex: end,
        linedef,
        side: 0,
        offset: 0.0,
    };
    let records = MapRecords {
        name: "BOX".to_string(),
        vertexes,
        sectors: vec![RawSector {
            floor_height: 0.0,
            ceil_height: 128.0,
            floor_tex: "FLOOR".to_string(),
            ceil_tex: "CEIL".to_string(),
            light_level: 255,
            kind: 0,
            tag: 0,
        }],
        sidedefs: vec![RawSideDef {
            x_offset: 0.0,
            y_offset: 0.0,
            upper_tex: "-".to_string(),
            lower_tex: "-".to_string(),
            middle_tex: "WALL".to_string(),
            sector: 0,
        }],
        linedefs: vec![line(0, 1), line(1, 2), line(2, 3), line(3, 0)],
        segments: vec![seg(0, 1, 0), seg(1, 2, 1), seg(2, 3, 2), seg(3, 0, 3)],
        subsectors: vec![RawSubSector {
            seg_count: 4,
            start_seg: 0,
        }],
        nodes: Vec::new(),
        things: Vec::new(),
    };
    MapData::new(records, pics).unwrap()
}

/// The red block sprite after distance shading
fn is_block(colour: [u8; 4]) -> bool {
    colour[0] > 150 && colour[1] < 30 && colour[2] < 30
}

#[test]
fn facing_wall_depth_and_span() {
    let pics = box_pics();
    let map = box_room(&pics);
    let mut r = renderer();
    let mut pixels = frame();
    r.render_frame(&view_from(Vec2::ZERO, 41.0, 0.0), &[], &map, &pics, &mut pixels);

    let depth = pixels.depth();
    for y in 46..=125 {
        assert!(
            (depth.depth(160, y) - 256.0).abs() < 0.01,
            "row {y} depth {}",
            depth.depth(160, y)
        );
    }
    // Ceiling above and floor below are nearer than the wall
    assert!(depth.depth(160, 45) < 256.0);
    assert!(depth.depth(160, 126) < 256.0);

    // The wall is square on, every column sees it at the same depth
    for x in [0, 80, 240, 319] {
        assert!((depth.depth(x, 100) - 256.0).abs() < 0.01);
    }

    // Fully enclosed, so every pixel was drawn
    assert!(depth.depths().iter().all(|d| d.is_finite() && *d > 0.0));
    assert!(r.r_data.portal_clip.ceilingclip.iter().all(|c| *c == 200));
    assert!(r.r_data.portal_clip.floorclip.iter().all(|c| *c == -1));

    let stats = r.stats();
    assert_eq!(stats.subsectors, 1);
    assert_eq!(stats.segs, 4);
    assert_eq!(stats.drawsegs, 1);
    assert_eq!(stats.visplanes, 2);
}

#[test]
fn same_input_same_frame() {
    let pics = box_pics();
    let map = box_room(&pics);
    let sprite = TestSprite::new("BLOCK", Vec2::new(100.0, 20.0), 40.0);
    let objects: [&dyn SpriteSource; 1] = [&sprite];
    let view = view_from(Vec2::new(-30.0, 10.0), 41.0, 20.0);

    let mut r = renderer();
    let mut first = frame();
    r.render_frame(&view, &objects, &map, &pics, &mut first);
    let mut second = frame();
    r.render_frame(&view, &objects, &map, &pics, &mut second);

    assert_eq!(first.buf(), second.buf());
    assert_eq!(first.depth().depths(), second.depth().depths());
}

#[test]
fn sprite_in_front_of_wall_is_drawn() {
    let pics = box_pics();
    let map = box_room(&pics);
    let view = view_from(Vec2::ZERO, 41.0, 0.0);
    let sprite = TestSprite::new("BLOCK", Vec2::new(128.0, 0.0), 56.0);

    let mut r = renderer();
    let mut pixels = frame();
    r.render_frame(&view, &[&sprite], &map, &pics, &mut pixels);

    // Scale 1.25, from 18.75 rows above the horizon to 51.25 below
    assert!(is_block(pixels.read_pixel(160, 120)));
    assert!((pixels.depth().depth(160, 120) - 128.0).abs() < 0.01);
    // Outside its columns the wall is untouched
    assert!((pixels.depth().depth(100, 120) - 256.0).abs() < 0.01);
    assert_eq!(r.stats().vissprites, 1);
}

#[test]
fn transparent_sprite_texels_leave_the_wall() {
    let pics = box_pics();
    let map = box_room(&pics);
    let view = view_from(Vec2::ZERO, 41.0, 0.0);

    let mut r = renderer();
    let mut empty = frame();
    r.render_frame(&view, &[], &map, &pics, &mut empty);

    // Opaque texels cover 142.5 to 160, the transparent ones 160 to 177.5
    let sprite = TestSprite::new("HALF", Vec2::new(128.0, 0.0), 56.0);
    let mut pixels = frame();
    r.render_frame(&view, &[&sprite], &map, &pics, &mut pixels);

    for x in 143..=158 {
        assert!(is_block(pixels.read_pixel(x, 120)), "column {x}");
        assert!((pixels.depth().depth(x, 120) - 128.0).abs() < 0.01);
    }
    for x in 161..=176 {
        for y in 0..200 {
            assert_eq!(pixels.read_pixel(x, y), empty.read_pixel(x, y));
            assert_eq!(pixels.depth().depth(x, y), empty.depth().depth(x, y));
        }
        assert!((pixels.depth().depth(x, 120) - 256.0).abs() < 0.01);
    }
}

#[test]
fn sprite_behind_wall_is_hidden() {
    let pics = box_pics();
    let map = box_room(&pics);
    let view = view_from(Vec2::ZERO, 41.0, 0.0);

    let mut r = renderer();
    let mut empty = frame();
    r.render_frame(&view, &[], &map, &pics, &mut empty);

    let sprite = TestSprite::new("BLOCK", Vec2::new(400.0, 0.0), 56.0);
    let mut pixels = frame();
    r.render_frame(&view, &[&sprite], &map, &pics, &mut pixels);

    // Projected, but every pixel failed the depth test
    assert_eq!(r.stats().vissprites, 1);
    assert_eq!(empty.buf(), pixels.buf());
    assert_eq!(empty.depth().depths(), pixels.depth().depths());
}

#[test]
fn sprite_order_does_not_matter() {
    let pics = box_pics();
    let map = box_room(&pics);
    let view = view_from(Vec2::ZERO, 41.0, 0.0);
    let near = TestSprite::new("BLOCK", Vec2::new(90.0, 5.0), 56.0);
    let far = TestSprite::new("OTHER", Vec2::new(180.0, -10.0), 56.0);

    let mut r = renderer();
    let mut a = frame();
    r.render_frame(&view, &[&near, &far], &map, &pics, &mut a);
    let mut b = frame();
    r.render_frame(&view, &[&far, &near], &map, &pics, &mut b);

    assert_eq!(a.buf(), b.buf());
    assert_eq!(a.depth().depths(), b.depth().depths());
    // Where they overlap the near one wins
    assert!(is_block(a.read_pixel(160, 120)));
}

#[test]
fn missing_sprite_is_skipped() {
    let pics = box_pics();
    let map = box_room(&pics);
    let view = view_from(Vec2::ZERO, 41.0, 0.0);

    let mut r = renderer();
    let mut empty = frame();
    r.render_frame(&view, &[], &map, &pics, &mut empty);
    assert_eq!(r.missing_pictures(), 0);

    let ghost = TestSprite::new("NOPE", Vec2::new(128.0, 0.0), 56.0);
    let mut pixels = frame();
    r.render_frame(&view, &[&ghost], &map, &pics, &mut pixels);
    r.render_frame(&view, &[&ghost], &map, &pics, &mut pixels);

    assert_eq!(empty.buf(), pixels.buf());
    assert_eq!(r.stats().vissprites, 0);
    // Reported once however many frames ask for it
    assert_eq!(r.missing_pictures(), 1);
}

#[test]
fn sprites_behind_the_eye_are_dropped() {
    let pics = box_pics();
    let map = box_room(&pics);
    let view = view_from(Vec2::ZERO, 41.0, 0.0);
    let behind = TestSprite::new("BLOCK", Vec2::new(-50.0, 0.0), 56.0);
    let touching = TestSprite::new("BLOCK", Vec2::new(0.25, 0.0), 56.0);

    let mut r = renderer();
    let mut pixels = frame();
    r.render_frame(&view, &[&behind, &touching], &map, &pics, &mut pixels);
    assert_eq!(r.stats().vissprites, 0);
}

#[test]
fn close_to_walls_is_safe() {
    let pics = box_pics();
    let map = box_room(&pics);
    let mut r = renderer();
    let mut pixels = frame();

    let spots = [
        Vec2::new(255.5, 0.0),
        Vec2::new(256.0, 0.0),
        Vec2::new(255.0, 255.0),
        Vec2::new(-255.9, -255.9),
        Vec2::new(0.0, 255.99),
    ];
    for xy in spots {
        for step in 0..24 {
            let view = view_from(xy, 41.0, step as f32 * 15.0);
            r.render_frame(&view, &[], &map, &pics, &mut pixels);
            assert!(
                pixels
                    .depth()
                    .depths()
                    .iter()
                    .all(|d| !d.is_nan() && *d > 0.0),
                "bad depth at {xy} facing {}",
                step * 15
            );
        }
    }
}

#[test]
fn resized_frames_are_followed() {
    let pics = box_pics();
    let map = box_room(&pics);
    let mut r = renderer();
    let mut pixels = crate::FrameBuffer::new(640, 400);
    r.render_frame(&view_from(Vec2::ZERO, 41.0, 0.0), &[], &map, &pics, &mut pixels);

    // Wall spans 91.25 to 251.25 at twice the size
    assert!((pixels.depth().depth(320, 200) - 256.0).abs() < 0.01);
    assert!(pixels.depth().depth(320, 90) < 256.0);
    assert!((pixels.depth().depth(320, 91) - 256.0).abs() < 0.01);
    assert!((pixels.depth().depth(320, 250) - 256.0).abs() < 0.01);
    assert!(pixels.depth().depth(320, 251) < 256.0);
    assert_eq!(r.r_data.portal_clip.screen_width(), 640);
}
