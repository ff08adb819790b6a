//! Enumeration of tiles over a bounding box and the tile -> bounds round trip

mod common;

use common::{moscow_bbox, NORTH_EAST, NORTH_WEST, SOUTH_EAST, SOUTH_WEST};
use osm_tile_slices::data::tile::{tiles_covering, GeoBBox, Tile};

#[test]
fn test_tile_counts_per_zoom() {
    let tiles = tiles_covering(&moscow_bbox(), 14..=18);
    let count = |zoom: u8| tiles.iter().filter(|tile| tile.zoom == zoom).count();

    assert_eq!(count(14), 4);
    assert_eq!(count(15), 4);
    assert_eq!(count(16), 9);
    assert_eq!(count(17), 20);
    assert_eq!(count(18), 72);
    assert_eq!(tiles.len(), 109);
}

#[test]
fn test_tiles_are_row_major_and_zoom_ascending() {
    let tiles = tiles_covering(&moscow_bbox(), [16, 14, 15, 14]);

    assert_eq!(&tiles[..4], &[NORTH_WEST, NORTH_EAST, SOUTH_WEST, SOUTH_EAST]);
    assert!(tiles.windows(2).all(|pair| {
        let (a, b) = (pair[0], pair[1]);
        (a.zoom, a.y, a.x) < (b.zoom, b.y, b.x)
    }));
}

#[test]
fn test_every_tile_overlaps_the_box() {
    let bbox = moscow_bbox();
    for tile in tiles_covering(&bbox, 14..=18) {
        assert!(tile.bounds().intersects(&bbox), "{tile:?} does not overlap the box");
    }
}

#[test]
fn test_bounds_round_trip_to_the_same_tile() {
    let mut tiles = tiles_covering(&moscow_bbox(), 14..=18);
    tiles.extend([
        Tile::new(0, 0, 0),
        Tile::new(1, 1, 0),
        Tile::new(5, 31, 31),
        Tile::new(12, 0, 4095),
        Tile::new(22, 2_534_000, 1_311_000),
    ]);

    for tile in tiles {
        assert_eq!(tiles_covering(&tile.bounds(), [tile.zoom]), vec![tile]);
    }
}

#[test]
fn test_adjacent_tiles_share_seams() {
    assert_eq!(NORTH_WEST.bounds().east, NORTH_EAST.bounds().west);
    assert_eq!(NORTH_WEST.bounds().south, SOUTH_WEST.bounds().north);
    assert_eq!(SOUTH_EAST.bounds().west, SOUTH_WEST.bounds().east);
}

#[test]
fn test_children_split_parent_bounds() {
    let parent = NORTH_EAST.bounds();
    let [north_west, north_east, south_west, south_east] = NORTH_EAST.children();

    assert_eq!(north_west.bounds().north, parent.north);
    assert_eq!(north_west.bounds().west, parent.west);
    assert_eq!(north_east.bounds().east, parent.east);
    assert_eq!(south_west.bounds().south, parent.south);
    assert_eq!(south_east.bounds().south, parent.south);
    assert_eq!(south_east.bounds().east, parent.east);
}

#[test]
fn test_box_is_clamped_to_mercator_extent() {
    let world = GeoBBox::new(-90.0, 90.0, -180.0, 180.0);
    let tiles = tiles_covering(&world, [1]);

    assert_eq!(tiles, vec![
        Tile::new(1, 0, 0),
        Tile::new(1, 1, 0),
        Tile::new(1, 0, 1),
        Tile::new(1, 1, 1),
    ]);
}

#[test]
fn test_point_tile_lies_in_its_bounds() {
    for (lat, lon) in [(55.7532, 37.6215), (-33.8568, 151.2153), (40.6892, -74.0445)] {
        for zoom in [0, 7, 14, 18] {
            let tile = Tile::from_coords(lat, lon, zoom);
            assert!(tile.bounds().contains_point(lat, lon), "{tile:?} misses ({lat}, {lon})");
        }
    }
}
