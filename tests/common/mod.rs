#![allow(dead_code)]

use std::path::PathBuf;

use osm_tile_slices::data::osm::{Node, Relation, Way};
use osm_tile_slices::data::tile::{GeoBBox, Tile};
use osm_tile_slices::data::OsmMapData;

/// The four zoom 14 tiles covering the default bounding box.
pub const NORTH_WEST: Tile = Tile { zoom: 14, x: 9903, y: 5121 };
pub const NORTH_EAST: Tile = Tile { zoom: 14, x: 9904, y: 5121 };
pub const SOUTH_WEST: Tile = Tile { zoom: 14, x: 9903, y: 5122 };
pub const SOUTH_EAST: Tile = Tile { zoom: 14, x: 9904, y: 5122 };

pub fn moscow_bbox() -> GeoBBox {
    GeoBBox::new(55.750717, 55.756187, 37.608505, 37.619706)
}

pub fn get_test_path(relative_path: &[&str]) -> PathBuf {
    let mut test_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    test_path.push("tests");
    for component in relative_path {
        test_path.push(component);
    }
    test_path
}

/// A handful of elements around the default bounding box.
///
/// - nodes 1 and 2 and way 10 lie inside the north-east tile, relation 20 holds way 10
/// - way 11 runs from node 3 (north-west of the box) to node 4 (south of it) and crosses
///   the two western tiles without a vertex in either
/// - node 5 lies in the south-west tile, relation 21 holds it
/// - node 6 sits on the corner shared by all four tiles
/// - way 12 has a single resolvable node, relation 22 only dangling members
/// - way 13 bends around the north-east tile: its overall box covers all four tiles but
///   none of its segments touches them
pub fn moscow_map_data() -> OsmMapData {
    let corner = SOUTH_EAST.bounds();

    let mut map_data = OsmMapData::default();
    map_data.add_node(Node::new(1, 55.755, 37.625).with_tag("amenity", "cafe"));
    map_data.add_node(Node::new(2, 55.760, 37.630));
    map_data.add_node(Node::new(3, 55.770, 37.590));
    map_data.add_node(Node::new(4, 55.735, 37.600));
    map_data.add_node(Node::new(5, 55.745, 37.610).with_tag("name", "Manege"));
    map_data.add_node(Node::new(6, corner.north, corner.west));
    map_data.add_node(Node::new(7, 55.770, 37.610));
    map_data.add_node(Node::new(8, 55.770, 37.645));
    map_data.add_node(Node::new(9, 55.735, 37.645));

    map_data.add_way(Way::new(10, vec![1, 2]).with_tag("highway", "footway"));
    map_data.add_way(Way::new(11, vec![3, 4]).with_tag("highway", "primary"));
    map_data.add_way(Way::new(12, vec![5, 999]));
    map_data.add_way(Way::new(13, vec![7, 8, 9]));

    map_data.add_relation(Relation::new(20, &[], &[10]).with_tag("type", "route"));
    map_data.add_relation(Relation::new(21, &[5], &[]));
    map_data.add_relation(Relation::new(22, &[998], &[997]));
    map_data
}
