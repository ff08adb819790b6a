//! Decides which nodes, ways and relations of an extract belong to a tile.
//!
//! Nodes use the half-open tile box. Ways are tested segment by segment: a segment
//! belongs to every tile covered by its own bounding box at the tile's zoom, so a way
//! can cross a tile without any of its vertices lying inside. Relations are derived
//! from their members.

use std::collections::BTreeSet;

use crate::data::{
    osm::{MapCoords, OsmId, Relation},
    tile::{GeoBBox, Tile},
    OsmMapData,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TileMembership {
    pub nodes: BTreeSet<OsmId>,
    pub ways: BTreeSet<OsmId>,
    pub relations: BTreeSet<OsmId>,
}

impl TileMembership {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.ways.is_empty() && self.relations.is_empty()
    }
}

pub fn node_in_tile(bounds: &GeoBBox, coords: MapCoords) -> bool {
    bounds.contains_point(coords.lat, coords.lon)
}

/// `coords` are the way's resolvable vertices in order. Fewer than two of them never
/// match.
pub fn way_in_tile(tile: &Tile, bounds: &GeoBBox, coords: &[MapCoords]) -> bool {
    if coords.len() < 2 {
        return false;
    }
    if coords.iter().any(|vertex| node_in_tile(bounds, *vertex)) {
        return true;
    }
    coords.windows(2).any(|segment| {
        GeoBBox::around(segment[0], segment[1])
            .tile_range(tile.zoom)
            .contains(tile)
    })
}

/// Needs the node and way sets of the same tile.
pub fn relation_in_tile(relation: &Relation, nodes: &BTreeSet<OsmId>, ways: &BTreeSet<OsmId>) -> bool {
    relation.node_ids.iter().any(|id| nodes.contains(id))
        || relation.way_ids.iter().any(|id| ways.contains(id))
}

pub fn classify(map_data: &OsmMapData, tile: &Tile) -> TileMembership {
    let bounds = tile.bounds();

    let nodes: BTreeSet<OsmId> = map_data.nodes.values()
        .filter(|node| node_in_tile(&bounds, MapCoords::from(*node)))
        .map(|node| node.id)
        .collect();

    let ways: BTreeSet<OsmId> = map_data.ways.values()
        .filter(|way| way_in_tile(tile, &bounds, &map_data.way_coords(way)))
        .map(|way| way.id)
        .collect();

    let relations = map_data.relations.values()
        .filter(|relation| relation_in_tile(relation, &nodes, &ways))
        .map(|relation| relation.id)
        .collect();

    TileMembership {
        nodes,
        ways,
        relations,
    }
}
