use std::collections::HashMap;

use self::osm::{MapCoords, Node, OsmId, Relation, Tags, Way};

pub mod osm;
pub mod slice;
pub mod tile;

/// Map data as defined in the .osm file: nodes, ways and relations keyed by their id,
/// together with their tags. Nothing is resolved at load time, so ways and relations
/// may point at elements that are missing from the extract.

#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Default, Clone, PartialEq)]
#[archive(check_bytes)]
pub struct OsmMapData {
    pub nodes: HashMap<OsmId, Node>,
    pub ways: HashMap<OsmId, Way>,
    pub relations: HashMap<OsmId, Relation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Node,
    Way,
    Relation,
}

impl OsmMapData {
    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id, node);
    }

    pub fn add_way(&mut self, way: Way) {
        self.ways.insert(way.id, way);
    }

    pub fn add_relation(&mut self, relation: Relation) {
        self.relations.insert(relation.id, relation);
    }

    pub fn node(&self, id: OsmId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn way(&self, id: OsmId) -> Option<&Way> {
        self.ways.get(&id)
    }

    pub fn relation(&self, id: OsmId) -> Option<&Relation> {
        self.relations.get(&id)
    }

    pub fn node_coords(&self, id: OsmId) -> Option<MapCoords> {
        self.node(id).map(MapCoords::from)
    }

    /// Coordinates of the way's nodes in order. Dangling references are skipped, so the
    /// result can be shorter than `way.node_ids`.
    pub fn way_coords(&self, way: &Way) -> Vec<MapCoords> {
        way.node_ids.iter()
            .filter_map(|id| self.node_coords(*id))
            .collect()
    }

    /// Tags of an element, empty when the element has none or is unknown.
    pub fn tags_of(&self, kind: EntityKind, id: OsmId) -> Tags {
        let tags = match kind {
            EntityKind::Node => self.node(id).map(|node| &node.tags),
            EntityKind::Way => self.way(id).map(|way| &way.tags),
            EntityKind::Relation => self.relation(id).map(|relation| &relation.tags),
        };
        tags.cloned().unwrap_or_default()
    }
}
