use std::collections::{BTreeMap, BTreeSet};

pub type OsmId = u64;

/// Free-form `k=v` pairs attached to an element. Keys are unique, a repeated key keeps
/// the last value seen.
pub type Tags = BTreeMap<String, String>;

#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, PartialEq)]
#[archive(check_bytes)]
pub struct Node {
    pub id: OsmId,
    pub lat: f64,
    pub lon: f64,
    pub tags: Tags,
}

/// Ordered chain of node references. References are kept as written in the source
/// file, even when the node they point to is not part of the extract.
#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, PartialEq)]
#[archive(check_bytes)]
pub struct Way {
    pub id: OsmId,
    pub node_ids: Vec<OsmId>,
    pub tags: Tags,
}

/// Plain membership, roles and member order are dropped. Members of type `relation`
/// are not kept.
#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, PartialEq)]
#[archive(check_bytes)]
pub struct Relation {
    pub id: OsmId,
    pub node_ids: BTreeSet<OsmId>,
    pub way_ids: BTreeSet<OsmId>,
    pub tags: Tags,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCoords {
    pub lat: f64,
    pub lon: f64,
}

impl From<&Node> for MapCoords {
    fn from(value: &Node) -> Self {
        MapCoords {
            lat: value.lat,
            lon: value.lon,
        }
    }
}

impl Node {
    pub fn new(id: OsmId, lat: f64, lon: f64) -> Node {
        Node {
            id,
            lat,
            lon,
            tags: Tags::new(),
        }
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Node {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }
}

impl Way {
    pub fn new(id: OsmId, node_ids: Vec<OsmId>) -> Way {
        Way {
            id,
            node_ids,
            tags: Tags::new(),
        }
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Way {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }
}

impl Relation {
    pub fn empty(id: OsmId) -> Relation {
        Relation {
            id,
            node_ids: BTreeSet::new(),
            way_ids: BTreeSet::new(),
            tags: Tags::new(),
        }
    }

    pub fn new(id: OsmId, node_ids: &[OsmId], way_ids: &[OsmId]) -> Relation {
        Relation {
            id,
            node_ids: node_ids.iter().copied().collect(),
            way_ids: way_ids.iter().copied().collect(),
            tags: Tags::new(),
        }
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Relation {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }
}
