use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::classify::TileMembership;

use super::{
    osm::{OsmId, Tags},
    tile::Tile,
    EntityKind, OsmMapData,
};

/// Matched elements of one kind, either as bare ids or keyed by id with their tags.
/// Written as a JSON list or a JSON object respectively.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum SliceEntities {
    Tagged(BTreeMap<OsmId, Tags>),
    Ids(Vec<OsmId>),
}

impl SliceEntities {
    pub fn ids(&self) -> Vec<OsmId> {
        match self {
            SliceEntities::Tagged(entities) => entities.keys().copied().collect(),
            SliceEntities::Ids(ids) => ids.clone(),
        }
    }

    pub fn contains(&self, id: OsmId) -> bool {
        match self {
            SliceEntities::Tagged(entities) => entities.contains_key(&id),
            SliceEntities::Ids(ids) => ids.contains(&id),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SliceEntities::Tagged(entities) => entities.len(),
            SliceEntities::Ids(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct EntitiesVisitor;

impl<'de> Visitor<'de> for EntitiesVisitor {
    type Value = SliceEntities;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a list of ids or a map from id to tags")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error> where A: SeqAccess<'de> {
        let mut ids: Vec<OsmId> = Vec::new();
        while let Some(id) = seq.next_element()? {
            ids.push(id);
        }
        Ok(SliceEntities::Ids(ids))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error> where A: MapAccess<'de> {
        let mut entities = BTreeMap::new();
        while let Some((id, tags)) = map.next_entry::<OsmId, Tags>()? {
            entities.insert(id, tags);
        }
        Ok(SliceEntities::Tagged(entities))
    }
}

// Numeric object keys only parse through the format's own map access, which an untagged
// derive does not provide.
impl<'de> Deserialize<'de> for SliceEntities {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where D: Deserializer<'de> {
        deserializer.deserialize_any(EntitiesVisitor)
    }
}

/// Everything an extract has in one tile, in the shape written to the fixture file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TileSlice {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
    pub nodes: SliceEntities,
    pub ways: SliceEntities,
    pub relations: SliceEntities,
}

impl TileSlice {
    pub fn build(tile: &Tile, membership: &TileMembership, map_data: &OsmMapData, with_tags: bool) -> TileSlice {
        let entities = |kind: EntityKind, ids: &BTreeSet<OsmId>| {
            if with_tags {
                SliceEntities::Tagged(
                    ids.iter()
                        .map(|id| (*id, map_data.tags_of(kind, *id)))
                        .collect()
                )
            } else {
                SliceEntities::Ids(ids.iter().copied().collect())
            }
        };

        TileSlice {
            zoom: tile.zoom,
            x: tile.x,
            y: tile.y,
            nodes: entities(EntityKind::Node, &membership.nodes),
            ways: entities(EntityKind::Way, &membership.ways),
            relations: entities(EntityKind::Relation, &membership.relations),
        }
    }

    pub fn tile(&self) -> Tile {
        Tile::new(self.zoom, self.x, self.y)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.ways.is_empty() && self.relations.is_empty()
    }
}
