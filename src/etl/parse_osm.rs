use std::ffi::OsStr;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use log::info;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use xz::bufread::XzDecoder;

use crate::config::UserConfig;
use crate::data::osm::{Node, OsmId, Relation, Tags, Way};
use crate::data::OsmMapData;
use crate::errors::{Error, Result};
use crate::etl::Etl;

pub const ETL_NAME: &str = "parse_osm";
pub const OUTPUT_FILE_NAME: &str = "osm_elements.rkyv";

/// Element whose children (`tag`, `nd`, `member`) are currently being read.
enum ParserState {
    Top,
    Node(Node),
    Way(Way),
    Relation(Relation),
}

impl ParserState {
    fn tags_mut(&mut self) -> Option<&mut Tags> {
        match self {
            ParserState::Top => None,
            ParserState::Node(node) => Some(&mut node.tags),
            ParserState::Way(way) => Some(&mut way.tags),
            ParserState::Relation(relation) => Some(&mut relation.tags),
        }
    }
}

pub struct ParseOsmEtl<'a> {
    config: &'a UserConfig,
}

fn element_name(el: &BytesStart) -> String {
    String::from_utf8_lossy(el.name().as_ref()).into_owned()
}

fn attribute(el: &BytesStart, key: &str) -> Result<Option<String>> {
    match el.try_get_attribute(key)? {
        Some(attribute) => Ok(Some(attribute.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn required_attribute(el: &BytesStart, key: &str) -> Result<String> {
    attribute(el, key)?.ok_or_else(|| {
        Error::from(format!("<{}> element without '{}' attribute", element_name(el), key))
    })
}

fn parse_id(el: &BytesStart) -> Result<OsmId> {
    Ok(required_attribute(el, "id")?.parse()?)
}

/// Reads a coordinate attribute. `NaN`, infinities and values beyond `limit` degrees
/// are rejected.
fn parse_degrees(el: &BytesStart, key: &str, limit: f64) -> Result<f64> {
    let value: f64 = required_attribute(el, key)?.parse()?;
    if !value.is_finite() || value.abs() > limit {
        return Err(format!(
            "<{}> element has {key}=\"{value}\" outside [-{limit}, {limit}]",
            element_name(el)
        ).into());
    }
    Ok(value)
}

fn parse_node(el: &BytesStart) -> Result<Node> {
    let id = parse_id(el)?;
    let lat = parse_degrees(el, "lat", 90.0)?;
    let lon = parse_degrees(el, "lon", 180.0)?;
    Ok(Node::new(id, lat, lon))
}

/// Handles a `tag`, `nd` or `member` element. Children that make no sense for the
/// enclosing element are ignored.
fn parse_child(state: &mut ParserState, el: &BytesStart) -> Result<()> {
    match el.name().as_ref() {
        b"tag" => {
            if let Some(tags) = state.tags_mut() {
                let key = required_attribute(el, "k")?;
                let value = required_attribute(el, "v")?;
                tags.insert(key, value);
            }
        },
        b"nd" => {
            if let ParserState::Way(way) = state {
                way.node_ids.push(required_attribute(el, "ref")?.parse()?);
            }
        },
        b"member" => {
            if let ParserState::Relation(relation) = state {
                let member_ref: OsmId = required_attribute(el, "ref")?.parse()?;
                match required_attribute(el, "type")?.as_str() {
                    "node" => {
                        relation.node_ids.insert(member_ref);
                    },
                    "way" => {
                        relation.way_ids.insert(member_ref);
                    },
                    _ => (),
                }
            }
        },
        _ => (),
    }
    Ok(())
}

fn finish_element(state: ParserState, map_data: &mut OsmMapData) {
    match state {
        ParserState::Top => (),
        ParserState::Node(node) => map_data.add_node(node),
        ParserState::Way(way) => map_data.add_way(way),
        ParserState::Relation(relation) => map_data.add_relation(relation),
    }
}

/// Reads an OSM XML document into memory. Elements other than nodes, ways and
/// relations (`bounds`, `meta`, ...) and unknown attributes are skipped.
pub fn parse_osm_xml<R: BufRead>(mut reader: Reader<R>) -> Result<OsmMapData> {
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut map_data = OsmMapData::default();
    let mut state = ParserState::Top;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Text(_e) => return Err("Didn't expect to see Text in OSM file.".into()),
            Event::Start(e) => {
                match e.name().as_ref() {
                    b"node" => state = ParserState::Node(parse_node(&e)?),
                    b"way" => state = ParserState::Way(Way::new(parse_id(&e)?, Vec::new())),
                    b"relation" => state = ParserState::Relation(Relation::empty(parse_id(&e)?)),
                    _ => parse_child(&mut state, &e)?,
                }
            },
            Event::Empty(e) => {
                match e.name().as_ref() {
                    b"node" => map_data.add_node(parse_node(&e)?),
                    b"way" => map_data.add_way(Way::new(parse_id(&e)?, Vec::new())),
                    b"relation" => map_data.add_relation(Relation::empty(parse_id(&e)?)),
                    _ => parse_child(&mut state, &e)?,
                }
            },
            Event::End(e) => {
                if matches!(e.name().as_ref(), b"node" | b"way" | b"relation") {
                    finish_element(std::mem::replace(&mut state, ParserState::Top), &mut map_data);
                }
            },
            // Declarations, comments, doctypes and processing instructions carry no map data.
            _ => (),
        }
        // if we don't keep a borrow elsewhere, we can clear the buffer to keep memory usage low
        buf.clear();
    }

    Ok(map_data)
}

/// Loads the geometry store written by [`ParseOsmEtl`] from `dir`.
pub fn read_cache(dir: &Path) -> Result<OsmMapData> {
    let input_file_path = dir.join(OUTPUT_FILE_NAME);
    let mut input_file = fs::File::open(&input_file_path)
        .map_err(|err| format!("Could not open {}: {err}", input_file_path.display()))?;

    let mut buf_vec: Vec<u8> = Vec::new();
    input_file.read_to_end(&mut buf_vec)?;
    let mut bytes = rkyv::AlignedVec::with_capacity(buf_vec.len());
    bytes.extend_from_slice(&buf_vec);

    let map_data = rkyv::from_bytes::<OsmMapData>(&bytes).map_err(|err| {
        format!("Corrupt node cache {}, rerun with --force: {err:?}", input_file_path.display())
    })?;

    Ok(map_data)
}

impl ParseOsmEtl<'_> {
    /// Plain `.osm`/`.xml` files are read as is, `.xz` dumps are decompressed on the fly.
    fn create_osm_reader(&self) -> Result<Reader<Box<dyn BufRead>>> {
        let path = Path::new(&self.config.data_path);
        let file = fs::File::open(path)
            .map_err(|err| format!("Could not open {}: {err}", path.display()))?;
        let file_reader = BufReader::new(file);

        let buffered: Box<dyn BufRead> = match path.extension().and_then(OsStr::to_str) {
            Some("xz") => Box::new(BufReader::new(XzDecoder::new(file_reader))),
            _ => Box::new(file_reader),
        };
        Ok(Reader::from_reader(buffered))
    }

    pub fn new(config: &UserConfig) -> ParseOsmEtl<'_> {
        ParseOsmEtl {
            config
        }
    }
}

impl Etl for ParseOsmEtl<'_> {
    type Input = ();
    type Output = OsmMapData;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn output_file_name(&self) -> &str {
        OUTPUT_FILE_NAME
    }

    fn extract(&mut self, _dir: &Path) -> Result<Self::Input> {
        Ok(())
    }

    fn transform(&mut self, _input: ()) -> Result<Self::Output> {
        let map_data = parse_osm_xml(self.create_osm_reader()?)?;
        info!(
            etl_name = ETL_NAME,
            nodes = map_data.nodes.len(),
            ways = map_data.ways.len(),
            relations = map_data.relations.len();
            "Parsed OSM elements"
        );
        Ok(map_data)
    }

    fn load(&mut self, dir: &Path, output: Self::Output) -> Result<()> {
        let bytes = rkyv::to_bytes::<_, 256>(&output)
            .map_err(|err| format!("Could not serialize node cache: {err:?}"))?;
        // Written next to the target and renamed, so an interrupted run never leaves a
        // truncated cache behind.
        let output_path = self.output_path(dir);
        let partial_path = output_path.with_extension("rkyv.partial");
        let mut output_file = fs::File::create(&partial_path)?;
        output_file.write_all(&bytes)?;
        output_file.sync_all()?;
        fs::rename(&partial_path, &output_path)?;
        Ok(())
    }
}
