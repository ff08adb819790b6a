use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::osm::MapCoords;

/// Deepest zoom level the grid math is trusted at.
pub const MAX_ZOOM: u8 = 22;

/// Latitude at which the square Web Mercator grid ends.
pub const MAX_MERCATOR_LAT: f64 = 85.051129;
const MAX_LON: f64 = 180.0;

// Shrinks the south-east corner of a box so that a box ending exactly on a seam does
// not spill into the next tile.
const LL_EPSILON: f64 = 1e-11;
// Absorbs the rounding error of a tile -> degrees -> tile round trip.
const EPSILON: f64 = 1e-14;

/// A cell of the Web Mercator grid: `2^zoom` columns (x grows eastwards) and `2^zoom`
/// rows (y grows southwards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

/// A box in degrees. Only configuration boxes are validated; boxes built around a
/// segment may be degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

/// Inclusive index ranges of the tiles covering a box at one zoom level. Empty when the
/// box collapses onto a seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub zoom: u8,
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

fn grid_size(zoom: u8) -> u32 {
    1 << zoom
}

/// Position of a geopoint on the unit square of the projection.
fn project(lat: f64, lon: f64) -> (f64, f64) {
    let x = lon / 360.0 + 0.5;
    let sin_lat = lat.to_radians().sin();
    let y = 0.5 - 0.25 * ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / PI;
    (x, y)
}

fn tile_index(position: f64, zoom: u8) -> u32 {
    let max_index = grid_size(zoom) - 1;
    if position <= 0.0 {
        0
    } else if position >= 1.0 {
        max_index
    } else {
        let index = ((position + EPSILON) * f64::from(grid_size(zoom))).floor() as u32;
        index.min(max_index)
    }
}

fn lat_of_row(y: u32, zoom: u8) -> f64 {
    let n = PI * (1.0 - 2.0 * f64::from(y) / f64::from(grid_size(zoom)));
    n.sinh().atan().to_degrees()
}

fn lon_of_column(x: u32, zoom: u8) -> f64 {
    f64::from(x) / f64::from(grid_size(zoom)) * 360.0 - 180.0
}

impl Tile {
    pub fn new(zoom: u8, x: u32, y: u32) -> Tile {
        Tile { zoom, x, y }
    }

    /// Tile whose closed north and west edges contain the point.
    ///
    /// # Panics
    ///
    /// If `zoom` is above [`MAX_ZOOM`].
    pub fn from_coords(lat: f64, lon: f64, zoom: u8) -> Tile {
        assert!(zoom <= MAX_ZOOM, "zoom {zoom} is above {MAX_ZOOM}");
        let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
        let (x, y) = project(lat, lon);
        Tile {
            zoom,
            x: tile_index(x, zoom),
            y: tile_index(y, zoom),
        }
    }

    pub fn bounds(&self) -> GeoBBox {
        GeoBBox {
            south: lat_of_row(self.y + 1, self.zoom),
            north: lat_of_row(self.y, self.zoom),
            west: lon_of_column(self.x, self.zoom),
            east: lon_of_column(self.x + 1, self.zoom),
        }
    }

    /// The four quadrants one zoom level down, north-west first.
    pub fn children(&self) -> [Tile; 4] {
        let (zoom, x, y) = (self.zoom + 1, self.x * 2, self.y * 2);
        [
            Tile::new(zoom, x, y),
            Tile::new(zoom, x + 1, y),
            Tile::new(zoom, x, y + 1),
            Tile::new(zoom, x + 1, y + 1),
        ]
    }

    pub fn parent(&self) -> Option<Tile> {
        if self.zoom == 0 {
            return None;
        }
        Some(Tile::new(self.zoom - 1, self.x / 2, self.y / 2))
    }
}

impl GeoBBox {
    pub fn new(south: f64, north: f64, west: f64, east: f64) -> GeoBBox {
        GeoBBox { south, north, west, east }
    }

    /// Smallest box holding both ends of a segment.
    pub fn around(a: MapCoords, b: MapCoords) -> GeoBBox {
        GeoBBox {
            south: a.lat.min(b.lat),
            north: a.lat.max(b.lat),
            west: a.lon.min(b.lon),
            east: a.lon.max(b.lon),
        }
    }

    /// Half-open membership: the north and west edges belong to the box, the south and
    /// east edges belong to the neighbours. Boxes sharing a seam therefore never both
    /// claim a point on it.
    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        (self.south < lat && lat <= self.north) && (self.west <= lon && lon < self.east)
    }

    /// Closed overlap test, touching edges count.
    pub fn intersects(&self, other: &GeoBBox) -> bool {
        self.south <= other.north
            && other.south <= self.north
            && self.west <= other.east
            && other.west <= self.east
    }

    fn clamped(&self) -> GeoBBox {
        GeoBBox {
            south: self.south.max(-MAX_MERCATOR_LAT),
            north: self.north.min(MAX_MERCATOR_LAT),
            west: self.west.max(-MAX_LON),
            east: self.east.min(MAX_LON),
        }
    }

    pub fn tile_range(&self, zoom: u8) -> TileRange {
        let bbox = self.clamped();
        let upper_left = Tile::from_coords(bbox.north, bbox.west, zoom);
        let lower_right = Tile::from_coords(bbox.south + LL_EPSILON, bbox.east - LL_EPSILON, zoom);
        TileRange {
            zoom,
            min_x: upper_left.x,
            max_x: lower_right.x,
            min_y: upper_left.y,
            max_y: lower_right.y,
        }
    }
}

impl TileRange {
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn contains(&self, tile: &Tile) -> bool {
        tile.zoom == self.zoom
            && (self.min_x..=self.max_x).contains(&tile.x)
            && (self.min_y..=self.max_y).contains(&tile.y)
    }

    /// Row by row, west to east.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> {
        let TileRange { zoom, min_x, max_x, min_y, max_y } = *self;
        (min_y..=max_y).flat_map(move |y| (min_x..=max_x).map(move |x| Tile::new(zoom, x, y)))
    }
}

/// All tiles covering `bbox` at the given zoom levels, lowest zoom first and row-major
/// within a zoom level. Zoom levels above [`MAX_ZOOM`] are skipped.
pub fn tiles_covering<Z>(bbox: &GeoBBox, zooms: Z) -> Vec<Tile>
where
    Z: IntoIterator<Item = u8>,
{
    let mut zooms: Vec<u8> = zooms.into_iter().filter(|zoom| *zoom <= MAX_ZOOM).collect();
    zooms.sort_unstable();
    zooms.dedup();

    zooms.into_iter()
        .flat_map(|zoom| bbox.tile_range(zoom).tiles())
        .collect()
}
