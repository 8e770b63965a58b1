// Dashboard domain model
use super::projection::ChartProjection;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub status: String,
    pub tiles: Vec<TileData>,
    pub chart: ChartData,
}

impl Dashboard {
    pub fn new(title: String, status: String, tiles: Vec<TileData>, chart: ChartData) -> Self {
        Self {
            title,
            status,
            tiles,
            chart,
        }
    }
}

/// One metric card.
#[derive(Debug, Clone, Serialize)]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub value: f64,
    pub precision: usize,
    /// Value rendered with the tile's precision and unit, e.g. `48.3m`.
    pub display: String,
}

impl TileData {
    pub fn new(id: &str, title: &str, unit: &str, value: f64, precision: usize) -> Self {
        let display = format!("{:.*}{}", precision, value, unit);
        Self {
            id: id.to_string(),
            title: title.to_string(),
            unit: unit.to_string(),
            value,
            precision,
            display,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Left,
    Right,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesMeta {
    pub id: String,
    pub name: String,
    pub color: String,
    pub axis: Axis,
}

impl SeriesMeta {
    pub fn new(id: &str, name: &str, color: &str, axis: Axis) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            axis,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub time_format: String,
    pub series: Vec<SeriesMeta>,
    pub projection: ChartProjection,
}

impl ChartData {
    pub fn new(
        id: &str,
        title: &str,
        time_format: &str,
        series: Vec<SeriesMeta>,
        projection: ChartProjection,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            time_format: time_format.to_string(),
            series,
            projection,
        }
    }
}
