use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three playable cities. Serialized lowercase so save documents and
/// level directories share one spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum City {
    Portland,
    Eugene,
    Corvallis,
}

impl City {
    pub const ALL: [City; 3] = [City::Portland, City::Eugene, City::Corvallis];

    pub fn from_name(name: &str) -> Option<City> {
        match name {
            "portland" => Some(City::Portland),
            "eugene" => Some(City::Eugene),
            "corvallis" => Some(City::Corvallis),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            City::Portland => "portland",
            City::Eugene => "eugene",
            City::Corvallis => "corvallis",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            City::Portland => "Portland",
            City::Eugene => "Eugene",
            City::Corvallis => "Corvallis",
        }
    }
}

pub const LEVEL_IDS: std::ops::RangeInclusive<u8> = 1..=5;

/// Points a first-time completion is worth. Every level pays the same.
pub const LEVEL_POINT_VALUE: u32 = 100;

/// Expected answer for a level. The two halves come straight from the
/// solution file and are compared without any numeric interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    lat: String,
    lon: String,
}

impl Solution {
    #[cfg(test)]
    pub fn from_parts(lat: &str, lon: &str) -> Self {
        Self {
            lat: lat.to_string(),
            lon: lon.to_string(),
        }
    }

    /// The canonical `lat,lon` string a stripped answer must equal.
    pub fn joined(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

#[derive(Debug, Clone)]
pub struct Level {
    pub city: City,
    pub id: u8,
    pub image_path: PathBuf,
    pub solution: Solution,
    pub point_value: u32,
}

/// One city's full set of levels, ordered by id.
#[derive(Debug, Clone)]
pub struct CityLevels {
    pub city: City,
    levels: Vec<Level>,
}

impl CityLevels {
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, id: u8) -> Option<&Level> {
        self.levels.iter().find(|level| level.id == id)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unrecognized city: {name}")]
    InvalidCity { name: String },
    #[error("unknown level {id} for {city}")]
    UnknownLevel { city: &'static str, id: u8 },
    #[error("missing level asset: {path}")]
    MissingAsset { path: PathBuf },
    #[error("failed to read solution file {path}: {source}")]
    ReadSolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed solution in {path}: expected exactly one comma, found {commas}")]
    MalformedSolution { path: PathBuf, commas: usize },
}

/// Reads level assets laid out as `<levels_dir>/<city>/<id>/<id>.jpg` plus a
/// sibling `<id>.txt` holding `lat,lon` on its first line.
pub struct LevelCatalog {
    levels_dir: PathBuf,
}

impl LevelCatalog {
    pub fn new(levels_dir: PathBuf) -> Self {
        Self { levels_dir }
    }

    /// Loads all five levels for a city, failing on the first problem so an
    /// incomplete grid is never shown.
    pub fn load_city(&self, city_name: &str) -> Result<CityLevels, CatalogError> {
        let city = City::from_name(city_name).ok_or_else(|| CatalogError::InvalidCity {
            name: city_name.to_string(),
        })?;

        let city_dir = self.levels_dir.join(city.name());
        let mut levels = Vec::with_capacity(LEVEL_IDS.count());
        for id in LEVEL_IDS {
            levels.push(self.load_level_entry(city, &city_dir, id)?);
        }
        Ok(CityLevels { city, levels })
    }

    /// Loads a single level for the challenge screen. The id must be one the
    /// grid could have offered.
    pub fn load_level(&self, city: City, id: u8) -> Result<Level, CatalogError> {
        if !LEVEL_IDS.contains(&id) {
            return Err(CatalogError::UnknownLevel {
                city: city.name(),
                id,
            });
        }
        let city_dir = self.levels_dir.join(city.name());
        self.load_level_entry(city, &city_dir, id)
    }

    fn load_level_entry(
        &self,
        city: City,
        city_dir: &Path,
        id: u8,
    ) -> Result<Level, CatalogError> {
        let level_dir = city_dir.join(id.to_string());
        let image_path = level_dir.join(format!("{id}.jpg"));
        if !image_path.is_file() {
            return Err(CatalogError::MissingAsset { path: image_path });
        }

        let solution_path = level_dir.join(format!("{id}.txt"));
        if !solution_path.is_file() {
            return Err(CatalogError::MissingAsset {
                path: solution_path,
            });
        }
        let raw = fs::read_to_string(&solution_path).map_err(|source| {
            CatalogError::ReadSolution {
                path: solution_path.clone(),
                source,
            }
        })?;
        let solution = parse_solution(&raw, &solution_path)?;

        Ok(Level {
            city,
            id,
            image_path,
            solution,
            point_value: LEVEL_POINT_VALUE,
        })
    }
}

/// First line only, trimmed as a whole. The halves around the comma are kept
/// verbatim, so a solution file with interior spaces produces a solution with
/// interior spaces.
fn parse_solution(raw: &str, path: &Path) -> Result<Solution, CatalogError> {
    let line = raw.lines().next().unwrap_or("").trim();
    let commas = line.matches(',').count();
    if commas != 1 {
        return Err(CatalogError::MalformedSolution {
            path: path.to_path_buf(),
            commas,
        });
    }
    let (lat, lon) = line.split_once(',').unwrap_or((line, ""));
    Ok(Solution {
        lat: lat.to_string(),
        lon: lon.to_string(),
    })
}
