//! Transient request parameters coming from the UI layer

use super::entity::Coordinates;
use crate::TourMapError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_RADIUS_METERS: u32 = 500;
pub const MAX_RADIUS_METERS: u32 = 5000;

/// Catalog area codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Region {
    Seoul,
    Incheon,
    Daejeon,
    Daegu,
    Gwangju,
    Busan,
    Ulsan,
    Sejong,
    Gyeonggi,
    Gangwon,
    Chungbuk,
    Chungnam,
    Gyeongbuk,
    Gyeongnam,
    Jeonbuk,
    Jeonnam,
    Jeju,
}

impl Region {
    pub const ALL: [Region; 17] = [
        Region::Seoul,
        Region::Incheon,
        Region::Daejeon,
        Region::Daegu,
        Region::Gwangju,
        Region::Busan,
        Region::Ulsan,
        Region::Sejong,
        Region::Gyeonggi,
        Region::Gangwon,
        Region::Chungbuk,
        Region::Chungnam,
        Region::Gyeongbuk,
        Region::Gyeongnam,
        Region::Jeonbuk,
        Region::Jeonnam,
        Region::Jeju,
    ];

    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Region::Seoul => 1,
            Region::Incheon => 2,
            Region::Daejeon => 3,
            Region::Daegu => 4,
            Region::Gwangju => 5,
            Region::Busan => 6,
            Region::Ulsan => 7,
            Region::Sejong => 8,
            Region::Gyeonggi => 31,
            Region::Gangwon => 32,
            Region::Chungbuk => 33,
            Region::Chungnam => 34,
            Region::Gyeongbuk => 35,
            Region::Gyeongnam => 36,
            Region::Jeonbuk => 37,
            Region::Jeonnam => 38,
            Region::Jeju => 39,
        }
    }

    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|region| region.code() == code)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Region::Seoul => "Seoul",
            Region::Incheon => "Incheon",
            Region::Daejeon => "Daejeon",
            Region::Daegu => "Daegu",
            Region::Gwangju => "Gwangju",
            Region::Busan => "Busan",
            Region::Ulsan => "Ulsan",
            Region::Sejong => "Sejong",
            Region::Gyeonggi => "Gyeonggi-do",
            Region::Gangwon => "Gangwon-do",
            Region::Chungbuk => "Chungcheongbuk-do",
            Region::Chungnam => "Chungcheongnam-do",
            Region::Gyeongbuk => "Gyeongsangbuk-do",
            Region::Gyeongnam => "Gyeongsangnam-do",
            Region::Jeonbuk => "Jeollabuk-do",
            Region::Jeonnam => "Jeollanam-do",
            Region::Jeju => "Jeju-do",
        }
    }
}

impl TryFrom<u32> for Region {
    type Error = TourMapError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Region::from_code(code)
            .ok_or_else(|| TourMapError::validation(format!("Unknown region code {code}")))
    }
}

impl From<Region> for u32 {
    fn from(region: Region) -> Self {
        region.code()
    }
}

impl FromStr for Region {
    type Err = TourMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s
            .trim()
            .parse::<u32>()
            .map_err(|_| TourMapError::validation(format!("Region code must be a number, got '{s}'")))?;
        Region::try_from(code)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// Region identifier plus the radius used for follow-up proximity searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedRegionQuery")]
pub struct RegionQuery {
    pub region: Region,
    pub radius_meters: Option<u32>,
}

impl RegionQuery {
    #[must_use]
    pub fn new(region: Region) -> Self {
        Self {
            region,
            radius_meters: None,
        }
    }

    pub fn with_radius(mut self, radius_meters: u32) -> crate::Result<Self> {
        validate_radius(radius_meters)?;
        self.radius_meters = Some(radius_meters);
        Ok(self)
    }
}

/// Reference coordinate plus search radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedProximityQuery")]
pub struct ProximityQuery {
    center: Coordinates,
    radius_meters: u32,
}

impl ProximityQuery {
    pub fn new(center: Coordinates, radius_meters: u32) -> crate::Result<Self> {
        if !center.is_valid() {
            return Err(TourMapError::validation(format!(
                "Coordinates out of range: {}, {}",
                center.latitude, center.longitude
            )));
        }
        validate_radius(radius_meters)?;
        Ok(Self {
            center,
            radius_meters,
        })
    }

    #[must_use]
    pub fn center(&self) -> Coordinates {
        self.center
    }

    #[must_use]
    pub fn radius_meters(&self) -> u32 {
        self.radius_meters
    }
}

// Wire shapes; deserialization goes through the checked constructors.

#[derive(Deserialize)]
struct UncheckedRegionQuery {
    region: Region,
    #[serde(default)]
    radius_meters: Option<u32>,
}

impl TryFrom<UncheckedRegionQuery> for RegionQuery {
    type Error = TourMapError;

    fn try_from(raw: UncheckedRegionQuery) -> Result<Self, Self::Error> {
        let query = RegionQuery::new(raw.region);
        match raw.radius_meters {
            Some(radius) => query.with_radius(radius),
            None => Ok(query),
        }
    }
}

#[derive(Deserialize)]
struct UncheckedProximityQuery {
    center: Coordinates,
    radius_meters: u32,
}

impl TryFrom<UncheckedProximityQuery> for ProximityQuery {
    type Error = TourMapError;

    fn try_from(raw: UncheckedProximityQuery) -> Result<Self, Self::Error> {
        ProximityQuery::new(raw.center, raw.radius_meters)
    }
}

fn validate_radius(radius_meters: u32) -> crate::Result<()> {
    if (MIN_RADIUS_METERS..=MAX_RADIUS_METERS).contains(&radius_meters) {
        Ok(())
    } else {
        Err(TourMapError::validation(format!(
            "Radius must be between {MIN_RADIUS_METERS} and {MAX_RADIUS_METERS} meters, got {radius_meters}"
        )))
    }
}

/// What the user picked in the category and entity dropdowns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub category: Option<String>,
    pub entity: Option<String>,
}

impl Selection {
    /// Build from raw UI values; empty or `"none"` means nothing selected
    #[must_use]
    pub fn from_ui(category: Option<&str>, entity: Option<&str>) -> Self {
        Self {
            category: category.and_then(selected_value),
            entity: entity.and_then(selected_value),
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

fn selected_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(trimmed.to_string())
    }
}
