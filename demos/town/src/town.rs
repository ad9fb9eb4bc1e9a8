//! The demo town: terrain, buildings, and the facilities they carry.
//!
//! ```text
//!    0         1         2
//!    012345678901234567890123
//!  0 ~~~~~..........^^^^^^^^^
//!  1 ~~~~...........^^^^^^^^^
//!  2 ~~~.....................
//!  3 ########################
//!  4 .HH.HH.HH.HH..FFFF.OOO..
//!  5 .HH.HH.HH.HH..FFFF.OOO..
//!  6 ........................
//!  7 ########################
//!  8 ........SSS.SSS.$$..PPP.
//!  9 ........SSS.SSS.$$..PPP.
//! 10 ...TTT..................
//! 11 ..TTTT..................
//! ```
//!
//! Houses (H) sit north of the middle row so residents gather on row 6.
//! Every house carries utilities the technicians at the plant (P) keep
//! running.

use anyhow::Result;
use tc_agent::{EducationLevel, Profession};
use tc_core::{Area, BuildingId, Placement, Position};
use tc_registry::{BuildingKind, BuildingRegistry, Commercial, Housing, School, Utilities, Workplace};
use tc_spatial::GridMap;

const TERRAIN: [&str; 12] = [
    "~~~~~..........^^^^^^^^^",
    "~~~~...........^^^^^^^^^",
    "~~~.....................",
    "########################",
    "........................",
    "........................",
    "........................",
    "########################",
    "........................",
    "........................",
    "...TTT..................",
    "..TTTT..................",
];

/// Tiles of the four houses' top-left corners.  The bundled population CSV
/// names homes by these tiles.
pub const HOUSES: [(i32, i32); 4] = [(1, 4), (4, 4), (7, 4), (10, 4)];

const HOUSE_CAPACITY: usize = 4;

/// A school course lasts this many lesson hours.
const COURSE_HOURS: u64 = 18;

pub fn build_town(ticks_per_hour: u32) -> Result<(GridMap, BuildingRegistry)> {
    let mut map = GridMap::from_ascii(&TERRAIN)?;
    let mut registry = BuildingRegistry::new();
    let course_ticks = COURSE_HOURS * ticks_per_hour as u64;

    let mut place = |x: i32, y: i32, w: u32, h: u32, kind: BuildingKind| -> Result<BuildingId> {
        let placement = Placement::new(Position::new(x, y), Area { width: w, height: h });
        Ok(registry.register(placement, kind, true, &mut map)?)
    };

    let houses = HOUSES
        .iter()
        .map(|&(x, y)| place(x, y, 2, 2, BuildingKind::House))
        .collect::<Result<Vec<_>>>()?;
    let factory = place(14, 4, 4, 2, BuildingKind::Workshop)?;
    let office = place(19, 4, 3, 2, BuildingKind::Office)?;
    let primary = place(8, 8, 3, 2, BuildingKind::School)?;
    let secondary = place(12, 8, 3, 2, BuildingKind::School)?;
    let shop = place(16, 8, 2, 2, BuildingKind::Shop)?;
    let plant = place(20, 8, 3, 2, BuildingKind::Plant)?;

    for &house in &houses {
        registry.attach(house, Housing::new(HOUSE_CAPACITY))?;
        registry.attach(house, Utilities::new())?;
    }
    registry.attach(factory, Workplace::new(Profession::Labourer, EducationLevel::None, 6))?;
    registry.attach(office, Workplace::new(Profession::Clerk, EducationLevel::Secondary, 3))?;
    for (school, level) in [(primary, EducationLevel::Primary), (secondary, EducationLevel::Secondary)] {
        registry.attach(school, School::new(level, 8, course_ticks))?;
        registry.attach(school, Workplace::new(Profession::Teacher, EducationLevel::University, 1))?;
    }
    registry.attach(shop, Commercial::new(2, 4, ticks_per_hour))?;
    registry.attach(shop, Workplace::new(Profession::Shopkeeper, EducationLevel::Primary, 1))?;
    registry.attach(plant, Workplace::new(Profession::Technician, EducationLevel::Secondary, 2))?;
    registry.attach(plant, Utilities::new())?;

    Ok((map, registry))
}

/// The terrain with buildings drawn over it.
pub fn render(map: &GridMap, registry: &BuildingRegistry) -> Vec<String> {
    let mut rows: Vec<Vec<char>> = map.to_ascii().iter().map(|r| r.chars().collect()).collect();
    for id in registry.ids() {
        let (Some(placement), Some(kind)) = (registry.placement(id), registry.kind(id)) else { continue };
        let glyph = glyph(kind);
        for tile in placement.tiles() {
            if let Some(cell) = rows.get_mut(tile.y as usize).and_then(|r| r.get_mut(tile.x as usize)) {
                *cell = glyph;
            }
        }
    }
    rows.into_iter().map(|r| r.into_iter().collect()).collect()
}

fn glyph(kind: BuildingKind) -> char {
    match kind {
        BuildingKind::House    => 'H',
        BuildingKind::Workshop => 'F',
        BuildingKind::Office   => 'O',
        BuildingKind::School   => 'S',
        BuildingKind::Shop     => '$',
        BuildingKind::Plant    => 'P',
        BuildingKind::Plaza    => '+',
    }
}
