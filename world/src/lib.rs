#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Client-side cache of the last server-pushed game state.
//!
//! The cache never mutates authoritative facts. [`replace`] swaps in a whole
//! snapshot at once and [`query`] answers spatial lookups against whichever
//! snapshot is current. An empty cache answers every query with "not found".

use std::{collections::HashMap, sync::Arc};

use conquest_core::{AxialCoord, CityId, GameSnapshot, Terrain, UnitId};

/// Snapshot paired with the coordinate and identity indexes built for it.
#[derive(Debug)]
struct IndexedSnapshot {
    snapshot: Arc<GameSnapshot>,
    terrain: HashMap<AxialCoord, Terrain>,
    units_by_coord: HashMap<AxialCoord, usize>,
    units_by_id: HashMap<UnitId, usize>,
    cities_by_coord: HashMap<AxialCoord, usize>,
    cities_by_id: HashMap<CityId, usize>,
}

impl IndexedSnapshot {
    fn build(snapshot: GameSnapshot) -> Self {
        let terrain = snapshot
            .map
            .hexes
            .iter()
            .map(|hex| (hex.coord, hex.terrain))
            .collect();

        let mut units_by_coord = HashMap::with_capacity(snapshot.units.len());
        let mut units_by_id = HashMap::with_capacity(snapshot.units.len());
        for (index, unit) in snapshot.units.iter().enumerate() {
            // First unit listed at a coordinate wins, matching a linear scan.
            let _ = units_by_coord.entry(unit.position).or_insert(index);
            let _ = units_by_id.entry(unit.id.clone()).or_insert(index);
        }

        let mut cities_by_coord = HashMap::with_capacity(snapshot.cities.len());
        let mut cities_by_id = HashMap::with_capacity(snapshot.cities.len());
        for (index, city) in snapshot.cities.iter().enumerate() {
            let _ = cities_by_coord.entry(city.position).or_insert(index);
            let _ = cities_by_id.entry(city.id.clone()).or_insert(index);
        }

        Self {
            snapshot: Arc::new(snapshot),
            terrain,
            units_by_coord,
            units_by_id,
            cities_by_coord,
            cities_by_id,
        }
    }
}

/// Holds the latest snapshot received from the server.
#[derive(Debug, Default)]
pub struct GameStateCache {
    current: Option<IndexedSnapshot>,
    revision: u64,
}

impl GameStateCache {
    /// Creates an empty cache with no snapshot loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache already holding the provided snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: GameSnapshot) -> Self {
        let mut cache = Self::new();
        replace(&mut cache, snapshot);
        cache
    }
}

/// Atomically replaces the cached snapshot.
///
/// Indexes for the new snapshot are built before the swap, so readers observe
/// either the previous snapshot or the new one in full. Nothing else happens;
/// callers decide whether to re-render.
pub fn replace(cache: &mut GameStateCache, snapshot: GameSnapshot) {
    let indexed = IndexedSnapshot::build(snapshot);
    cache.current = Some(indexed);
    cache.revision = cache.revision.wrapping_add(1);
}

/// Read-only queries answered from the cached snapshot.
pub mod query {
    use std::sync::Arc;

    use super::GameStateCache;
    use conquest_core::{
        AxialCoord, City, CityId, GameSnapshot, Hex, PlayerId, Terrain, Unit, UnitId,
    };

    /// Borrows the cached snapshot, if one has been loaded.
    #[must_use]
    pub fn snapshot(cache: &GameStateCache) -> Option<&GameSnapshot> {
        cache.current.as_ref().map(|indexed| indexed.snapshot.as_ref())
    }

    /// Shares the cached snapshot so it can outlive the borrow of the cache.
    #[must_use]
    pub fn shared_snapshot(cache: &GameStateCache) -> Option<Arc<GameSnapshot>> {
        cache
            .current
            .as_ref()
            .map(|indexed| Arc::clone(&indexed.snapshot))
    }

    /// Number of snapshots applied since the cache was created.
    #[must_use]
    pub fn revision(cache: &GameStateCache) -> u64 {
        cache.revision
    }

    /// Unit occupying the provided hex.
    #[must_use]
    pub fn unit_at(cache: &GameStateCache, coord: AxialCoord) -> Option<&Unit> {
        let indexed = cache.current.as_ref()?;
        let index = *indexed.units_by_coord.get(&coord)?;
        indexed.snapshot.units.get(index)
    }

    /// Unit with the provided identity.
    #[must_use]
    pub fn unit_by_id<'cache>(cache: &'cache GameStateCache, id: &UnitId) -> Option<&'cache Unit> {
        let indexed = cache.current.as_ref()?;
        let index = *indexed.units_by_id.get(id)?;
        indexed.snapshot.units.get(index)
    }

    /// City occupying the provided hex.
    #[must_use]
    pub fn city_at(cache: &GameStateCache, coord: AxialCoord) -> Option<&City> {
        let indexed = cache.current.as_ref()?;
        let index = *indexed.cities_by_coord.get(&coord)?;
        indexed.snapshot.cities.get(index)
    }

    /// City with the provided identity.
    #[must_use]
    pub fn city_by_id<'cache>(cache: &'cache GameStateCache, id: &CityId) -> Option<&'cache City> {
        let indexed = cache.current.as_ref()?;
        let index = *indexed.cities_by_id.get(id)?;
        indexed.snapshot.cities.get(index)
    }

    /// Reports whether the hex belongs to the loaded map.
    #[must_use]
    pub fn is_valid_hex(cache: &GameStateCache, coord: AxialCoord) -> bool {
        terrain_at(cache, coord).is_some()
    }

    /// Terrain of the provided hex.
    #[must_use]
    pub fn terrain_at(cache: &GameStateCache, coord: AxialCoord) -> Option<Terrain> {
        cache
            .current
            .as_ref()
            .and_then(|indexed| indexed.terrain.get(&coord).copied())
    }

    /// Seat whose turn it currently is.
    #[must_use]
    pub fn current_player(cache: &GameStateCache) -> Option<&PlayerId> {
        snapshot(cache).map(|snapshot| &snapshot.current_player)
    }

    /// Resource stockpile of a seat; unknown seats hold nothing.
    #[must_use]
    pub fn resources_of(cache: &GameStateCache, player: &PlayerId) -> i64 {
        snapshot(cache)
            .and_then(|snapshot| snapshot.resources.get(player).copied())
            .unwrap_or(0)
    }

    /// Every hex of the loaded map.
    #[must_use]
    pub fn hexes(cache: &GameStateCache) -> &[Hex] {
        snapshot(cache).map_or(&[], |snapshot| snapshot.map.hexes.as_slice())
    }

    /// Every unit of the loaded snapshot.
    #[must_use]
    pub fn units(cache: &GameStateCache) -> &[Unit] {
        snapshot(cache).map_or(&[], |snapshot| snapshot.units.as_slice())
    }

    /// Every city of the loaded snapshot.
    #[must_use]
    pub fn cities(cache: &GameStateCache) -> &[City] {
        snapshot(cache).map_or(&[], |snapshot| snapshot.cities.as_slice())
    }
}
