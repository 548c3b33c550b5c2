//! Dirty tile accumulation and the hierarchical collapse to coarser zooms.

use std::collections::HashSet;
use std::vec;

use super::quadkey;
use crate::coord::TileCoord;

/// Duplicate-free set of dirty tiles at one maximum zoom level.
///
/// Tiles are stored as quadkeys. Coarser zoom levels are never stored; they
/// are derived on output by [`TileList::into_tiles`].
#[derive(Debug, Clone)]
pub struct TileList {
    maxzoom: u8,
    dirty: HashSet<u64>,
    /// Arguments of the previous `add` call
    last_tile: Option<(u32, u32)>,
}

impl TileList {
    pub fn new(maxzoom: u8) -> Self {
        Self {
            maxzoom,
            dirty: HashSet::new(),
            last_tile: None,
        }
    }

    /// Marks tile `(x, y)` at the maximum zoom as dirty.
    ///
    /// Geometries tend to request the same tile many times in a row while
    /// scanning adjacent rows, so a repeat of the previous call returns
    /// without computing the key.
    #[inline]
    pub fn add(&mut self, x: u32, y: u32) {
        if self.last_tile == Some((x, y)) {
            return;
        }
        self.dirty.insert(quadkey::encode(x, y, self.maxzoom));
        self.last_tile = Some((x, y));
    }

    pub fn maxzoom(&self) -> u8 {
        self.maxzoom
    }

    /// Number of distinct tiles at the maximum zoom.
    pub fn len(&self) -> usize {
        self.dirty.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    /// Consumes the list and yields every dirty tile at every zoom level from
    /// the maximum down to `minzoom`.
    ///
    /// Each tile appears once. Within one zoom level tiles come out in
    /// ascending quadkey order. Yields nothing if `minzoom > maxzoom`.
    pub fn into_tiles(self, minzoom: u8) -> CollapsedTiles {
        let mut sorted: Vec<u64> = if minzoom > self.maxzoom {
            Vec::new()
        } else {
            self.dirty.into_iter().collect()
        };
        sorted.sort_unstable();

        CollapsedTiles {
            sorted: sorted.into_iter(),
            maxzoom: self.maxzoom,
            depth: self.maxzoom.saturating_sub(minzoom),
            current: None,
            dz: 0,
            last_quadkey: None,
        }
    }
}

/// Iterator returned by [`TileList::into_tiles`].
///
/// Walks the sorted max-zoom quadkeys once. For each key it climbs the zoom
/// levels, emitting the ancestor at each level, and stops climbing as soon as
/// an ancestor equals the one of the previous key: that ancestor and all
/// coarser ones have already been emitted.
#[derive(Debug)]
pub struct CollapsedTiles {
    sorted: vec::IntoIter<u64>,
    maxzoom: u8,
    /// `maxzoom - minzoom`
    depth: u8,
    /// Key being climbed
    current: Option<u64>,
    /// Next level to look at for `current`
    dz: u8,
    /// Previously finished key; `None` compares unequal to every ancestor
    last_quadkey: Option<u64>,
}

impl Iterator for CollapsedTiles {
    type Item = TileCoord;

    fn next(&mut self) -> Option<TileCoord> {
        loop {
            let key = match self.current {
                Some(key) => key,
                None => {
                    let key = self.sorted.next()?;
                    self.current = Some(key);
                    self.dz = 0;
                    key
                }
            };

            if self.dz <= self.depth {
                let dz = self.dz;
                let here = quadkey::ancestor(key, dz);
                let seen = self
                    .last_quadkey
                    .is_some_and(|last| quadkey::ancestor(last, dz) == here);
                if !seen {
                    self.dz += 1;
                    let zoom = self.maxzoom - dz;
                    let (x, y) = quadkey::decode(here, zoom);
                    return Some(TileCoord::new(x, y, zoom));
                }
            }

            self.last_quadkey = Some(key);
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn collect_by_zoom(tiles: impl Iterator<Item = TileCoord>) -> Vec<Vec<(u32, u32)>> {
        let mut by_zoom: Vec<Vec<(u32, u32)>> = vec![Vec::new(); 33];
        for tile in tiles {
            by_zoom[tile.zoom as usize].push((tile.x, tile.y));
        }
        by_zoom
    }

    /// Straightforward per-level reference for the collapse.
    fn expected_at(tiles: &[(u32, u32)], maxzoom: u8, zoom: u8) -> BTreeSet<(u32, u32)> {
        let dz = maxzoom - zoom;
        tiles.iter().map(|&(x, y)| (x >> dz, y >> dz)).collect()
    }

    #[test]
    fn test_new_list_is_empty() {
        let list = TileList::new(14);
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.maxzoom(), 14);
        assert_eq!(list.into_tiles(0).count(), 0);
    }

    #[test]
    fn test_add_same_tile_twice() {
        let mut list = TileList::new(10);
        list.add(3, 4);
        list.add(3, 4);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_add_same_tile_non_consecutively() {
        let mut list = TileList::new(10);
        list.add(3, 4);
        list.add(5, 6);
        list.add(3, 4);
        assert_eq!(list.len(), 2);
        let tiles: Vec<_> = list.into_tiles(10).collect();
        assert_eq!(tiles, vec![TileCoord::new(3, 4, 10), TileCoord::new(5, 6, 10)]);
    }

    #[test]
    fn test_first_add_always_inserts() {
        // (0, 0) must not be mistaken for a repeat of an earlier call
        let mut list = TileList::new(0);
        list.add(0, 0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_single_tile_collapses_to_one_per_level() {
        let mut list = TileList::new(14);
        list.add(8186, 5448);
        let tiles: Vec<_> = list.into_tiles(10).collect();
        assert_eq!(
            tiles,
            vec![
                TileCoord::new(8186, 5448, 14),
                TileCoord::new(4093, 2724, 13),
                TileCoord::new(2046, 1362, 12),
                TileCoord::new(1023, 681, 11),
                TileCoord::new(511, 340, 10),
            ]
        );
    }

    #[test]
    fn test_siblings_share_parent() {
        let mut list = TileList::new(2);
        for &(x, y) in &[(0, 0), (1, 0), (0, 1), (1, 1)] {
            list.add(x, y);
        }
        let tiles: Vec<_> = list.into_tiles(0).collect();
        assert_eq!(
            tiles,
            vec![
                TileCoord::new(0, 0, 2),
                TileCoord::new(0, 0, 1),
                TileCoord::new(0, 0, 0),
                TileCoord::new(1, 0, 2),
                TileCoord::new(0, 1, 2),
                TileCoord::new(1, 1, 2),
            ]
        );
    }

    #[test]
    fn test_minzoom_equal_to_maxzoom() {
        let mut list = TileList::new(5);
        list.add(1, 1);
        list.add(2, 2);
        let tiles: Vec<_> = list.into_tiles(5).collect();
        assert_eq!(tiles.len(), 2);
        assert!(tiles.iter().all(|t| t.zoom == 5));
    }

    #[test]
    fn test_minzoom_above_maxzoom_yields_nothing() {
        let mut list = TileList::new(5);
        list.add(1, 1);
        assert_eq!(list.into_tiles(6).count(), 0);
    }

    #[test]
    fn test_maxzoom_32_extremes() {
        let mut list = TileList::new(32);
        list.add(u32::MAX, u32::MAX);
        list.add(0, 0);
        let tiles: Vec<_> = list.into_tiles(31).collect();
        assert_eq!(
            tiles,
            vec![
                TileCoord::new(0, 0, 32),
                TileCoord::new(0, 0, 31),
                TileCoord::new(u32::MAX, u32::MAX, 32),
                TileCoord::new(u32::MAX >> 1, u32::MAX >> 1, 31),
            ]
        );
    }

    #[test]
    fn test_each_level_sorted_by_quadkey() {
        let mut list = TileList::new(6);
        for x in 10..20 {
            for y in 30..37 {
                list.add(x, y);
            }
        }
        let by_zoom = collect_by_zoom(list.into_tiles(2));
        for (zoom, tiles) in by_zoom.iter().enumerate() {
            let keys: Vec<u64> = tiles
                .iter()
                .map(|&(x, y)| quadkey::encode(x, y, zoom as u8))
                .collect();
            assert!(
                keys.windows(2).all(|w| w[0] < w[1]),
                "zoom {} not strictly ascending",
                zoom
            );
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_collapse_matches_reference(
                maxzoom in 1u8..=16,
                minzoom_raw in 0u8..=16,
                raw in prop::collection::vec((any::<u32>(), any::<u32>()), 0..200)
            ) {
                let minzoom = minzoom_raw % (maxzoom + 1);
                let mask = ((1u64 << maxzoom) - 1) as u32;
                let tiles: Vec<(u32, u32)> =
                    raw.iter().map(|&(x, y)| (x & mask, y & mask)).collect();

                let mut list = TileList::new(maxzoom);
                for &(x, y) in &tiles {
                    list.add(x, y);
                }
                let by_zoom = collect_by_zoom(list.into_tiles(minzoom));

                for zoom in 0..=32u8 {
                    let got = &by_zoom[zoom as usize];
                    if zoom < minzoom || zoom > maxzoom {
                        prop_assert!(got.is_empty(), "unexpected tiles at zoom {}", zoom);
                        continue;
                    }
                    let unique: BTreeSet<(u32, u32)> = got.iter().copied().collect();
                    prop_assert_eq!(unique.len(), got.len(), "duplicates at zoom {}", zoom);
                    prop_assert_eq!(unique, expected_at(&tiles, maxzoom, zoom));
                }
            }

            #[test]
            fn test_repeated_adds_do_not_change_result(
                raw in prop::collection::vec((0u32..64, 0u32..64, 1usize..4), 0..100)
            ) {
                let mut with_repeats = TileList::new(6);
                let mut without_repeats = TileList::new(6);
                for &(x, y, times) in &raw {
                    for _ in 0..times {
                        with_repeats.add(x, y);
                    }
                    without_repeats.add(x, y);
                }
                let a: Vec<_> = with_repeats.into_tiles(0).collect();
                let b: Vec<_> = without_repeats.into_tiles(0).collect();
                prop_assert_eq!(a, b);
            }

            #[test]
            fn test_insertion_order_irrelevant(
                raw in prop::collection::vec((0u32..256, 0u32..256), 0..100)
            ) {
                let mut forward = TileList::new(8);
                let mut backward = TileList::new(8);
                for &(x, y) in &raw {
                    forward.add(x, y);
                }
                for &(x, y) in raw.iter().rev() {
                    backward.add(x, y);
                }
                let a: Vec<_> = forward.into_tiles(3).collect();
                let b: Vec<_> = backward.into_tiles(3).collect();
                prop_assert_eq!(a, b);
            }
        }
    }
}
