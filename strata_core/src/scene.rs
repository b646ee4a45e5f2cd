// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The retained scene.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Point;

use crate::diff::MarkDiff;
use crate::ids::{MarkId, TableId};
use crate::mark::Mark;
use crate::table::Table;

/// Tables plus the mark set produced by the most recent [`Scene::tick`].
#[derive(Debug, Default)]
pub struct Scene {
    /// Registered tables, keyed by id.
    pub tables: HashMap<TableId, Table>,
    marks: HashMap<MarkId, Mark>,
    ticks: u64,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) a table.
    ///
    /// A replaced table keeps counting versions from the previous one.
    pub fn insert_table(&mut self, mut table: Table) {
        if let Some(prev) = self.tables.get(&table.id) {
            table.version = prev.version.wrapping_add(1);
        }
        self.tables.insert(table.id, table);
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Replaces the retained mark set and reports what changed.
    ///
    /// Diffs are ordered by `(z_index, id)`, with exits after enters and updates. If the
    /// same id appears more than once in `marks`, the last one wins.
    pub fn tick(&mut self, marks: impl IntoIterator<Item = Mark>) -> Vec<MarkDiff> {
        let mut next: HashMap<MarkId, Mark> = HashMap::new();
        for mark in marks {
            next.insert(mark.id, mark);
        }

        let mut changed: Vec<(i32, MarkId, MarkDiff)> = Vec::new();
        for (id, mark) in &next {
            match self.marks.get(id) {
                None => changed.push((
                    mark.z_index,
                    *id,
                    MarkDiff::Enter {
                        id: *id,
                        kind: mark.kind,
                        z_index: mark.z_index,
                        bounds: mark.payload.bounds(),
                        new: Box::new(mark.payload.clone()),
                    },
                )),
                Some(old) if old.z_index != mark.z_index || old.payload != mark.payload => {
                    changed.push((
                        mark.z_index,
                        *id,
                        MarkDiff::Update {
                            id: *id,
                            kind: mark.kind,
                            old_z_index: old.z_index,
                            new_z_index: mark.z_index,
                            old_bounds: old.payload.bounds(),
                            new_bounds: mark.payload.bounds(),
                            old: Box::new(old.payload.clone()),
                            new: Box::new(mark.payload.clone()),
                        },
                    ));
                }
                Some(_) => {}
            }
        }
        changed.sort_by_key(|(z, id, _)| (*z, *id));

        let mut exits: Vec<(i32, MarkId, MarkDiff)> = self
            .marks
            .iter()
            .filter(|(id, _)| !next.contains_key(*id))
            .map(|(id, old)| {
                (
                    old.z_index,
                    *id,
                    MarkDiff::Exit {
                        id: *id,
                        kind: old.kind,
                        bounds: old.payload.bounds(),
                        old: Box::new(old.payload.clone()),
                    },
                )
            })
            .collect();
        exits.sort_by_key(|(z, id, _)| (*z, *id));

        self.marks = next;
        self.ticks += 1;

        changed
            .into_iter()
            .chain(exits)
            .map(|(_, _, diff)| diff)
            .collect()
    }

    /// Looks up a retained mark.
    pub fn mark(&self, id: MarkId) -> Option<&Mark> {
        self.marks.get(&id)
    }

    /// Number of retained marks.
    pub fn mark_count(&self) -> usize {
        self.marks.len()
    }

    /// Retained marks sorted by `(z_index, id)`, i.e. back to front.
    pub fn marks_in_paint_order(&self) -> Vec<&Mark> {
        let mut out: Vec<&Mark> = self.marks.values().collect();
        out.sort_by_key(|m| (m.z_index, m.id));
        out
    }

    /// Returns the topmost rect or path mark whose fill contains `pt`.
    pub fn hit_test(&self, pt: Point) -> Option<MarkId> {
        self.marks_in_paint_order()
            .into_iter()
            .rev()
            .find(|m| m.payload.contains(pt))
            .map(|m| m.id)
    }

    /// Like [`Scene::hit_test`], restricted to marks accepted by `filter`.
    pub fn hit_test_where(&self, pt: Point, filter: impl Fn(&Mark) -> bool) -> Option<MarkId> {
        self.marks_in_paint_order()
            .into_iter()
            .rev()
            .filter(|m| filter(m))
            .find(|m| m.payload.contains(pt))
            .map(|m| m.id)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;
    use peniko::Color;

    use super::*;

    fn square(id: u64, z: i32, rect: Rect) -> Mark {
        Mark::builder(MarkId::from_raw(id))
            .rect()
            .z_index(z)
            .bounds(rect)
            .fill(Color::BLACK)
            .build()
    }

    #[test]
    fn tick_reports_enter_update_exit_once() {
        let mut scene = Scene::new();
        let a = square(1, 0, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = square(2, 0, Rect::new(20.0, 0.0, 30.0, 10.0));

        let diffs = scene.tick([a.clone(), b.clone()]);
        assert_eq!(diffs.len(), 2);
        assert!(diffs.iter().all(|d| matches!(d, MarkDiff::Enter { .. })));

        // Unchanged marks produce no diffs.
        assert!(scene.tick([a.clone(), b.clone()]).is_empty());

        let moved = square(1, 0, Rect::new(5.0, 0.0, 15.0, 10.0));
        let diffs = scene.tick([moved]);
        assert_eq!(diffs.len(), 2);
        assert!(matches!(diffs[0], MarkDiff::Update { id, .. } if id == MarkId(1)));
        assert!(matches!(diffs[1], MarkDiff::Exit { id, .. } if id == MarkId(2)));
        assert_eq!(
            diffs[0].damage(),
            Some(Rect::new(0.0, 0.0, 15.0, 10.0))
        );
        assert_eq!(scene.mark_count(), 1);
        assert_eq!(scene.tick_count(), 3);
    }

    #[test]
    fn diffs_are_sorted_by_z_then_id() {
        let mut scene = Scene::new();
        let r = Rect::new(0.0, 0.0, 1.0, 1.0);
        let diffs = scene.tick([square(5, 2, r), square(9, 1, r), square(1, 2, r)]);
        let ids: Vec<u64> = diffs.iter().map(|d| d.id().0).collect();
        assert_eq!(ids, [9, 1, 5]);
    }

    #[test]
    fn hit_test_prefers_topmost_mark() {
        let mut scene = Scene::new();
        scene.tick([
            square(1, 0, Rect::new(0.0, 0.0, 10.0, 10.0)),
            square(2, 5, Rect::new(5.0, 5.0, 15.0, 15.0)),
        ]);
        assert_eq!(scene.hit_test(Point::new(7.0, 7.0)), Some(MarkId(2)));
        assert_eq!(scene.hit_test(Point::new(2.0, 2.0)), Some(MarkId(1)));
        assert_eq!(scene.hit_test(Point::new(50.0, 50.0)), None);
        assert_eq!(
            scene.hit_test_where(Point::new(7.0, 7.0), |m| m.id == MarkId(1)),
            Some(MarkId(1))
        );
    }

    #[test]
    fn replacing_a_table_bumps_its_version() {
        let mut scene = Scene::new();
        scene.insert_table(Table::new(TableId(1)));
        let v1 = scene.tables[&TableId(1)].version;
        scene.insert_table(Table::new(TableId(1)));
        assert_ne!(scene.tables[&TableId(1)].version, v1);
    }
}
