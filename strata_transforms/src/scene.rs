// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Running programs directly against a `strata_core::Scene`.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use hashbrown::hash_map::Entry;
use hashbrown::{HashMap, HashSet};
use strata_core::{ColId, Scene, Table, TableId};

use crate::Program;
use crate::program::{ExecutionError, ProgramOutput};
use crate::table::{TableFrame, TableFrameError};
use crate::transform::Transform;

/// Errors returned when executing a [`Program`] against a [`Scene`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneExecutionError {
    /// The referenced input table does not exist in the scene.
    MissingInput(TableId),
    /// The referenced input table exists, but has no data accessor.
    MissingData(TableId),
    /// Failed to extract a numeric frame from an input table.
    FrameError {
        /// The table id that failed frame extraction.
        table: TableId,
        /// The underlying extraction error.
        err: TableFrameError,
    },
    /// Failed while executing the program.
    Execution(ExecutionError),
}

impl fmt::Display for SceneExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInput(t) => write!(f, "scene has no table {}", t.0),
            Self::MissingData(t) => write!(f, "scene table {} has no data", t.0),
            Self::FrameError { table, err } => write!(f, "table {}: {err}", table.0),
            Self::Execution(err) => write!(f, "{err}"),
        }
    }
}

impl core::error::Error for SceneExecutionError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::FrameError { err, .. } => Some(err),
            Self::Execution(err) => Some(err),
            _ => None,
        }
    }
}

impl Program {
    /// Executes this program using tables from the given scene.
    ///
    /// Only the columns the program reads are extracted from scene tables.
    pub fn execute_on_scene(&self, scene: &Scene) -> Result<ProgramOutput, SceneExecutionError> {
        let required = required_input_columns(self.transforms());
        let mut inputs: HashMap<TableId, TableFrame> = HashMap::new();

        for (table_id, cols) in required {
            let Some(table) = scene.tables.get(&table_id) else {
                return Err(SceneExecutionError::MissingInput(table_id));
            };
            if table.data.is_none() {
                return Err(SceneExecutionError::MissingData(table_id));
            }
            let mut columns: Vec<ColId> = cols.into_iter().collect();
            columns.sort_by_key(|c| c.0);
            let frame = TableFrame::from_table(table, columns).map_err(|err| {
                SceneExecutionError::FrameError {
                    table: table_id,
                    err,
                }
            })?;
            inputs.insert(table_id, frame);
        }

        self.execute(&inputs)
            .map_err(SceneExecutionError::Execution)
    }

    /// Executes this program against the scene, inserting or updating output tables.
    ///
    /// Existing output tables get new `row_keys` and `data` and their version is bumped once.
    pub fn apply_to_scene(&self, scene: &mut Scene) -> Result<ProgramOutput, SceneExecutionError> {
        let out = self.execute_on_scene(scene)?;
        for (id, frame) in &out.tables {
            upsert_frame_as_table(scene, *id, frame.clone());
        }
        Ok(out)
    }
}

/// Columns read from tables that no earlier transform produces.
fn required_input_columns(transforms: &[Transform]) -> HashMap<TableId, HashSet<ColId>> {
    let mut out: HashMap<TableId, HashSet<ColId>> = HashMap::new();
    let mut produced: HashSet<TableId> = HashSet::new();

    for t in transforms {
        let input = t.input();
        if !produced.contains(&input) {
            out.entry(input).or_default().extend(t.required_columns());
        }
        produced.insert(t.output());
    }

    out
}

fn upsert_frame_as_table(scene: &mut Scene, id: TableId, frame: TableFrame) {
    match scene.tables.entry(id) {
        Entry::Occupied(mut e) => {
            let Table { data, row_keys, .. } = frame.into_table(id);
            let existing = e.get_mut();
            existing.row_keys = row_keys;
            existing.data = data;
            existing.bump();
        }
        Entry::Vacant(e) => {
            e.insert(frame.into_table(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;
    use alloc::vec::Vec;

    use strata_core::TableData;

    use super::*;
    use crate::transform::{SortOrder, StackOffset};

    #[derive(Debug)]
    struct TwoCols {
        a: Vec<f64>,
        b: Vec<f64>,
    }

    impl TableData for TwoCols {
        fn row_count(&self) -> usize {
            self.a.len().min(self.b.len())
        }

        fn f64(&self, row: usize, col: ColId) -> Option<f64> {
            match col {
                ColId(0) => self.a.get(row).copied(),
                ColId(1) => self.b.get(row).copied(),
                _ => None,
            }
        }
    }

    fn scene_with_source(source_id: TableId) -> Scene {
        let mut scene = Scene::new();
        let mut t = Table::new(source_id);
        t.row_keys = vec![10, 11, 12];
        t.data = Some(Box::new(TwoCols {
            a: vec![1.0, 2.0, 3.0],
            b: vec![3.0, 2.0, 1.0],
        }));
        scene.insert_table(t);
        scene
    }

    #[test]
    fn apply_to_scene_inserts_output_table_and_bumps_on_update() {
        let source_id = TableId(1);
        let out_id = TableId(2);
        let mut scene = scene_with_source(source_id);

        let p = Program::new().with(Transform::Project {
            input: source_id,
            output: out_id,
            columns: vec![ColId(0)],
        });

        p.apply_to_scene(&mut scene).unwrap();
        let v1 = scene.tables[&out_id].version;

        p.apply_to_scene(&mut scene).unwrap();
        let v2 = scene.tables[&out_id].version;

        assert_ne!(v1, v2);
        assert_eq!(scene.tables[&out_id].row_keys, vec![10, 11, 12]);
    }

    #[test]
    fn stack_output_is_readable_from_the_scene() {
        let source_id = TableId(1);
        let out_id = TableId(3);
        let mut scene = scene_with_source(source_id);

        let p = Program::new().with(Transform::Stack {
            input: source_id,
            output: out_id,
            group_by: vec![],
            offset: StackOffset::Zero,
            sort_by: None,
            sort_order: SortOrder::Asc,
            field: ColId(1),
            output_start: ColId(5),
            output_end: ColId(6),
            columns: vec![ColId(0)],
        });
        p.apply_to_scene(&mut scene).unwrap();

        let table = &scene.tables[&out_id];
        assert_eq!(table.f64(2, ColId(5)), Some(5.0));
        assert_eq!(table.f64(2, ColId(6)), Some(6.0));
    }

    #[test]
    fn tables_without_data_are_rejected() {
        let mut scene = Scene::new();
        scene.insert_table(Table::new(TableId(7)));
        let p = Program::new().with(Transform::Project {
            input: TableId(7),
            output: TableId(8),
            columns: vec![ColId(0)],
        });
        assert_eq!(
            p.execute_on_scene(&scene).unwrap_err(),
            SceneExecutionError::MissingData(TableId(7))
        );
    }
}
