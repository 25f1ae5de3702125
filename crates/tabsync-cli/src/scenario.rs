//! House-points scenarios.
//!
//! `setup` seeds the synthetic tables into a target document. `transform`
//! stages every source tab into a database target, computes the points
//! summary (place 1 earns 6 points down to place 6 earning 1), and writes
//! the result tables back into the source document.

use rand::thread_rng;
use tabsync_core::{Result, TabDocument};
use tracing::info;

use crate::seeds;

const SUMMARY_SQL: &str = "\
WITH house_points AS (
    SELECT
        h.id AS house_id,
        h.house_name,
        CASE p.place
            WHEN 1 THEN 6
            WHEN 2 THEN 5
            WHEN 3 THEN 4
            WHEN 4 THEN 3
            WHEN 5 THEN 2
            WHEN 6 THEN 1
            ELSE 0
        END AS points
    FROM placements AS p
    JOIN houses AS h
        ON p.house_id = h.id
    JOIN races AS r
        ON p.race_id = r.id
)
SELECT
    house_id,
    house_name,
    SUM(points) AS total_points,
    COUNT(*) AS races_participated
FROM house_points
GROUP BY house_id, house_name
ORDER BY total_points DESC";

const DENORMALIZED_SQL: &str = "\
SELECT
    r.id AS race_id,
    r.name,
    h.id AS house_id,
    h.house_name,
    p.place,
    CASE p.place
        WHEN 1 THEN 6
        WHEN 2 THEN 5
        WHEN 3 THEN 4
        WHEN 4 THEN 3
        WHEN 5 THEN 2
        WHEN 6 THEN 1
        ELSE 0
    END AS points
FROM placements AS p
JOIN races AS r
    ON p.race_id = r.id
JOIN houses AS h
    ON p.house_id = h.id
ORDER BY r.id, p.place";

/// Seeds the synthetic house-points tables into `target`.
///
/// With `only`, all tables but the named one are skipped.
pub fn housepoints_setup(target: &dyn TabDocument, only: Option<&str>) -> Result<()> {
    let mut rng = thread_rng();
    for (title, table) in seeds::generate_housepoints(&mut rng)? {
        if only.is_none_or(|o| o == title) {
            info!(tab = title, rows = table.row_count(), "seeding table");
            target.write_tab(&title, &table)?;
        }
    }
    Ok(())
}

/// Stages every source tab into `target`, computes the house-points
/// summary and denormalized placements, and writes both back to `source`.
pub fn housepoints_transform(source: &dyn TabDocument, target: &dyn TabDocument) -> Result<()> {
    for name in source.tab_names()? {
        let table = source.read_tab(&name)?;
        info!(tab = name, rows = table.row_count(), "staging tab");
        target.write_tab(&name, &table)?;
    }

    let results = target.query(SUMMARY_SQL)?;
    let denormalized = target.query(DENORMALIZED_SQL)?;
    info!(
        houses = results.row_count(),
        placements = denormalized.row_count(),
        "computed house points"
    );

    source.write_tab("results", &results)?;
    source.write_tab("placements_denormalized", &denormalized)?;
    Ok(())
}

/// Writes `count` synthetic student records through `save_records`.
pub fn seed_local(target: &dyn TabDocument, count: usize) -> Result<()> {
    let mut rng = thread_rng();
    let records = seeds::generate_student_records(&mut rng, count);
    info!(rows = records.len(), "saving student records");
    target.save_records("students", &records)
}
