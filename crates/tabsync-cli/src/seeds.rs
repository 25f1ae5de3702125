//! Synthetic house-points data.
//!
//! Generates the demo tables for the house-points scenario: students,
//! houses, a student/house association, races, and per-race placements.

use rand::Rng;
use rand::seq::SliceRandom;
use tabsync_core::{Record, Result, TabError, Table, Value};

pub const HOUSE_NAMES: [&str; 4] = ["Griffincrest", "Serpenthelm", "Ravenbrook", "Badgerfen"];
const HOUSE_COLORS: [&str; 4] = ["red", "green", "blue", "yellow"];

const FIRST_NAMES: [&str; 12] = [
    "Ada", "Grace", "Alan", "Edsger", "Barbara", "Donald", "Margaret", "John", "Radia", "Ken",
    "Frances", "Dennis",
];
const LAST_NAMES: [&str; 12] = [
    "Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov", "Knuth", "Hamilton", "Backus",
    "Perlman", "Thompson", "Allen", "Ritchie",
];

const RACE_ADJECTIVES: [&str; 6] = ["Lightning", "Thunder", "Blazing", "Golden", "Rapid", "Flying"];
const RACE_NOUNS: [&str; 6] = ["Dash", "Quest", "Match", "Sprint", "Tournament", "Cup"];

const STUDENT_ID_BASE: i64 = 1250;
const HOUSE_ID_BASE: i64 = 2300;

fn pick<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

/// Generates `count` students with randomized names, grades, and derived
/// emails.
pub fn generate_students<R: Rng>(rng: &mut R, count: usize) -> Result<Table> {
    let mut table = Table::with_columns(vec![
        "id",
        "student_id",
        "first_name",
        "last_name",
        "grade",
        "email",
    ])?;
    for index in 0..count {
        let first = pick(rng, &FIRST_NAMES);
        let last = pick(rng, &LAST_NAMES);
        table.push_row(vec![
            Value::Int(STUDENT_ID_BASE + index as i64),
            Value::Text(format!("S{:06}", rng.gen_range(0..1_000_000))),
            first.into(),
            last.into(),
            Value::Int(rng.gen_range(1..=12)),
            Value::Text(format!(
                "{}.{}@example.edu",
                first.to_lowercase(),
                last.to_lowercase()
            )),
        ])?;
    }
    Ok(table)
}

/// Generates the four houses with their colors and founding years.
pub fn generate_houses<R: Rng>(rng: &mut R) -> Result<Table> {
    let mut table = Table::with_columns(vec!["id", "house_name", "colors", "founder_year"])?;
    for (index, name) in HOUSE_NAMES.iter().enumerate() {
        table.push_row(vec![
            Value::Int(HOUSE_ID_BASE + index as i64),
            (*name).into(),
            HOUSE_COLORS[index].into(),
            Value::Int(rng.gen_range(2000..=2025)),
        ])?;
    }
    Ok(table)
}

/// Generates `count` races with adjective-noun names.
pub fn generate_races<R: Rng>(rng: &mut R, count: usize) -> Result<Table> {
    let mut table = Table::with_columns(vec!["id", "name"])?;
    for index in 0..count {
        table.push_row(vec![
            Value::Int(index as i64 + 1),
            Value::Text(format!(
                "{} {}",
                pick(rng, &RACE_ADJECTIVES),
                pick(rng, &RACE_NOUNS)
            )),
        ])?;
    }
    Ok(table)
}

/// Generates placements: every race gets 1..=5 participating houses
/// (sampled with replacement), shuffled into places starting at 1.
pub fn generate_placements<R: Rng>(rng: &mut R, races: &Table, houses: &Table) -> Result<Table> {
    let race_ids = int_column(races, "id")?;
    let house_ids = int_column(houses, "id")?;

    let mut table = Table::with_columns(vec!["race_id", "house_id", "place"])?;
    for race_id in race_ids {
        let participants = rng.gen_range(1..=5);
        let mut entrants: Vec<i64> = (0..participants)
            .map(|_| house_ids[rng.gen_range(0..house_ids.len())])
            .collect();
        entrants.shuffle(rng);
        for (place, house_id) in entrants.into_iter().enumerate() {
            table.push_row(vec![
                Value::Int(race_id),
                Value::Int(house_id),
                Value::Int(place as i64 + 1),
            ])?;
        }
    }
    Ok(table)
}

/// Generates the full set of scenario tables in seeding order.
pub fn generate_housepoints<R: Rng>(rng: &mut R) -> Result<Vec<(String, Table)>> {
    let students = generate_students(rng, 20)?;
    let houses = generate_houses(rng)?;

    let house_ids = int_column(&houses, "id")?;
    let mut associations = Table::with_columns(vec!["id", "house_id"])?;
    for student_id in int_column(&students, "id")? {
        associations.push_row(vec![
            Value::Int(student_id),
            Value::Int(house_ids[rng.gen_range(0..house_ids.len())]),
        ])?;
    }

    let races = generate_races(rng, 50)?;
    let placements = generate_placements(rng, &races, &houses)?;

    Ok(vec![
        ("students".to_string(), students),
        ("houses".to_string(), houses),
        ("students_houses".to_string(), associations),
        ("races".to_string(), races),
        ("placements".to_string(), placements),
    ])
}

/// Generates plain student records for the directory-seeding command.
pub fn generate_student_records<R: Rng>(rng: &mut R, count: usize) -> Vec<Record> {
    (0..count)
        .map(|index| {
            let mut record = Record::new();
            record.insert("id".to_string(), serde_json::json!(1000 + index as i64));
            record.insert(
                "name".to_string(),
                serde_json::json!(format!(
                    "{} {}",
                    pick(rng, &FIRST_NAMES),
                    pick(rng, &LAST_NAMES)
                )),
            );
            record.insert(
                "house".to_string(),
                serde_json::json!(pick(rng, &HOUSE_NAMES)),
            );
            record
        })
        .collect()
}

fn int_column(table: &Table, name: &str) -> Result<Vec<i64>> {
    let column = table
        .column(name)
        .ok_or_else(|| TabError::Schema(format!("missing column '{}'", name)))?;
    column
        .values
        .iter()
        .map(|value| match value {
            Value::Int(i) => Ok(*i),
            other => Err(TabError::Schema(format!(
                "column '{}' holds non-integer value '{}'",
                name, other
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn seeds_all_five_tables_in_order() {
        let tables = generate_housepoints(&mut rng()).unwrap();
        let names: Vec<&str> = tables.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec!["students", "houses", "students_houses", "races", "placements"]
        );
    }

    #[test]
    fn students_have_unique_ids_and_derived_emails() {
        let students = generate_students(&mut rng(), 20).unwrap();
        assert_eq!(students.row_count(), 20);
        let ids: HashSet<String> = students
            .column("id")
            .unwrap()
            .values
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(ids.len(), 20);
        for email in &students.column("email").unwrap().values {
            assert!(email.to_string().ends_with("@example.edu"));
        }
    }

    #[test]
    fn placements_reference_existing_races_and_houses() {
        let mut rng = rng();
        let houses = generate_houses(&mut rng).unwrap();
        let races = generate_races(&mut rng, 10).unwrap();
        let placements = generate_placements(&mut rng, &races, &houses).unwrap();

        let house_ids: HashSet<i64> = int_column(&houses, "id").unwrap().into_iter().collect();
        let race_ids: HashSet<i64> = int_column(&races, "id").unwrap().into_iter().collect();
        for row in placements.rows() {
            let race_id = match row[0] {
                Value::Int(i) => *i,
                other => panic!("unexpected race_id {other:?}"),
            };
            let house_id = match row[1] {
                Value::Int(i) => *i,
                other => panic!("unexpected house_id {other:?}"),
            };
            assert!(race_ids.contains(&race_id));
            assert!(house_ids.contains(&house_id));
        }
    }

    #[test]
    fn places_start_at_one_per_race() {
        let mut rng = rng();
        let houses = generate_houses(&mut rng).unwrap();
        let races = generate_races(&mut rng, 5).unwrap();
        let placements = generate_placements(&mut rng, &races, &houses).unwrap();

        for target in int_column(&races, "id").unwrap() {
            let mut places: Vec<i64> = placements
                .rows()
                .filter(|row| matches!(row[0], Value::Int(i) if *i == target))
                .map(|row| match row[2] {
                    Value::Int(i) => *i,
                    other => panic!("unexpected place {other:?}"),
                })
                .collect();
            places.sort_unstable();
            let expected: Vec<i64> = (1..=places.len() as i64).collect();
            assert_eq!(places, expected);
        }
    }
}
