use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::common::VoterId;

/// A voter on the electoral roll.
///
/// Whether a voter has voted is not stored here: it is derived per category
/// from the ballot log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub id: VoterId,
    pub full_name: String,
    pub address: String,
    pub district: String,
    pub province: String,
    pub department: String,
    pub birth_date: NaiveDate,
}

const GIVEN_NAMES: [&str; 16] = [
    "Juan", "María", "Carlos", "Ana", "Luis", "Carmen", "Pedro", "Rosa", "Miguel", "Patricia",
    "Fernando", "Sandra", "Roberto", "Elena", "Jorge", "Lucía",
];
const SURNAMES: [&str; 16] = [
    "García", "Rodríguez", "López", "Martínez", "González", "Pérez", "Sánchez", "Ramírez",
    "Torres", "Flores", "Rivera", "Gómez", "Díaz", "Cruz", "Morales", "Ortiz",
];
const DISTRICTS: [&str; 6] = [
    "Miraflores", "San Isidro", "La Molina", "Surco", "Pueblo Libre", "Jesús María",
];
const PROVINCES: [&str; 6] = ["Lima", "Callao", "Arequipa", "Cusco", "Trujillo", "Chiclayo"];
const DEPARTMENTS: [&str; 6] = [
    "Lima", "Callao", "Arequipa", "Cusco", "La Libertad", "Lambayeque",
];

impl Voter {
    /// Generate a deterministic profile for an identifier seen for the first time.
    ///
    /// Each attribute is picked by one digit of the identifier, so the same
    /// identifier always yields the same profile.
    pub fn synthesize(id: VoterId) -> Self {
        fn pick(pool: &[&'static str], digit: usize) -> &'static str {
            pool[digit % pool.len()]
        }

        let district = pick(&DISTRICTS, id.digit(3));
        let street_number = id.digit(0) * 100 + id.digit(1) * 10 + id.digit(2);
        let year = 1900 + (id.digit(4) * 10 + id.digit(5)) as i32;
        let month = id.digit(6) as u32 + 1;
        let day = id.digit(7) as u32 + 1;

        Self {
            full_name: format!(
                "{} {} {}",
                pick(&GIVEN_NAMES, id.digit(0)),
                pick(&SURNAMES, id.digit(1)),
                pick(&SURNAMES, id.digit(2))
            ),
            address: format!("Av. Principal {street_number} - {district}"),
            district: district.to_string(),
            province: pick(&PROVINCES, id.digit(4)).to_string(),
            department: pick(&DEPARTMENTS, id.digit(5)).to_string(),
            // Months and days never exceed 10, so the date always exists.
            birth_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
            id,
        }
    }
}
