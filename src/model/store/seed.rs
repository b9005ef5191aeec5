use chrono::{Duration, Utc};
use rand::{seq::SliceRandom, Rng};

use crate::model::{
    catalog::Catalog,
    common::{Category, VoterId},
    vote::Selection,
    voter::Voter,
};

use super::ledger::Ledger;

/// Seeded votes are spread over this many days before now.
const SEED_WINDOW_DAYS: i64 = 30;

/// Record up to `count` random votes, each from a random voter in a random category.
///
/// Votes go through the normal commit path, so a random voter drawn twice for
/// the same category is simply skipped.
pub(super) fn seed_ledger<R: Rng>(
    ledger: &mut Ledger,
    catalog: &Catalog,
    count: u32,
    rng: &mut R,
) -> u32 {
    let now = Utc::now();
    let mut recorded = 0;
    for _ in 0..count {
        let category = Category::ALL[rng.gen_range(0..Category::ALL.len())];
        let candidates: Vec<_> = catalog.candidates_in(category).collect();
        let candidate = match candidates.choose(rng) {
            Some(candidate) => candidate,
            None => continue,
        };

        let raw_id = rng.gen_range(10_000_000..100_000_000u32).to_string();
        let voter_id = match VoterId::parse(&raw_id) {
            Ok(id) => id,
            Err(_) => continue,
        };
        ledger.register(Voter::synthesize(voter_id.clone()));

        let voted_at = now - Duration::days(rng.gen_range(0..SEED_WINDOW_DAYS));
        let selection = Selection::new(candidate.id.clone(), category);
        match ledger.commit(catalog, &voter_id, &[selection], voted_at) {
            Ok(_) => recorded += 1,
            Err(err) => trace!("Skipped seed vote: {err}"),
        }
    }
    info!("Seeded {recorded} of {count} requested votes");
    recorded
}
