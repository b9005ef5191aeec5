use std::collections::HashSet;

use rand::{rngs::StdRng, Rng, SeedableRng};
use rocket::tokio;

use crate::model::{
    validation::{INVALID_VOTER_ID_MESSAGE, UNKNOWN_VOTER_MESSAGE},
    voter::examples::EXAMPLE_VOTER_ID,
};

use super::*;

fn example_id() -> VoterId {
    VoterId::parse(EXAMPLE_VOTER_ID).unwrap()
}

fn named(id: &str, name: &str, category: Category) -> Selection {
    Selection {
        candidate_id: id.to_string(),
        candidate_name: name.to_string(),
        category,
    }
}

#[backend_test(voter)]
async fn first_vote_commits_and_counts(store: BallotStore) {
    let selections = [Selection::new("pres-1", Category::Presidential)];
    assert_eq!(
        store.validate_batch(EXAMPLE_VOTER_ID, &selections).await,
        Validation::Valid
    );

    let before = store.tally("pres-1").await.unwrap();
    let votes = store.commit_batch(&example_id(), &selections).await.unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].voter_id, example_id());
    assert_eq!(votes[0].candidate_id, "pres-1");
    assert_eq!(votes[0].category, Category::Presidential);
    assert_eq!(store.tally("pres-1").await, Some(before + 1));
    assert_eq!(store.votes_by_voter(&example_id()).await, votes);
}

#[backend_test(voter)]
async fn second_vote_in_category_rejected(store: BallotStore) {
    store
        .commit_batch(&example_id(), &[Selection::new("pres-1", Category::Presidential)])
        .await
        .unwrap();

    let selections = [Selection::new("pres-2", Category::Presidential)];
    assert_eq!(
        store.validate_batch(EXAMPLE_VOTER_ID, &selections).await,
        Validation::Invalid(vec!["Already voted in: Presidencial".to_string()])
    );
    assert_eq!(
        store.commit_batch(&example_id(), &selections).await,
        Err(CommitError::Conflict {
            voter: example_id(),
            categories: vec![Category::Presidential],
        })
    );
    assert_eq!(store.votes_by_voter(&example_id()).await.len(), 1);
    assert_eq!(store.tally("pres-2").await, Some(0));
}

#[backend_test(voter)]
async fn category_mismatch_rejected(store: BallotStore) {
    let selections = [named("dist-1", "Jorge Muñoz Wells", Category::Presidential)];
    assert_eq!(
        store.validate_batch(EXAMPLE_VOTER_ID, &selections).await,
        Validation::Invalid(vec![
            "Candidate Jorge Muñoz Wells does not belong to the Presidencial category".to_string()
        ])
    );
    assert_eq!(
        store.commit_batch(&example_id(), &selections).await,
        Err(CommitError::CategoryMismatch {
            candidate: "dist-1".to_string(),
            category: Category::Presidential,
        })
    );
    assert!(store.votes_by_voter(&example_id()).await.is_empty());
}

#[backend_test(voter)]
async fn unknown_candidate_rejected(store: BallotStore) {
    let selections = [Selection::new("unknown-id", Category::Regional)];
    assert_eq!(
        store.validate_batch(EXAMPLE_VOTER_ID, &selections).await,
        Validation::Invalid(vec!["Candidate unknown-id is not valid".to_string()])
    );
    assert_eq!(
        store.commit_batch(&example_id(), &selections).await,
        Err(CommitError::UnknownCandidate("unknown-id".to_string()))
    );
    assert!(store.votes_by_category(Category::Regional).await.is_empty());
}

#[backend_test(voter)]
async fn identity_checks(store: BallotStore) {
    let selections = [Selection::new("reg-1", Category::Regional)];
    assert_eq!(
        store.validate_batch("123", &selections).await,
        Validation::Invalid(vec![INVALID_VOTER_ID_MESSAGE.to_string()])
    );
    assert_eq!(
        store.validate_batch("87654321", &selections).await,
        Validation::Invalid(vec![UNKNOWN_VOTER_MESSAGE.to_string()])
    );

    let stranger = VoterId::parse("87654321").unwrap();
    assert_eq!(
        store.commit_batch(&stranger, &selections).await,
        Err(CommitError::UnknownVoter(stranger))
    );
}

#[backend_test(voter)]
async fn empty_batch_is_distinct(store: BallotStore) {
    assert_eq!(
        store.validate_batch(EXAMPLE_VOTER_ID, &[]).await,
        Validation::NothingSelected
    );
    assert_eq!(
        store.commit_batch(&example_id(), &[]).await,
        Err(CommitError::NothingSelected)
    );
}

#[backend_test(voter)]
async fn batch_is_all_or_nothing(store: BallotStore) {
    store
        .commit_batch(&example_id(), &[Selection::new("dist-1", Category::District)])
        .await
        .unwrap();

    // The presidential selection is fine on its own, but the district one conflicts.
    let selections = [
        Selection::new("pres-3", Category::Presidential),
        Selection::new("dist-2", Category::District),
        Selection::new("reg-2", Category::Regional),
    ];
    assert_eq!(
        store.commit_batch(&example_id(), &selections).await,
        Err(CommitError::Conflict {
            voter: example_id(),
            categories: vec![Category::District],
        })
    );

    assert_eq!(store.votes_by_voter(&example_id()).await.len(), 1);
    assert_eq!(store.tally("pres-3").await, Some(0));
    assert_eq!(store.tally("reg-2").await, Some(0));
    assert!(store.votes_by_category(Category::Presidential).await.is_empty());
}

#[backend_test(voter)]
async fn repeated_category_within_batch_conflicts(store: BallotStore) {
    let selections = [
        Selection::new("reg-1", Category::Regional),
        Selection::new("reg-2", Category::Regional),
    ];
    assert!(!store.validate_batch(EXAMPLE_VOTER_ID, &selections).await.is_valid());
    assert_eq!(
        store.commit_batch(&example_id(), &selections).await,
        Err(CommitError::Conflict {
            voter: example_id(),
            categories: vec![Category::Regional],
        })
    );
    assert!(store.dump().await.votes.is_empty());
}

#[backend_test(voter)]
async fn full_ballot_preserves_order(store: BallotStore) {
    let selections = [
        Selection::new("reg-3", Category::Regional),
        Selection::new("pres-2", Category::Presidential),
        Selection::new("dist-3", Category::District),
    ];
    let votes = store.commit_batch(&example_id(), &selections).await.unwrap();

    let committed: Vec<_> = votes.iter().map(|v| v.candidate_id.as_str()).collect();
    assert_eq!(committed, vec!["reg-3", "pres-2", "dist-3"]);

    let ids: HashSet<_> = votes.iter().map(|v| v.id).collect();
    assert_eq!(ids.len(), 3);
    assert!(votes.windows(2).all(|pair| pair[0].id < pair[1].id));

    for category in Category::ALL {
        assert_eq!(store.votes_by_category(category).await.len(), 1);
    }
}

#[backend_test]
async fn registration_is_idempotent(store: BallotStore) {
    let original = Voter::example();
    assert_eq!(store.register_voter(original.clone()).await, original);

    let mut renamed = original.clone();
    renamed.full_name = "Someone Else".to_string();
    assert_eq!(store.register_voter(renamed).await, original);
    assert_eq!(store.find_voter(&original.id).await, Some(original.clone()));

    let fresh = VoterId::parse("55555555").unwrap();
    assert_eq!(store.find_voter(&fresh).await, None);
    let registered = store.find_or_register(fresh.clone()).await;
    assert_eq!(registered, Voter::synthesize(fresh.clone()));
    assert_eq!(store.find_voter(&fresh).await, Some(registered));
    assert_eq!(store.summary().await.registered_voters, 2);
}

#[backend_test(voter)]
async fn concurrent_commits_for_same_category(store: BallotStore) {
    let first = store.clone();
    let second = store.clone();
    let (a, b) = tokio::join!(
        tokio::spawn(async move {
            first
                .commit_batch(&example_id(), &[Selection::new("reg-1", Category::Regional)])
                .await
        }),
        tokio::spawn(async move {
            second
                .commit_batch(&example_id(), &[Selection::new("reg-2", Category::Regional)])
                .await
        }),
    );
    let outcomes = [a.unwrap(), b.unwrap()];
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert_eq!(store.votes_by_category(Category::Regional).await.len(), 1);
    assert_eq!(store.dump().await.verify(), Ok(()));
}

#[backend_test]
async fn random_batches_keep_invariants(store: BallotStore) {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let voters: Vec<VoterId> = (0..20)
        .map(|i| VoterId::parse(&format!("{:08}", 40_000_000 + i)).unwrap())
        .collect();
    for voter in &voters {
        store.register_voter(Voter::synthesize(voter.clone())).await;
    }
    let candidate_ids: Vec<CandidateId> = store
        .catalog()
        .list_candidates()
        .iter()
        .map(|candidate| candidate.id.clone())
        .chain(["ghost".to_string()])
        .collect();

    for _ in 0..300 {
        let voter = &voters[rng.gen_range(0..voters.len())];
        let size = rng.gen_range(1..=3);
        let selections: Vec<_> = (0..size)
            .map(|_| {
                let candidate = candidate_ids[rng.gen_range(0..candidate_ids.len())].clone();
                let category = Category::ALL[rng.gen_range(0..Category::ALL.len())];
                Selection::new(candidate, category)
            })
            .collect();

        let before = store.dump().await;
        let validation = store.validate_batch(voter.as_str(), &selections).await;
        let committed = store.commit_batch(voter, &selections).await;

        // The store never accepts what the engine rejects, and vice versa.
        assert_eq!(validation.is_valid(), committed.is_ok());
        if committed.is_err() {
            assert_eq!(store.dump().await, before);
        }
    }

    let dump = store.dump().await;
    assert_eq!(dump.verify(), Ok(()));
    let recounted = store.ledger.read().await.recount();
    assert_eq!(store.tallies().await, recounted);
}

#[backend_test]
async fn seeded_store_is_consistent(store: BallotStore) {
    let mut rng = StdRng::seed_from_u64(1200);
    let recorded = store.seed(500, &mut rng).await;
    assert!(recorded > 0 && recorded <= 500);

    let summary = store.summary().await;
    assert_eq!(summary.total_votes, u64::from(recorded));
    let per_category: u64 = summary.categories.iter().map(|c| c.total_votes).sum();
    assert_eq!(per_category, summary.total_votes);
    assert!(summary.participating_voters <= summary.registered_voters);
    assert_eq!(store.dump().await.verify(), Ok(()));
}

#[backend_test(voter)]
async fn summary_ranks_candidates(store: BallotStore) {
    store
        .commit_batch(&example_id(), &[Selection::new("reg-2", Category::Regional)])
        .await
        .unwrap();

    let summary = store.summary().await;
    assert_eq!(summary.total_votes, 1);
    assert_eq!(summary.participating_voters, 1);
    let regional = summary
        .categories
        .iter()
        .find(|results| results.category == Category::Regional)
        .unwrap();
    assert_eq!(regional.total_votes, 1);
    assert_eq!(regional.candidates[0].candidate.id, "reg-2");
    assert_eq!(regional.candidates[0].vote_count, 1);

    let filtered = store.candidates(Some(Category::Regional)).await;
    assert_eq!(filtered.len(), 3);
    assert_eq!(store.candidate("reg-2").await.unwrap().vote_count, 1);
    assert!(store.candidate("ghost").await.is_none());
}
