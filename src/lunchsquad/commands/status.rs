use crate::commands::{CmdResult, LunchPaths, StatusReport};
use crate::error::Result;
use crate::model::Kind;
use crate::store::{OrderStore, StorageBackend};
use crate::votes::VoteTally;
use chrono::Utc;

pub fn run<C: StorageBackend, D: StorageBackend>(
    store: &OrderStore<C, D>,
    paths: &LunchPaths,
    session: &str,
) -> Result<CmdResult> {
    let catalog = store.catalog();
    let per_restaurant = Kind::ALL
        .iter()
        .map(|&kind| {
            let count = store.orders().iter().filter(|o| o.kind() == kind).count();
            (catalog.restaurant_label(kind).to_string(), count)
        })
        .collect();

    let formatter = timeago::Formatter::new();
    let last_order = store.orders().iter().map(|o| o.created_at).max().map(|t| {
        let elapsed = Utc::now().signed_duration_since(t).to_std().unwrap_or_default();
        formatter.convert(elapsed)
    });

    let leading_vote = VoteTally::load(store.backend(), session)
        .leader()
        .map(|k| catalog.restaurant_label(k).to_string());

    let report = StatusReport {
        session: session.to_string(),
        order_count: store.len(),
        per_restaurant,
        last_order,
        leading_vote,
        data_dir: paths.data.clone(),
        cache_dir: paths.session_cache(session),
    };
    Ok(CmdResult {
        status: Some(report),
        ..Default::default()
    })
}
