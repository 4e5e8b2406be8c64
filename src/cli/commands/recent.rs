use super::search::print_results;
use crate::services::{ScopeKind, StudySearchService};

pub async fn cmd_recent(
    service: &StudySearchService,
    kind: ScopeKind,
    id: i32,
    limit: u64,
) -> anyhow::Result<()> {
    let results = service.recent(kind, id, Some(limit)).await?;

    if results.is_empty() {
        println!("No stored results for {} {id}", kind.owner_label());
        return Ok(());
    }

    println!("Latest {} results for {} {id}:", results.len(), kind.owner_label());
    print_results(&results);
    Ok(())
}
