use crate::services::{CachedResult, ScopeKind, StudySearchService};

pub async fn cmd_search(
    service: &StudySearchService,
    kind: ScopeKind,
    id: i32,
    query: &str,
) -> anyhow::Result<()> {
    if query.is_empty() {
        println!("Searching for {} {id} (query derived from {kind})", kind.owner_label());
    } else {
        println!("Searching for {} {id}: {query}", kind.owner_label());
    }

    let results = match kind {
        ScopeKind::Exercise => service.search_exercise(id, Some(query), None).await?,
        ScopeKind::Lecture => service.search_lecture(id, Some(query)).await?,
    };

    if results.is_empty() {
        println!("No results found");
        return Ok(());
    }

    print_results(&results);
    Ok(())
}

pub(super) fn print_results(results: &[CachedResult]) {
    println!();
    println!("{:-<60}", "");

    for result in results {
        println!("• {}", result.title);
        println!("  {}", result.link);
        if !result.snippet.is_empty() {
            println!("  {}", result.snippet.replace('\n', " "));
        }
        let date = result.date.as_deref().unwrap_or("-");
        println!(
            "  Source: {} | Published: {} | Cached: {}",
            result.source,
            date,
            result.created_at.format("%Y-%m-%d %H:%M")
        );
        println!();
    }
}
