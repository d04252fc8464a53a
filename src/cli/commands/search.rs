//! Search command.

use console::style;

use super::helpers::{format_brl, truncate};
use crate::cli::icons::{dim_arrow, info, warn};
use crate::config::Settings;
use crate::models::SearchParams;
use crate::search::{SearchOutcome, SearchService};

/// Run one search and print the page.
pub async fn cmd_search(settings: &Settings, params: SearchParams, json: bool) -> anyhow::Result<()> {
    let service = SearchService::from_settings(settings)?;
    let outcome = service.search_with_source(&params).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &SearchOutcome) {
    let result = &outcome.result;

    if outcome.source.is_degraded() {
        eprintln!(
            "{} Upstream unavailable, showing {}",
            warn(),
            outcome.source
        );
    }

    if result.is_empty() {
        println!("{} No notices found.", warn());
        return;
    }

    println!(
        "\n{} {} notices, page {}/{} ({}-{})",
        info(),
        style(result.total).bold(),
        result.page.current_page,
        result.page.last_page,
        result.page.from,
        result.page.to
    );
    println!("{}", "-".repeat(100));
    println!(
        "{:<28} {:<3} {:<22} {:>16}  Objeto",
        "Controle PNCP", "UF", "Modalidade", "Valor estimado"
    );
    println!("{}", "-".repeat(100));

    for item in &result.items {
        println!(
            "{:<28} {:<3} {:<22} {:>16}  {}",
            truncate(&item.numero_controle_pncp, 28),
            item.unidade_orgao.uf_sigla,
            truncate(&item.modalidade_nome, 22),
            format_brl(item.valor_total_estimado),
            truncate(&item.objeto_compra, 60)
        );
        if !item.orgao_entidade.razao_social.is_empty() {
            println!(
                "  {} {}",
                dim_arrow(),
                style(truncate(&item.orgao_entidade.razao_social, 90)).dim()
            );
        }
    }

    println!("\n  {} source: {}", dim_arrow(), outcome.source);
}
