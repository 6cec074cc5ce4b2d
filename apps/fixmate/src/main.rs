use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{HttpLookupService, RequestStatus, SessionController, DEFAULT_API_BASE};
use shared::domain::{ApplianceName, BrandName, IssueName};
use tracing::info;

#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the lookup service API.
    #[arg(long, default_value = DEFAULT_API_BASE)]
    server_url: String,
    /// Brand to select; omit to only list the available brands.
    #[arg(long)]
    brand: Option<String>,
    /// Appliance to select under the brand.
    #[arg(long)]
    appliance: Option<String>,
    /// Issue to select; with all three set, a solution is requested.
    #[arg(long)]
    issue: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();
    info!(server_url = %args.server_url, "fixmate: starting selection session");

    let controller = SessionController::new(Arc::new(HttpLookupService::with_base_url(
        args.server_url,
    )));

    controller.initialize().await;
    let state = controller.snapshot().await;
    if let Some(message) = state.status.error_message() {
        anyhow::bail!("loading brands failed: {message}");
    }
    println!("Brands:");
    for brand in &state.brands {
        println!("  {brand}");
    }

    let Some(brand) = args.brand else {
        return Ok(());
    };
    controller
        .select_brand(Some(BrandName::new(brand.as_str())))
        .await?;
    let state = controller.snapshot().await;
    if let Some(message) = state.status.error_message() {
        anyhow::bail!("loading appliances failed: {message}");
    }
    println!("Appliances for {brand}:");
    for appliance in &state.appliances {
        println!("  {appliance}");
    }

    let Some(appliance) = args.appliance else {
        return Ok(());
    };
    controller
        .select_appliance(Some(ApplianceName::new(appliance.as_str())))
        .await?;
    let state = controller.snapshot().await;
    if let Some(message) = state.status.error_message() {
        anyhow::bail!("loading issues failed: {message}");
    }
    println!("Issues for {brand} / {appliance}:");
    for issue in &state.issues {
        println!("  {issue}");
    }

    let Some(issue) = args.issue else {
        return Ok(());
    };
    controller
        .select_issue(Some(IssueName::new(issue.as_str())))
        .await?;
    controller.request_solution().await;

    let state = controller.snapshot().await;
    match (&state.solution, &state.status) {
        (Some(solution), _) => {
            println!("Solution: {}", solution.text);
            if let Some(page) = &solution.brand_page {
                println!("Support page: {page}");
            }
        }
        (None, RequestStatus::Error(message)) => println!("No solution: {message}"),
        (None, _) => println!("No solution returned."),
    }

    Ok(())
}
