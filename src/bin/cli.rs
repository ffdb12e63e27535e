//! Stockroom CLI
//!
//! Command-line interface for a running Stockroom API server:
//! - Browse products and sales page by page
//! - Show the dashboard summary and goal progress
//! - Check server and session status

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use stockroom::client::{ClientError, InventoryClient};
use stockroom::inventory::{Product, Sale};
use stockroom::pagination::{Page, PaginationController, PaginationState, SortDirection};

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inventory and sales dashboard from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8090", global = true)]
    pub api_url: String,

    /// Bearer token for the identity provider
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

/// Paging and sorting flags shared by listings
#[derive(clap::Args)]
pub struct ListingArgs {
    /// Page number (1-based)
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,
    /// Rows per page
    #[arg(short, long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: u32,
    /// Field to sort by
    #[arg(short, long)]
    pub sort_by: Option<String>,
    /// Sort order (asc, desc)
    #[arg(short, long)]
    pub order: Option<SortDirection>,
}

impl ListingArgs {
    /// Pagination state for a view that starts sorted by `default_key`
    fn view(&self, default_key: &str) -> PaginationController {
        let mut view = PaginationController::new(PaginationState::new(
            1,
            self.limit,
            default_key,
            SortDirection::Ascending,
        ));

        if let Some(key) = &self.sort_by {
            view.set_sorting(key.as_str(), Some(self.order.unwrap_or_default()));
        } else if let Some(order) = self.order {
            view.set_sorting(default_key, Some(order));
        }

        // Sorting resets the page, so pick the page last
        view.set_page(self.page);
        view
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List products
    Products(ListingArgs),

    /// List sales
    Sales(ListingArgs),

    /// Show stock and revenue totals
    Summary,

    /// Show progress toward a target
    Goal {
        /// Target value
        #[arg(short, long)]
        target: f64,
        /// What to measure (revenue, units)
        #[arg(short, long, default_value = "revenue")]
        metric: String,
    },

    /// Show server and session status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut client = InventoryClient::new(cli.api_url.as_str(), Duration::from_secs(10))?;
    if let Some(token) = &cli.token {
        client = client.with_token(token.as_str());
    }

    let json = cli.format == "json";

    match cli.command {
        Commands::Products(args) => {
            let view = args.view("name");
            let page = client.list_products(&view).await.map_err(explain)?;
            if json {
                print_json(&page)?;
            } else {
                print_products(&page);
            }
        }

        Commands::Sales(args) => {
            let view = args.view("soldAt");
            let page = client.list_sales(&view).await.map_err(explain)?;
            if json {
                print_json(&page)?;
            } else {
                print_sales(&page);
            }
        }

        Commands::Summary => {
            let summary = client.summary().await.map_err(explain)?;
            if json {
                print_json(&summary)?;
            } else {
                println!("Products:      {}", summary.product_count);
                println!("Units:         {}", summary.total_units);
                println!("Stock value:   {:.2}", summary.stock_value);
                println!("Sales:         {}", summary.sales_count);
                println!("Revenue:       {:.2}", summary.total_revenue);
                if summary.low_stock.is_empty() {
                    println!("Low stock:     none");
                } else {
                    println!("Low stock:     {}", summary.low_stock.join(", "));
                }
            }
        }

        Commands::Goal { target, metric } => {
            let goal = client.goal(&metric, target).await.map_err(explain)?;
            if json {
                print_json(&goal)?;
            } else {
                println!(
                    "{}: {:.2} / {:.2} ({:.1}%)",
                    goal.name, goal.achieved, goal.target, goal.percent
                );
                println!("{}", progress_bar(goal.percent, 40));
                if goal.reached {
                    println!("Goal reached");
                } else {
                    println!("Remaining: {:.2}", goal.remaining);
                }
            }
        }

        Commands::Status => {
            println!("Stockroom v{}", env!("CARGO_PKG_VERSION"));
            println!();

            if let Err(e) = client.health_check().await {
                eprintln!("Cannot connect to Stockroom API at {}", client.base_url());
                eprintln!("Error: {}", e);
                eprintln!();
                eprintln!("Make sure the Stockroom API server is running:");
                eprintln!("  cargo run --bin stockroom-api");
                std::process::exit(1);
            }
            println!("API Status: ok ({})", client.base_url());

            let state = client.session().await.map_err(explain)?;
            match state.identity() {
                Some(identity) => println!("Session: {} as {}", state, identity.user_id),
                None => println!("Session: {}", state),
            }
        }

        Commands::Config { output } => {
            let config = stockroom::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Add a hint for the errors users can fix themselves
fn explain(e: ClientError) -> anyhow::Error {
    match &e {
        ClientError::Api { status: 401, .. } => {
            anyhow::anyhow!("{} (pass a valid --token)", e)
        }
        ClientError::Unavailable => {
            anyhow::anyhow!("{} (is stockroom-api running?)", e)
        }
        _ => e.into(),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_products(page: &Page<Product>) {
    if page.items.is_empty() {
        println!("No products on this page");
    } else {
        println!(
            "{:<8} {:<24} {:<14} {:>10} {:>6}",
            "SKU", "Name", "Category", "Price", "Qty"
        );
        println!("{}", "-".repeat(66));

        for product in &page.items {
            let flag = if product.is_low_stock() { " !" } else { "" };
            println!(
                "{:<8} {:<24} {:<14} {:>10.2} {:>6}{}",
                product.sku,
                truncate(&product.name, 24),
                truncate(&product.category, 14),
                product.price,
                product.quantity,
                flag
            );
        }
    }
    print_footer(page);
}

fn print_sales(page: &Page<Sale>) {
    if page.items.is_empty() {
        println!("No sales on this page");
    } else {
        println!(
            "{:<6} {:<20} {:>8} {:>6} {:>10}",
            "ID", "Sold at", "Product", "Qty", "Revenue"
        );
        println!("{}", "-".repeat(54));

        for sale in &page.items {
            println!(
                "{:<6} {:<20} {:>8} {:>6} {:>10.2}",
                sale.id,
                sale.sold_at.format("%Y-%m-%d %H:%M"),
                sale.product_id,
                sale.quantity,
                sale.revenue()
            );
        }
    }
    print_footer(page);
}

fn print_footer<T>(page: &Page<T>) {
    println!();
    println!(
        "Page {} of {} ({} total)",
        page.page,
        page.total_pages.max(1),
        page.total
    );
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{}~", cut)
    }
}

fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}
