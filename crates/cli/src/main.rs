//! Command line interface for inspecting Aelin pool status.
use aelin_data::{PollerConfig, SnapshotPoller, SubgraphProvider};
use aelin_domain::derived;
use aelin_lifecycle::prelude::*;
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "aelin")]
#[command(about = "Aelin pool lifecycle inspector", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a pool once and print its derived status
    Status {
        /// Chain ID the pool lives on
        #[arg(short, long, default_value_t = 1)]
        chain: u64,

        /// Pool contract address
        #[arg(short, long)]
        pool: String,
    },
    /// Poll a pool and report status changes until interrupted
    Watch {
        /// Chain ID the pool lives on
        #[arg(short, long, default_value_t = 1)]
        chain: u64,

        /// Pool contract address
        #[arg(short, long)]
        pool: String,

        /// Refetch interval in seconds
        #[arg(short, long, default_value_t = 15)]
        interval: u64,
    },
}

fn provider_from_env(chain_id: u64) -> Result<SubgraphProvider> {
    let url = env::var("AELIN_SUBGRAPH_URL")
        .context("AELIN_SUBGRAPH_URL must point at the subgraph endpoint")?;
    Ok(SubgraphProvider::new().with_endpoint(chain_id, url))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Status { chain, pool } => {
            let provider = provider_from_env(chain)?;
            let key = PoolKey::new(chain, pool);
            let poller = SnapshotPoller::new(Arc::new(provider), PollerConfig::default());

            poller.track(key.clone()).await;
            poller.refresh(&key).await?;
            let tracked = poller
                .latest(&key)
                .await
                .context("no snapshot applied for pool")?;

            print_status(&tracked.snapshot);
        }
        Commands::Watch {
            chain,
            pool,
            interval,
        } => {
            let provider = provider_from_env(chain)?;
            let key = PoolKey::new(chain, pool);
            let poller = SnapshotPoller::new(
                Arc::new(provider),
                PollerConfig {
                    interval_secs: interval,
                },
            );

            poller.track(key.clone()).await;
            info!(pool = %key, interval, "Watching pool");

            let mut last_state: Option<PoolState> = None;
            poller
                .watch(key, |tracked| {
                    let status = classify(&tracked.snapshot, Utc::now());
                    if last_state != Some(status.state) {
                        print_status(&tracked.snapshot);
                        last_state = Some(status.state);
                    }
                })
                .await;
        }
    }

    Ok(())
}

fn print_status(pool: &PoolSnapshot) {
    let now = Utc::now();
    let status = classify(pool, now);
    let symbol = &pool.purchase_token.symbol;

    println!("Pool {} (chain {})", pool.address, pool.chain_id);
    println!("  Sponsor:          {}", pool.sponsor);
    println!("  State:            {:?}", status.state);
    println!("  Created:          {}", derived::pool_created_date(pool));
    println!("  Funding ends:     {}", derived::purchase_expiry(pool));
    println!("  Deal deadline:    {}", derived::deal_deadline(pool));
    println!(
        "  Cap:              {} {symbol}",
        derived::purchase_token_cap(pool).formatted
    );
    println!(
        "  Funded:           {} {symbol}",
        derived::amount_funded(pool).formatted
    );
    println!(
        "  Withdrawn:        {} {symbol}",
        derived::amount_withdrawn(pool).formatted
    );
    println!("  Sponsor fee:      {}", derived::sponsor_fee(pool).formatted);

    match &status.meta {
        StatusMeta::Funding {
            is_uncapped,
            cap_reached,
            max_deposit_allowed,
        } => {
            if *is_uncapped {
                println!("  Deposits:         open, unlimited");
            } else if *cap_reached {
                println!("  Deposits:         cap reached");
            } else {
                println!(
                    "  Deposits:         up to {} {symbol}",
                    max_deposit_allowed.formatted()
                );
            }
        }
        StatusMeta::WaitingForDeal {
            deal_presented,
            attempts_remaining,
        } => {
            println!(
                "  Deal:             {} ({attempts_remaining} attempts left)",
                if *deal_presented { "presented" } else { "none" }
            );
            if let Some(deal) = &pool.deal {
                print_deal(pool, deal, &status);
            }
        }
        StatusMeta::Vesting {
            schedule,
            vesting_start,
        } => {
            println!(
                "  Vesting:          cliff {}s + linear {}s from {vesting_start}",
                schedule.cliff_secs, schedule.linear_secs
            );
        }
        StatusMeta::Closed => {}
    }
}

fn print_deal(pool: &PoolSnapshot, deal: &DealSnapshot, status: &DerivedStatus) {
    let now = Utc::now();
    println!(
        "  Deal token:       {} ({})",
        deal.underlying_token.symbol, deal.address
    );

    let rates = deal.exchange_rates(pool.purchase_token.decimals_or_zero());
    println!(
        "  Exchange rate:    {} {} per {}",
        rates.investment_per_deal, pool.purchase_token.symbol, deal.underlying_token.symbol
    );

    if status.state == PoolState::WaitingForDeal {
        match redemption_stage(deal, now) {
            Some(RedemptionStage::ProRata) => println!("  Redemption:       pro-rata round"),
            Some(RedemptionStage::Open) => println!("  Redemption:       open round"),
            None if deal.holder_funded => {
                println!(
                    "  Redemption:       closed ({} unredeemed)",
                    unredeemed(deal)
                );
            }
            None => println!("  Redemption:       awaiting holder funding"),
        }
    }
}
