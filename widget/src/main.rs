//! # Donation Widget Host
//!
//! Runs the widgets headless: polls network stats and donation history and logs
//! every widget event. With `DONATION_AMOUNT` set it performs one donation from
//! the `WALLET_KEYPAIR_PATH` keypair and exits; with `SWAP_AMOUNT` set it logs an
//! indicative swap price first.

use anyhow::{bail, Context};
use async_channel::Receiver;
use donation_widget::app::{AppEvent, DonationWidget, DonationWidgetSettings, SwapWidget, ToastLevel};
use donation_widget::debug::logger;
use donation_widget::utils::{
    calculate_usd_value, format_number, format_sol, format_timestamp, format_token_amount, format_usd, solana_pay_uri,
    solscan_url, truncate_signature,
};
use lib_core::init_config;
use lib_solana::{KeypairWallet, PriorityTier, SolanaState, WalletProvider};
use lib_utils::envs::get_env;
use solana_sdk::signature::Keypair;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = logger::init();

    let config = init_config().map_err(anyhow::Error::msg).context("Invalid configuration")?;
    let solana = Arc::new(SolanaState::from_config(config)?);
    info!(
        network = %solana.rpc.network(),
        recipient = %solana.recipient,
        pay_uri = %solana_pay_uri(&solana.recipient),
        "Donation widget starting"
    );
    if let Err(e) = solana.rpc.health_check().await {
        warn!(error = %e, "Solana RPC is not responding - continuing, requests will be retried on each poll");
    }

    let wallet: Arc<dyn WalletProvider> = match &config.keypair_path {
        Some(path) => Arc::new(KeypairWallet::from_file(path, solana.rpc.as_ref().clone())?),
        None => {
            warn!("WALLET_KEYPAIR_PATH not set - donations disabled");
            Arc::new(KeypairWallet::new(Keypair::new(), solana.rpc.as_ref().clone()))
        }
    };

    let (event_tx, event_rx) = async_channel::unbounded();
    let logger_task = tokio::spawn(log_events(event_rx));

    let donation = DonationWidget::new(
        Arc::clone(&wallet),
        solana.clone(),
        solana.recipient,
        DonationWidgetSettings::from(config),
        event_tx.clone(),
    );

    if let Ok(amount) = get_env("SWAP_AMOUNT") {
        let swap = SwapWidget::from_config(solana.swap.clone(), config, event_tx.clone());
        if let Ok(symbol) = get_env("SWAP_FROM") {
            swap.select_from_token(&symbol)?;
        }
        if let Ok(symbol) = get_env("SWAP_TO") {
            swap.select_to_token(&symbol)?;
        }
        if !swap.set_from_amount(&amount) {
            bail!("SWAP_AMOUNT must be a decimal number, got {}", amount);
        }
        // Let the debounced fetch run before moving on
        tokio::time::sleep(config.quote_debounce() + Duration::from_secs(5)).await;
        let state = swap.snapshot();
        match &state.last_price {
            Some(price) => {
                let usd = match solana.price_cache.get_price(state.from_token.symbol).await {
                    Ok(quote) => calculate_usd_value(&price.sell_amount, quote.price, state.from_token.decimals),
                    Err(e) => {
                        warn!(error = %e, "No USD price for {}", state.from_token.symbol);
                        0.0
                    }
                };
                info!(
                    from = %format!("{} {}", state.from_amount, state.from_token.symbol),
                    to = %format!("{} {}", state.to_amount, state.to_token.symbol),
                    whole_tokens = %format_token_amount(&price.buy_amount, state.to_token.decimals),
                    rate = %price.price.parse::<f64>().map(|r| format_number(r, 6)).unwrap_or_default(),
                    usd = %format_usd(usd),
                    "Swap price"
                );
            }
            None => warn!(error = ?state.error, "No swap price"),
        }
    }

    if let Ok(amount) = get_env("DONATION_AMOUNT") {
        if config.keypair_path.is_none() {
            bail!("DONATION_AMOUNT requires WALLET_KEYPAIR_PATH");
        }
        donation.connect_wallet().await?;
        if !donation.set_amount(amount.trim()) {
            bail!("DONATION_AMOUNT must be a decimal number, got {}", amount);
        }
        if let Ok(memo) = get_env("DONATION_MEMO") {
            donation.set_memo(&memo);
        }
        if let Ok(tier) = get_env("DONATION_PRIORITY") {
            donation.set_tier(parse_tier(&tier)?);
        }

        let form = donation.snapshot();
        info!(amount = %form.amount, tier = form.tier.label(), memo = %form.memo, "Submitting donation");
        let outcome = donation.donate().await;
        drop(donation);
        drop(event_tx);
        let _ = logger_task.await;

        return match outcome {
            Some(Ok(signature)) => {
                info!(explorer = %solscan_url(&signature.to_string()), "Done");
                Ok(())
            }
            Some(Err(e)) => Err(e.into()),
            None => bail!("A donation is already in flight"),
        };
    }

    donation.start_polling();
    info!("Polling network stats and donation history, press Ctrl+C to stop");
    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl+C")?;

    donation.stop_polling();
    info!("Shutting down");
    Ok(())
}

fn parse_tier(value: &str) -> anyhow::Result<PriorityTier> {
    match value.trim().to_lowercase().as_str() {
        "low" => Ok(PriorityTier::Low),
        "medium" => Ok(PriorityTier::Medium),
        "high" => Ok(PriorityTier::High),
        other => bail!("DONATION_PRIORITY must be low, medium or high, got {}", other),
    }
}

/// Log widget events until every sender is gone.
async fn log_events(events: Receiver<AppEvent>) {
    while let Ok(event) = events.recv().await {
        match event {
            AppEvent::Toast { level, message } => match level {
                ToastLevel::Error => error!(toast = %message),
                _ => info!(toast = %message, ?level),
            },
            AppEvent::WalletConnected(address) => info!(%address, "Wallet connected"),
            AppEvent::FeeEstimated(Some(fee)) => info!(fee = %format_sol(fee, 6), "Fee estimate"),
            AppEvent::FeeEstimated(None) => info!("Fee estimate unavailable"),
            AppEvent::DonationPhaseChanged(phase) => info!(?phase, "Donation phase"),
            AppEvent::QuoteUpdated(Ok(price)) => info!(price = %price.price, buy_amount = %price.buy_amount, "Quote updated"),
            AppEvent::QuoteUpdated(Err(e)) => warn!(error = %e, "Quote failed"),
            AppEvent::NetworkStatsUpdated(stats) => info!(
                slot = stats.current_slot,
                block_time = stats.average_block_time,
                sol_price = %format_usd(stats.sol_price),
                "Network stats"
            ),
            AppEvent::HistoryUpdated { entries, summary } => {
                info!(
                    total = %format_sol(summary.total_lamports, 2),
                    donors = summary.donor_count,
                    transactions = summary.transaction_count,
                    "Donation history"
                );
                for entry in entries.iter().take(3) {
                    info!(
                        signature = %truncate_signature(&entry.signature),
                        amount = %format_sol(entry.amount_lamports, 2),
                        at = %format_timestamp(entry.timestamp),
                        "Recent donation"
                    );
                }
            }
        }
    }
}
