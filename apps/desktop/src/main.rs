use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{HttpAtmDirectory, ReportField, SessionController};
use shared::domain::{Atm, CashStatus, ServiceStatus};

mod config;

#[derive(Parser, Debug)]
#[command(about = "Find nearby ATMs and report their service status")]
struct Args {
    /// Base URL of the ATM directory service. Overrides client.toml and
    /// the environment.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List ATMs near a postal code.
    Search { pincode: String },
    /// Submit a status report for one ATM found near a postal code.
    Report {
        pincode: String,
        /// Address of the ATM to report on, as shown in the listing.
        #[arg(long)]
        address: String,
        /// WORKING | NOT_WORKING | OUT_OF_CASH (kebab-case accepted).
        #[arg(long)]
        cash: CashStatus,
        /// AVAILABLE | NOT_AVAILABLE.
        #[arg(long)]
        deposit: ServiceStatus,
        /// AVAILABLE | NOT_AVAILABLE.
        #[arg(long)]
        passbook: ServiceStatus,
    },
    /// Check that the directory service is reachable.
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    tracing::debug!(server_url = %settings.server_url, "resolved directory settings");

    let http = reqwest::Client::builder()
        .timeout(settings.request_timeout())
        .build()?;
    let directory = HttpAtmDirectory::with_client(http, &settings.server_url)?;
    let controller = SessionController::new(Arc::new(directory));

    match args.command {
        Command::Search { pincode } => {
            controller.search(&pincode).await?;
            let state = controller.state().await;
            if state.atms.is_empty() {
                println!("No ATMs found near {pincode}.");
            } else {
                for atm in &state.atms {
                    print_atm(atm);
                }
            }
        }
        Command::Report {
            pincode,
            address,
            cash,
            deposit,
            passbook,
        } => {
            controller.search(&pincode).await?;
            controller.select_atm_by_address(&address).await?;
            controller
                .update_report_field(ReportField::Cash(cash))
                .await;
            controller
                .update_report_field(ReportField::Deposit(deposit))
                .await;
            controller
                .update_report_field(ReportField::Passbook(passbook))
                .await;
            controller.submit_report().await?;

            let state = controller.state().await;
            if let Some(notice) = state.notice {
                println!("{notice}");
            }
        }
        Command::Ping => {
            controller.health_check().await?;
            println!("ATM directory service is reachable.");
        }
    }

    Ok(())
}

fn print_atm(atm: &Atm) {
    println!("{} - {}", atm.name, atm.address);
    match &atm.latest_report {
        Some(report) => println!(
            "\t> Cash: {} | Deposit: {} | Passbook: {}",
            report.cash_status, report.deposit_status, report.passbook_status
        ),
        None => println!("\t> No reports for this ATM yet."),
    }
}
