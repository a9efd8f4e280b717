use crate::Config;
use crate::database::{DatabaseManager, DatabaseManagerImpl};
use crate::seed::{self, SeedOptions};
use clap::Args;

#[derive(Args)]
pub struct SeedArgs {
    /// Number of patients to generate
    #[arg(short, long, default_value = "10")]
    pub patients: usize,
    /// Number of transactions to generate
    #[arg(short, long, default_value = "200")]
    pub transactions: usize,
    /// Days back from now to spread transaction dates over
    #[arg(short, long, default_value = "365")]
    pub days_back: i64,
    /// Seed for the random number generator (for reproducible data)
    #[arg(short, long)]
    pub seed: Option<u64>,
}

pub async fn handle_seed_command(
    args: SeedArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let db_manager = DatabaseManagerImpl::new_from_config(config).await?;
    db_manager.migrate().await?;

    let options = SeedOptions {
        patients: args.patients,
        transactions: args.transactions,
        days_back: args.days_back,
        seed: args.seed,
    };

    let report = seed::run(&db_manager, &options).await?;
    println!(
        "Seeded {} patients and {} transactions",
        report.patients, report.transactions
    );

    Ok(())
}
