use chrono::Utc;
use structopt::StructOpt;

use fblock_archive::{ArchiveError, LoggerConfig};
use fblock_grant::{
    activation_height, contribution_until_height, payout_date, payout_estimate,
    AuthoritySetClient,
};
use fblock_node::{NodeClient, NodeConfig};

/// Estimate the payout and activation heights of the current grant round.
#[derive(Clone, Debug, StructOpt)]
#[structopt(author, about)]
struct GrantCalcCli {
    /// The factomd v2 API endpoint.
    #[structopt(long, default_value = "https://api.factomd.net/v2")]
    node_url: String,

    /// The authority-set summary endpoint.
    #[structopt(long, default_value = "https://luciap.ca/api/v1/authority-set/summary")]
    authority_url: String,
}

fn main() -> Result<(), ArchiveError> {
    LoggerConfig::default().init()?;
    let cli = GrantCalcCli::from_args();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(cli))
}

async fn run(cli: GrantCalcCli) -> Result<(), ArchiveError> {
    let node = NodeClient::new(NodeConfig {
        url: cli.node_url,
        ..NodeConfig::default()
    })?;
    let current_height = node.heights().await?.directory_block_height;
    let now = Utc::now();

    let (round, payout) = payout_estimate(current_height, now);
    let activation = activation_height(payout);

    let authority = AuthoritySetClient::new(&cli.authority_url)?;
    let daily = authority.daily_grant_pool_contribution().await?;
    let accrued = contribution_until_height(daily, current_height, payout);

    println!("Grant round:           {}", round);
    println!("Payout date:           {}", payout_date(round));
    println!("Current height:        {}", current_height);
    println!("Payout height:         {}", payout);
    println!("Activation height:     {}", activation);
    println!("Pool growth by payout: {} FCT", accrued);

    Ok(())
}
