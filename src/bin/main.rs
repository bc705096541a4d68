use std::time::Duration;

use anyhow::Result;
use releasewatch::job::{JobKind, Jobs};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let poll_rate = Duration::from_secs(1);
    let mut jobs = Jobs::init()?.add(JobKind::Releases, Duration::from_secs(3600))?;

    loop {
        jobs.poll().await?;
        tokio::time::sleep(poll_rate).await;
    }
}
