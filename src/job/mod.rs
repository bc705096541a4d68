use std::time::{Duration, Instant};

use anyhow::Result;

pub mod discord;
pub mod releases;
pub mod tmdb;
pub mod util;

use releases::ReleaseFetcher;

use crate::config::Config;

trait Runnable {
    async fn run(&mut self) -> Result<()>;
}

/// Declare the job kinds and the 'runner' struct backing each one.
///
/// A runner is built from the shared configuration (fallibly — the release
/// runner loads its state store at construction) and must implement the
/// `Runnable` trait.
macro_rules! define_jobs {
    ($(($jobname:ident, $runnable:ident)),+) => {
        pub enum JobKind {
            $($jobname),*
        }

        enum JobRunner {
            $($jobname($runnable)),*
        }

        impl JobRunner {
            fn new(jobkind: JobKind, config: &Config) -> Result<JobRunner> {
                Ok(match jobkind {
                    $(JobKind::$jobname => JobRunner::$jobname($runnable::new(config)?)),*
                })
            }

            async fn run(&mut self) -> Result<()> {
                match self {
                    $(JobRunner::$jobname(fetcher) => fetcher.run().await),*
                }
            }
        }
    };
}

define_jobs!(
    (Releases, ReleaseFetcher)
);

struct Job {
    last_ran: Option<Instant>,
    run_interval: Duration,
    job_runner: JobRunner,
}
impl Job {
    fn should_run(&self) -> bool {
        if let Some(time) = self.last_ran {
            return (Instant::now() - time) >= self.run_interval;
        }
        true
    }

    fn new(jobkind: JobKind, interval: Duration, config: &Config) -> Result<Self> {
        Ok(Job {
            last_ran: None,
            run_interval: interval,
            job_runner: JobRunner::new(jobkind, config)?,
        })
    }

    async fn run(&mut self) -> Result<()> {
        self.job_runner.run().await?;
        self.last_ran = Some(Instant::now());
        Ok(())
    }
}

pub struct Jobs {
    joblist: Vec<Job>,
    config: Config,
}

impl Jobs {
    /// Initializes the job queue and reads the runtime configuration
    pub fn init() -> Result<Self> {
        let config = Config::from_env()?;
        Ok(Jobs {
            joblist: vec![],
            config,
        })
    }

    pub fn add(mut self, jobkind: JobKind, interval: Duration) -> Result<Self> {
        self.joblist
            .push(Job::new(jobkind, interval, &self.config)?);
        Ok(self)
    }

    /// Polls jobs in registration order, running any whose interval has
    /// elapsed. Each run is awaited to completion, so a slow cycle delays
    /// the next one instead of overlapping it.
    pub async fn poll(&mut self) -> Result<()> {
        for job in &mut self.joblist {
            if job.should_run() {
                job.run().await?;
            }
        }
        Ok(())
    }
}
