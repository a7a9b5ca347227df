//! Sequential suite runner
//!
//! Drives every enabled suite against one API in a fixed order:
//! health, authentication, profile, the three resource collections, then
//! categories. One session is threaded through the whole run.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{FatalError, Recorder};
use crate::checks::{authenticate, check_health, check_profile, verify_category, verify_resource};
use crate::config::AppConfig;
use crate::http::ApiClient;
use crate::models::{CategorySpec, RunSummary, Session, Suite, UserTemplate};
use crate::utils::Timer;

/// Runs the suites of one harness invocation
pub struct SuiteRunner {
    client: ApiClient,
    user: UserTemplate,
    suites: Vec<Suite>,
}

impl SuiteRunner {
    /// Build a runner and its HTTP client from configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = ApiClient::with_timeout(config.base_url.trim(), config.timeout_secs)?;
        Self::with_client(client, config)
    }

    /// Build a runner around an existing client
    pub fn with_client(client: ApiClient, config: &AppConfig) -> Result<Self> {
        let mut suites = Vec::new();
        for suite in Suite::all() {
            if config.runs(suite)? {
                suites.push(suite);
            }
        }

        Ok(Self {
            client,
            user: config.user.clone(),
            suites,
        })
    }

    /// Suites this runner will execute, in order
    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    /// Run every suite, stopping at the first fatal error
    pub async fn run(&self, recorder: &mut Recorder) -> Result<RunSummary, FatalError> {
        self.run_at(Utc::now(), recorder).await
    }

    /// Run with an explicit start time, which names the user and dates payloads
    pub async fn run_at(
        &self,
        started_at: DateTime<Utc>,
        recorder: &mut Recorder,
    ) -> Result<RunSummary, FatalError> {
        let timer = Timer::start("run");
        let registration = self.user.registration(started_at);
        let mut session = Session::new();

        info!(
            "Running {} suites against {} as {}",
            self.suites().len(),
            self.client.base_url(),
            registration.name
        );

        for &suite in self.suites() {
            recorder.section(suite);
            match suite {
                Suite::Health => check_health(&self.client, &session, recorder).await?,
                Suite::Auth => {
                    authenticate(&self.client, &mut session, &registration, recorder).await?
                }
                Suite::Profile => check_profile(&self.client, &mut session, recorder).await?,
                Suite::Waters | Suite::Sleeps | Suite::Activities => {
                    if let Some(kind) = suite.resource_kind() {
                        verify_resource(&self.client, &session, &kind.spec(started_at), recorder)
                            .await?;
                    }
                }
                Suite::Categories => {
                    verify_category(
                        &self.client,
                        &session,
                        &CategorySpec::new(started_at),
                        recorder,
                    )
                    .await?
                }
            }
        }

        if let Some(id) = session.user_id() {
            debug!("Profile reported user id {}", id);
        }

        let summary = RunSummary::new(
            self.client.base_url(),
            recorder.results().to_vec(),
            timer.stop(),
        );
        info!(
            "Run completed in {}ms - Pass: {}/{} ({:.1}%)",
            summary.total_duration_ms,
            summary.passed,
            summary.total,
            summary.pass_rate()
        );

        Ok(summary)
    }
}
