//! Session controller - gets the game running, focused and into a spectate lobby

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::config::{Config, EntryConfig, LaunchConfig};
use crate::error::{NavError, Result};
use crate::host::{focus_matching, matching_windows, NamePattern, ProcessTable, WindowSystem};
use crate::input::{Key, KeySink};
use crate::nav::{NavOutcome, NavigationBudget, Navigator};
use crate::screen::TemplateMatcher;
use crate::types::{LogicalScreen, SpectateCode};

const MIN_PROCESS_POLL: Duration = Duration::from_millis(1);

/// Drives the whole join flow on top of a [`Navigator`]
pub struct SessionController<M, K, P, W>
where
    M: TemplateMatcher,
    K: KeySink,
    P: ProcessTable,
    W: WindowSystem,
{
    navigator: Navigator<M, K>,
    processes: P,
    windows: W,
    pattern: NamePattern,
    launch_query: String,
    launch: LaunchConfig,
    entry: EntryConfig,
}

impl<M, K, P, W> SessionController<M, K, P, W>
where
    M: TemplateMatcher,
    K: KeySink,
    P: ProcessTable,
    W: WindowSystem,
{
    pub fn new(navigator: Navigator<M, K>, processes: P, windows: W, config: &Config) -> Result<Self> {
        Ok(Self {
            navigator,
            processes,
            windows,
            pattern: NamePattern::new(&config.process_name)?,
            launch_query: config.launch_query.clone(),
            launch: config.launch.clone(),
            entry: config.entry.clone(),
        })
    }

    pub fn navigator(&self) -> &Navigator<M, K> {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator<M, K> {
        &mut self.navigator
    }

    pub fn is_running(&mut self) -> bool {
        self.processes.is_running(&self.pattern)
    }

    /// Join a custom match as spectator.
    ///
    /// The code is validated before anything is touched, and it is only typed
    /// once the code entry dialog has been recognised.
    pub async fn join_spectate(&mut self, code: &str, budget: Duration, poll_interval: Duration) -> Result<()> {
        let code = SpectateCode::parse(code)?;
        info!(code = %code, budget = ?budget, "Joining match as spectator");

        self.ensure_running().await?;
        if !self.focus()? {
            warn!(pattern = self.pattern.as_str(), "Game window not in foreground");
        }

        let mut budget = NavigationBudget::new(budget, poll_interval);
        let first = self.wait_for_screen(&mut budget).await?;
        debug!(screen = %first, remaining = ?budget.remaining(), "Initial screen");

        match self
            .navigator
            .run_from(first, LogicalScreen::CodeEntry, &mut budget)
            .await?
        {
            NavOutcome::Reached { maneuvers } => {
                debug!(maneuvers, "Code entry dialog open");
            }
            NavOutcome::TimedOut { last_seen, .. } => {
                return Err(NavError::NavigationTimeout {
                    target: LogicalScreen::CodeEntry,
                    last_seen,
                    budget: budget.initial(),
                });
            }
        }

        self.enter_code(&code).await?;
        info!(code = %code, "Spectate code entered");
        Ok(())
    }

    /// Make sure the game process is up, launching (or relaunching) it as configured
    pub async fn ensure_running(&mut self) -> Result<()> {
        if self.is_running() {
            if !self.launch.restart_if_running {
                debug!("Game already running");
                return Ok(());
            }
            info!("Restarting running game");
            self.stop().await?;
        }

        let attempts = self.launch.max_retries + 1;
        for attempt in 1..=attempts {
            if attempt > 1 {
                warn!(attempt, attempts, "Game did not start, retrying launch");
                let nav = self.navigator.config().clone();
                self.navigator
                    .input_mut()
                    .escape_burst(nav.burst_presses, nav.burst_interval())
                    .await?;
            }

            self.launch_once().await?;
            if self.wait_for_process(true).await {
                info!(attempt, "Game started");
                return Ok(());
            }
        }

        Err(NavError::LaunchFailure(format!(
            "{} did not start after {} attempts",
            self.pattern.as_str(),
            attempts
        )))
    }

    /// Close every game window and wait for the process to exit
    pub async fn stop(&mut self) -> Result<()> {
        for handle in matching_windows(&self.windows, &self.pattern)? {
            debug!(handle = handle.0, "Closing game window");
            self.windows.set_foreground(handle)?;
            self.windows.close(handle)?;
        }

        if self.wait_for_process(false).await {
            info!("Game stopped");
            Ok(())
        } else {
            Err(NavError::LaunchFailure(format!(
                "{} is running and cannot be stopped",
                self.pattern.as_str()
            )))
        }
    }

    /// Bring the game window to the front; `false` if it did not end up there
    pub fn focus(&mut self) -> Result<bool> {
        focus_matching(&mut self.windows, &self.pattern)
    }

    /// Open the start menu search, type the launch query and run it
    async fn launch_once(&mut self) -> Result<()> {
        let key_interval = self.launch.launch_key_interval();
        let per_char = self.entry.per_char_delay();
        let input = self.navigator.input_mut();

        input.press(Key::Win).await?;
        sleep(key_interval).await;
        input.press(Key::Space).await?;
        sleep(key_interval).await;
        input.type_text(&self.launch_query, per_char).await?;
        input.press(Key::Enter).await?;
        info!(query = %self.launch_query, "Launch requested");
        Ok(())
    }

    /// Poll until the process is (or is no longer) running, up to the startup timeout
    async fn wait_for_process(&mut self, running: bool) -> bool {
        let timeout = self.launch.startup_timeout();
        let poll = self.launch.poll_interval().max(MIN_PROCESS_POLL);
        let mut waited = Duration::ZERO;

        loop {
            if self.is_running() == running {
                return true;
            }
            if waited >= timeout {
                return false;
            }
            sleep(poll).await;
            waited += poll;
        }
    }

    /// Classify until something recognisable shows up or the budget runs out
    async fn wait_for_screen(&mut self, budget: &mut NavigationBudget) -> Result<LogicalScreen> {
        loop {
            let started = Instant::now();
            let screen = self.navigator.classify().await?;
            if screen != LogicalScreen::Unknown || budget.is_exhausted() {
                return Ok(screen);
            }
            debug!(remaining = ?budget.remaining(), "Waiting for a known screen");
            budget.backoff_since(started).await;
            if budget.is_exhausted() {
                return Ok(screen);
            }
        }
    }

    /// Replace the placeholder in the code field with `code`
    async fn enter_code(&mut self, code: &SpectateCode) -> Result<()> {
        let per_char = self.entry.per_char_delay();
        let clear = self.entry.clear_presses;
        let input = self.navigator.input_mut();

        input.press(Key::Right).await?;
        input.burst(Key::Backspace, clear, per_char).await?;
        input.type_text(code.as_str(), per_char).await
    }
}
