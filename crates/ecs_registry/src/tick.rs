//! Fixed-timestep tick loop.
//!
//! Every tick runs each system of the owned [`Registry`] once, with
//! `dt = 1 / tick_rate`. [`TickLoop::run`] sleeps away whatever is left of
//! the tick's time budget and logs a warning when a tick overruns it.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::TickConfig;
use crate::error::{ConfigError, RegistryError};
use crate::registry::Registry;

/// Drives a [`Registry`] at a fixed rate.
#[derive(Debug)]
pub struct TickLoop {
    /// Number of ticks started so far.
    tick_id: u64,
    config: TickConfig,
    registry: Registry,
}

impl TickLoop {
    /// Create a tick loop around an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTickRate`] if the configuration does
    /// not validate.
    pub fn new(config: TickConfig) -> Result<Self, ConfigError> {
        Self::with_registry(config, Registry::new())
    }

    /// Create a tick loop around an existing registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTickRate`] if the configuration does
    /// not validate.
    pub fn with_registry(config: TickConfig, registry: Registry) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            tick_id: 0,
            config,
            registry,
        })
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    /// Returns a reference to the registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns a mutable reference to the registry.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Consume the loop and return its registry.
    #[must_use]
    pub fn into_registry(self) -> Registry {
        self.registry
    }

    /// Run one tick: every system once, with the configured `dt`.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing system.
    pub fn tick(&mut self) -> Result<(), RegistryError> {
        self.tick_id += 1;
        let dt = self.config.dt();
        debug!(
            tick_id = self.tick_id,
            dt,
            systems = self.registry.system_count(),
            "tick start"
        );
        self.registry.run_systems(dt)
    }

    /// Run the loop for the configured number of ticks, or indefinitely.
    ///
    /// # Errors
    ///
    /// Stops at the first tick whose systems fail and returns that error.
    pub fn run(&mut self) -> Result<(), RegistryError> {
        self.run_with(|_, _| Ok(()))
    }

    /// Like [`TickLoop::run`], calling `after_tick` with the registry and
    /// tick counter after every tick.
    ///
    /// Structural changes such as spawning and killing entities need the
    /// registry mutably, which systems never get; `after_tick` is where they
    /// happen.
    ///
    /// # Errors
    ///
    /// Stops at the first tick whose systems or `after_tick` fail and
    /// returns that error.
    pub fn run_with<F>(&mut self, mut after_tick: F) -> Result<(), RegistryError>
    where
        F: FnMut(&mut Registry, u64) -> Result<(), RegistryError>,
    {
        // Validated in `with_registry`.
        let tick_duration = self.config.tick_duration().unwrap_or(Duration::ZERO);
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            "starting tick loop"
        );

        loop {
            let start = Instant::now();

            self.tick()?;
            after_tick(&mut self.registry, self.tick_id)?;

            tick_count += 1;
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(ticks = tick_count, "tick loop complete");
                return Ok(());
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
    }
}
