//! Probabilistic notification generator.

use crate::config::GeneratorConfig;
use crate::error::{CenterError, Result};
use crate::types::{Notification, NotificationInput, NotificationKind};
use rand::Rng;
use tracing::debug;

use super::catalog::MessageTemplate;
use super::NotificationSink;

/// Runs one Bernoulli trial per tick and, on success, synthesizes a
/// notification from an independently drawn kind and template.
pub struct ArrivalGenerator<R> {
    probability: f64,
    catalog: Vec<MessageTemplate>,
    rng: R,
}

impl<R: Rng> ArrivalGenerator<R> {
    pub fn new(probability: f64, catalog: Vec<MessageTemplate>, rng: R) -> Result<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(CenterError::InvalidConfig(format!(
                "arrival probability {} outside [0, 1]",
                probability
            )));
        }
        if catalog.is_empty() {
            return Err(CenterError::InvalidConfig(
                "message catalog is empty".to_string(),
            ));
        }
        for template in &catalog {
            NotificationInput::new(NotificationKind::Info, &template.title, &template.message)
                .validate()
                .map_err(|e| CenterError::InvalidConfig(format!("catalog entry: {}", e)))?;
        }

        Ok(Self {
            probability,
            catalog,
            rng,
        })
    }

    pub fn from_config(config: &GeneratorConfig, rng: R) -> Result<Self> {
        Self::new(config.arrival_probability, config.catalog.clone(), rng)
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn catalog(&self) -> &[MessageTemplate] {
        &self.catalog
    }

    /// Draw one tick's worth of randomness without touching any store.
    pub fn sample(&mut self) -> Option<NotificationInput> {
        if !self.rng.random_bool(self.probability) {
            return None;
        }

        let kind = NotificationKind::ALL[self.rng.random_range(0..NotificationKind::ALL.len())];
        let template = &self.catalog[self.rng.random_range(0..self.catalog.len())];

        Some(NotificationInput::new(
            kind,
            template.title.clone(),
            template.message.clone(),
        ))
    }

    /// Sample and, on success, push into the sink.
    pub fn tick(&mut self, sink: &dyn NotificationSink) -> Result<Option<Notification>> {
        match self.sample() {
            Some(input) => {
                let notification = sink.push(input)?;
                debug!(id = %notification.id, title = %notification.title, "feed produced notification");
                Ok(Some(notification))
            }
            None => {
                debug!("feed tick produced nothing");
                Ok(None)
            }
        }
    }
}
