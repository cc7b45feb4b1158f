use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::NicheAnalysis;
use crate::input::{ProductInput, SourceType};
use crate::pin::GeneratedPin;

/// A named batch of pins generated from one configuration. Persisted as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub input: ProductInput,
    pub analysis: Option<NicheAnalysis>,
    #[serde(default)]
    pub pins: Vec<GeneratedPin>,
}

impl Project {
    /// Start an empty project named after `input`.
    #[must_use]
    pub fn new(input: ProductInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            name: Self::display_name_for(&input),
            input,
            analysis: None,
            pins: Vec::new(),
        }
    }

    /// Product name, else a fixed label depending on the source.
    #[must_use]
    pub fn display_name_for(input: &ProductInput) -> String {
        let name = input.url_or_name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
        match input.source_type {
            SourceType::Rss => "RSS Automation".to_string(),
            SourceType::Brand => "Market Campaign".to_string(),
        }
    }

    #[must_use]
    pub fn pin(&self, id: Uuid) -> Option<&GeneratedPin> {
        self.pins.iter().find(|p| p.id() == id)
    }

    pub fn pin_mut(&mut self, id: Uuid) -> Option<&mut GeneratedPin> {
        self.pins.iter_mut().find(|p| p.id() == id)
    }

    /// Append a pin unless one with the same id is already present.
    ///
    /// Returns `false` when the id collides.
    pub fn push_pin(&mut self, pin: GeneratedPin) -> bool {
        if self.pin(pin.id()).is_some() {
            return false;
        }
        self.pins.push(pin);
        true
    }

    /// Apply `patch` to the pin with `id`. Returns `false` if no pin matched.
    pub fn update_pin<F>(&mut self, id: Uuid, patch: F) -> bool
    where
        F: FnOnce(&mut GeneratedPin),
    {
        match self.pin_mut(id) {
            Some(pin) => {
                patch(pin);
                true
            }
            None => false,
        }
    }

    pub fn completed_pins(&self) -> impl Iterator<Item = &GeneratedPin> {
        self.pins.iter().filter(|p| p.is_completed())
    }
}
