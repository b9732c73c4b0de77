//! Core library for the `weather-push` job.
//!
//! This crate defines:
//! - Configuration loaded from the environment
//! - The Caiyun weather source with bounded retry
//! - Shared domain models and code-to-label mappings
//! - Text and HTML report rendering
//! - Delivery to WxPusher and GitHub Pages
//!
//! It is used by `weather-push-cli`, but can also be reused by other binaries
//! or services.

pub mod condition;
pub mod config;
pub mod html;
pub mod model;
pub mod pipeline;
pub mod publish;
pub mod report;
pub mod retry;
pub mod source;

#[cfg(test)]
mod testutil;

pub use condition::{PrecipIntensity, SkyCondition, compass_label};
pub use config::{Config, TriggerEvent};
pub use model::{Alert, DailyForecastEntry, HourlyForecastEntry, WeatherSnapshot};
pub use pipeline::{RunOutcome, run};
pub use source::{CaiyunSource, WeatherSource};
