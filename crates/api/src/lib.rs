// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appliances and the service boundary.
//!
//! An [`Appliance`] owns the command registry built by a [`CommandLoader`]
//! and the live [`ApplianceAttributes`] reported by the service. All service
//! access goes through the [`HonApi`] trait; [`FixtureApi`] implements it
//! over recorded payloads.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod api;
mod appliance;
mod attribute;
mod customizer;
mod error;
mod fixture;
mod loader;

#[cfg(test)]
mod tests;

pub use api::{ApplianceTransport, HonApi};
pub use appliance::{Appliance, ApplianceInfo};
pub use attribute::{ApplianceAttributes, Attribute, LOCK_TIMEOUT};
pub use customizer::{
    ApplianceCustomizer, DishWasher, Fridge, Identity, Oven, TumbleDryer, WasherDryer,
    WashingMachine, WaterHeater, customizer_for,
};
pub use error::{ApiError, LoaderError};
pub use fixture::FixtureApi;
pub use loader::{CommandLoader, LoadedCommands, LoaderState};
