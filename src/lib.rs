#![doc(test(attr(deny(warnings))))]

//! ExoTrack client core: sign-up and profile flows, the contract-creation
//! wizard, and the REST client they talk to, without any rendering layer.

pub mod api;
pub mod cli;
pub mod config;
pub mod currency;
pub mod dates;
pub mod errors;
pub mod forms;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("ExoTrack client tracing initialized.");
    });
}
