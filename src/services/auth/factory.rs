/// Factory: build the shared `Gate` from application `Config`.
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::services::auth::{Gate, KeyState};

pub async fn build_gate(config: &Config) -> Arc<Gate> {
    let gate = Gate::new(config.gate_config());

    info!(
        key_path = %gate.key_location().path().display(),
        deduced = gate.key_location().is_deduced(),
        issuer_check = config.expected_issuer.is_some(),
        "bearer gate configured"
    );

    if config.preload_key && gate.warm_up().await == KeyState::Faulted {
        warn!("public key could not be preloaded; every request will be refused until restart");
    }

    Arc::new(gate)
}
