//! # Roadside Unit (Verifier)
//!
//! Verification looks up the vehicle's secret, applies the optional
//! freshness window, re-derives the OTP from the secret and the timestamp
//! the vehicle presented, then asks the prover backend whether the
//! presented proof matches.
//!
//! ## Security Invariant
//!
//! Fails closed. An unknown vehicle, a timestamp outside the freshness
//! window, or a malformed proof is `Ok(false)`. `Err` is reserved for a
//! backend or clock that cannot run at all, so a broken verifier is never
//! mistaken for a rejected vehicle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zkotp_core::{Clock, Secret, SystemClock, UnixTimestamp, VehicleId};
use zkotp_crypto::derive_otp;
use zkotp_zkp::{CommitmentBackend, ProofArtifact, ProofBackend, Statement};

use crate::error::ProtocolError;
use crate::registry::Registry;

/// Acceptable age of a presented timestamp relative to the RSU clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshnessPolicy {
    /// Oldest accepted timestamp, in seconds before now.
    pub max_age_secs: u64,
    /// Furthest accepted timestamp, in seconds after now.
    pub max_future_skew_secs: u64,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            max_age_secs: 30,
            max_future_skew_secs: 5,
        }
    }
}

impl FreshnessPolicy {
    /// Whether `timestamp` falls inside the window around `now`.
    pub fn admits(&self, timestamp: UnixTimestamp, now: UnixTimestamp) -> bool {
        let age = now.seconds_since(timestamp);
        if age >= 0 {
            age.unsigned_abs() <= self.max_age_secs
        } else {
            age.unsigned_abs() <= self.max_future_skew_secs
        }
    }
}

/// The verifier.
#[derive(Debug)]
pub struct Rsu {
    registry: Registry,
    backend: Arc<dyn ProofBackend>,
    freshness: Option<FreshnessPolicy>,
    clock: Arc<dyn Clock>,
}

impl Rsu {
    /// RSU over `registry` with the commitment backend and no freshness
    /// window.
    pub fn new(registry: Registry) -> Self {
        Self::with_backend(registry, Arc::new(CommitmentBackend))
    }

    /// RSU over `registry` with the given backend and no freshness window.
    pub fn with_backend(registry: Registry, backend: Arc<dyn ProofBackend>) -> Self {
        Self {
            registry,
            backend,
            freshness: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Reject timestamps outside `policy`, measured against `clock`.
    pub fn with_freshness(mut self, policy: FreshnessPolicy, clock: Arc<dyn Clock>) -> Self {
        self.freshness = Some(policy);
        self.clock = clock;
        self
    }

    /// The registry this RSU authenticates against.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Add or replace a vehicle's secret.
    pub fn register(&self, id: impl Into<VehicleId>, secret: Secret) -> bool {
        self.registry.register(id.into(), secret)
    }

    /// Remove a vehicle.
    pub fn revoke(&self, id: &VehicleId) -> bool {
        self.registry.revoke(id)
    }

    /// Check `proof` from `vehicle_id` at `timestamp`.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Verify`] if the backend cannot run, or
    /// [`ProtocolError::Core`] if a freshness check cannot read the clock.
    pub fn verify(
        &self,
        vehicle_id: &VehicleId,
        proof: &ProofArtifact,
        timestamp: UnixTimestamp,
    ) -> Result<bool, ProtocolError> {
        let Some(expected_otp) = self
            .registry
            .with_secret(vehicle_id, |secret| derive_otp(secret, timestamp))
        else {
            debug!("unknown vehicle, failing closed");
            return Ok(false);
        };

        if let Some(policy) = &self.freshness {
            let now = self.clock.now()?;
            if !policy.admits(timestamp, now) {
                warn!(%timestamp, %now, "rejecting timestamp outside freshness window");
                return Ok(false);
            }
        }

        let verified = self
            .backend
            .verify(proof, &Statement::new(expected_otp, timestamp))?;
        debug!(%timestamp, verified, "proof checked");
        Ok(verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use zkotp_core::FixedClock;
    use zkotp_zkp::ProofScheme;

    fn secret(s: &str) -> Secret {
        Secret::try_from(s).unwrap()
    }

    fn rsu_with(id: &str, s: &str) -> Rsu {
        Rsu::new([(VehicleId::from(id), secret(s))].into_iter().collect())
    }

    fn proof_for(s: &str, secs: u64) -> (ProofArtifact, UnixTimestamp) {
        let ts = UnixTimestamp::from_secs(secs);
        let statement = Statement::new(derive_otp(&secret(s), ts), ts);
        (CommitmentBackend.prove(&statement).unwrap(), ts)
    }

    #[test]
    fn registered_vehicle_verifies() {
        let rsu = rsu_with("VEH001", "shared");
        let (proof, ts) = proof_for("shared", 1_700_000_000);
        assert!(rsu.verify(&"VEH001".into(), &proof, ts).unwrap());
    }

    #[test]
    fn golden_proof_verifies() {
        let rsu = rsu_with("VEH001", "mysecret");
        let proof = ProofArtifact::new(
            ProofScheme::Commitment,
            "2c3baf2ef57abb0ab44ed0020004bd6a2960f3ecf55031f510d754986aaffdc3",
        );
        let ts = UnixTimestamp::from_secs(1_700_000_000);
        assert!(rsu.verify(&"VEH001".into(), &proof, ts).unwrap());
    }

    #[test]
    fn golden_proof_with_one_case_bit_flipped_rejected() {
        let rsu = rsu_with("VEH001", "mysecret");
        let proof = ProofArtifact::new(
            ProofScheme::Commitment,
            "2C3baf2ef57abb0ab44ed0020004bd6a2960f3ecf55031f510d754986aaffdc3",
        );
        let ts = UnixTimestamp::from_secs(1_700_000_000);
        assert!(!rsu.verify(&"VEH001".into(), &proof, ts).unwrap());
    }

    #[test]
    fn unknown_vehicle_fails_closed() {
        let rsu = rsu_with("VEH001", "shared");
        let (proof, ts) = proof_for("shared", 10);
        assert!(!rsu.verify(&"VEH999".into(), &proof, ts).unwrap());
    }

    #[test]
    fn wrong_secret_rejected() {
        let rsu = rsu_with("VEH001", "secret-b");
        let (proof, ts) = proof_for("secret-a", 10);
        assert!(!rsu.verify(&"VEH001".into(), &proof, ts).unwrap());
    }

    #[test]
    fn shifted_timestamp_rejected() {
        let rsu = rsu_with("VEH001", "shared");
        let (proof, ts) = proof_for("shared", 10);
        let later = UnixTimestamp::from_secs(ts.as_secs() + 1);
        assert!(!rsu.verify(&"VEH001".into(), &proof, later).unwrap());
    }

    #[test]
    fn malformed_payload_rejected() {
        let rsu = rsu_with("VEH001", "shared");
        let ts = UnixTimestamp::from_secs(10);
        for payload in [String::new(), "deadbeef".to_string(), "z".repeat(64)] {
            let proof = ProofArtifact::new(ProofScheme::Commitment, payload);
            assert!(!rsu.verify(&"VEH001".into(), &proof, ts).unwrap());
        }
    }

    #[test]
    fn register_and_revoke_at_runtime() {
        let rsu = Rsu::new(Registry::new());
        let (proof, ts) = proof_for("late", 10);
        let id = VehicleId::from("VEH002");
        assert!(!rsu.verify(&id, &proof, ts).unwrap());
        rsu.register(id.clone(), secret("late"));
        assert!(rsu.verify(&id, &proof, ts).unwrap());
        assert!(rsu.revoke(&id));
        assert!(!rsu.verify(&id, &proof, ts).unwrap());
    }

    #[test]
    fn freshness_window_bounds() {
        let policy = FreshnessPolicy {
            max_age_secs: 30,
            max_future_skew_secs: 5,
        };
        let now = UnixTimestamp::from_secs(1_000);
        assert!(policy.admits(UnixTimestamp::from_secs(970), now));
        assert!(!policy.admits(UnixTimestamp::from_secs(969), now));
        assert!(policy.admits(UnixTimestamp::from_secs(1_005), now));
        assert!(!policy.admits(UnixTimestamp::from_secs(1_006), now));
    }

    #[test]
    fn stale_timestamp_rejected_when_policy_enabled() {
        let clock = Arc::new(FixedClock::new(1_000));
        let rsu = rsu_with("VEH001", "shared").with_freshness(FreshnessPolicy::default(), clock.clone());
        let (proof, ts) = proof_for("shared", 990);
        assert!(rsu.verify(&"VEH001".into(), &proof, ts).unwrap());
        clock.advance(60);
        assert!(!rsu.verify(&"VEH001".into(), &proof, ts).unwrap());
    }

    #[test]
    fn no_freshness_by_default() {
        let rsu = rsu_with("VEH001", "shared");
        let (proof, ts) = proof_for("shared", 1);
        assert!(rsu.verify(&"VEH001".into(), &proof, ts).unwrap());
    }

    proptest! {
        #[test]
        fn only_the_registered_secret_verifies(
            registered in "[a-z0-9]{1,16}",
            presented in "[a-z0-9]{1,16}",
            secs in 0u64..u64::MAX,
        ) {
            let rsu = rsu_with("VEH001", &registered);
            let (proof, ts) = proof_for(&presented, secs);
            let verified = rsu.verify(&"VEH001".into(), &proof, ts).unwrap();
            prop_assert_eq!(verified, registered == presented);
        }
    }
}
