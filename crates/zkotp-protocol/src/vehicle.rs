//! # Vehicle (Prover)
//!
//! A vehicle holds its identifier and secret, samples its clock once per
//! attempt, and proves knowledge of the resulting OTP through the
//! configured backend. It has no mutable state.

use std::sync::Arc;

use tracing::debug;
use zkotp_core::{Clock, Secret, SystemClock, UnixTimestamp, VehicleId};
use zkotp_crypto::{generate_otp, Otp};
use zkotp_zkp::{CommitmentBackend, ProofArtifact, ProofBackend, Statement};

use crate::error::ProtocolError;

/// The authenticating principal.
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: VehicleId,
    secret: Secret,
    prover: Arc<dyn ProofBackend>,
    clock: Arc<dyn Clock>,
}

impl Vehicle {
    /// Vehicle with the commitment backend and the system clock.
    pub fn new(id: impl Into<VehicleId>, secret: Secret) -> Self {
        Self::with_parts(id, secret, Arc::new(CommitmentBackend), Arc::new(SystemClock))
    }

    /// Vehicle with an explicit prover backend and clock.
    pub fn with_parts(
        id: impl Into<VehicleId>,
        secret: Secret,
        prover: Arc<dyn ProofBackend>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            id: id.into(),
            secret,
            prover,
            clock,
        }
    }

    /// The vehicle's identifier.
    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    /// Sample the clock and derive the OTP for that instant.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Core`] if the clock reads before the Unix epoch.
    pub fn generate_otp(&self) -> Result<(Otp, UnixTimestamp), ProtocolError> {
        let (otp, timestamp) = generate_otp(&self.secret, self.clock.as_ref())?;
        debug!(vehicle = %self.id, %timestamp, "generated OTP");
        Ok((otp, timestamp))
    }

    /// Prove knowledge of `otp` at `timestamp`. `timestamp` must be the one
    /// returned alongside `otp`.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Proof`] if the backend fails.
    pub fn create_proof(
        &self,
        otp: &Otp,
        timestamp: UnixTimestamp,
    ) -> Result<ProofArtifact, ProtocolError> {
        let proof = self.prover.prove(&Statement::new(*otp, timestamp))?;
        debug!(vehicle = %self.id, scheme = %proof.scheme, "created proof");
        Ok(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkotp_core::{CoreError, FixedClock};
    use zkotp_crypto::derive_otp;
    use zkotp_zkp::ProofScheme;

    #[derive(Debug)]
    struct PreEpochClock;

    impl Clock for PreEpochClock {
        fn now(&self) -> Result<UnixTimestamp, CoreError> {
            Err(CoreError::ClockBeforeEpoch(-1))
        }
    }

    fn vehicle(clock_secs: u64) -> Vehicle {
        Vehicle::with_parts(
            "VEH001",
            Secret::try_from("mysecret").unwrap(),
            Arc::new(CommitmentBackend),
            Arc::new(FixedClock::new(clock_secs)),
        )
    }

    #[test]
    fn golden_otp_and_proof() {
        let v = vehicle(1_700_000_000);
        let (otp, ts) = v.generate_otp().unwrap();
        assert_eq!(ts.as_secs(), 1_700_000_000);
        assert_eq!(
            otp.to_hex(),
            "04fa23bc0302017681e7a1095bf8c7f09dd44bbe9919bd56f857bf2cf27221ac"
        );
        let proof = v.create_proof(&otp, ts).unwrap();
        assert_eq!(proof.scheme, ProofScheme::Commitment);
        assert_eq!(
            proof.payload,
            "2c3baf2ef57abb0ab44ed0020004bd6a2960f3ecf55031f510d754986aaffdc3"
        );
    }

    #[test]
    fn proof_is_deterministic() {
        let v = vehicle(42);
        let (otp, ts) = v.generate_otp().unwrap();
        assert_eq!(v.create_proof(&otp, ts).unwrap(), v.create_proof(&otp, ts).unwrap());
    }

    #[test]
    fn otp_matches_shared_derivation() {
        let v = vehicle(1_234);
        let (otp, ts) = v.generate_otp().unwrap();
        let secret = Secret::try_from("mysecret").unwrap();
        assert_eq!(otp, derive_otp(&secret, ts));
        assert_eq!((otp, ts), generate_otp(&secret, &FixedClock::new(1_234)).unwrap());
    }

    #[test]
    fn pre_epoch_clock_surfaces_core_error() {
        let v = Vehicle::with_parts(
            "VEH001",
            Secret::try_from("mysecret").unwrap(),
            Arc::new(CommitmentBackend),
            Arc::new(PreEpochClock),
        );
        assert!(matches!(
            v.generate_otp(),
            Err(ProtocolError::Core(CoreError::ClockBeforeEpoch(-1)))
        ));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let dbg = format!("{:?}", vehicle(1));
        assert!(!dbg.contains("mysecret"));
    }
}
