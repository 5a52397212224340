//! Simulated charger link
//!
//! Stands in for the real device protocol: waits a fixed latency, then
//! accepts the command with a configured probability.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use crate::application::chargers::dto::ControlRequest;
use crate::application::ports::DeviceControlPort;

#[derive(Debug, Clone)]
pub struct SimulatedDeviceController {
    latency: Duration,
    success_rate: f64,
}

impl SimulatedDeviceController {
    pub fn new(latency: Duration, success_rate: f64) -> Self {
        Self {
            latency,
            success_rate: if success_rate.is_nan() {
                0.0
            } else {
                success_rate.clamp(0.0, 1.0)
            },
        }
    }
}

impl Default for SimulatedDeviceController {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), 0.95)
    }
}

#[async_trait]
impl DeviceControlPort for SimulatedDeviceController {
    async fn send(&self, request: &ControlRequest) -> bool {
        debug!(
            charger_id = %request.charger_id,
            action = %request.action,
            reason = ?request.reason,
            force = ?request.force,
            "Simulated device call"
        );
        tokio::time::sleep(self.latency).await;

        let accepted = rand::thread_rng().gen_bool(self.success_rate);
        debug!(charger_id = %request.charger_id, accepted, "Simulated device answered");
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChargerAction;

    #[tokio::test]
    async fn certain_outcomes_are_honoured() {
        let request = ControlRequest::new("C1", ChargerAction::TurnOn);
        let always = SimulatedDeviceController::new(Duration::ZERO, 1.0);
        let never = SimulatedDeviceController::new(Duration::ZERO, 0.0);
        for _ in 0..10 {
            assert!(always.send(&request).await);
            assert!(!never.send(&request).await);
        }
    }

    #[test]
    fn success_rate_is_clamped() {
        let device = SimulatedDeviceController::new(Duration::ZERO, 3.0);
        assert_eq!(device.success_rate, 1.0);
    }
}
