//! # vacbot-adapter-miio
//!
//! Live vacuum adapter for miIO robot vacuums.
//!
//! ## Connection
//!
//! [`MiioVacuum::connect`] handshakes with the device up to
//! [`DISCOVERY_ATTEMPTS`](config::DISCOVERY_ATTEMPTS) times. If no handshake is
//! answered the adapter is never constructed and the caller receives a
//! [`ConnectivityError`]. [`MiioVacuum::open`] does the same for a
//! [`MiioConfig`], building the encrypted [`UdpTransport`] from its token.
//! See [`packet`] for the datagram format.
//!
//! ## Command mapping
//!
//! | Port operation | Device method(s) |
//! |----------------|------------------|
//! | `status` | `get_status` |
//! | `pause` | `app_pause` |
//! | `home` | `app_stop`, then `app_charge` |
//! | `set_fan_level` | `set_custom_mode [value]` |
//! | `start_zone_cleaning` | `app_pause`, then `app_zoned_clean [[x1, y1, x2, y2, n], ..]` |
//!
//! Every acknowledgment goes through [`Ack`]: only `["ok"]` is success.
//!
//! ## Dependency rule
//!
//! Depends on `vacbot-app` (port traits) and `vacbot-domain` only.

pub mod config;
pub mod error;
pub mod packet;
pub mod status;
pub mod transport;

use std::net::SocketAddr;

use serde_json::{Value, json};

use vacbot_app::ports::Vacuum;
use vacbot_domain::command::{Ack, CommandResult};
use vacbot_domain::error::{ConnectivityError, VacBotError};
use vacbot_domain::fan_level::FanLevel;
use vacbot_domain::zone::CleaningRegion;

pub use config::MiioConfig;
pub use error::MiioError;
pub use packet::Token;
pub use transport::{MiioTransport, UdpTransport};

use config::DISCOVERY_ATTEMPTS;

/// A vacuum reached through a [`MiioTransport`].
pub struct MiioVacuum<T> {
    transport: T,
}

impl<T: MiioTransport> MiioVacuum<T> {
    /// Handshake with the device and wrap the transport once it answers.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectivityError`] after [`DISCOVERY_ATTEMPTS`] failed handshakes.
    pub async fn connect(transport: T) -> Result<Self, ConnectivityError> {
        Self::connect_with_attempts(transport, DISCOVERY_ATTEMPTS).await
    }

    /// Like [`connect`](Self::connect) with an explicit attempt budget.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectivityError`] when every handshake fails.
    pub async fn connect_with_attempts(
        transport: T,
        attempts: u32,
    ) -> Result<Self, ConnectivityError> {
        for attempt in 1..=attempts {
            match transport.discover().await {
                Ok(()) => {
                    tracing::info!(address = %transport.address(), attempt, "vacuum discovered");
                    return Ok(Self { transport });
                }
                Err(err) => {
                    tracing::warn!(
                        address = %transport.address(),
                        attempt,
                        error = %err,
                        "vacuum discovery failed"
                    );
                }
            }
        }
        Err(ConnectivityError {
            address: transport.address(),
            attempts,
        })
    }

    async fn command(&self, method: &'static str, params: Value) -> CommandResult {
        match self.transport.send(method, params).await {
            Ok(result) => {
                let outcome = Ack::from_value(result).into_result();
                if outcome.is_err() {
                    tracing::warn!(method, "device did not acknowledge command");
                }
                outcome
            }
            Err(err) => {
                tracing::warn!(method, error = %err, "device command failed");
                Err(err.into_failure())
            }
        }
    }
}

impl MiioVacuum<UdpTransport> {
    /// Reach the device at `peer` with the token and timeout of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`VacBotError::Device`] when the token is unusable or no
    /// socket can be bound, and [`VacBotError::Connectivity`] when the device
    /// never answers the handshake.
    pub async fn open(peer: SocketAddr, config: &MiioConfig) -> Result<Self, VacBotError> {
        let transport = UdpTransport::connect(peer, config.token()?, config.timeout()).await?;
        Ok(Self::connect(transport).await?)
    }
}

impl<T: MiioTransport> Vacuum for MiioVacuum<T> {
    async fn status(&self) -> CommandResult<String> {
        let result = self
            .transport
            .send("get_status", json!([]))
            .await
            .map_err(MiioError::into_failure)?;
        let code = status::state_code(result).map_err(MiioError::into_failure)?;
        Ok(status::status_text(code))
    }

    async fn pause(&self) -> CommandResult {
        self.command("app_pause", json!([])).await
    }

    async fn home(&self) -> CommandResult {
        if let Err(failure) = self.command("app_stop", json!([])).await {
            tracing::debug!(%failure, "stop before docking was not acknowledged");
        }
        self.command("app_charge", json!([])).await
    }

    async fn set_fan_level(&self, level: FanLevel) -> CommandResult {
        self.command("set_custom_mode", json!([level.value()])).await
    }

    async fn start_zone_cleaning(&self, regions: &[CleaningRegion]) -> CommandResult {
        if let Err(failure) = self.command("app_pause", json!([])).await {
            tracing::debug!(%failure, "pause before zoned clean was not acknowledged");
        }
        let params: Vec<[i32; 5]> = regions.iter().map(CleaningRegion::to_params).collect();
        self.command("app_zoned_clean", json!(params)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use vacbot_domain::command::CommandFailure;
    use vacbot_domain::geometry::{Point, Rectangle};

    /// Scripted transport: fails the first `failed_attempts` discoveries and
    /// answers sends from a queue, defaulting to `["ok"]`.
    #[derive(Default)]
    struct FakeTransport {
        failed_attempts: u32,
        attempts: AtomicU32,
        replies: Mutex<VecDeque<Result<Value, MiioError>>>,
        sent: Mutex<Vec<(&'static str, Value)>>,
    }

    impl FakeTransport {
        fn failing(failed_attempts: u32) -> Self {
            Self {
                failed_attempts,
                ..Self::default()
            }
        }

        fn reply(self, reply: Result<Value, MiioError>) -> Self {
            self.replies.lock().unwrap().push_back(reply);
            self
        }

        fn sent(&self) -> Vec<(&'static str, Value)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl MiioTransport for FakeTransport {
        fn address(&self) -> String {
            "10.0.0.7:54321".to_string()
        }

        async fn discover(&self) -> Result<(), MiioError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.failed_attempts {
                Err(MiioError::Timeout)
            } else {
                Ok(())
            }
        }

        async fn send(&self, method: &'static str, params: Value) -> Result<Value, MiioError> {
            self.sent.lock().unwrap().push((method, params));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!(["ok"])))
        }
    }

    async fn vacuum(transport: FakeTransport) -> MiioVacuum<FakeTransport> {
        MiioVacuum::connect(transport).await.unwrap()
    }

    fn kitchen() -> Vec<CleaningRegion> {
        let room = Rectangle::new(Point::new(25500, 25500), Point::new(28000, 27000)).unwrap();
        let door = Rectangle::new(Point::new(28000, 26000), Point::new(28300, 26800)).unwrap();
        vec![
            CleaningRegion::room(room, 2).unwrap(),
            CleaningRegion::door(door),
        ]
    }

    #[tokio::test]
    async fn should_connect_on_first_answer() {
        let vacuum = vacuum(FakeTransport::default()).await;
        assert_eq!(vacuum.transport.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn should_connect_when_third_attempt_succeeds() {
        let vacuum = vacuum(FakeTransport::failing(2)).await;
        assert_eq!(vacuum.transport.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn should_fail_after_three_unanswered_handshakes() {
        let err = MiioVacuum::connect(FakeTransport::failing(3))
            .await
            .err()
            .unwrap();
        assert_eq!(err.attempts, 3);
        assert_eq!(err.address, "10.0.0.7:54321");
    }

    #[tokio::test]
    async fn should_respect_custom_attempt_budget() {
        let result = MiioVacuum::connect_with_attempts(FakeTransport::failing(1), 1).await;
        assert!(result.is_err());
    }

    fn live_config(token: &str) -> MiioConfig {
        MiioConfig {
            token: token.to_string(),
            timeout_ms: 50,
            ..MiioConfig::default()
        }
    }

    #[tokio::test]
    async fn should_open_device_answering_handshake() {
        let device = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let peer = device.local_addr().unwrap();
        let answer = tokio::spawn(async move {
            let mut buf = [0_u8; 64];
            let (len, from) = device.recv_from(&mut buf).await.unwrap();
            assert_eq!(&buf[..len], &packet::HELLO);
            let mut reply = [0_u8; packet::HEADER_LEN];
            reply[..4].copy_from_slice(&packet::HELLO[..4]);
            device.send_to(&reply, from).await.unwrap();
        });

        let vacuum = MiioVacuum::open(peer, &live_config("00112233445566778899aabbccddeeff")).await;
        assert!(vacuum.is_ok());
        answer.await.unwrap();
    }

    #[tokio::test]
    async fn should_refuse_to_open_with_bad_token() {
        let peer: SocketAddr = "127.0.0.1:54321".parse().unwrap();
        let err = MiioVacuum::open(peer, &live_config("not-a-token"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, VacBotError::Device(_)));
    }

    #[tokio::test]
    async fn should_report_silent_device_as_connectivity_error() {
        let silent = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let peer = silent.local_addr().unwrap();
        let err = MiioVacuum::open(peer, &live_config("00112233445566778899aabbccddeeff"))
            .await
            .err()
            .unwrap();
        assert!(matches!(
            err,
            VacBotError::Connectivity(ConnectivityError { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn should_map_status_code_to_text() {
        let transport = FakeTransport::default().reply(Ok(json!([{"state": 8, "battery": 100}])));
        let vacuum = vacuum(transport).await;
        assert_eq!(vacuum.status().await.unwrap(), "Charging");
        assert_eq!(vacuum.transport.sent()[0].0, "get_status");
    }

    #[tokio::test]
    async fn should_fail_status_on_malformed_reply() {
        let transport = FakeTransport::default().reply(Ok(json!(["ok"])));
        let vacuum = vacuum(transport).await;
        assert!(matches!(
            vacuum.status().await,
            Err(CommandFailure::Transport(_))
        ));
    }

    #[tokio::test]
    async fn should_send_fan_level_value() {
        let vacuum = vacuum(FakeTransport::default()).await;
        for level in FanLevel::ALL {
            vacuum.set_fan_level(level).await.unwrap();
        }
        let params: Vec<Value> = vacuum
            .transport
            .sent()
            .into_iter()
            .map(|(method, params)| {
                assert_eq!(method, "set_custom_mode");
                params
            })
            .collect();
        assert_eq!(
            params,
            vec![
                json!([38]),
                json!([60]),
                json!([75]),
                json!([100]),
                json!([105])
            ]
        );
    }

    #[tokio::test]
    async fn should_stop_then_charge_when_going_home() {
        let vacuum = vacuum(FakeTransport::default()).await;
        vacuum.home().await.unwrap();
        let methods: Vec<&str> = vacuum.transport.sent().iter().map(|s| s.0).collect();
        assert_eq!(methods, vec!["app_stop", "app_charge"]);
    }

    #[tokio::test]
    async fn should_pause_before_zoned_clean() {
        let vacuum = vacuum(FakeTransport::default()).await;
        vacuum.start_zone_cleaning(&kitchen()).await.unwrap();

        let sent = vacuum.transport.sent();
        assert_eq!(sent[0].0, "app_pause");
        assert_eq!(sent[1].0, "app_zoned_clean");
        assert_eq!(
            sent[1].1,
            json!([[25500, 25500, 28000, 27000, 2], [28000, 26000, 28300, 26800, 1]])
        );
    }

    #[tokio::test]
    async fn should_clean_even_when_pause_is_rejected() {
        let transport = FakeTransport::default().reply(Ok(json!(["busy"])));
        let vacuum = vacuum(transport).await;
        assert!(vacuum.start_zone_cleaning(&kitchen()).await.is_ok());
        assert_eq!(vacuum.transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn should_report_rejected_acknowledgment() {
        let transport = FakeTransport::default().reply(Ok(json!([0])));
        let vacuum = vacuum(transport).await;
        assert_eq!(vacuum.pause().await, Err(CommandFailure::Rejected));
    }

    #[tokio::test]
    async fn should_report_timeout() {
        let transport = FakeTransport::default().reply(Err(MiioError::Timeout));
        let vacuum = vacuum(transport).await;
        assert_eq!(vacuum.pause().await, Err(CommandFailure::Timeout));
    }

    #[tokio::test]
    async fn should_report_device_error() {
        let transport = FakeTransport::default()
            .reply(Ok(json!(["ok"])))
            .reply(Err(MiioError::Device {
                code: -1,
                message: "busy".to_string(),
            }));
        let vacuum = vacuum(transport).await;
        assert_eq!(
            vacuum.start_zone_cleaning(&kitchen()).await,
            Err(CommandFailure::DeviceError {
                code: -1,
                message: "busy".to_string()
            })
        );
    }
}
