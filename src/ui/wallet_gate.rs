//! Gate for pages that require a connected wallet.
//!
//! The wallet status reported before the client has mounted is a default, not
//! an observation, so the gate refuses to act on it: until [`WalletGate::mount`]
//! is called every status renders the loading placeholder.

/// Placeholder text shown while the connection state is unknown.
pub const LOADING_MESSAGE: &str = "Initializing...";

/// Where a definitively disconnected visitor is sent.
pub const REDIRECT_PATH: &str = "/";

/// Wallet connection state as reported by the wallet client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    Reconnecting,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountPhase {
    #[default]
    Unmounted,
    Mounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Loading { message: &'static str },
    Redirect { location: &'static str },
    Render,
}

#[derive(Debug, Clone, Default)]
pub struct WalletGate {
    phase: MountPhase,
}

impl WalletGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unmounted -> Mounted. There is no way back.
    pub fn mount(&mut self) {
        self.phase = MountPhase::Mounted;
    }

    pub fn phase(&self) -> MountPhase {
        self.phase
    }

    pub fn outcome(&self, status: ConnectionStatus) -> GateOutcome {
        match (self.phase, status) {
            (MountPhase::Mounted, ConnectionStatus::Disconnected) => GateOutcome::Redirect {
                location: REDIRECT_PATH,
            },
            (MountPhase::Unmounted, _)
            | (_, ConnectionStatus::Connecting)
            | (_, ConnectionStatus::Reconnecting) => GateOutcome::Loading {
                message: LOADING_MESSAGE,
            },
            (MountPhase::Mounted, ConnectionStatus::Connected) => GateOutcome::Render,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ConnectionStatus; 4] = [
        ConnectionStatus::Connected,
        ConnectionStatus::Connecting,
        ConnectionStatus::Reconnecting,
        ConnectionStatus::Disconnected,
    ];

    #[test]
    fn nothing_is_trusted_before_mount() {
        let gate = WalletGate::new();
        for status in ALL {
            assert_eq!(gate.outcome(status), GateOutcome::Loading { message: LOADING_MESSAGE });
        }
    }

    #[test]
    fn mounted_gate_follows_status() {
        let mut gate = WalletGate::new();
        gate.mount();
        assert_eq!(gate.phase(), MountPhase::Mounted);

        assert_eq!(gate.outcome(ConnectionStatus::Connected), GateOutcome::Render);
        assert_eq!(
            gate.outcome(ConnectionStatus::Connecting),
            GateOutcome::Loading { message: LOADING_MESSAGE }
        );
        assert_eq!(
            gate.outcome(ConnectionStatus::Reconnecting),
            GateOutcome::Loading { message: LOADING_MESSAGE }
        );
        assert_eq!(
            gate.outcome(ConnectionStatus::Disconnected),
            GateOutcome::Redirect { location: "/" }
        );
    }
}
