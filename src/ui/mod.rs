// Client-side state helpers: wallet gating, style selection, clipboard.

pub mod clipboard;
pub mod style;
pub mod wallet_gate;

pub use clipboard::{Clipboard, ClipboardHook, MemoryClipboard};
pub use style::{ConfigStore, StyleSwitcher, StyleWrapper, UiConfig};
pub use wallet_gate::{ConnectionStatus, GateOutcome, WalletGate};
