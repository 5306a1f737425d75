//! The `/identity/2fa` contract: wire types, the resource client, the identity
//! proxy client, and the bundled provider catalog.

pub mod catalog;
pub mod client;
pub mod proxy;
pub mod types;

pub use client::Identity2FAClient;
pub use proxy::{ExchangeToken, IdentityProxyClient};
pub use types::{
    Auth2FAProvider, Auth2FAProviderType, Identity2FA, Identity2FAState, Identity2FAStatus,
    ProviderKind,
};
