/// Balance holder with deposit, withdraw, transfer and synchronization.
/// State is modified using events, which are created by handling commands
pub mod account;

/// Commands executed by [`account`], plus operation names used in scripts.
pub mod command;

/// External balance source consulted when an account synchronizes.
pub mod oracle;

/// Balance oracle settings, with environment overrides.
pub mod config;

/// Account processor interface, plus "in memory" implementation that
/// addresses accounts by client id.
pub mod processor;

/// Script runner used by the binary and the integration test.
pub mod bin_utils;
