// Shared Kernel - identifier and URN codecs for the banking platform
// Exposes all modules for use by services, the urn-inspect CLI, and tests

pub mod error;
pub mod urn;
pub mod tags;      // Closed vocabularies: account systems, action verbs, portals
pub mod account;   // ClientAccountId and per-system grammars
pub mod client;    // ClientId family, nested indirect clients
pub mod profile;   // Profile identifiers anchored to clients
pub mod action;    // Permission URNs
pub mod values;
pub mod ids;
pub mod directory;
pub mod inspect;

// Re-export commonly used types
pub use error::{KernelError, Result};
pub use tags::{
    AccountSystem, AccountType, OfiAccountType,
    ServiceType, ActionType, PortalType,
};
pub use account::ClientAccountId;
pub use client::{
    ClientId, BankClientId, SrfClientId, CdrClientId, IndirectClientId,
};
pub use profile::{
    ProfileId, ServicingProfileId, OnlineProfileId, IndirectProfileId,
};
pub use action::Action;
pub use values::{Currency, Address};
pub use ids::{UserId, UserGroupId, BatchId, BatchItemId, EnrollmentId};
pub use directory::{ClientNameResolver, ClientDirectory};
pub use inspect::{inspect, Inspection, UrnKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
