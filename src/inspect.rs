// URN Inspection - parse an arbitrary URN and report what it is
//
// Backs the urn-inspect binary. Auto mode tries each parser in a fixed order
// and keeps the first that accepts the string.

use serde::Serialize;
use serde_json::{json, Value};

use crate::account::ClientAccountId;
use crate::action::Action;
use crate::client::{BankClientId, ClientId};
use crate::error::{KernelError, Result};
use crate::profile::{IndirectProfileId, OnlineProfileId, ProfileId, ServicingProfileId};

/// Which parser to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum UrnKind {
    /// Detect by trying every parser in turn
    Auto,
    Client,
    Account,
    Profile,
    OnlineProfile,
    IndirectProfile,
    ServicingProfile,
    Action,
}

impl UrnKind {
    /// Order tried by [`UrnKind::Auto`]. Specific profile kinds come before the
    /// open-ended `Profile`, which would otherwise accept all of them.
    pub const DETECTION_ORDER: [UrnKind; 7] = [
        UrnKind::Client,
        UrnKind::IndirectProfile,
        UrnKind::OnlineProfile,
        UrnKind::ServicingProfile,
        UrnKind::Account,
        UrnKind::Action,
        UrnKind::Profile,
    ];
}

/// Parse result: the detected kind, the canonical string and the components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    pub kind: UrnKind,
    pub canonical: String,
    pub components: Value,
}

pub fn inspect(kind: UrnKind, urn: &str) -> Result<Inspection> {
    match kind {
        UrnKind::Auto => detect(urn),
        UrnKind::Client => ClientId::parse(urn).map(|id| report(kind, id.urn(), client_components(&id))),
        UrnKind::Account => ClientAccountId::parse(urn).map(|id| {
            let components = json!({
                "accountSystem": id.account_system(),
                "accountType": id.account_type(),
                "accountNumberSegments": id.account_number_segments(),
                "grads": id.is_grads(),
            });
            report(kind, id.urn(), components)
        }),
        UrnKind::Profile => ProfileId::from_urn(urn).map(|id| {
            let components = json!({
                "profileType": id.profile_type(),
                "client": client_components(id.client_id()),
            });
            report(kind, id.urn(), components)
        }),
        UrnKind::OnlineProfile => OnlineProfileId::from_urn(urn).map(|id| {
            let components = json!({
                "client": id.client_id().urn(),
                "sequence": id.sequence(),
            });
            report(kind, id.urn(), components)
        }),
        UrnKind::IndirectProfile => IndirectProfileId::from_urn(urn).map(|id| {
            let indirect = ClientId::from(id.indirect_client_id().clone());
            let components = json!({
                "client": id.client_id().urn(),
                "indirectClient": client_components(&indirect),
            });
            report(kind, id.urn(), components)
        }),
        UrnKind::ServicingProfile => ServicingProfileId::from_urn(urn).map(|id| {
            let components = json!({
                "system": id.client_id().system(),
                "clientNumber": id.client_id().client_number(),
            });
            report(kind, id.urn(), components)
        }),
        UrnKind::Action => Action::parse(urn).map(|action| {
            let components = json!({
                "serviceType": action.service_type(),
                "service": action.service(),
                "resourceType": action.resource_type(),
                "actionType": action.action_type(),
            });
            report(kind, action.urn(), components)
        }),
    }
}

fn detect(urn: &str) -> Result<Inspection> {
    let mut outcome = Err(KernelError::format(format!("Unrecognized URN: {urn}")));
    for kind in UrnKind::DETECTION_ORDER {
        outcome = inspect(kind, urn);
        if outcome.is_ok() {
            break;
        }
    }
    outcome
}

fn report(kind: UrnKind, canonical: String, components: Value) -> Inspection {
    Inspection {
        kind,
        canonical,
        components,
    }
}

/// Indirect chains are reported flat: the base client plus the sequences
/// from the innermost layer outwards.
fn client_components(client_id: &ClientId) -> Value {
    let bank = |id: &BankClientId| json!({ "system": id.system(), "clientNumber": id.client_number() });
    match client_id {
        ClientId::Indirect(id) => json!({
            "system": client_id.system(),
            "base": bank(id.base()),
            "sequences": id.sequences().collect::<Vec<_>>(),
            "depth": id.depth(),
        }),
        _ => bank(&client_id.root()),
    }
}
