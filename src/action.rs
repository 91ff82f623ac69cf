// Action - permission URN checked by authorization
//
// {serviceType}:{service}:{resourceType}:{actionType}
//
// direct:client-portal:profile:view
// bank:payor-enrolment:enrolment:approve

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{KernelError, Result};
use crate::tags::{ActionType, ServiceType};
use crate::urn::{canonical_string_serde, require_non_blank, SEPARATOR};

const SEGMENT_COUNT: usize = 4;
const NAME_PATTERN_TEXT: &str = "[a-z][a-z0-9-]*";

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{NAME_PATTERN_TEXT}$")).expect("action name pattern is a valid regex")
});

/// Checks a service or resource-type name. `urn` is appended to the message
/// when the name came out of a parsed string.
fn validate_name(value: &str, field: &'static str, urn: Option<&str>) -> Result<String> {
    require_non_blank(value, field)?;
    if !NAME_PATTERN.is_match(value) {
        let context = urn.map(|urn| format!(". URN: {urn}")).unwrap_or_default();
        return Err(KernelError::format(format!(
            "Invalid {field} '{value}'. Must match pattern: {NAME_PATTERN_TEXT}{context}"
        )));
    }
    Ok(value.to_string())
}

/// A permission: which verb on which resource of which service.
///
/// Tags are case-insensitive on input and lower-case in the URN; names must
/// already be lower-case. Equality follows the canonical string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Action {
    service_type: ServiceType,
    service: String,
    resource_type: String,
    action_type: ActionType,
}

impl Action {
    pub fn of(
        service_type: ServiceType,
        service: &str,
        resource_type: &str,
        action_type: ActionType,
    ) -> Result<Self> {
        Ok(Action {
            service_type,
            service: validate_name(service, "service", None)?,
            resource_type: validate_name(resource_type, "resourceType", None)?,
            action_type,
        })
    }

    /// Parses exactly four colon-separated segments.
    pub fn parse(urn: &str) -> Result<Self> {
        Self::parse_segments(urn).inspect_err(|err| {
            tracing::debug!(urn, reason = %err, "rejected Action URN");
        })
    }

    fn parse_segments(urn: &str) -> Result<Self> {
        let segments: Vec<&str> = urn.split(SEPARATOR).collect();
        let [service_type, service, resource_type, action_type] = segments[..] else {
            return Err(KernelError::format(format!(
                "Invalid Action URN format. Expected {SEGMENT_COUNT} segments separated by '{SEPARATOR}' but got {}. URN: {urn}",
                segments.len()
            )));
        };

        let service_type = ServiceType::from_name(service_type).ok_or_else(|| {
            KernelError::format(format!(
                "Invalid service type '{service_type}' in URN. Valid types: {}. URN: {urn}",
                ServiceType::valid_names()
            ))
        })?;
        let service = validate_name(service, "service", Some(urn))?;
        let resource_type = validate_name(resource_type, "resourceType", Some(urn))?;
        let action_type = ActionType::from_name(action_type).ok_or_else(|| {
            KernelError::format(format!(
                "Invalid action type '{action_type}' in URN. Valid types: {}. URN: {urn}",
                ActionType::valid_names()
            ))
        })?;

        Ok(Action {
            service_type,
            service,
            resource_type,
            action_type,
        })
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn action_type(&self) -> ActionType {
        self.action_type
    }

    pub fn urn(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.service_type, self.service, self.resource_type, self.action_type
        )
    }
}

impl FromStr for Action {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

canonical_string_serde!(Action);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_normalizes_tags_to_lower_case() {
        let action = Action::parse("DIRECT:client-portal:profile:VIEW").unwrap();
        assert_eq!(action.urn(), "direct:client-portal:profile:view");
        assert_eq!(action.service_type(), ServiceType::Direct);
        assert_eq!(action.service(), "client-portal");
        assert_eq!(action.resource_type(), "profile");
        assert_eq!(action.action_type(), ActionType::View);
    }

    #[test]
    fn test_parse_all_service_types() {
        for urn in [
            "direct:client-portal:profile:view",
            "indirect:indirect-portal:client:update",
            "bank:payor-enrolment:enrolment:approve",
            "admin:user-management:user:manage",
        ] {
            assert_eq!(Action::parse(urn).unwrap().urn(), urn);
        }
    }

    #[test]
    fn test_mixed_case_tags_compare_equal() {
        let a = Action::parse("Bank:payments:batch:Approve").unwrap();
        let b = Action::parse("bank:payments:batch:approve").unwrap();
        let c = Action::of(ServiceType::Bank, "payments", "batch", ActionType::Approve).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        let set: HashSet<Action> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_segment_count_is_reported() {
        let err = Action::parse("direct:client-portal:view").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid Action URN format. Expected 4 segments separated by ':' but got 3. URN: direct:client-portal:view"
        );

        let err = Action::parse("direct:a:b:view:extra").unwrap_err();
        assert!(err.to_string().contains("but got 5"));

        let err = Action::parse("").unwrap_err();
        assert!(err.to_string().contains("but got 1"));
    }

    #[test]
    fn test_unknown_tags_list_valid_names() {
        let err = Action::parse("public:svc:res:view").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid service type 'public' in URN. Valid types: DIRECT, INDIRECT, BANK, ADMIN. URN: public:svc:res:view"
        );

        let err = Action::parse("direct:svc:res:execute").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid action type 'execute' in URN. Valid types: VIEW, CREATE, UPDATE, DELETE, APPROVE, MANAGE. URN: direct:svc:res:execute"
        );
    }

    #[test]
    fn test_names_must_match_pattern() {
        for bad in ["Client-Portal", "1portal", "client_portal", "client portal", "-portal"] {
            let urn = format!("direct:{bad}:profile:view");
            let err = Action::parse(&urn).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("Invalid service '{bad}'. Must match pattern: [a-z][a-z0-9-]*. URN: {urn}")
            );
        }

        let err = Action::parse("direct:portal:Profile:view").unwrap_err();
        assert!(err.to_string().starts_with("Invalid resourceType 'Profile'"));
    }

    #[test]
    fn test_blank_names_are_required() {
        assert_eq!(
            Action::parse("direct::profile:view"),
            Err(KernelError::required("service"))
        );
        assert_eq!(
            Action::of(ServiceType::Direct, "portal", " ", ActionType::View),
            Err(KernelError::required("resourceType"))
        );
    }

    #[test]
    fn test_component_constructor_validates_without_urn_context() {
        let err = Action::of(ServiceType::Admin, "Users", "user", ActionType::Manage).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid service 'Users'. Must match pattern: [a-z][a-z0-9-]*"
        );

        let action = Action::of(ServiceType::Admin, "user-management", "user2", ActionType::Manage)
            .unwrap();
        assert_eq!(action.urn(), "admin:user-management:user2:manage");
    }

    #[test]
    fn test_serde_round_trip() {
        let action = Action::parse("indirect:indirect-portal:client:update").unwrap();
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, "\"indirect:indirect-portal:client:update\"");
        let back: Action = serde_json::from_str("\"INDIRECT:indirect-portal:client:UPDATE\"").unwrap();
        assert_eq!(back, action);
    }
}
