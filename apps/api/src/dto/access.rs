use serde::Serialize;
use tessera_domain::AccessDecision;
use ts_rs::TS;

/// Access decision as consumed by the admin frontend.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-decision-response.ts"
)]
pub struct AccessDecisionResponse {
    pub can_access_admin: bool,
    pub is_admin: bool,
    pub is_super_admin: bool,
    pub permissions: Vec<String>,
}

impl From<AccessDecision> for AccessDecisionResponse {
    fn from(decision: AccessDecision) -> Self {
        Self {
            can_access_admin: decision.can_access_admin,
            is_admin: decision.is_admin,
            is_super_admin: decision.is_super_admin,
            permissions: decision
                .permissions
                .into_iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tessera_domain::AccessDecision;

    use super::AccessDecisionResponse;

    #[test]
    fn denied_decision_serializes_with_camel_case_fields() {
        let response = AccessDecisionResponse::from(AccessDecision::denied());

        let Ok(value) = serde_json::to_value(&response) else {
            panic!("response should serialize");
        };

        assert_eq!(
            value,
            serde_json::json!({
                "canAccessAdmin": false,
                "isAdmin": false,
                "isSuperAdmin": false,
                "permissions": [],
            })
        );
    }
}
