//! Wire DTOs for the lvlup v4 API.
//!
//! # Design
//! Field names follow the API's camelCase JSON exactly. The mock-server crate
//! defines its own copies; end-to-end tests catch schema drift between them.
//! Envelopes differ per endpoint (`{services}`, `{count, items}`, bare
//! arrays) and are kept as the API returns them.

use serde::{Deserialize, Serialize};

/// Result of `POST /wallet/up`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentResult {
    pub id: String,
    pub url: String,
}

/// One entry of `GET /payments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub amount: String,
    pub created_at: String,
    pub description: String,
    pub id: i64,
    pub method_id: i64,
    pub service_id: i64,
}

/// Result of `GET /payments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPaymentsResult {
    pub count: i64,
    pub items: Vec<Payment>,
}

/// Result of `GET /wallet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    pub balance_pln_formatted: String,
    pub balance_pln_int: i64,
}

/// Result of `GET /wallet/up/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectPaymentResult {
    pub amount_int: i64,
    #[serde(alias = "amuntStr")]
    pub amount_str: String,
    pub amount_with_fee_int: i64,
    pub amount_with_fee_str: String,
    pub payed: bool,
}

/// A hosted service (VPS, domain, ...) as listed by `GET /services`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i64,
    pub plan_name: String,
    pub active: bool,
    pub created_at: String,
    pub payed_to: String,
    pub ip: String,
    pub name: String,
    pub node_id: i64,
    pub service_id: i64,
}

/// Result of `GET /services`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListServicesResult {
    #[serde(alias = "Services")]
    pub services: Vec<Service>,
}

/// A DDoS attack recorded against a VPS. Timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DdosAttack {
    pub id: i64,
    pub ip: String,
    pub started_at: i64,
    pub ended_at: i64,
}

/// Result of `GET /services/vps/{id}/attacks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDdosAttacksResult {
    pub count: i64,
    pub items: Vec<DdosAttack>,
}

/// UDP filter state, returned by both the get and set filtering endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UdpFilter {
    pub filtering_enabled: bool,
    pub state: String,
}

/// Request payload for `PUT /services/vps/{id}/filtering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUdpFilter {
    pub filtering_enabled: bool,
}

/// Inclusive port range of a filter exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    #[serde(alias = "form")]
    pub from: u16,
    pub to: u16,
}

/// A UDP filter whitelist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UdpFilterException {
    pub id: i64,
    pub ports: Vec<PortRange>,
    pub protocol: String,
    pub state: String,
}

/// Request payload for `POST /services/vps/{id}/filtering/whitelist`.
/// The server assigns `id` and `state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUdpFilterException {
    pub ports: Vec<PortRange>,
    pub protocol: String,
}

/// Proxmox panel credentials returned by `POST /services/vps/{id}/proxmo`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxmoUser {
    pub password: String,
    pub url: String,
    pub username: String,
}

impl std::fmt::Debug for ProxmoUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxmoUser")
            .field("password", &"<redacted>")
            .field("url", &self.url)
            .field("username", &self.username)
            .finish()
    }
}

/// Result of `GET /services/vps/{id}/state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpsState {
    pub status: String,
    pub vm_uptime_s: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_payment_accepts_misspelled_amount_field() {
        let raw = r#"{"amountInt":1000,"amuntStr":"10.00","amountWithFeeInt":1100,"amountWithFeeStr":"11.00","payed":false}"#;
        let result: InspectPaymentResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.amount_str, "10.00");
        assert_eq!(result.amount_with_fee_int, 1100);
    }

    #[test]
    fn port_range_serializes_from_and_accepts_form() {
        let range = PortRange { from: 25565, to: 25570 };
        let json = serde_json::to_value(range).unwrap();
        assert_eq!(json, serde_json::json!({"from": 25565, "to": 25570}));

        let legacy: PortRange = serde_json::from_str(r#"{"form":1,"to":2}"#).unwrap();
        assert_eq!(legacy, PortRange { from: 1, to: 2 });
    }

    #[test]
    fn services_envelope_uses_named_field() {
        let raw = r#"{"services":[{"id":1,"planName":"VPS S","active":true,"createdAt":"2021-01-01","payedTo":"2021-02-01","ip":"10.0.0.1","name":"vps","nodeId":4,"serviceId":7}]}"#;
        let result: ListServicesResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.services.len(), 1);
        assert_eq!(result.services[0].plan_name, "VPS S");
        assert_eq!(result.services[0].node_id, 4);
    }

    #[test]
    fn vps_state_reads_uptime() {
        let state: VpsState = serde_json::from_str(r#"{"status":"running","vmUptimeS":42}"#).unwrap();
        assert_eq!(state.vm_uptime_s, 42);
    }

    #[test]
    fn proxmo_debug_hides_password() {
        let user = ProxmoUser {
            password: "hunter2".to_string(),
            url: "https://panel".to_string(),
            username: "u".to_string(),
        };
        assert!(!format!("{user:?}").contains("hunter2"));
    }
}
