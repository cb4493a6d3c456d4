//! Stateless request builders and response parsers for every endpoint.
//!
//! # Design
//! `LvlRequests` holds only a `ClientConfig`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`; `LvlClient` glues the two together with
//! a `Transport`. Callers with their own HTTP stack can use this type
//! directly and keep the I/O on their side.
//!
//! Payment endpoints report failures with the status only, service
//! endpoints add the response body. `parse_inspect_payment` is the single
//! place where 404 is a valid answer.

use crate::config::ClientConfig;
use crate::decode::{decode_ok, expect_ok, ErrorDetail};
use crate::error::ApiError;
use crate::http::{build_segment_request, HttpMethod, HttpRequest, HttpResponse, RequestOptions};
use crate::options::{CreatePayment, ListPayments};
use crate::types::{
    CreatePaymentResult, InspectPaymentResult, ListDdosAttacksResult, ListPaymentsResult,
    ListServicesResult, NewUdpFilterException, ProxmoUser, SetUdpFilter, UdpFilter,
    UdpFilterException, VpsState, WalletBalance,
};

#[derive(Debug, Clone)]
pub struct LvlRequests {
    config: ClientConfig,
}

impl LvlRequests {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Options carrying the bearer token every endpoint requires.
    fn authorized(&self) -> RequestOptions {
        RequestOptions::new().with_header("authorization", self.config.bearer())
    }

    /// Path segments are escaped one by one, so ids cannot alter the route.
    fn request(
        &self,
        method: HttpMethod,
        segments: &[&str],
        options: RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        build_segment_request(self.config.base_url(), method, segments, options)
    }

    fn json_body<T: serde::Serialize>(&self, payload: &T) -> Result<RequestOptions, ApiError> {
        let body = serde_json::to_vec(payload).map_err(ApiError::Serialization)?;
        Ok(self.authorized().with_body(body))
    }

    // -----------------------------------------------------------------------
    // Payments
    // -----------------------------------------------------------------------

    pub fn build_create_payment(&self, payment: &CreatePayment) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Post, &["wallet", "up"], self.json_body(payment)?)
    }

    pub fn parse_create_payment(
        &self,
        response: HttpResponse,
    ) -> Result<CreatePaymentResult, ApiError> {
        decode_ok(&response, ErrorDetail::StatusOnly)
    }

    pub fn build_list_payments(&self, filter: &ListPayments) -> Result<HttpRequest, ApiError> {
        let options = self.authorized().with_query(filter.to_query());
        self.request(HttpMethod::Get, &["payments"], options)
    }

    pub fn parse_list_payments(
        &self,
        response: HttpResponse,
    ) -> Result<ListPaymentsResult, ApiError> {
        decode_ok(&response, ErrorDetail::StatusOnly)
    }

    pub fn build_wallet_balance(&self) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, &["wallet"], self.authorized())
    }

    pub fn parse_wallet_balance(&self, response: HttpResponse) -> Result<WalletBalance, ApiError> {
        decode_ok(&response, ErrorDetail::StatusOnly)
    }

    pub fn build_inspect_payment(&self, payment_id: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, &["wallet", "up", payment_id], self.authorized())
    }

    /// `Ok(None)` when the payment does not exist (HTTP 404).
    pub fn parse_inspect_payment(
        &self,
        response: HttpResponse,
    ) -> Result<Option<InspectPaymentResult>, ApiError> {
        if response.status == 404 {
            return Ok(None);
        }
        decode_ok(&response, ErrorDetail::StatusOnly).map(Some)
    }

    // -----------------------------------------------------------------------
    // Services
    // -----------------------------------------------------------------------

    pub fn build_list_services(&self) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, &["services"], self.authorized())
    }

    pub fn parse_list_services(
        &self,
        response: HttpResponse,
    ) -> Result<ListServicesResult, ApiError> {
        decode_ok(&response, ErrorDetail::WithBody)
    }

    pub fn build_list_ddos_attacks(&self, vps_id: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, &["services", "vps", vps_id, "attacks"], self.authorized())
    }

    pub fn parse_list_ddos_attacks(
        &self,
        response: HttpResponse,
    ) -> Result<ListDdosAttacksResult, ApiError> {
        decode_ok(&response, ErrorDetail::WithBody)
    }

    pub fn build_get_udp_filter(&self, vps_id: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, &["services", "vps", vps_id, "filtering"], self.authorized())
    }

    pub fn parse_get_udp_filter(&self, response: HttpResponse) -> Result<UdpFilter, ApiError> {
        decode_ok(&response, ErrorDetail::WithBody)
    }

    pub fn build_set_udp_filter(
        &self,
        vps_id: &str,
        filtering_enabled: bool,
    ) -> Result<HttpRequest, ApiError> {
        let options = self.json_body(&SetUdpFilter { filtering_enabled })?;
        self.request(HttpMethod::Put, &["services", "vps", vps_id, "filtering"], options)
    }

    pub fn parse_set_udp_filter(&self, response: HttpResponse) -> Result<UdpFilter, ApiError> {
        decode_ok(&response, ErrorDetail::WithBody)
    }

    pub fn build_list_udp_filter_exceptions(&self, vps_id: &str) -> Result<HttpRequest, ApiError> {
        self.request(
            HttpMethod::Get,
            &["services", "vps", vps_id, "filtering", "whitelist"],
            self.authorized(),
        )
    }

    pub fn parse_list_udp_filter_exceptions(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<UdpFilterException>, ApiError> {
        decode_ok(&response, ErrorDetail::WithBody)
    }

    pub fn build_add_udp_filter_exception(
        &self,
        vps_id: &str,
        exception: &NewUdpFilterException,
    ) -> Result<HttpRequest, ApiError> {
        self.request(
            HttpMethod::Post,
            &["services", "vps", vps_id, "filtering", "whitelist"],
            self.json_body(exception)?,
        )
    }

    pub fn parse_add_udp_filter_exception(&self, response: HttpResponse) -> Result<(), ApiError> {
        expect_ok(&response, ErrorDetail::WithBody)
    }

    pub fn build_remove_udp_filter_exception(
        &self,
        vps_id: &str,
        exception_id: i64,
    ) -> Result<HttpRequest, ApiError> {
        let exception_id = exception_id.to_string();
        self.request(
            HttpMethod::Delete,
            &["services", "vps", vps_id, "filtering", "whitelist", exception_id.as_str()],
            self.authorized(),
        )
    }

    pub fn parse_remove_udp_filter_exception(
        &self,
        response: HttpResponse,
    ) -> Result<(), ApiError> {
        expect_ok(&response, ErrorDetail::WithBody)
    }

    /// Creates the Proxmox panel user, or resets its password if it exists.
    pub fn build_get_proxmo_user(&self, vps_id: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Post, &["services", "vps", vps_id, "proxmo"], self.authorized())
    }

    pub fn parse_get_proxmo_user(&self, response: HttpResponse) -> Result<ProxmoUser, ApiError> {
        decode_ok(&response, ErrorDetail::WithBody)
    }

    pub fn build_start_vps(&self, vps_id: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Post, &["services", "vps", vps_id, "start"], self.authorized())
    }

    pub fn parse_start_vps(&self, response: HttpResponse) -> Result<(), ApiError> {
        expect_ok(&response, ErrorDetail::WithBody)
    }

    pub fn build_get_vps_state(&self, vps_id: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, &["services", "vps", vps_id, "state"], self.authorized())
    }

    pub fn parse_get_vps_state(&self, response: HttpResponse) -> Result<VpsState, ApiError> {
        decode_ok(&response, ErrorDetail::WithBody)
    }

    pub fn build_stop_vps(&self, vps_id: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Post, &["services", "vps", vps_id, "stop"], self.authorized())
    }

    pub fn parse_stop_vps(&self, response: HttpResponse) -> Result<(), ApiError> {
        expect_ok(&response, ErrorDetail::WithBody)
    }
}
