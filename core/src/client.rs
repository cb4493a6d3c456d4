//! Blocking client for the lvlup v4 API.
//!
//! # Design
//! `LvlClient` pairs the stateless `LvlRequests` with an injected
//! `Transport`. Every method is one round trip: build the request, send it,
//! parse the response. The client keeps no mutable state, so it can be
//! shared across threads whenever the transport can.

use tracing::instrument;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::options::{CreatePayment, ListPayments};
use crate::requests::LvlRequests;
use crate::transport::Transport;
use crate::types::{
    CreatePaymentResult, InspectPaymentResult, ListDdosAttacksResult, ListPaymentsResult,
    ListServicesResult, NewUdpFilterException, ProxmoUser, UdpFilter, UdpFilterException,
    VpsState, WalletBalance,
};

#[derive(Debug, Clone)]
pub struct LvlClient<T> {
    requests: LvlRequests,
    transport: T,
}

#[cfg(feature = "ureq")]
impl LvlClient<crate::transport::UreqTransport> {
    /// Client backed by a fresh `UreqTransport`.
    pub fn with_default_transport(config: ClientConfig) -> Self {
        Self::new(config, crate::transport::UreqTransport::new())
    }
}

impl<T: Transport> LvlClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            requests: LvlRequests::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.requests.config()
    }

    pub fn requests(&self) -> &LvlRequests {
        &self.requests
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.send(request).map_err(|err| {
            tracing::debug!(error = %err, "transport failed");
            ApiError::Transport(err)
        })?;
        tracing::debug!(status = response.status, "received response");
        Ok(response)
    }

    #[instrument(name = "lvlup.create_payment", skip_all, fields(amount = %payment.amount))]
    pub fn create_payment(&self, payment: &CreatePayment) -> Result<CreatePaymentResult, ApiError> {
        let response = self.send(self.requests.build_create_payment(payment)?)?;
        self.requests.parse_create_payment(response)
    }

    #[instrument(name = "lvlup.list_payments", skip_all)]
    pub fn list_payments(&self, filter: &ListPayments) -> Result<ListPaymentsResult, ApiError> {
        let response = self.send(self.requests.build_list_payments(filter)?)?;
        self.requests.parse_list_payments(response)
    }

    #[instrument(name = "lvlup.wallet_balance", skip_all)]
    pub fn wallet_balance(&self) -> Result<WalletBalance, ApiError> {
        let response = self.send(self.requests.build_wallet_balance()?)?;
        self.requests.parse_wallet_balance(response)
    }

    /// `Ok(None)` when no payment with `payment_id` exists.
    #[instrument(name = "lvlup.inspect_payment", skip(self))]
    pub fn inspect_payment(
        &self,
        payment_id: &str,
    ) -> Result<Option<InspectPaymentResult>, ApiError> {
        let response = self.send(self.requests.build_inspect_payment(payment_id)?)?;
        self.requests.parse_inspect_payment(response)
    }

    #[instrument(name = "lvlup.list_services", skip_all)]
    pub fn list_services(&self) -> Result<ListServicesResult, ApiError> {
        let response = self.send(self.requests.build_list_services()?)?;
        self.requests.parse_list_services(response)
    }

    #[instrument(name = "lvlup.list_ddos_attacks", skip(self))]
    pub fn list_ddos_attacks(&self, vps_id: &str) -> Result<ListDdosAttacksResult, ApiError> {
        let response = self.send(self.requests.build_list_ddos_attacks(vps_id)?)?;
        self.requests.parse_list_ddos_attacks(response)
    }

    #[instrument(name = "lvlup.get_udp_filter", skip(self))]
    pub fn get_udp_filter(&self, vps_id: &str) -> Result<UdpFilter, ApiError> {
        let response = self.send(self.requests.build_get_udp_filter(vps_id)?)?;
        self.requests.parse_get_udp_filter(response)
    }

    #[instrument(name = "lvlup.set_udp_filter", skip(self))]
    pub fn set_udp_filter(
        &self,
        vps_id: &str,
        filtering_enabled: bool,
    ) -> Result<UdpFilter, ApiError> {
        let response = self.send(
            self.requests
                .build_set_udp_filter(vps_id, filtering_enabled)?,
        )?;
        self.requests.parse_set_udp_filter(response)
    }

    #[instrument(name = "lvlup.list_udp_filter_exceptions", skip(self))]
    pub fn list_udp_filter_exceptions(
        &self,
        vps_id: &str,
    ) -> Result<Vec<UdpFilterException>, ApiError> {
        let response = self.send(self.requests.build_list_udp_filter_exceptions(vps_id)?)?;
        self.requests.parse_list_udp_filter_exceptions(response)
    }

    #[instrument(name = "lvlup.add_udp_filter_exception", skip(self, exception))]
    pub fn add_udp_filter_exception(
        &self,
        vps_id: &str,
        exception: &NewUdpFilterException,
    ) -> Result<(), ApiError> {
        let response = self.send(
            self.requests
                .build_add_udp_filter_exception(vps_id, exception)?,
        )?;
        self.requests.parse_add_udp_filter_exception(response)
    }

    #[instrument(name = "lvlup.remove_udp_filter_exception", skip(self))]
    pub fn remove_udp_filter_exception(
        &self,
        vps_id: &str,
        exception_id: i64,
    ) -> Result<(), ApiError> {
        let response = self.send(
            self.requests
                .build_remove_udp_filter_exception(vps_id, exception_id)?,
        )?;
        self.requests.parse_remove_udp_filter_exception(response)
    }

    /// Creates the Proxmox panel user, or resets its password if it exists.
    #[instrument(name = "lvlup.get_proxmo_user", skip(self))]
    pub fn get_proxmo_user(&self, vps_id: &str) -> Result<ProxmoUser, ApiError> {
        let response = self.send(self.requests.build_get_proxmo_user(vps_id)?)?;
        self.requests.parse_get_proxmo_user(response)
    }

    #[instrument(name = "lvlup.start_vps", skip(self))]
    pub fn start_vps(&self, vps_id: &str) -> Result<(), ApiError> {
        let response = self.send(self.requests.build_start_vps(vps_id)?)?;
        self.requests.parse_start_vps(response)
    }

    #[instrument(name = "lvlup.get_vps_state", skip(self))]
    pub fn get_vps_state(&self, vps_id: &str) -> Result<VpsState, ApiError> {
        let response = self.send(self.requests.build_get_vps_state(vps_id)?)?;
        self.requests.parse_get_vps_state(response)
    }

    #[instrument(name = "lvlup.stop_vps", skip(self))]
    pub fn stop_vps(&self, vps_id: &str) -> Result<(), ApiError> {
        let response = self.send(self.requests.build_stop_vps(vps_id)?)?;
        self.requests.parse_stop_vps(response)
    }
}
