//! Blocking client for the lvlup.pro v4 REST API.
//!
//! # Overview
//! Covers payments, the wallet, VPS power control, DDoS attack history and
//! UDP filtering. Every call is a single authenticated request/response
//! round trip; there are no retries, caches or background tasks.
//!
//! # Design
//! - `LvlRequests` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network.
//! - `LvlClient` pairs it with an injected `Transport`; `UreqTransport` is the
//!   default implementation (cargo feature `ureq`).
//! - `ClientConfig` is fixed at construction, including the base URL, so
//!   tests point a client at a mock server without mutating it afterwards.
//!
//! ```no_run
//! use lvlup_core::{ClientConfig, CreatePayment, LvlClient};
//!
//! let client = LvlClient::with_default_transport(ClientConfig::new("api-key").with_sandbox_mode());
//! let payment = client.create_payment(&CreatePayment::new("10.00").with_redirect("https://shop/done"))?;
//! println!("pay at {}", payment.url);
//! # Ok::<(), lvlup_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod options;
pub mod requests;
pub mod transport;
pub mod types;

pub use client::LvlClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError};
pub use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
pub use options::{CreatePayment, ListPayments};
pub use requests::LvlRequests;
pub use transport::{Transport, TransportError};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{
    CreatePaymentResult, DdosAttack, InspectPaymentResult, ListDdosAttacksResult,
    ListPaymentsResult, ListServicesResult, NewUdpFilterException, Payment, PortRange, ProxmoUser,
    Service, SetUdpFilter, UdpFilter, UdpFilterException, VpsState, WalletBalance,
};
