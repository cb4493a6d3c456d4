//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector names an operation and describes its input, the expected
//! request, a simulated response and either the expected parse result or the
//! expected HTTP error. Results are compared as JSON values so field order
//! never matters.

use lvlup_core::{
    ApiError, ClientConfig, CreatePayment, HttpMethod, HttpRequest, HttpResponse, ListPayments,
    LvlRequests, NewUdpFilterException,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000/v4";

fn requests() -> LvlRequests {
    LvlRequests::new(ClientConfig::new("token").with_base_url(BASE_URL))
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn vps_id(input: &Value) -> &str {
    input["vps_id"].as_str().unwrap()
}

fn build(r: &LvlRequests, operation: &str, input: &Value) -> HttpRequest {
    let request = match operation {
        "create_payment" => {
            let payment: CreatePayment = serde_json::from_value(input.clone()).unwrap();
            r.build_create_payment(&payment)
        }
        "list_payments" => {
            let mut filter = ListPayments::new();
            if let Some(limit) = input["limit"].as_i64() {
                filter = filter.with_limit(limit);
            }
            if let Some(before_id) = input["beforeId"].as_i64() {
                filter = filter.with_before_id(before_id);
            }
            if let Some(after_id) = input["afterId"].as_i64() {
                filter = filter.with_after_id(after_id);
            }
            r.build_list_payments(&filter)
        }
        "wallet_balance" => r.build_wallet_balance(),
        "inspect_payment" => r.build_inspect_payment(input["id"].as_str().unwrap()),
        "list_services" => r.build_list_services(),
        "list_ddos_attacks" => r.build_list_ddos_attacks(vps_id(input)),
        "get_udp_filter" => r.build_get_udp_filter(vps_id(input)),
        "set_udp_filter" => {
            r.build_set_udp_filter(vps_id(input), input["filteringEnabled"].as_bool().unwrap())
        }
        "list_udp_filter_exceptions" => r.build_list_udp_filter_exceptions(vps_id(input)),
        "add_udp_filter_exception" => {
            let exception: NewUdpFilterException =
                serde_json::from_value(input["exception"].clone()).unwrap();
            r.build_add_udp_filter_exception(vps_id(input), &exception)
        }
        "remove_udp_filter_exception" => r.build_remove_udp_filter_exception(
            vps_id(input),
            input["exception_id"].as_i64().unwrap(),
        ),
        "get_proxmo_user" => r.build_get_proxmo_user(vps_id(input)),
        "start_vps" => r.build_start_vps(vps_id(input)),
        "get_vps_state" => r.build_get_vps_state(vps_id(input)),
        "stop_vps" => r.build_stop_vps(vps_id(input)),
        other => panic!("unknown operation: {other}"),
    };
    request.unwrap()
}

fn to_json<T: serde::Serialize>(result: Result<T, ApiError>) -> Result<Value, ApiError> {
    result.map(|value| serde_json::to_value(value).unwrap())
}

fn parse(r: &LvlRequests, operation: &str, response: HttpResponse) -> Result<Value, ApiError> {
    match operation {
        "create_payment" => to_json(r.parse_create_payment(response)),
        "list_payments" => to_json(r.parse_list_payments(response)),
        "wallet_balance" => to_json(r.parse_wallet_balance(response)),
        "inspect_payment" => to_json(r.parse_inspect_payment(response)),
        "list_services" => to_json(r.parse_list_services(response)),
        "list_ddos_attacks" => to_json(r.parse_list_ddos_attacks(response)),
        "get_udp_filter" => to_json(r.parse_get_udp_filter(response)),
        "set_udp_filter" => to_json(r.parse_set_udp_filter(response)),
        "list_udp_filter_exceptions" => to_json(r.parse_list_udp_filter_exceptions(response)),
        "add_udp_filter_exception" => to_json(r.parse_add_udp_filter_exception(response)),
        "remove_udp_filter_exception" => to_json(r.parse_remove_udp_filter_exception(response)),
        "get_proxmo_user" => to_json(r.parse_get_proxmo_user(response)),
        "start_vps" => to_json(r.parse_start_vps(response)),
        "get_vps_state" => to_json(r.parse_get_vps_state(response)),
        "stop_vps" => to_json(r.parse_stop_vps(response)),
        other => panic!("unknown operation: {other}"),
    }
}

fn run_vectors(raw: &str) {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let r = requests();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let operation = case["operation"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = build(&r, operation, &case["input"]);
        assert_eq!(
            req.method,
            parse_method(expected_req["method"].as_str().unwrap()),
            "{name}: method"
        );
        assert_eq!(
            req.url,
            format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()),
            "{name}: url"
        );

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (
                    arr[0].as_str().unwrap().to_string(),
                    arr[1].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        match &expected_req["body"] {
            Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
            expected => {
                let body: Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&body, expected, "{name}: body");
            }
        }

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse::new(
            sim["status"].as_u64().unwrap() as u16,
            sim["body"].as_str().unwrap(),
        );
        let result = parse(&r, operation, response);

        if let Some(expected_error) = case.get("expected_error") {
            match result.unwrap_err() {
                ApiError::Http {
                    status, message, ..
                } => {
                    assert_eq!(
                        u64::from(status),
                        expected_error["status"].as_u64().unwrap(),
                        "{name}: status"
                    );
                    assert_eq!(
                        message.as_deref(),
                        expected_error["message"].as_str(),
                        "{name}: message"
                    );
                }
                other => panic!("{name}: expected HTTP error, got {other:?}"),
            }
        } else {
            assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result");
        }
    }
}

#[test]
fn payment_test_vectors() {
    run_vectors(include_str!("../../test-vectors/payments.json"));
}

#[test]
fn service_test_vectors() {
    run_vectors(include_str!("../../test-vectors/services.json"));
}
