use std::time::Duration;

use pretty_assertions::assert_eq;
use prp_client::HttpPlanService;
use prp_core::calculator;
use prp_core::{GoalQuoteRequest, PlanService, Profile, RiskComfort, SavePlanRequest, ServiceError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What the responder saw.
struct Captured {
    request_line: String,
    body: String,
}

/// Serve exactly one request on a loopback port with a canned response.
async fn one_shot(status: &'static str, body: String) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = sock.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = sock.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        sock.write_all(response.as_bytes()).await.unwrap();
        sock.shutdown().await.ok();

        Captured {
            request_line: head.lines().next().unwrap_or_default().to_string(),
            body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
        }
    });

    (base, handle)
}

fn profile() -> Profile {
    Profile {
        age: 35,
        monthly_income: 120_000.0,
        monthly_expenses: 70_000.0,
        family_size: 3,
        has_dependents: true,
        risk_comfort: RiskComfort::Medium,
        has_daughter: true,
        daughter_age: Some(5),
        has_son: false,
        son_age: None,
    }
}

fn service(base: &str) -> HttpPlanService {
    HttpPlanService::new(base, Some(Duration::from_secs(5))).unwrap()
}

#[tokio::test]
async fn test_calculate_plan_posts_profile_and_decodes_plan() {
    let body = serde_json::to_string(&calculator::calculate_plan(&profile())).unwrap();
    let (base, server) = one_shot("200 OK", body.clone()).await;

    let plan = service(&base).calculate_plan(&profile()).await.unwrap();
    let expected: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(serde_json::to_value(&plan).unwrap(), expected);

    let seen = server.await.unwrap();
    assert_eq!(seen.request_line, "POST /api/calculate-plan HTTP/1.1");
    let sent: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(sent["age"], 35);
    assert_eq!(sent["risk_comfort"], "Medium");
    assert_eq!(sent["daughter_age"], 5);
}

#[tokio::test]
async fn test_calculate_goal_round_trip() {
    let (base, server) = one_shot(
        "200 OK",
        r#"{"future_cost": 179084.77, "monthly_saving": 867.02}"#.to_string(),
    )
    .await;

    let quote = service(&base)
        .calculate_goal(GoalQuoteRequest {
            amount_today: 100_000.0,
            years: 10,
        })
        .await
        .unwrap();
    assert!((quote.future_cost - 179_084.77).abs() < 1e-6);
    assert!((quote.monthly_saving - 867.02).abs() < 1e-6);

    let seen = server.await.unwrap();
    assert_eq!(seen.request_line, "POST /api/calculate-goal HTTP/1.1");
    let sent: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(sent["years"], 10);
}

#[tokio::test]
async fn test_save_plan_returns_ack() {
    let (base, server) = one_shot(
        "200 OK",
        r#"{"id": "65a1f0", "message": "Plan saved successfully"}"#.to_string(),
    )
    .await;

    let plan = calculator::calculate_plan(&profile());
    let request = SavePlanRequest::new("user_42", profile(), &plan, &[]);
    let ack = service(&base).save_plan(&request).await.unwrap();
    assert_eq!(ack.id, "65a1f0");

    let seen = server.await.unwrap();
    assert_eq!(seen.request_line, "POST /api/plans HTTP/1.1");
    let sent: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(sent["user_id"], "user_42");
    assert!(sent["goals"]["goals"].is_array());
}

#[tokio::test]
async fn test_user_plans_hits_user_path() {
    let (base, server) = one_shot("200 OK", "[]".to_string()).await;

    let plans = service(&base).user_plans("user_7").await.unwrap();
    assert!(plans.is_empty());
    assert_eq!(
        server.await.unwrap().request_line,
        "GET /api/plans/user_7 HTTP/1.1"
    );
}

#[tokio::test]
async fn test_scheme_rates_decode() {
    let body = r#"{"schemes": [
        {"name": "PPF", "rate": 7.1, "description": "Public Provident Fund", "tenure": "15 years", "tax_benefit": "EEE"},
        {"name": "SSY", "rate": 8.2}
    ]}"#;
    let (base, server) = one_shot("200 OK", body.to_string()).await;

    let rates = service(&base).scheme_rates().await.unwrap();
    assert_eq!(rates.schemes.len(), 2);
    assert_eq!(rates.schemes[1].name, "SSY");
    assert_eq!(rates.schemes[1].tenure, "");
    assert_eq!(
        server.await.unwrap().request_line,
        "GET /api/scheme-rates HTTP/1.1"
    );
}

#[tokio::test]
async fn test_error_status_is_reported_without_reading_body() {
    let (base, server) = one_shot(
        "500 Internal Server Error",
        r#"{"detail": "database down"}"#.to_string(),
    )
    .await;

    let err = service(&base).plan("abc").await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::Status {
            call: "plan",
            status: 500
        }
    );
    assert!(!err.to_string().contains("database"));
    assert_eq!(
        server.await.unwrap().request_line,
        "GET /api/plan/abc HTTP/1.1"
    );
}

#[tokio::test]
async fn test_missing_goal_fields_is_a_client_error_status() {
    let (base, _server) = one_shot("400 Bad Request", r#"{"detail": "missing"}"#.to_string()).await;

    let err = service(&base)
        .calculate_goal(GoalQuoteRequest {
            amount_today: 1.0,
            years: 1,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Status { status: 400, .. }));
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let (base, _server) = one_shot("200 OK", r#"{"protection": 1}"#.to_string()).await;

    let err = service(&base).calculate_plan(&profile()).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Decode {
            call: "calculate-plan",
            ..
        }
    ));
}

#[tokio::test]
async fn test_refused_connection_is_a_transport_error() {
    // Bind then drop so the port is very likely closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = service(&format!("http://{addr}"))
        .scheme_rates()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Transport {
            call: "scheme-rates",
            ..
        }
    ));
}
