use reqwest::Client;
use serde_json::Value;

use crate::core::record::Payload;

use super::error::ScanError;
use super::payload::ScanQuery;

/// `GET <base>/data?productId=..&date=..`. No timeout is applied.
pub async fn fetch_payload(
    client: &Client,
    base: &str,
    query: &ScanQuery,
) -> Result<Payload, ScanError> {
    let url = query.endpoint(base);
    tracing::info!(
        %url,
        product_id = %query.product_id,
        line = %query.line_code,
        date = %query.date_param(),
        "requesting records"
    );

    let response = client.get(&url).query(&query.query_pairs()).send().await?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%status, "data endpoint rejected the request");
        return Err(ScanError::FetchFailure(format!("HTTP {status}")));
    }

    let body: Value = response.json().await?;
    let payload = Payload::from_value(body);
    tracing::info!(
        records = payload.records().len(),
        limits = payload.limits().len(),
        "records received"
    );
    Ok(payload)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one canned response on a local port. The handle yields the
    /// request line that was received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut chunk = [0_u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let read = stream.read(&mut chunk).await.expect("read request");
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.expect("write response");
            stream.shutdown().await.ok();
            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });
        (format!("http://{addr}/"), handle)
    }

    fn query() -> ScanQuery {
        ScanQuery::parse("P100,L2,05/01/2024").expect("valid code")
    }

    #[tokio::test]
    async fn server_error_is_a_fetch_failure() {
        let (base, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
        let outcome = fetch_payload(&Client::new(), &base, &query()).await;

        match outcome {
            Err(ScanError::FetchFailure(detail)) => assert!(detail.contains("500"), "{detail}"),
            other => panic!("expected a fetch failure, got {other:?}"),
        }
        server.await.expect("stub server");
    }

    #[tokio::test]
    async fn array_body_becomes_a_batch() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"Fecha":"2024-01-05","Temperatura":75},{"Fecha":"2024-01-04","Temperatura":71}]"#,
        )
        .await;
        let payload = fetch_payload(&Client::new(), &base, &query())
            .await
            .expect("payload");

        assert!(matches!(payload, Payload::Batch(_)));
        assert_eq!(payload.records().len(), 2);

        let request_line = server.await.expect("stub server");
        assert!(request_line.starts_with("GET /data?"), "{request_line}");
        assert!(request_line.contains("productId=P100"), "{request_line}");
        assert!(request_line.contains("date=2024-01-05"), "{request_line}");
    }
}
