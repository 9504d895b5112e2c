use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;

    for path in ["/health", "/api/health"] {
        let response = app.api_client
            .get(format!("{}{}", &app.address, path))
            .send()
            .await
            .expect("Failed to execute request.");

        assert!(response.status().is_success(), "{} did not succeed", path);

        let body: serde_json::Value = response.json().await.expect("Health payload is not JSON");
        assert_eq!(body["status"], "OK");
        assert_eq!(body["message"], "API is running");
        let timestamp = body["timestamp"].as_str().expect("Missing timestamp");
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }
}
